//! Per-frame scene driver
//!
//! Owns all static geometry and the per-frame state. A frame is computed in
//! two phases: [`Scene::frame`] updates racers and the camera (building the
//! selected track mesh the first time it is seen), then [`Scene::submit`]
//! hands the cached geometry to a renderer.

use crate::camera::{CameraController, CameraMode, CameraState, ViewState};
use crate::error::GeometryError;
use crate::mesh::{
    Material, RenderSink, RollingHills, TerrainGrid, TerrainMesh, TrackMesh, TrackMeshBuilder,
    TrackMeshCache,
};
use crate::race::{RaceField, RaceParams};
use crate::settings::Settings;
use crate::track::{TrackCatalog, TrackId};

pub struct Scene {
    settings: Settings,
    catalog: TrackCatalog,
    tracks: TrackMeshCache,
    terrain: TerrainGrid,
    race: RaceField,
    camera: CameraController,
}

impl Scene {
    /// Validate configuration and build the terrain; track meshes are built on demand
    pub fn new(settings: Settings) -> Result<Self, GeometryError> {
        let catalog = TrackCatalog::builtin()?;
        let builder =
            TrackMeshBuilder::new(settings.track.lane_offsets(), settings.quality.track_segments())?
                .with_wall_floor(settings.track.wall_floor);
        let terrain = TerrainMesh::build(
            &RollingHills,
            settings.terrain.bounds,
            settings.quality.terrain_segments(),
        )?;
        let race = RaceField::new(
            settings.race.racer_count,
            RaceParams {
                speed_minimum: settings.race.speed_minimum,
                speed_multiplier: settings.race.speed_multiplier,
                head_height: settings.race.head_height,
            },
            settings.race.seed,
        );
        let camera_seed = settings.race.seed.wrapping_add(1);
        let camera = CameraController::seeded(settings.camera.clone(), camera_seed);
        log::info!(
            "Scene ready ({} quality, {} racers)",
            settings.quality.as_str(),
            settings.race.racer_count
        );

        Ok(Self {
            settings,
            catalog,
            tracks: TrackMeshCache::new(builder),
            terrain,
            race,
            camera,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn selected_track(&self) -> TrackId {
        self.tracks.selected()
    }

    /// Mesh of the selected track, once a frame has built it
    pub fn track_mesh(&self) -> Option<&TrackMesh> {
        self.tracks.cached(self.tracks.selected())
    }

    pub fn track_builds(&self) -> usize {
        self.tracks.build_count()
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn race(&self) -> &RaceField {
        &self.race
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Advance to `view.time` and compute the camera.
    ///
    /// Only the first frame that selects a given track can fail, since that is
    /// when its mesh is built.
    pub fn frame(&mut self, view: &ViewState) -> Result<CameraState, GeometryError> {
        let previous = self.tracks.selected();
        let track = self.tracks.select(&self.catalog, view.track)?.track;
        if track != previous {
            log::info!("Switched to {} track", track.as_str());
        }

        self.race.advance(view.time, &self.catalog.lanes(track));

        let mode = CameraMode::from_selector(view.camera, self.camera.settings());
        Ok(self.camera.update(mode, view, &self.race))
    }

    /// Stream terrain, water and the selected track to a renderer
    pub fn submit(&self, sink: &mut impl RenderSink) {
        sink.draw_triangles(Material::Terrain, &self.terrain.surface);
        if let Some(mesh) = self.track_mesh() {
            for (material, strip) in mesh.strips() {
                sink.draw_strip(material, strip);
            }
        }
        // Translucent, so last
        sink.draw_strip(Material::Water, &self.terrain.water);
    }
}
