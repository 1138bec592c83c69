//! Track ring tessellation
//!
//! A track is drawn as closed triangle-strip rings between neighbouring lane
//! boundaries, a thin start line across all lanes, and two skirt walls that
//! drop from the outermost boundaries down to a fixed floor height.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::Material;
use super::vertex::TriangleStrip;
use crate::consts::*;
use crate::curve::{Curve, OffsetCurve};
use crate::error::GeometryError;
use crate::track::{TrackCatalog, TrackId, Winding};

/// Which side of the loop a wall skirts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// Faces the area enclosed by the track
    Inner,
    /// Faces away from the enclosed area
    Outer,
}

impl WallSide {
    #[inline]
    fn sign(self) -> f64 {
        match self {
            WallSide::Inner => -1.0,
            WallSide::Outer => 1.0,
        }
    }
}

/// Static geometry of one track
///
/// Roadway strips (lanes and start line) wind clockwise seen from above on
/// every track, so their front face is CW while the normal attribute is +Z.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackMesh {
    pub track: TrackId,
    pub winding: Winding,
    pub segments: usize,
    /// One ring per adjacent lane boundary pair, innermost offset first
    pub lanes: Vec<TriangleStrip>,
    pub start_line: TriangleStrip,
    pub inner_wall: TriangleStrip,
    pub outer_wall: TriangleStrip,
}

impl TrackMesh {
    /// Every strip of the track with its material, in draw order
    pub fn strips(&self) -> impl Iterator<Item = (Material, &TriangleStrip)> {
        self.lanes
            .iter()
            .enumerate()
            .map(|(i, lane)| (Material::Lane(i as u8), lane))
            .chain([
                (Material::StartLine, &self.start_line),
                (Material::Wall(WallSide::Inner), &self.inner_wall),
                (Material::Wall(WallSide::Outer), &self.outer_wall),
            ])
    }

    pub fn vertex_count(&self) -> usize {
        self.strips().map(|(_, strip)| strip.len()).sum()
    }
}

/// Tessellation parameters shared by every track
#[derive(Debug, Clone)]
pub struct TrackMeshBuilder {
    lane_offsets: Vec<f64>,
    segments: usize,
    wall_floor: f64,
}

impl TrackMeshBuilder {
    /// `lane_offsets` must be strictly increasing with at least two entries
    pub fn new(lane_offsets: Vec<f64>, segments: usize) -> Result<Self, GeometryError> {
        if lane_offsets.len() < 2 {
            return Err(GeometryError::InvalidConfiguration(
                "a track needs at least two lane boundaries".to_string(),
            ));
        }
        if lane_offsets.windows(2).any(|w| w[0] >= w[1] || !w[1].is_finite()) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "lane offsets must be strictly increasing, got {:?}",
                lane_offsets
            )));
        }
        if segments < 3 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "a closed ring needs at least 3 segments, got {}",
                segments
            )));
        }
        Ok(Self {
            lane_offsets,
            segments,
            wall_floor: WALL_FLOOR_Z,
        })
    }

    pub fn with_wall_floor(mut self, wall_floor: f64) -> Self {
        self.wall_floor = wall_floor;
        self
    }

    pub fn lane_offsets(&self) -> &[f64] {
        &self.lane_offsets
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    #[inline]
    fn innermost(&self) -> f64 {
        self.lane_offsets[0]
    }

    #[inline]
    fn outermost(&self) -> f64 {
        self.lane_offsets[self.lane_offsets.len() - 1]
    }

    /// Parameter of ring sample `i`; sample `segments` closes the ring at t = 0
    #[inline]
    fn ring_t(&self, i: usize) -> f64 {
        (i % self.segments) as f64 / self.segments as f64
    }

    /// Tessellate one track
    pub fn build<C: Curve>(&self, track: TrackId, curve: &C) -> Result<TrackMesh, GeometryError> {
        let lanes = OffsetCurve::new(curve);
        let winding = Winding::of(curve, self.segments);

        let rings = self
            .lane_offsets
            .windows(2)
            .map(|pair| self.lane_ring(&lanes, pair[0], pair[1]))
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = TrackMesh {
            track,
            winding,
            segments: self.segments,
            lanes: rings,
            start_line: self.start_line(&lanes)?,
            inner_wall: self.wall(&lanes, winding, WallSide::Inner)?,
            outer_wall: self.wall(&lanes, winding, WallSide::Outer)?,
        };
        log::info!(
            "Built {} track mesh: {} lanes, {} vertices, {:?}",
            track.as_str(),
            mesh.lanes.len(),
            mesh.vertex_count(),
            winding
        );
        Ok(mesh)
    }

    /// Zig-zag ring between two boundaries: inner(i), outer(i), inner(i+1), ...
    fn lane_ring<C: Curve>(
        &self,
        lanes: &OffsetCurve<C>,
        inner_offset: f64,
        outer_offset: f64,
    ) -> Result<TriangleStrip, GeometryError> {
        let up = lanes.up();
        let mut strip = TriangleStrip::with_capacity(2 * (self.segments + 1));
        for i in 0..=self.segments {
            let t = self.ring_t(i);
            let along = i as f64 / WALL_UV_PERIOD;
            strip.push(lanes.evaluate(t, inner_offset)?, up, DVec2::new(0.0, along));
            strip.push(lanes.evaluate(t, outer_offset)?, up, DVec2::new(1.0, along));
        }
        Ok(strip)
    }

    /// Short strip across the full width just past t = 0, lifted off the road
    fn start_line<C: Curve>(&self, lanes: &OffsetCurve<C>) -> Result<TriangleStrip, GeometryError> {
        let up = lanes.up();
        let lift = up * START_LINE_BIAS;
        let mut strip = TriangleStrip::with_capacity(4);
        for (t, v) in [(0.0, 0.0), (START_LINE_SPAN, 1.0)] {
            strip.push(lanes.evaluate(t, self.innermost())? + lift, up, DVec2::new(0.0, v));
            strip.push(lanes.evaluate(t, self.outermost())? + lift, up, DVec2::new(1.0, v));
        }
        Ok(strip)
    }

    /// Skirt from one extreme boundary down to the floor
    fn wall<C: Curve>(
        &self,
        lanes: &OffsetCurve<C>,
        winding: Winding,
        side: WallSide,
    ) -> Result<TriangleStrip, GeometryError> {
        // Increasing offsets point out of the loop only on clockwise tracks
        let outward_is_outermost = winding == Winding::Clockwise;
        let offset = match (side, outward_is_outermost) {
            (WallSide::Outer, true) | (WallSide::Inner, false) => self.outermost(),
            (WallSide::Outer, false) | (WallSide::Inner, true) => self.innermost(),
        };
        // The raw edge cross product points toward increasing offsets
        let flip = winding.outward_sign() * side.sign();

        let mut strip = TriangleStrip::with_capacity(2 * (self.segments + 1));
        for i in 0..=self.segments {
            let t = self.ring_t(i);
            let top = lanes.evaluate(t, offset)?;
            let next_top = lanes.evaluate(self.ring_t(i + 1), offset)?;
            let bottom = DVec3::new(top.x, top.y, self.wall_floor);

            let normal = (next_top - top).cross(bottom - top) * flip;
            if normal.length_squared() < TANGENT_EPSILON * TANGENT_EPSILON {
                return Err(GeometryError::DegenerateTangent { t });
            }
            let normal = normal.normalize();

            let u = i as f64 / WALL_UV_PERIOD;
            strip.push(top, normal, DVec2::new(u, 1.0));
            strip.push(bottom, normal, DVec2::new(u, 0.0));
        }
        Ok(strip)
    }
}

/// Lazily built track meshes, at most one per track id
pub struct TrackMeshCache {
    builder: TrackMeshBuilder,
    slots: [Option<TrackMesh>; TrackId::COUNT],
    builds: usize,
    selected: TrackId,
}

impl TrackMeshCache {
    pub fn new(builder: TrackMeshBuilder) -> Self {
        Self {
            builder,
            slots: Default::default(),
            builds: 0,
            selected: TrackId::default(),
        }
    }

    pub fn builder(&self) -> &TrackMeshBuilder {
        &self.builder
    }

    /// Number of meshes built so far
    pub fn build_count(&self) -> usize {
        self.builds
    }

    pub fn selected(&self) -> TrackId {
        self.selected
    }

    /// Mesh for `id` if it has been built
    pub fn cached(&self, id: TrackId) -> Option<&TrackMesh> {
        self.slots[id.index()].as_ref()
    }

    /// Mesh for `id`, building it on first use
    pub fn mesh(
        &mut self,
        catalog: &TrackCatalog,
        id: TrackId,
    ) -> Result<&TrackMesh, GeometryError> {
        let slot = &mut self.slots[id.index()];
        fill_slot(slot, &self.builder, &mut self.builds, catalog, id)
    }

    /// Apply a UI track selector.
    ///
    /// Unknown selectors keep the current track. A track whose build fails is
    /// not selected, so the current track stays drawable.
    pub fn select(
        &mut self,
        catalog: &TrackCatalog,
        index: usize,
    ) -> Result<&TrackMesh, GeometryError> {
        let id = match TrackId::from_index(index) {
            Some(id) => id,
            None => {
                log::warn!(
                    "Ignoring unknown track selector {}, keeping {}",
                    index,
                    self.selected.as_str()
                );
                self.selected
            }
        };
        let slot = &mut self.slots[id.index()];
        let mesh = fill_slot(slot, &self.builder, &mut self.builds, catalog, id)?;
        self.selected = id;
        Ok(mesh)
    }
}

fn fill_slot<'a>(
    slot: &'a mut Option<TrackMesh>,
    builder: &TrackMeshBuilder,
    builds: &mut usize,
    catalog: &TrackCatalog,
    id: TrackId,
) -> Result<&'a TrackMesh, GeometryError> {
    match slot {
        Some(mesh) => Ok(&*mesh),
        None => {
            let mesh = builder.build(id, catalog.curve(id))?;
            *builds += 1;
            Ok(&*slot.insert(mesh))
        }
    }
}
