//! Robot Race entry point
//!
//! Headless driver: builds the scene, runs the animation for a while cycling
//! through every track and camera mode, and packs each frame's geometry the
//! way a renderer would upload it.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use robot_race::camera::ViewState;
    use robot_race::mesh::{GpuVertex, Material, RenderSink, TriangleList, TriangleStrip};
    use robot_race::track::TrackId;
    use robot_race::{GeometryError, Scene, Settings};

    const FRAME_DT: f64 = 0.25;
    const FRAMES_PER_VIEW: usize = 40;
    const CAMERA_MODES: usize = 5;

    /// Packs geometry into upload buffers and keeps totals
    #[derive(Default)]
    struct UploadSink {
        bytes: usize,
        draws: usize,
        triangles: usize,
    }

    impl UploadSink {
        fn upload(&mut self, material: Material, vertices: &[GpuVertex], triangles: usize) {
            let data: &[u8] = bytemuck::cast_slice(vertices);
            log::trace!("{:?}: {} bytes", material, data.len());
            self.bytes += data.len();
            self.draws += 1;
            self.triangles += triangles;
        }
    }

    impl RenderSink for UploadSink {
        fn draw_strip(&mut self, material: Material, strip: &TriangleStrip) {
            self.upload(material, &strip.to_gpu(), strip.triangle_count());
        }

        fn draw_triangles(&mut self, material: Material, triangles: &TriangleList) {
            self.upload(material, &triangles.to_gpu(), triangles.triangle_count());
        }
    }

    pub fn run() -> Result<(), GeometryError> {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load_or_default(&PathBuf::from(path)),
            None => Settings::default(),
        };
        let mut scene = Scene::new(settings)?;

        let mut view = ViewState {
            distance: 60.0,
            elevation: 0.6,
            view_width: 40.0,
            ..Default::default()
        };
        let mut time = 0.0;

        for track in 0..TrackId::COUNT {
            for camera in 0..CAMERA_MODES {
                view.track = track;
                view.camera = camera;

                let mut sink = UploadSink::default();
                for _ in 0..FRAMES_PER_VIEW {
                    time += FRAME_DT;
                    view.time = time;
                    view.azimuth = time * 0.1;
                    let state = scene.frame(&view)?;
                    log::debug!(
                        "t={:.2} {} eye={:.2} center={:.2}",
                        time,
                        state.mode.as_str(),
                        state.eye,
                        state.center
                    );
                    scene.submit(&mut sink);
                }

                let state = scene.camera().state();
                log::info!(
                    "{} track, camera {}: {} draws, {} triangles, {} KiB uploaded, last eye {:.1}",
                    scene.selected_track().as_str(),
                    state.mode.as_str(),
                    sink.draws,
                    sink.triangles,
                    sink.bytes / 1024,
                    state.eye
                );
            }
        }

        log::info!("Built {} track meshes", scene.track_builds());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Robot Race (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("Scene failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by an embedding renderer on the web
}
