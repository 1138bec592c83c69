//! Robot Race - procedural geometry for a race track viewer
//!
//! Core modules:
//! - `curve`: Bezier track curves and lateral offset (lane) curves
//! - `track`: The selectable track catalog
//! - `mesh`: Track ring and terrain tessellation, GPU vertex packing
//! - `race`: Racers advancing along the track (the tracked entities)
//! - `camera`: View state and the camera mode state machine
//! - `scene`: Per-frame driver tying everything together
//! - `settings`: Data-driven configuration

pub mod camera;
pub mod curve;
pub mod error;
pub mod mesh;
pub mod race;
pub mod scene;
pub mod settings;
pub mod track;

pub use error::{GeometryError, SettingsError};
pub use scene::Scene;
pub use settings::{QualityPreset, Settings};

use glam::DVec3;

/// Geometry configuration constants
pub mod consts {
    use glam::DVec3;

    /// World up axis
    pub const WORLD_UP: DVec3 = DVec3::Z;

    /// Samples per lane ring at the default quality
    pub const TRACK_SEGMENTS: usize = 300;
    /// Terrain cells per axis direction at the default quality (grid is 2x this)
    pub const TERRAIN_SEGMENTS: usize = 100;

    /// Lane boundaries from innermost to outermost
    pub const LANE_OFFSETS: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
    /// Parameter span of the start line strip
    pub const START_LINE_SPAN: f64 = 0.001;
    /// Lift of the start line above the roadway (avoids z-fighting)
    pub const START_LINE_BIAS: f64 = 0.0001;
    /// Height the edge walls drop down to
    pub const WALL_FLOOR_Z: f64 = -1.0;
    /// Wall texture repeats once every this many samples
    pub const WALL_UV_PERIOD: f64 = 8.0;

    /// Number of racers on the track
    pub const RACER_COUNT: usize = 4;
    /// Racer speed (track fractions per time unit) = minimum + U[0,1) * multiplier
    pub const SPEED_MINIMUM: f64 = 0.05;
    pub const SPEED_MULTIPLIER: f64 = 0.05;
    /// Head height above a racer's track position (head z + half head height)
    pub const HEAD_HEIGHT: f64 = 0.8;

    /// Camera defaults
    pub const HELICOPTER_HEIGHT: f64 = 50.0;
    pub const MOTORCYCLE_RADIUS: f64 = 20.0;
    pub const MOTORCYCLE_LIFT: f64 = 1.0;
    pub const FIRST_PERSON_LOOK_AHEAD: f64 = 10.0;
    /// Auto mode re-picks a camera mode this often (animation time units)
    pub const AUTO_MODE_INTERVAL: i64 = 10;
    /// Tracked racer is re-picked this often (animation time units)
    pub const AUTO_ENTITY_INTERVAL: i64 = 5;

    /// Tangents shorter than this cannot define a lane normal
    pub const TANGENT_EPSILON: f64 = 1e-12;
}

/// Wrap a curve parameter into [0, 1)
#[inline]
pub fn wrap_unit(t: f64) -> f64 {
    let wrapped = t.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Convert spherical (distance, azimuth, elevation) to a cartesian offset
#[inline]
pub fn spherical_to_cartesian(distance: f64, azimuth: f64, elevation: f64) -> DVec3 {
    DVec3::new(
        distance * azimuth.cos() * elevation.cos(),
        distance * azimuth.sin() * elevation.cos(),
        distance * elevation.sin(),
    )
}
