//! Camera modes and view state

pub mod controller;

pub use controller::CameraController;

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use crate::consts::WORLD_UP;
use crate::settings::CameraSettings;

/// Camera mode with the parameters that mode needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Free orbit around the focus point
    Default,
    /// Straight above the followed racer
    Helicopter { height: f64 },
    /// Beside the followed racer
    MotorCycle { radius: f64, lift: f64 },
    /// From the followed racer's head, looking along the track
    FirstPerson { look_ahead: f64 },
    /// Periodically switches between the other four
    Auto,
}

impl CameraMode {
    /// Map a UI selector (0-4) onto a mode; anything else falls back to Default
    pub fn from_selector(index: usize, settings: &CameraSettings) -> Self {
        match index {
            1 => CameraMode::Helicopter {
                height: settings.helicopter_height,
            },
            2 => CameraMode::MotorCycle {
                radius: settings.motorcycle_radius,
                lift: settings.motorcycle_lift,
            },
            3 => CameraMode::FirstPerson {
                look_ahead: settings.look_ahead,
            },
            4 => CameraMode::Auto,
            0 => CameraMode::Default,
            _ => {
                log::warn!("Unknown camera selector {}, using default mode", index);
                CameraMode::Default
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::Default => "Default",
            CameraMode::Helicopter { .. } => "Helicopter",
            CameraMode::MotorCycle { .. } => "MotorCycle",
            CameraMode::FirstPerson { .. } => "FirstPerson",
            CameraMode::Auto => "Auto",
        }
    }

    /// Whether this mode follows a racer
    pub fn follows_entity(&self) -> bool {
        matches!(
            self,
            CameraMode::Helicopter { .. }
                | CameraMode::MotorCycle { .. }
                | CameraMode::FirstPerson { .. }
        )
    }
}

/// Viewer-controlled state read once per frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    /// Orbit distance from the focus point
    pub distance: f64,
    /// Orbit angle around the up axis (radians)
    pub azimuth: f64,
    /// Orbit angle above the ground plane (radians)
    pub elevation: f64,
    pub focus: DVec3,
    /// Visible width at the focus distance (world units)
    pub view_width: f64,
    /// Window size in pixels
    pub width_px: u32,
    pub height_px: u32,
    /// Track selector (0-4)
    pub track: usize,
    /// Camera selector (0-4)
    pub camera: usize,
    pub show_axes: bool,
    pub stick_figure: bool,
    /// Animation time
    pub time: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            focus: DVec3::ZERO,
            view_width: 5.0,
            width_px: 800,
            height_px: 600,
            track: 0,
            camera: 0,
            show_axes: false,
            stick_figure: false,
            time: 0.0,
        }
    }
}

impl ViewState {
    pub fn near(&self) -> f64 {
        0.05 * self.distance
    }

    pub fn far(&self) -> f64 {
        10.0 * self.distance
    }

    /// Vertical field of view that shows `view_width` halfway into the depth range
    pub fn fov_y(&self) -> f64 {
        2.0 * ((self.view_width / 2.0) / ((self.near() + self.far()) / 2.0)).atan()
    }

    pub fn aspect(&self) -> f64 {
        self.width_px as f64 / self.height_px.max(1) as f64
    }

    /// OpenGL-style perspective projection
    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_y(), self.aspect(), self.near(), self.far())
    }
}

/// Resolved camera for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: DVec3,
    pub center: DVec3,
    pub up: DVec3,
    /// Mode that produced the vectors (never Auto)
    pub mode: CameraMode,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye: DVec3::new(3.0, 6.0, 5.0),
            center: DVec3::ZERO,
            up: WORLD_UP,
            mode: CameraMode::Default,
        }
    }
}

impl CameraState {
    pub fn view(&self) -> DMat4 {
        DMat4::look_at_rh(self.eye, self.center, self.up)
    }

    pub fn view_direction(&self) -> DVec3 {
        (self.center - self.eye).normalize_or_zero()
    }
}
