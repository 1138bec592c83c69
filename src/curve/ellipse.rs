//! Analytic ellipse used by the test track

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::{Curve, CurveSample};

/// Axis-aligned ellipse `(a cos 2πt, b sin 2πt, z)`, counter-clockwise from above
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EllipseCurve {
    pub radius_x: f64,
    pub radius_y: f64,
    pub height: f64,
}

impl EllipseCurve {
    pub const fn new(radius_x: f64, radius_y: f64, height: f64) -> Self {
        Self {
            radius_x,
            radius_y,
            height,
        }
    }
}

impl Curve for EllipseCurve {
    fn sample(&self, t: f64) -> CurveSample {
        let (sin, cos) = (TAU * t).sin_cos();
        CurveSample {
            position: DVec3::new(self.radius_x * cos, self.radius_y * sin, self.height),
            tangent: DVec3::new(-TAU * self.radius_x * sin, TAU * self.radius_y * cos, 0.0),
        }
    }
}
