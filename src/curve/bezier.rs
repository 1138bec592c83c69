//! Piecewise cubic Bezier splines
//!
//! A spline of k segments is stored as 3k+1 control points. Segment i uses
//! points [3i, 3i+1, 3i+2, 3i+3], so neighbouring segments share an endpoint.
//! Track splines are closed: the first and last control point coincide.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::{Curve, CurveSample};
use crate::error::GeometryError;
use crate::wrap_unit;

/// Cubic Bernstein position at local parameter u
#[inline]
pub fn cubic_point(u: f64, p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> DVec3 {
    let v = 1.0 - u;
    p0 * (v * v * v) + p1 * (3.0 * u * v * v) + p2 * (3.0 * u * u * v) + p3 * (u * u * u)
}

/// Exact derivative of [`cubic_point`] with respect to u
#[inline]
pub fn cubic_tangent(u: f64, p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3) -> DVec3 {
    let v = 1.0 - u;
    (p1 - p0) * (3.0 * v * v) + (p2 - p1) * (6.0 * u * v) + (p3 - p2) * (3.0 * u * u)
}

/// Serialized as its bare control point list; deserializing validates like [`BezierSpline::new`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<DVec3>", into = "Vec<DVec3>")]
pub struct BezierSpline {
    points: Vec<DVec3>,
}

impl BezierSpline {
    /// Build a spline, validating the 3k+1 control point layout
    pub fn new(points: Vec<DVec3>) -> Result<Self, GeometryError> {
        if points.len() < 4 || (points.len() - 1) % 3 != 0 {
            return Err(GeometryError::InvalidConfiguration(format!(
                "expected 3k+1 control points with k >= 1, got {}",
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "control point {} is not finite",
                i
            )));
        }
        Ok(Self { points })
    }

    /// Build a closed spline; first and last point must coincide
    pub fn closed(points: Vec<DVec3>) -> Result<Self, GeometryError> {
        let spline = Self::new(points)?;
        if !spline.is_closed() {
            return Err(GeometryError::InvalidConfiguration(
                "closed spline must end at its first control point".to_string(),
            ));
        }
        Ok(spline)
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    pub fn control_points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first.abs_diff_eq(*last, 1e-9),
            _ => false,
        }
    }

    /// Segment index and local parameter for a wrapped t
    fn locate(&self, t: f64) -> (usize, f64) {
        let k = self.segment_count();
        let scaled = wrap_unit(t) * k as f64;
        let segment = (scaled.floor() as usize).min(k - 1);
        (segment, scaled - segment as f64)
    }

    /// Position and tangent at t; t is taken modulo 1
    pub fn evaluate(&self, t: f64) -> CurveSample {
        let (segment, u) = self.locate(t);
        let [p0, p1, p2, p3] = [
            self.points[segment * 3],
            self.points[segment * 3 + 1],
            self.points[segment * 3 + 2],
            self.points[segment * 3 + 3],
        ];
        CurveSample {
            position: cubic_point(u, p0, p1, p2, p3),
            tangent: cubic_tangent(u, p0, p1, p2, p3),
        }
    }
}

impl TryFrom<Vec<DVec3>> for BezierSpline {
    type Error = GeometryError;

    fn try_from(points: Vec<DVec3>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<BezierSpline> for Vec<DVec3> {
    fn from(spline: BezierSpline) -> Self {
        spline.points
    }
}

impl Curve for BezierSpline {
    fn sample(&self, t: f64) -> CurveSample {
        self.evaluate(t)
    }
}
