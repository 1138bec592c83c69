//! Track curves
//!
//! Every curve is periodic over t in [0, 1): evaluation wraps the parameter
//! so motion along a closed track is continuous across the seam.

pub mod bezier;
pub mod ellipse;
pub mod offset;

pub use bezier::BezierSpline;
pub use ellipse::EllipseCurve;
pub use offset::OffsetCurve;

use glam::DVec3;

/// Position and (un-normalized) derivative of a curve at one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: DVec3,
    pub tangent: DVec3,
}

/// A closed parametric curve over t in [0, 1)
pub trait Curve {
    fn sample(&self, t: f64) -> CurveSample;

    #[inline]
    fn position(&self, t: f64) -> DVec3 {
        self.sample(t).position
    }

    #[inline]
    fn tangent(&self, t: f64) -> DVec3 {
        self.sample(t).tangent
    }
}

impl<C: Curve + ?Sized> Curve for &C {
    fn sample(&self, t: f64) -> CurveSample {
        (**self).sample(t)
    }
}
