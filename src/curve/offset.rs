//! Lateral offset curves (lane boundaries)
//!
//! A boundary at signed distance d sits at `position + d * normal` with
//! `normal = normalize(-tangent x up)`. The tangent is negated for every curve
//! so that increasing offsets always step to the same side of the direction
//! of travel: to the left when looking along the tangent with `up` overhead.

use glam::DVec3;

use super::Curve;
use crate::consts::{TANGENT_EPSILON, WORLD_UP};
use crate::error::GeometryError;

#[derive(Debug, Clone, Copy)]
pub struct OffsetCurve<C> {
    base: C,
    up: DVec3,
}

impl<C: Curve> OffsetCurve<C> {
    /// Offset curve family around `base` using the world up axis
    pub fn new(base: C) -> Self {
        Self::with_up(base, WORLD_UP)
    }

    pub fn with_up(base: C, up: DVec3) -> Self {
        Self { base, up }
    }

    pub fn base(&self) -> &C {
        &self.base
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    /// Tangent of the base curve, the one the lateral normal is built from
    #[inline]
    pub fn tangent(&self, t: f64) -> DVec3 {
        self.base.tangent(t)
    }

    /// Unit lateral normal at t
    pub fn normal(&self, t: f64) -> Result<DVec3, GeometryError> {
        let tangent = self.base.tangent(t);
        let side = (-tangent).cross(self.up);
        if tangent.length_squared() < TANGENT_EPSILON * TANGENT_EPSILON
            || side.length_squared() < TANGENT_EPSILON * TANGENT_EPSILON
        {
            return Err(GeometryError::DegenerateTangent { t });
        }
        Ok(side.normalize())
    }

    /// Point on the boundary `lateral_offset` away from the base curve
    pub fn evaluate(&self, t: f64, lateral_offset: f64) -> Result<DVec3, GeometryError> {
        let position = self.base.position(t);
        if lateral_offset == 0.0 {
            return Ok(position);
        }
        Ok(position + self.normal(t)? * lateral_offset)
    }
}
