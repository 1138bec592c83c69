//! Selectable race tracks
//!
//! Track 0 is an analytic test ellipse, tracks 1-4 are closed Bezier splines.
//! Control points are immutable configuration validated once at startup.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::curve::{BezierSpline, Curve, CurveSample, EllipseCurve, OffsetCurve};
use crate::error::GeometryError;

/// Track selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackId {
    #[default]
    Test,
    O,
    L,
    C,
    Custom,
}

impl TrackId {
    pub const COUNT: usize = 5;
    pub const ALL: [TrackId; Self::COUNT] =
        [TrackId::Test, TrackId::O, TrackId::L, TrackId::C, TrackId::Custom];

    /// Map a UI selector onto a track; out-of-range selectors yield None
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackId::Test => "Test",
            TrackId::O => "O",
            TrackId::L => "L",
            TrackId::C => "C",
            TrackId::Custom => "Custom",
        }
    }
}

/// Centerline of one track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrackCurve {
    Ellipse(EllipseCurve),
    Bezier(BezierSpline),
}

impl Curve for TrackCurve {
    fn sample(&self, t: f64) -> CurveSample {
        match self {
            TrackCurve::Ellipse(ellipse) => ellipse.sample(t),
            TrackCurve::Bezier(spline) => spline.sample(t),
        }
    }
}

/// Direction a closed track runs when seen from above
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    /// Winding of a closed curve from the signed area of `samples` points on it
    pub fn of(curve: &impl Curve, samples: usize) -> Self {
        let samples = samples.max(3);
        let area: f64 = (0..samples)
            .map(|i| {
                let a = curve.position(i as f64 / samples as f64);
                let b = curve.position((i + 1) as f64 / samples as f64);
                a.x * b.y - b.x * a.y
            })
            .sum();
        if area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }

    /// +1 when increasing lane offsets move away from the enclosed area
    #[inline]
    pub fn outward_sign(self) -> f64 {
        // Offsets step to the left of travel, which is outward only when clockwise
        match self {
            Winding::Clockwise => 1.0,
            Winding::CounterClockwise => -1.0,
        }
    }
}

fn points(raw: &[[f64; 2]], z: f64) -> Vec<DVec3> {
    raw.iter().map(|&[x, y]| DVec3::new(x, y, z)).collect()
}

/// Height of the Bezier tracks above the ground plane
const TRACK_Z: f64 = 2.0;

const O_TRACK: [[f64; 2]; 13] = [
    [-12.0, -12.0],
    [-12.0, -4.0],
    [-12.0, 4.0],
    [-12.0, 12.0],
    [-12.0, 24.0],
    [12.0, 24.0],
    [12.0, 12.0],
    [12.0, 4.0],
    [12.0, -4.0],
    [12.0, -12.0],
    [12.0, -24.0],
    [-12.0, -24.0],
    [-12.0, -12.0],
];

const L_TRACK: [[f64; 2]; 19] = [
    [-7.5, 7.5],
    [-7.5, 12.5],
    [0.0, 12.5],
    [0.0, 7.5],
    [0.0, 2.5],
    [2.5, 0.0],
    [7.5, 0.0],
    [12.5, 0.0],
    [12.5, -7.5],
    [7.5, -7.5],
    [5.0, -7.5],
    [2.5, -7.5],
    [0.0, -7.5],
    [-7.5, -7.5],
    [-7.5, -7.5],
    [-7.5, 0.0],
    [-7.5, 2.5],
    [-7.5, 5.0],
    [-7.5, 7.5],
];

const C_TRACK: [[f64; 2]; 25] = [
    [-7.5, 15.0],
    [-5.0, 15.0],
    [-2.5, 15.0],
    [0.0, 15.0],
    [7.5, 15.0],
    [7.5, 7.5],
    [0.0, 7.5],
    [-7.5, 7.5],
    [-7.5, -7.5],
    [0.0, -7.5],
    [7.5, -7.5],
    [7.5, -15.0],
    [0.0, -15.0],
    [-2.5, -15.0],
    [-5.0, -15.0],
    [-7.5, -15.0],
    [-10.0, -15.0],
    [-15.0, -12.5],
    [-15.0, -7.5],
    [-15.0, -2.5],
    [-15.0, 2.5],
    [-15.0, 7.5],
    [-15.0, 10.0],
    [-10.0, 15.0],
    [-7.5, 15.0],
];

const CUSTOM_TRACK: [[f64; 2]; 31] = [
    [0.0, 15.0],
    [2.5, 15.0],
    [5.0, 15.0],
    [7.5, 15.0],
    [15.0, 15.0],
    [15.0, 7.5],
    [7.5, 7.5],
    [0.0, 7.5],
    [0.0, -7.5],
    [7.5, -7.5],
    [15.0, -7.5],
    [15.0, -15.0],
    [7.5, -15.0],
    [5.0, -15.0],
    [2.5, -15.0],
    [0.0, -15.0],
    [-2.5, -15.0],
    [-5.0, -15.0],
    [-7.5, -15.0],
    [-15.0, -15.0],
    [-15.0, -7.5],
    [-7.5, -7.5],
    [0.0, -7.5],
    [0.0, 7.5],
    [-7.5, 7.5],
    [-15.0, 7.5],
    [-15.0, 15.0],
    [-7.5, 15.0],
    [-5.0, 15.0],
    [-2.5, 15.0],
    [0.0, 15.0],
];

/// All track centerlines, indexed by [`TrackId`]
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    curves: [TrackCurve; TrackId::COUNT],
}

impl TrackCatalog {
    /// The built-in tracks; fails only if the authored data is broken
    pub fn builtin() -> Result<Self, GeometryError> {
        let catalog = Self {
            curves: [
                TrackCurve::Ellipse(EllipseCurve::new(10.0, 14.0, 1.0)),
                TrackCurve::Bezier(BezierSpline::closed(points(&O_TRACK, TRACK_Z))?),
                TrackCurve::Bezier(BezierSpline::closed(points(&L_TRACK, TRACK_Z))?),
                TrackCurve::Bezier(BezierSpline::closed(points(&C_TRACK, TRACK_Z))?),
                TrackCurve::Bezier(BezierSpline::closed(points(&CUSTOM_TRACK, TRACK_Z))?),
            ],
        };
        log::info!("Track catalog ready ({} tracks)", TrackId::COUNT);
        Ok(catalog)
    }

    /// Catalog from caller-supplied curves (one per track id)
    pub fn from_curves(curves: [TrackCurve; TrackId::COUNT]) -> Self {
        Self { curves }
    }

    pub fn curve(&self, id: TrackId) -> &TrackCurve {
        &self.curves[id.index()]
    }

    /// Lane boundary family around a track's centerline
    pub fn lanes(&self, id: TrackId) -> OffsetCurve<&TrackCurve> {
        OffsetCurve::new(self.curve(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_selector() {
        assert_eq!(TrackId::from_index(0), Some(TrackId::Test));
        assert_eq!(TrackId::from_index(4), Some(TrackId::Custom));
        assert_eq!(TrackId::from_index(5), None);
        for id in TrackId::ALL {
            assert_eq!(TrackId::from_index(id.index()), Some(id));
        }
    }

    #[test]
    fn test_builtin_tracks_are_closed_loops() {
        let catalog = TrackCatalog::builtin().unwrap();
        for id in TrackId::ALL {
            let curve = catalog.curve(id);
            let start = curve.position(0.0);
            let end = curve.position(1.0 - 1e-9);
            assert!((start - end).length() < 1e-6, "{} track not closed", id.as_str());
        }
    }

    #[test]
    fn test_windings() {
        let catalog = TrackCatalog::builtin().unwrap();
        assert_eq!(
            Winding::of(catalog.curve(TrackId::Test), 64),
            Winding::CounterClockwise
        );
        for id in [TrackId::O, TrackId::L, TrackId::C, TrackId::Custom] {
            assert_eq!(Winding::of(catalog.curve(id), 300), Winding::Clockwise, "{}", id.as_str());
        }
    }

    #[test]
    fn test_builtin_lanes_have_no_degenerate_tangents() {
        let catalog = TrackCatalog::builtin().unwrap();
        for id in TrackId::ALL {
            let lanes = catalog.lanes(id);
            for i in 0..1000 {
                let t = i as f64 / 1000.0;
                assert!(lanes.evaluate(t, 4.0).is_ok(), "{} at {}", id.as_str(), t);
            }
        }
    }

    #[test]
    fn test_track_curve_from_json() {
        let curve: TrackCurve =
            serde_json::from_str(r#"{ "Bezier": [[0,0,0],[1,0,0],[2,0,0],[3,0,0]] }"#).unwrap();
        assert!(curve.position(1.0 / 3.0).abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), 1e-12));
        assert!(serde_json::from_str::<TrackCurve>(r#"{ "Bezier": [[0,0,0],[1,0,0]] }"#).is_err());
    }
}
