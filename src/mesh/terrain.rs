//! Height-field terrain tessellation
//!
//! The terrain is a regular lattice of flat-shaded triangles sampled from an
//! analytic height function, plus a translucent water quad at z = 0.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use super::vertex::{TriangleList, TriangleStrip};
use crate::error::GeometryError;

/// Surface height z = f(x, y)
pub trait HeightField {
    fn height(&self, x: f64, y: f64) -> f64;
}

impl<F: Fn(f64, f64) -> f64> HeightField for F {
    fn height(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Two crossing cosine waves, the default landscape
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingHills;

impl HeightField for RollingHills {
    fn height(&self, x: f64, y: f64) -> f64 {
        0.6 * (0.3 * x + 0.2 * y).cos() + 0.4 * (x - 0.5 * y).cos()
    }
}

/// Rectangle [x_begin, x_begin + x_size] x [y_begin, y_begin + y_size]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainBounds {
    pub x_begin: f64,
    pub x_size: f64,
    pub y_begin: f64,
    pub y_size: f64,
}

impl Default for TerrainBounds {
    fn default() -> Self {
        Self {
            x_begin: -40.0,
            x_size: 80.0,
            y_begin: -40.0,
            y_size: 80.0,
        }
    }
}

impl TerrainBounds {
    pub fn x_end(&self) -> f64 {
        self.x_begin + self.x_size
    }

    pub fn y_end(&self) -> f64 {
        self.y_begin + self.y_size
    }
}

/// Map elevation into the middle half of a 1-D color ramp
#[inline]
pub fn height_to_tex_coord(height: f64) -> f64 {
    ((height + 1.0) / 4.0 + 0.25).clamp(0.25, 0.75)
}

/// Tessellated terrain, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainGrid {
    pub bounds: TerrainBounds,
    /// Cells per axis
    pub cells: usize,
    pub surface: TriangleList,
    /// Four-vertex strip at z = 0 covering the bounds
    pub water: TriangleStrip,
}

impl TerrainGrid {
    pub fn triangle_count(&self) -> usize {
        self.surface.triangle_count()
    }
}

pub struct TerrainMesh;

impl TerrainMesh {
    /// Tessellate `height` over `bounds` with 2 * `segments` cells per axis
    pub fn build(
        height: &impl HeightField,
        bounds: TerrainBounds,
        segments: usize,
    ) -> Result<TerrainGrid, GeometryError> {
        if segments == 0 {
            return Err(GeometryError::InvalidConfiguration(
                "terrain needs at least one segment".to_string(),
            ));
        }
        if !(bounds.x_size > 0.0 && bounds.y_size > 0.0) {
            return Err(GeometryError::InvalidConfiguration(format!(
                "terrain bounds must have positive size, got {:?}",
                bounds
            )));
        }

        let cells = 2 * segments;
        let dx = bounds.x_size / cells as f64;
        let dy = bounds.y_size / cells as f64;
        let point = |xi: usize, yi: usize| {
            let x = bounds.x_begin + dx * xi as f64;
            let y = bounds.y_begin + dy * yi as f64;
            DVec3::new(x, y, height.height(x, y))
        };
        let tex = |p: DVec3| DVec2::new(height_to_tex_coord(p.z), 0.0);

        let mut surface = TriangleList::with_capacity(2 * cells * cells);
        for xi in 0..cells {
            for yi in 0..cells {
                let p11 = point(xi, yi);
                let p12 = point(xi, yi + 1);
                let p21 = point(xi + 1, yi);
                let p22 = point(xi + 1, yi + 1);

                // Diagonal split along (x1, y1) - (x2, y2)
                let a = [p11, p12, p22];
                let normal_a = -(a[1] - a[0]).cross(a[2] - a[0]);
                surface.push_triangle(a, normal_a.normalize_or_zero(), a.map(tex));

                let b = [p11, p21, p22];
                let normal_b = (b[1] - b[0]).cross(b[2] - b[0]);
                surface.push_triangle(b, normal_b.normalize_or_zero(), b.map(tex));
            }
        }

        let mut water = TriangleStrip::with_capacity(4);
        for (x, y, uv) in [
            (bounds.x_begin, bounds.y_begin, DVec2::new(0.0, 0.0)),
            (bounds.x_end(), bounds.y_begin, DVec2::new(1.0, 0.0)),
            (bounds.x_begin, bounds.y_end(), DVec2::new(0.0, 1.0)),
            (bounds.x_end(), bounds.y_end(), DVec2::new(1.0, 1.0)),
        ] {
            water.push(DVec3::new(x, y, 0.0), DVec3::Z, uv);
        }

        log::info!(
            "Built terrain: {}x{} cells, {} triangles",
            cells,
            cells,
            surface.triangle_count()
        );
        Ok(TerrainGrid {
            bounds,
            cells,
            surface,
            water,
        })
    }
}
