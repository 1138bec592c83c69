//! Vertex types for generated geometry

use bytemuck::{Pod, Zeroable};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Double precision vertex produced by the geometry phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
}

impl MeshVertex {
    pub const fn new(position: DVec3, normal: DVec3, uv: DVec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Single precision copy for upload
    pub fn to_gpu(&self) -> GpuVertex {
        GpuVertex {
            position: self.position.as_vec3().to_array(),
            normal: self.normal.as_vec3().to_array(),
            uv: self.uv.as_vec2().to_array(),
        }
    }
}

/// Interleaved vertex as laid out in a GPU vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Vertices to be drawn as a triangle strip
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleStrip {
    pub vertices: Vec<MeshVertex>,
}

impl TriangleStrip {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, position: DVec3, normal: DVec3, uv: DVec2) {
        self.vertices.push(MeshVertex::new(position, normal, uv));
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles the strip rasterizes to
    pub fn triangle_count(&self) -> usize {
        self.vertices.len().saturating_sub(2)
    }

    /// Corners of triangle `i`, flipping every odd triangle back to strip winding
    pub fn triangle(&self, i: usize) -> Option<[DVec3; 3]> {
        if i >= self.triangle_count() {
            return None;
        }
        let [a, b, c] = [
            self.vertices[i].position,
            self.vertices[i + 1].position,
            self.vertices[i + 2].position,
        ];
        Some(if i % 2 == 0 { [a, b, c] } else { [b, a, c] })
    }

    pub fn to_gpu(&self) -> Vec<GpuVertex> {
        self.vertices.iter().map(MeshVertex::to_gpu).collect()
    }
}

/// Vertices to be drawn as independent triangles (three per triangle)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleList {
    pub vertices: Vec<MeshVertex>,
}

impl TriangleList {
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triangles * 3),
        }
    }

    /// Push one flat-shaded triangle
    pub fn push_triangle(&mut self, corners: [DVec3; 3], normal: DVec3, uvs: [DVec2; 3]) {
        for (position, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(MeshVertex::new(position, normal, uv));
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = &[MeshVertex]> {
        self.vertices.chunks_exact(3)
    }

    pub fn to_gpu(&self) -> Vec<GpuVertex> {
        self.vertices.iter().map(MeshVertex::to_gpu).collect()
    }
}
