//! Geometry generation
//!
//! Pure CPU tessellation into vertex/normal/uv buffers. Nothing here talks to
//! a graphics API: the output is handed to a [`RenderSink`] in a separate
//! upload/draw phase.

pub mod terrain;
pub mod track;
pub mod vertex;

pub use terrain::{
    HeightField, RollingHills, TerrainBounds, TerrainGrid, TerrainMesh, height_to_tex_coord,
};
pub use track::{TrackMesh, TrackMeshBuilder, TrackMeshCache, WallSide};
pub use vertex::{GpuVertex, MeshVertex, TriangleList, TriangleStrip};

/// Material tag attached to each draw, resolved to colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    /// Lane surface, 0 = innermost
    Lane(u8),
    StartLine,
    Wall(WallSide),
    Terrain,
    /// Translucent water plane
    Water,
}

/// Receiver for generated geometry
pub trait RenderSink {
    fn draw_strip(&mut self, material: Material, strip: &TriangleStrip);
    fn draw_triangles(&mut self, material: Material, triangles: &TriangleList);
}
