use crate::layout::{VertexLayout, VertexLayoutElement};

/// One corner of a batched quad, already in world space.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct QuadVertex {
    /// Homogeneous world position.
    pub position: [f32; 4],
    pub tex_coord: [f32; 2],
    /// Texture slot, as a float.
    pub tex_index: f32,
}

/// Per-batch limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_quads: usize,
    pub max_texture_units: u32,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_quads: 10_000,
            max_texture_units: 32,
        }
    }
}

impl BatchLimits {
    pub fn max_vertices(&self) -> usize {
        self.max_quads * VERTICES_PER_QUAD
    }

    pub fn max_indices(&self) -> usize {
        self.max_quads * INDICES_PER_QUAD
    }
}

/// Counters for what a flush submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub quads: usize,
    pub vertices: usize,
    pub indices: usize,
    pub textures: usize,
    pub draw_calls: usize,
}

impl FrameStats {
    pub fn accumulate(&mut self, other: FrameStats) {
        self.quads += other.quads;
        self.vertices += other.vertices;
        self.indices += other.indices;
        self.textures += other.textures;
        self.draw_calls += other.draw_calls;
    }
}

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Unit quad centred on the origin: top-left, bottom-left, bottom-right,
/// top-right.
pub(crate) const QUAD_POSITIONS: [[f32; 4]; VERTICES_PER_QUAD] = [
    [-0.5, 0.5, 0.0, 1.0],
    [-0.5, -0.5, 0.0, 1.0],
    [0.5, -0.5, 0.0, 1.0],
    [0.5, 0.5, 0.0, 1.0],
];

pub(crate) const QUAD_TEX_COORDS: [[f32; 2]; VERTICES_PER_QUAD] =
    [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];

pub(crate) const QUAD_INDICES: [u32; INDICES_PER_QUAD] = [0, 1, 2, 2, 3, 0];

/// Attribute layout matching [`QuadVertex`].
pub fn quad_layout() -> VertexLayout {
    VertexLayout::new([
        VertexLayoutElement::float(4),
        VertexLayoutElement::float(2),
        VertexLayoutElement::float(1),
    ])
}
