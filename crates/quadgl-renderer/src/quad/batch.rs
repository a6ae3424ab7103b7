use std::collections::BTreeMap;

use glam::{Mat4, Vec4};
use tracing::{debug, info, warn};

use super::pipeline::{
    QUAD_FRAGMENT_SHADER, QUAD_VERTEX_SHADER, SAMPLER_UNIFORM, VIEW_PROJECTION_UNIFORM,
};
use super::types::{
    quad_layout, BatchLimits, FrameStats, QuadVertex, QUAD_INDICES, QUAD_POSITIONS,
    QUAD_TEX_COORDS,
};
use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::error::RenderError;
use crate::gl::{BindScope, GraphicsApi};
use crate::shader::ShaderProgram;
use crate::texture::{Texture, TextureHandle, TextureSlot, SAMPLER_ARRAY_LEN};
use crate::vertex_array::VertexArray;

/// CPU-side contents of one batch: transformed vertices, their indices and
/// the distinct textures they sample.
#[derive(Debug, Clone)]
pub struct BatchData {
    limits: BatchLimits,
    vertices: Vec<QuadVertex>,
    indices: Vec<u32>,
    textures: BTreeMap<TextureSlot, TextureHandle>,
}

impl BatchData {
    pub fn new(limits: BatchLimits) -> Self {
        Self {
            limits,
            vertices: Vec::with_capacity(limits.max_vertices()),
            indices: Vec::with_capacity(limits.max_indices()),
            textures: BTreeMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.textures.clear();
    }

    /// Append one textured quad. On error nothing is appended.
    pub fn push_textured(
        &mut self,
        transform: &Mat4,
        texture: TextureHandle,
    ) -> Result<(), RenderError> {
        if self.quad_count() >= self.limits.max_quads {
            return Err(RenderError::QuadCapacityExceeded {
                max: self.limits.max_quads,
            });
        }
        self.register_texture(texture)?;

        let base = self.vertices.len() as u32;
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        let tex_index = texture.slot.as_vertex_index();
        for (corner, tex_coord) in QUAD_POSITIONS.iter().zip(QUAD_TEX_COORDS) {
            let position = *transform * Vec4::from_array(*corner);
            self.vertices.push(QuadVertex {
                position: position.to_array(),
                tex_coord,
                tex_index,
            });
        }
        Ok(())
    }

    fn register_texture(&mut self, texture: TextureHandle) -> Result<(), RenderError> {
        if self.textures.contains_key(&texture.slot) {
            return Ok(());
        }
        let max = self.limits.max_texture_units;
        if self.textures.len() >= max as usize {
            return Err(RenderError::TextureUnitsExhausted { max });
        }
        // Only samplers [0, max) are wired to texture units.
        if texture.slot.index() >= max {
            return Err(RenderError::TextureSlotOutOfRange {
                slot: texture.slot.index(),
                max,
            });
        }
        self.textures.insert(texture.slot, texture);
        Ok(())
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Distinct textures in the batch, ordered by slot.
    pub fn textures(&self) -> impl Iterator<Item = &TextureHandle> {
        self.textures.values()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn limits(&self) -> BatchLimits {
        self.limits
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Accumulating,
}

/// Accumulates textured quads between `begin` and `end` and submits them
/// with a single indexed draw.
#[derive(Debug)]
pub struct QuadBatch {
    data: BatchData,
    state: BatchState,
    vertex_array: VertexArray,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    shader: ShaderProgram,
}

impl QuadBatch {
    /// Create the batch's GPU resources and wire the sampler array.
    pub fn init<G: GraphicsApi>(gl: &mut G, limits: BatchLimits) -> Result<Self, RenderError> {
        let mut limits = limits;
        if limits.max_texture_units > SAMPLER_ARRAY_LEN {
            warn!(
                requested = limits.max_texture_units,
                max = SAMPLER_ARRAY_LEN,
                "max_texture_units exceeds sampler array; clamping"
            );
            limits.max_texture_units = SAMPLER_ARRAY_LEN;
        }

        let mut shader = ShaderProgram::new(gl, QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER)?;
        let vertex_buffer = match VertexBuffer::new(
            gl,
            limits.max_vertices() * std::mem::size_of::<QuadVertex>(),
            quad_layout(),
        ) {
            Ok(buffer) => buffer,
            Err(e) => {
                shader.destroy(gl);
                return Err(e);
            }
        };
        let index_buffer = match IndexBuffer::new(gl, limits.max_indices()) {
            Ok(buffer) => buffer,
            Err(e) => {
                vertex_buffer.destroy(gl);
                shader.destroy(gl);
                return Err(e);
            }
        };
        let mut vertex_array = match VertexArray::new(gl) {
            Ok(vertex_array) => vertex_array,
            Err(e) => {
                index_buffer.destroy(gl);
                vertex_buffer.destroy(gl);
                shader.destroy(gl);
                return Err(e);
            }
        };
        vertex_array.add_vertex_buffer(gl, &vertex_buffer);
        vertex_array.set_index_buffer(gl, &index_buffer);

        let samplers: Vec<i32> = (0..limits.max_texture_units as i32).collect();
        shader.set_uniform_1iv(gl, SAMPLER_UNIFORM, &samplers);

        info!(
            max_quads = limits.max_quads,
            max_texture_units = limits.max_texture_units,
            "quad batch initialized"
        );

        Ok(Self {
            data: BatchData::new(limits),
            state: BatchState::Idle,
            vertex_array,
            vertex_buffer,
            index_buffer,
            shader,
        })
    }

    /// Start a frame: clear accumulated quads and upload the camera matrix.
    pub fn begin<G: GraphicsApi>(
        &mut self,
        gl: &mut G,
        view_projection: &Mat4,
    ) -> Result<(), RenderError> {
        if self.state == BatchState::Accumulating {
            return Err(RenderError::FrameAlreadyStarted);
        }
        self.data.clear();
        self.state = BatchState::Accumulating;
        self.shader
            .set_uniform_mat4(gl, VIEW_PROJECTION_UNIFORM, view_projection);
        Ok(())
    }

    /// Queue a unit quad transformed by `transform` and sampled from
    /// `texture`. Capacity errors leave the batch unchanged.
    pub fn add_textured(&mut self, transform: &Mat4, texture: &Texture) -> Result<(), RenderError> {
        if self.state != BatchState::Accumulating {
            return Err(RenderError::FrameNotStarted);
        }
        self.data.push_textured(transform, texture.handle())
    }

    /// Upload the accumulated quads and issue one draw call.
    pub fn end<G: GraphicsApi>(&mut self, gl: &mut G) -> Result<FrameStats, RenderError> {
        if self.state != BatchState::Accumulating {
            return Err(RenderError::FrameNotStarted);
        }
        // A failed upload keeps the frame open with its quads intact.
        self.vertex_buffer
            .set_data(gl, bytemuck::cast_slice(self.data.vertices()))?;
        self.index_buffer.set_data(gl, self.data.indices())?;
        self.state = BatchState::Idle;

        {
            let mut scope = BindScope::new(&mut *gl);
            for texture in self.data.textures() {
                scope.texture(texture.slot.index(), texture.id);
            }
            scope
                .program(self.shader.id())
                .vertex_array(self.vertex_array.id());
            scope.draw_indexed_triangles(self.index_buffer.count());
        }

        let stats = FrameStats {
            quads: self.data.quad_count(),
            vertices: self.data.vertices().len(),
            indices: self.data.indices().len(),
            textures: self.data.texture_count(),
            draw_calls: 1,
        };
        debug!(
            quads = stats.quads,
            textures = stats.textures,
            "quad batch flushed"
        );
        Ok(stats)
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn data(&self) -> &BatchData {
        &self.data
    }

    pub fn limits(&self) -> BatchLimits {
        self.data.limits()
    }

    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn vertex_buffer(&self) -> &VertexBuffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &IndexBuffer {
        &self.index_buffer
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        self.vertex_array.destroy(gl);
        self.vertex_buffer.destroy(gl);
        self.index_buffer.destroy(gl);
        self.shader.destroy(gl);
    }
}
