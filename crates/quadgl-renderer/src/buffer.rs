//! Fixed-capacity GPU buffers with partial re-upload.

use tracing::debug;

use crate::error::RenderError;
use crate::gl::{BindScope, BufferId, BufferTarget, BufferUsage, GraphicsApi};
use crate::layout::VertexLayout;

/// Vertex storage allocated once at a fixed byte capacity.
#[derive(Debug)]
pub struct VertexBuffer {
    id: BufferId,
    capacity: usize,
    len: usize,
    layout: VertexLayout,
}

impl VertexBuffer {
    pub fn new<G: GraphicsApi>(
        gl: &mut G,
        capacity: usize,
        layout: VertexLayout,
    ) -> Result<Self, RenderError> {
        let id = gl.create_buffer()?;
        BindScope::new(gl)
            .buffer(BufferTarget::Array, id)
            .buffer_storage(BufferTarget::Array, capacity, BufferUsage::Dynamic);
        debug!(buffer = id.get(), capacity, "vertex buffer allocated");
        Ok(Self {
            id,
            capacity,
            len: 0,
            layout,
        })
    }

    /// Overwrite the start of the buffer with `data`. Bytes past
    /// `data.len()` keep their previous contents.
    pub fn set_data<G: GraphicsApi>(&mut self, gl: &mut G, data: &[u8]) -> Result<(), RenderError> {
        if data.len() > self.capacity {
            return Err(RenderError::BufferOverflow {
                requested: data.len(),
                capacity: self.capacity,
            });
        }
        BindScope::new(gl)
            .buffer(BufferTarget::Array, self.id)
            .buffer_sub_data(BufferTarget::Array, 0, data);
        self.len = data.len();
        Ok(())
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written by the last upload.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        gl.delete_buffer(self.id);
    }
}

/// `u32` index storage allocated once at a fixed index capacity.
///
/// Binding an element buffer while a vertex array is bound changes that
/// vertex array, so uploads must happen with no vertex array bound.
#[derive(Debug)]
pub struct IndexBuffer {
    id: BufferId,
    capacity: usize,
    count: usize,
}

impl IndexBuffer {
    pub fn new<G: GraphicsApi>(gl: &mut G, capacity: usize) -> Result<Self, RenderError> {
        let id = gl.create_buffer()?;
        BindScope::new(gl)
            .buffer(BufferTarget::ElementArray, id)
            .buffer_storage(
                BufferTarget::ElementArray,
                capacity * std::mem::size_of::<u32>(),
                BufferUsage::Dynamic,
            );
        debug!(buffer = id.get(), capacity, "index buffer allocated");
        Ok(Self {
            id,
            capacity,
            count: 0,
        })
    }

    pub fn set_data<G: GraphicsApi>(
        &mut self,
        gl: &mut G,
        indices: &[u32],
    ) -> Result<(), RenderError> {
        if indices.len() > self.capacity {
            return Err(RenderError::BufferOverflow {
                requested: std::mem::size_of_val(indices),
                capacity: self.capacity * std::mem::size_of::<u32>(),
            });
        }
        BindScope::new(gl)
            .buffer(BufferTarget::ElementArray, self.id)
            .buffer_sub_data(BufferTarget::ElementArray, 0, bytemuck::cast_slice(indices));
        self.count = indices.len();
        Ok(())
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Capacity in indices.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of indices written by the last upload.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        gl.delete_buffer(self.id);
    }
}
