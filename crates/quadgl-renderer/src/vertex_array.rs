use tracing::debug;

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::error::RenderError;
use crate::gl::{BindScope, BufferId, BufferTarget, GraphicsApi, VertexArrayId};

/// Ties vertex buffers and their attribute layouts to one index buffer.
#[derive(Debug)]
pub struct VertexArray {
    id: VertexArrayId,
    next_attribute: u32,
    vertex_buffers: Vec<BufferId>,
    index_buffer: Option<BufferId>,
}

impl VertexArray {
    pub fn new<G: GraphicsApi>(gl: &mut G) -> Result<Self, RenderError> {
        let id = gl.create_vertex_array()?;
        Ok(Self {
            id,
            next_attribute: 0,
            vertex_buffers: Vec::new(),
            index_buffer: None,
        })
    }

    /// Register the attributes of `buffer`'s layout. Attribute indices
    /// continue from any previously added buffer.
    pub fn add_vertex_buffer<G: GraphicsApi>(&mut self, gl: &mut G, buffer: &VertexBuffer) {
        let mut scope = BindScope::new(gl);
        scope
            .vertex_array(self.id)
            .buffer(BufferTarget::Array, buffer.id());
        for attrib in buffer.layout().attributes(self.next_attribute) {
            scope.vertex_attrib_pointer(attrib);
            scope.enable_vertex_attrib_array(attrib.index);
            self.next_attribute = attrib.index + 1;
        }
        self.vertex_buffers.push(buffer.id());
        debug!(
            vertex_array = self.id.get(),
            buffer = buffer.id().get(),
            attributes = self.next_attribute,
            "vertex buffer attached"
        );
    }

    /// Record `buffer` as this vertex array's element buffer.
    pub fn set_index_buffer<G: GraphicsApi>(&mut self, gl: &mut G, buffer: &IndexBuffer) {
        {
            let mut scope = BindScope::new(&mut *gl);
            scope.vertex_array(self.id);
            // Left bound until the vertex array is released, or the
            // association would be cleared.
            scope.bind_buffer(BufferTarget::ElementArray, Some(buffer.id()));
        }
        gl.bind_buffer(BufferTarget::ElementArray, None);
        self.index_buffer = Some(buffer.id());
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Number of attribute indices in use.
    pub fn attribute_count(&self) -> u32 {
        self.next_attribute
    }

    pub fn vertex_buffers(&self) -> &[BufferId] {
        &self.vertex_buffers
    }

    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index_buffer
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        gl.delete_vertex_array(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::HeadlessBackend;
    use crate::layout::{VertexLayout, VertexLayoutElement};

    #[test]
    fn attributes_continue_across_buffers() {
        let mut gl = HeadlessBackend::new();
        let positions = VertexBuffer::new(
            &mut gl,
            64,
            VertexLayout::new([VertexLayoutElement::float(3)]),
        )
        .unwrap();
        let extras = VertexBuffer::new(
            &mut gl,
            64,
            VertexLayout::new([VertexLayoutElement::float(2), VertexLayoutElement::float(1)]),
        )
        .unwrap();
        let mut vao = VertexArray::new(&mut gl).unwrap();
        vao.add_vertex_buffer(&mut gl, &positions);
        vao.add_vertex_buffer(&mut gl, &extras);

        let attribs = gl.attributes_of(vao.id());
        assert_eq!(attribs.len(), 3);
        assert_eq!(attribs[0].0.index, 0);
        assert_eq!(attribs[0].1, Some(positions.id()));
        assert_eq!(attribs[1].0.index, 1);
        assert_eq!(attribs[2].0.index, 2);
        assert_eq!(attribs[2].0.offset, 8);
        assert_eq!(attribs[2].1, Some(extras.id()));
        assert!((0..3).all(|i| gl.is_attribute_enabled(vao.id(), i)));
        assert_eq!(vao.attribute_count(), 3);
        assert_eq!(vao.vertex_buffers().len(), 2);
    }

    #[test]
    fn index_buffer_survives_unbind() {
        let mut gl = HeadlessBackend::new();
        let ib = IndexBuffer::new(&mut gl, 6).unwrap();
        let mut vao = VertexArray::new(&mut gl).unwrap();
        vao.set_index_buffer(&mut gl, &ib);

        assert_eq!(gl.element_buffer_of(vao.id()), Some(ib.id()));
        assert_eq!(gl.bound_vertex_array(), None);
        assert_eq!(gl.bound_buffer(BufferTarget::ElementArray), None);
        assert_eq!(vao.index_buffer(), Some(ib.id()));
        assert!(gl.errors().is_empty());
    }

    #[test]
    fn bindings_restored_after_setup() {
        let mut gl = HeadlessBackend::new();
        let vb = VertexBuffer::new(&mut gl, 16, VertexLayout::new([VertexLayoutElement::float(4)]))
            .unwrap();
        let mut vao = VertexArray::new(&mut gl).unwrap();
        vao.add_vertex_buffer(&mut gl, &vb);
        assert_eq!(gl.bound_vertex_array(), None);
        assert_eq!(gl.bound_buffer(BufferTarget::Array), None);
    }
}
