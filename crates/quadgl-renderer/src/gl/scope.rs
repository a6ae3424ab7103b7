use std::ops::{Deref, DerefMut};

use super::{BufferId, BufferTarget, GraphicsApi, ProgramId, TextureId, VertexArrayId};

#[derive(Debug, Clone, Copy)]
enum Release {
    Buffer(BufferTarget),
    VertexArray,
    Program,
    Texture(u32),
}

/// Binds objects for the duration of a scope and unbinds them, in reverse
/// order, when dropped.
///
/// Dereferences to the backend so calls that act on the bound objects can be
/// issued through the scope.
pub struct BindScope<'g, G: GraphicsApi> {
    gl: &'g mut G,
    releases: Vec<Release>,
}

impl<'g, G: GraphicsApi> BindScope<'g, G> {
    pub fn new(gl: &'g mut G) -> Self {
        Self {
            gl,
            releases: Vec::new(),
        }
    }

    pub fn buffer(&mut self, target: BufferTarget, buffer: BufferId) -> &mut Self {
        self.gl.bind_buffer(target, Some(buffer));
        self.releases.push(Release::Buffer(target));
        self
    }

    pub fn vertex_array(&mut self, vertex_array: VertexArrayId) -> &mut Self {
        self.gl.bind_vertex_array(Some(vertex_array));
        self.releases.push(Release::VertexArray);
        self
    }

    pub fn program(&mut self, program: ProgramId) -> &mut Self {
        self.gl.use_program(Some(program));
        self.releases.push(Release::Program);
        self
    }

    /// Bind `texture` on texture unit `unit`. The unit stays active.
    pub fn texture(&mut self, unit: u32, texture: TextureId) -> &mut Self {
        self.gl.active_texture(unit);
        self.gl.bind_texture(Some(texture));
        self.releases.push(Release::Texture(unit));
        self
    }
}

impl<G: GraphicsApi> Deref for BindScope<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        &*self.gl
    }
}

impl<G: GraphicsApi> DerefMut for BindScope<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        &mut *self.gl
    }
}

impl<G: GraphicsApi> Drop for BindScope<'_, G> {
    fn drop(&mut self) {
        while let Some(release) = self.releases.pop() {
            match release {
                Release::Buffer(target) => self.gl.bind_buffer(target, None),
                Release::VertexArray => self.gl.bind_vertex_array(None),
                Release::Program => self.gl.use_program(None),
                Release::Texture(unit) => {
                    self.gl.active_texture(unit);
                    self.gl.bind_texture(None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::HeadlessBackend;

    #[test]
    fn releases_bindings_on_drop() {
        let mut gl = HeadlessBackend::new();
        let vao = gl.create_vertex_array().unwrap();
        let vbo = gl.create_buffer().unwrap();
        let tex = gl.create_texture().unwrap();
        {
            let mut scope = BindScope::new(&mut gl);
            scope
                .vertex_array(vao)
                .buffer(BufferTarget::Array, vbo)
                .texture(4, tex);
            assert_eq!(scope.bound_vertex_array(), Some(vao));
            assert_eq!(scope.bound_buffer(BufferTarget::Array), Some(vbo));
            assert_eq!(scope.bound_textures().get(&4), Some(&tex));
        }
        assert_eq!(gl.bound_vertex_array(), None);
        assert_eq!(gl.bound_buffer(BufferTarget::Array), None);
        assert!(gl.bound_textures().is_empty());
        assert!(gl.errors().is_empty());
    }

    #[test]
    fn vertex_array_released_before_element_buffer_it_captured() {
        let mut gl = HeadlessBackend::new();
        let vao = gl.create_vertex_array().unwrap();
        let ebo = gl.create_buffer().unwrap();
        {
            let mut scope = BindScope::new(&mut gl);
            scope.vertex_array(vao);
            scope.bind_buffer(BufferTarget::ElementArray, Some(ebo));
        }
        gl.bind_buffer(BufferTarget::ElementArray, None);
        assert_eq!(gl.element_buffer_of(vao), Some(ebo));
    }
}
