//! The narrow set of graphics-API calls the renderer needs.
//!
//! Every GPU object is addressed through a `Copy` handle. Rendering code is
//! written against [`GraphicsApi`] and never touches a driver directly, so
//! the same batching logic runs on a real OpenGL context ([`GlowBackend`])
//! or on the in-memory [`HeadlessBackend`] used by tests and the demo app.

mod glow_backend;
mod headless;
mod scope;

use std::fmt;
use std::num::NonZeroU32;

pub use glow_backend::GlowBackend;
pub use headless::{DrawCall, HeadlessBackend, RecordedUniform};
pub use scope::BindScope;

use crate::error::RenderError;

macro_rules! gl_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub const fn new(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u32 {
                self.0.get()
            }

            pub(crate) const fn raw(self) -> NonZeroU32 {
                self.0
            }
        }
    };
}

gl_handle!(
    /// A GPU buffer object (vertex or index storage).
    BufferId
);
gl_handle!(
    /// A vertex array object.
    VertexArrayId
);
gl_handle!(
    /// A 2D texture object.
    TextureId
);
gl_handle!(
    /// A single compiled shader stage.
    ShaderId
);
gl_handle!(
    /// A linked shader program.
    ProgramId
);

/// Location of an active uniform within a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    Static,
    Dynamic,
    Stream,
}

/// Scalar type of a vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float,
    Int,
    UnsignedInt,
    Short,
    UnsignedShort,
    Byte,
    UnsignedByte,
}

impl DataType {
    /// Size of one component in bytes.
    pub const fn size(self) -> usize {
        match self {
            DataType::Float | DataType::Int | DataType::UnsignedInt => 4,
            DataType::Short | DataType::UnsignedShort => 2,
            DataType::Byte | DataType::UnsignedByte => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Linear,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
}

/// Sampling state applied to the currently bound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSampling {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap: TextureWrap,
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self {
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            wrap: TextureWrap::ClampToEdge,
        }
    }
}

/// One vertex attribute binding, as passed to `glVertexAttribPointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttrib {
    pub index: u32,
    pub count: u32,
    pub data_type: DataType,
    pub normalized: bool,
    /// Byte distance between consecutive vertices.
    pub stride: usize,
    /// Byte offset of this attribute within a vertex.
    pub offset: usize,
}

/// A value to upload to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    Int(i32),
    IntArray(&'a [i32]),
    Float(f32),
    Vec4([f32; 4]),
    /// Column-major 4x4 matrix.
    Mat4(&'a [f32; 16]),
}

/// Graphics calls used by the renderer.
///
/// Methods mirror their OpenGL counterparts and act on the current binding
/// state, so callers are responsible for binding the object they mean to
/// modify (see [`BindScope`]). Texture units are plain indices starting at
/// zero; backends add the API-specific base.
pub trait GraphicsApi {
    fn create_buffer(&mut self) -> Result<BufferId, RenderError>;
    fn bind_buffer(&mut self, target: BufferTarget, buffer: Option<BufferId>);
    /// Allocate `size` bytes of uninitialized storage for the bound buffer.
    fn buffer_storage(&mut self, target: BufferTarget, size: usize, usage: BufferUsage);
    fn buffer_sub_data(&mut self, target: BufferTarget, offset: usize, data: &[u8]);
    fn delete_buffer(&mut self, buffer: BufferId);

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, RenderError>;
    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>);
    fn vertex_attrib_pointer(&mut self, attrib: VertexAttrib);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId);

    fn create_texture(&mut self) -> Result<TextureId, RenderError>;
    fn active_texture(&mut self, unit: u32);
    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn texture_sampling(&mut self, sampling: TextureSampling);
    /// Upload tightly packed RGBA8 pixels to the bound texture.
    fn texture_image_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]);
    fn generate_mipmap(&mut self);
    fn delete_texture(&mut self, texture: TextureId);

    fn create_shader(&mut self, stage: ShaderStage) -> Result<ShaderId, RenderError>;
    /// Set the source and compile. On failure returns the info log.
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String>;
    fn delete_shader(&mut self, shader: ShaderId);
    fn create_program(&mut self) -> Result<ProgramId, RenderError>;
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);
    fn detach_shader(&mut self, program: ProgramId, shader: ShaderId);
    /// Link the program. On failure returns the info log.
    fn link_program(&mut self, program: ProgramId) -> Result<(), String>;
    fn use_program(&mut self, program: Option<ProgramId>);
    fn delete_program(&mut self, program: ProgramId);
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    /// Upload a uniform on the program currently in use.
    fn uniform(&mut self, location: UniformLocation, value: UniformValue<'_>);

    /// Clear the color and depth buffers.
    fn clear(&mut self, color: [f32; 4]);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    /// Enable source-alpha / one-minus-source-alpha blending.
    fn enable_alpha_blending(&mut self);
    /// Draw `index_count` `u32` indices from the bound vertex array as triangles.
    fn draw_indexed_triangles(&mut self, index_count: usize);

    /// Route driver debug messages to the log, where supported.
    fn enable_debug_output(&mut self) {}
}
