//! Batched textured-quad rendering over OpenGL.
//!
//! All GPU work goes through the [`gl::GraphicsApi`] trait: [`GlowBackend`]
//! drives a real context, [`HeadlessBackend`] records calls in memory.

pub mod buffer;
pub mod camera;
pub mod error;
pub mod gl;
pub mod layout;
pub mod perf;
pub mod quad;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use buffer::{IndexBuffer, VertexBuffer};
pub use camera::{CameraController, Projection};
pub use error::RenderError;
pub use gl::{GlowBackend, GraphicsApi, HeadlessBackend};
pub use layout::{VertexLayout, VertexLayoutElement};
pub use perf::{FrameCounter, FrameReport};
pub use quad::{BatchLimits, FrameStats, QuadBatch, QuadVertex};
pub use renderer::{Renderer, RendererOptions};
pub use shader::ShaderProgram;
pub use texture::{SlotAllocator, Texture, TextureImage, TextureSlot};
pub use vertex_array::VertexArray;
