//! The application-facing renderer.

use std::marker::PhantomData;
use std::path::Path;

use glam::Mat4;
use quadgl_common::Color;
use quadgl_config::colors::parse_color;
use quadgl_config::QuadglConfig;
use tracing::{info, warn};

use crate::camera::CameraController;
use crate::error::RenderError;
use crate::gl::GraphicsApi;
use crate::quad::{BatchLimits, FrameStats, QuadBatch};
use crate::shader::ShaderProgram;
use crate::texture::{SlotAllocator, Texture, TextureImage, TextureSlot};

/// Background used when the configured color does not parse.
const DEFAULT_BACKGROUND: Color = Color::from_rgba(51, 75, 75, 255);

/// Construction options for [`Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RendererOptions {
    pub limits: BatchLimits,
    pub background: Color,
    pub blending: bool,
    pub debug_output: bool,
    pub viewport: (u32, u32),
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            limits: BatchLimits::default(),
            background: DEFAULT_BACKGROUND,
            blending: true,
            debug_output: false,
            viewport: (1024, 768),
        }
    }
}

impl RendererOptions {
    pub fn from_config(config: &QuadglConfig) -> Self {
        let background = match parse_color(&config.renderer.background) {
            Ok(color) => color,
            Err(e) => {
                warn!(
                    "invalid background color {:?}: {e}; using default",
                    config.renderer.background
                );
                DEFAULT_BACKGROUND
            }
        };
        Self {
            limits: BatchLimits {
                max_quads: config.renderer.max_quads as usize,
                max_texture_units: config.renderer.max_texture_units,
            },
            background,
            blending: config.renderer.blending,
            debug_output: config.renderer.debug_output,
            viewport: (config.viewport.width, config.viewport.height),
        }
    }
}

/// Owns the graphics backend and one quad batch.
///
/// Tied to the thread that created the graphics context.
pub struct Renderer<G: GraphicsApi> {
    gl: G,
    batch: QuadBatch,
    slots: SlotAllocator,
    background: Color,
    viewport: (u32, u32),
    frame: FrameStats,
    _not_send: PhantomData<*const ()>,
}

impl<G: GraphicsApi> Renderer<G> {
    pub fn new(mut gl: G, options: RendererOptions) -> Result<Self, RenderError> {
        if options.debug_output {
            gl.enable_debug_output();
        }
        if options.blending {
            gl.enable_alpha_blending();
        }
        let batch = QuadBatch::init(&mut gl, options.limits)?;
        let slots = SlotAllocator::new(batch.limits().max_texture_units);

        let mut renderer = Self {
            gl,
            batch,
            slots,
            background: options.background,
            viewport: options.viewport,
            frame: FrameStats::default(),
            _not_send: PhantomData,
        };
        let (width, height) = options.viewport;
        renderer.set_viewport(width, height);
        info!(
            width,
            height,
            background = %renderer.background.to_hex(),
            "renderer ready"
        );
        Ok(renderer)
    }

    pub fn from_config(gl: G, config: &QuadglConfig) -> Result<Self, RenderError> {
        Self::new(gl, RendererOptions::from_config(config))
    }

    /// Clear color and depth with the background color. Starts a new
    /// frame's statistics.
    pub fn clear(&mut self) {
        self.frame = FrameStats::default();
        self.gl.clear(self.background.to_f32_array());
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn begin(&mut self, view_projection: &Mat4) -> Result<(), RenderError> {
        self.batch.begin(&mut self.gl, view_projection)
    }

    pub fn begin_with_camera(&mut self, camera: &CameraController) -> Result<(), RenderError> {
        self.begin(&camera.view_projection())
    }

    pub fn draw_textured_quad(
        &mut self,
        transform: &Mat4,
        texture: &Texture,
    ) -> Result<(), RenderError> {
        self.batch.add_textured(transform, texture)
    }

    pub fn end(&mut self) -> Result<FrameStats, RenderError> {
        let stats = self.batch.end(&mut self.gl)?;
        self.frame.accumulate(stats);
        Ok(stats)
    }

    /// Totals for every flush since the last [`Renderer::clear`].
    pub fn frame_stats(&self) -> FrameStats {
        self.frame
    }

    /// Load a texture from an image file. With `slot` unset the next free
    /// slot is used.
    pub fn create_texture(
        &mut self,
        path: impl AsRef<Path>,
        slot: Option<u32>,
    ) -> Result<Texture, RenderError> {
        let path = path.as_ref();
        let image = TextureImage::from_path(path)?;
        let texture = self.create_texture_from_image(&image, slot)?;
        info!(path = %path.display(), slot = texture.slot().index(), "texture loaded");
        Ok(texture)
    }

    pub fn create_texture_from_image(
        &mut self,
        image: &TextureImage,
        slot: Option<u32>,
    ) -> Result<Texture, RenderError> {
        let slot = self.reserve_slot(slot)?;
        Texture::new(&mut self.gl, image, slot).inspect_err(|_| self.slots.release(slot))
    }

    /// Delete a texture and free its slot.
    pub fn destroy_texture(&mut self, texture: Texture) {
        self.slots.release(texture.slot());
        texture.destroy(&mut self.gl);
    }

    pub fn create_shader_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderProgram, RenderError> {
        ShaderProgram::new(&mut self.gl, vertex_source, fragment_source)
    }

    fn reserve_slot(&mut self, slot: Option<u32>) -> Result<TextureSlot, RenderError> {
        match slot {
            Some(index) => self.slots.claim(index),
            None => self.slots.allocate(),
        }
    }

    pub fn batch(&self) -> &QuadBatch {
        &self.batch
    }

    pub fn slots(&self) -> &SlotAllocator {
        &self.slots
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn gl_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    /// Release the batch's GPU objects and hand back the backend.
    pub fn destroy(self) -> G {
        let mut gl = self.gl;
        self.batch.destroy(&mut gl);
        gl
    }
}
