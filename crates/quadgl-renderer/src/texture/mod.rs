//! 2D textures bound to fixed texture units.

mod slots;

use std::path::Path;

use image::DynamicImage;
use tracing::{debug, info};

pub use slots::{SlotAllocator, TextureSlot};

use crate::error::RenderError;
use crate::gl::{BindScope, GraphicsApi, TextureId, TextureSampling};

/// Length of the sampler array declared by the quad shader. Texture slots
/// must fall below it.
pub const SAMPLER_ARRAY_LEN: u32 = 32;

/// Decoded RGBA8 pixels, rows ordered bottom to top as OpenGL expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let image = image::open(path).map_err(|e| RenderError::TextureDecode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_dynamic(image))
    }

    /// Decode an encoded image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RenderError> {
        let image = image::load_from_memory(bytes).map_err(|e| RenderError::TextureDecode {
            path: "<memory>".into(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_dynamic(image))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgba = image.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            width,
            height,
            pixels: rgba.into_raw(),
        }
    }

    /// A `width` x `height` image filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Non-owning reference to a texture, as held by a batch for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub id: TextureId,
    pub slot: TextureSlot,
}

/// A GPU texture with linear filtering, edge clamping and mipmaps.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    slot: TextureSlot,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn new<G: GraphicsApi>(
        gl: &mut G,
        image: &TextureImage,
        slot: TextureSlot,
    ) -> Result<Self, RenderError> {
        if slot.index() >= SAMPLER_ARRAY_LEN {
            return Err(RenderError::TextureSlotOutOfRange {
                slot: slot.index(),
                max: SAMPLER_ARRAY_LEN,
            });
        }
        let id = gl.create_texture()?;
        {
            let mut scope = BindScope::new(&mut *gl);
            scope.texture(slot.index(), id);
            scope.texture_sampling(TextureSampling::default());
            scope.texture_image_rgba8(image.width, image.height, &image.pixels);
            scope.generate_mipmap();
        }
        debug!(
            texture = id.get(),
            slot = slot.index(),
            width = image.width,
            height = image.height,
            "texture uploaded"
        );
        Ok(Self {
            id,
            slot,
            width: image.width,
            height: image.height,
        })
    }

    pub fn from_path<G: GraphicsApi>(
        gl: &mut G,
        path: &Path,
        slot: TextureSlot,
    ) -> Result<Self, RenderError> {
        let image = TextureImage::from_path(path)?;
        let texture = Self::new(gl, &image, slot)?;
        info!(path = %path.display(), slot = slot.index(), "texture loaded");
        Ok(texture)
    }

    /// Bind to this texture's unit.
    pub fn bind<G: GraphicsApi>(&self, gl: &mut G) {
        gl.active_texture(self.slot.index());
        gl.bind_texture(Some(self.id));
    }

    pub fn unbind<G: GraphicsApi>(&self, gl: &mut G) {
        gl.active_texture(self.slot.index());
        gl.bind_texture(None);
    }

    pub fn handle(&self) -> TextureHandle {
        TextureHandle {
            id: self.id,
            slot: self.slot,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn slot(&self) -> TextureSlot {
        self.slot
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn destroy<G: GraphicsApi>(self, gl: &mut G) {
        gl.delete_texture(self.id);
    }
}
