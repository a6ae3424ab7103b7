//! Grid of textured quads under a slowly panning camera.

use std::path::PathBuf;

use glam::{Mat4, Vec3};
use quadgl_renderer::{
    CameraController, GraphicsApi, RenderError, Renderer, Texture, TextureImage,
};
use tracing::{debug, info};

/// Fallback textures when no image paths are given.
const PALETTE: [[u8; 4]; 3] = [
    [66, 133, 244, 255],
    [24, 119, 242, 255],
    [225, 48, 108, 255],
];

const SOLID_TEXTURE_SIZE: u32 = 16;
/// Fraction of the visible height the grid spans.
const GRID_EXTENT: f32 = 1.8;
const PAN_SPEED: f32 = 0.1;
const PAN_LIMIT: f32 = 0.25;

pub struct TexturedQuadLayer {
    sources: Vec<PathBuf>,
    quad_count: usize,
    camera: CameraController,
    textures: Vec<Texture>,
    quads: Vec<(Mat4, usize)>,
    pan_direction: f32,
    pan_offset: f32,
}

impl TexturedQuadLayer {
    pub fn new(sources: Vec<PathBuf>, quad_count: usize, camera: CameraController) -> Self {
        Self {
            sources,
            quad_count,
            camera,
            textures: Vec::new(),
            quads: Vec::new(),
            pan_direction: 1.0,
            pan_offset: 0.0,
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn transforms(&self) -> impl Iterator<Item = &Mat4> {
        self.quads.iter().map(|(transform, _)| transform)
    }
}

/// Transforms for `count` quads on a centred square-ish grid.
pub fn grid_transforms(count: usize) -> Vec<Mat4> {
    if count == 0 {
        return Vec::new();
    }
    let cols = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    let cell = GRID_EXTENT / cols.max(rows) as f32;
    let scale = Mat4::from_scale(Vec3::new(cell * 0.9, cell * 0.9, 1.0));

    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let x = (col as f32 - (cols - 1) as f32 / 2.0) * cell;
            let y = ((rows - 1) as f32 / 2.0 - row as f32) * cell;
            Mat4::from_translation(Vec3::new(x, y, 0.0)) * scale
        })
        .collect()
}

/// Queue a quad, flushing the batch first if it is full.
fn draw_or_flush<G: GraphicsApi>(
    renderer: &mut Renderer<G>,
    camera: &CameraController,
    transform: &Mat4,
    texture: &Texture,
) -> Result<(), RenderError> {
    match renderer.draw_textured_quad(transform, texture) {
        Err(e) if e.is_capacity() => {
            debug!("{e}; flushing batch early");
            renderer.end()?;
            renderer.begin_with_camera(camera)?;
            renderer.draw_textured_quad(transform, texture)
        }
        other => other,
    }
}

impl<G: GraphicsApi> crate::app::Layer<G> for TexturedQuadLayer {
    fn on_init(&mut self, renderer: &mut Renderer<G>) -> Result<(), RenderError> {
        if self.sources.is_empty() {
            let free = (renderer.slots().max() as usize).saturating_sub(renderer.slots().in_use());
            // At least one, so an exhausted allocator reports its own error.
            for &rgba in PALETTE.iter().take(free.max(1)) {
                let image = TextureImage::solid(SOLID_TEXTURE_SIZE, SOLID_TEXTURE_SIZE, rgba);
                self.textures
                    .push(renderer.create_texture_from_image(&image, None)?);
            }
        } else {
            for path in &self.sources {
                self.textures.push(renderer.create_texture(path, None)?);
            }
        }

        let texture_count = self.textures.len();
        self.quads = grid_transforms(self.quad_count)
            .into_iter()
            .enumerate()
            .map(|(i, transform)| (transform, i % texture_count))
            .collect();

        info!(
            quads = self.quads.len(),
            textures = texture_count,
            "textured quad layer ready"
        );
        Ok(())
    }

    fn on_update(&mut self, dt: f32) {
        let step = PAN_SPEED * dt * self.pan_direction;
        self.pan_offset += step;
        self.camera.move_right(step);
        if self.pan_offset.abs() >= PAN_LIMIT {
            self.pan_direction = -self.pan_direction;
        }
    }

    fn on_render(&mut self, renderer: &mut Renderer<G>) -> Result<(), RenderError> {
        renderer.begin_with_camera(&self.camera)?;
        for (transform, index) in &self.quads {
            draw_or_flush(renderer, &self.camera, transform, &self.textures[*index])?;
        }
        renderer.end()?;
        Ok(())
    }

    fn on_shutdown(&mut self, renderer: &mut Renderer<G>) {
        for texture in self.textures.drain(..) {
            renderer.destroy_texture(texture);
        }
    }
}
