//! Layer-driven frame loop.

use quadgl_common::QuadglError;
use quadgl_renderer::{FrameCounter, GraphicsApi, RenderError, Renderer};
use tracing::{debug, info};

/// A unit of per-frame application logic.
pub trait Layer<G: GraphicsApi> {
    /// Called once before the first frame.
    fn on_init(&mut self, renderer: &mut Renderer<G>) -> Result<(), RenderError>;

    /// Advance by `dt` seconds.
    fn on_update(&mut self, dt: f32);

    /// Submit this layer's draws for the current frame.
    fn on_render(&mut self, renderer: &mut Renderer<G>) -> Result<(), RenderError>;

    /// Release GPU resources the layer owns.
    fn on_shutdown(&mut self, _renderer: &mut Renderer<G>) {}
}

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub quads: usize,
    pub draw_calls: usize,
}

pub struct Application<G: GraphicsApi> {
    renderer: Renderer<G>,
    layers: Vec<Box<dyn Layer<G>>>,
    frame_counter: FrameCounter,
}

impl<G: GraphicsApi> Application<G> {
    pub fn new(renderer: Renderer<G>) -> Self {
        Self {
            renderer,
            layers: Vec::new(),
            frame_counter: FrameCounter::new(),
        }
    }

    pub fn add_layer(&mut self, layer: impl Layer<G> + 'static) {
        self.layers.push(Box::new(layer));
    }

    pub fn renderer(&self) -> &Renderer<G> {
        &self.renderer
    }

    /// Initialize every layer, then run `frames` iterations of
    /// clear → update → render.
    pub fn run(&mut self, frames: u64) -> Result<RunSummary, QuadglError> {
        for layer in &mut self.layers {
            layer.on_init(&mut self.renderer)?;
        }
        info!(layers = self.layers.len(), frames, "entering frame loop");

        let mut summary = RunSummary::default();
        while summary.frames < frames {
            self.frame_counter.tick();
            let dt = self.frame_counter.delta_seconds();

            self.renderer.clear();
            for layer in &mut self.layers {
                layer.on_update(dt);
                layer.on_render(&mut self.renderer)?;
            }

            let stats = self.renderer.frame_stats();
            summary.frames += 1;
            summary.quads += stats.quads;
            summary.draw_calls += stats.draw_calls;
            debug!(
                frame = summary.frames,
                quads = stats.quads,
                draw_calls = stats.draw_calls,
                "frame done"
            );
        }
        Ok(summary)
    }

    /// Let layers release their resources and tear down the renderer.
    pub fn shutdown(mut self) -> G {
        for layer in &mut self.layers {
            layer.on_shutdown(&mut self.renderer);
        }
        self.renderer.destroy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use quadgl_renderer::{HeadlessBackend, RendererOptions, Texture, TextureImage};

    #[derive(Default)]
    struct CountingLayer {
        texture: Option<Texture>,
        updates: u32,
    }

    impl Layer<HeadlessBackend> for CountingLayer {
        fn on_init(&mut self, renderer: &mut Renderer<HeadlessBackend>) -> Result<(), RenderError> {
            let image = TextureImage::solid(1, 1, [255; 4]);
            self.texture = Some(renderer.create_texture_from_image(&image, None)?);
            Ok(())
        }

        fn on_update(&mut self, _dt: f32) {
            self.updates += 1;
        }

        fn on_render(&mut self, renderer: &mut Renderer<HeadlessBackend>) -> Result<(), RenderError> {
            renderer.begin(&Mat4::IDENTITY)?;
            if let Some(texture) = &self.texture {
                renderer.draw_textured_quad(&Mat4::IDENTITY, texture)?;
            }
            renderer.end()?;
            Ok(())
        }

        fn on_shutdown(&mut self, renderer: &mut Renderer<HeadlessBackend>) {
            if let Some(texture) = self.texture.take() {
                renderer.destroy_texture(texture);
            }
        }
    }

    struct FailingLayer;

    impl Layer<HeadlessBackend> for FailingLayer {
        fn on_init(&mut self, _: &mut Renderer<HeadlessBackend>) -> Result<(), RenderError> {
            Ok(())
        }

        fn on_update(&mut self, _dt: f32) {}

        fn on_render(&mut self, renderer: &mut Renderer<HeadlessBackend>) -> Result<(), RenderError> {
            renderer.end().map(|_| ())
        }
    }

    fn app() -> Application<HeadlessBackend> {
        let renderer = Renderer::new(HeadlessBackend::new(), RendererOptions::default()).unwrap();
        Application::new(renderer)
    }

    #[test]
    fn runs_requested_frames() {
        let mut app = app();
        app.add_layer(CountingLayer::default());
        let summary = app.run(5).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                frames: 5,
                quads: 5,
                draw_calls: 5,
            }
        );
        assert_eq!(app.renderer().gl().clears().len(), 5);
        assert_eq!(app.renderer().gl().draw_calls().len(), 5);
    }

    #[test]
    fn zero_frames_still_initializes() {
        let mut app = app();
        app.add_layer(CountingLayer::default());
        let summary = app.run(0).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(app.renderer().slots().in_use(), 1);
    }

    #[test]
    fn layer_error_stops_the_loop() {
        let mut app = app();
        app.add_layer(FailingLayer);
        let err = app.run(3).unwrap_err();
        assert!(matches!(err, QuadglError::Renderer(_)));
        assert!(app.renderer().gl().clears().len() == 1);
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut app = app();
        app.add_layer(CountingLayer::default());
        app.run(2).unwrap();
        let gl = app.shutdown();
        assert_eq!(gl.live_textures(), 0);
        assert_eq!(gl.live_buffers(), 0);
        assert_eq!(gl.live_programs(), 0);
    }
}
