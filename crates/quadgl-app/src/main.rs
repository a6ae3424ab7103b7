mod app;
mod cli;
mod demo;

use std::process::ExitCode;

use quadgl_config::QuadglConfig;
use quadgl_renderer::{CameraController, HeadlessBackend, Renderer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const LOG_TARGETS: [&str; 4] = ["quadgl", "quadgl_app", "quadgl_renderer", "quadgl_config"];

fn init_logging(level: &str) {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let mut filter = EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> ExitCode {
    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => quadgl_config::load_config_from(path),
        None => quadgl_config::load_config(),
    };

    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.as_filter())
        .unwrap_or("info");
    init_logging(args.log_level.as_deref().unwrap_or(config_level));

    tracing::info!("quadgl v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        QuadglConfig::default()
    });
    tracing::info!(
        "Config loaded ({}x{}, max {} quads)",
        config.viewport.width,
        config.viewport.height,
        config.renderer.max_quads
    );

    if args.print_config {
        println!("{}", quadgl_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }

    let renderer = match Renderer::from_config(HeadlessBackend::new(), &config) {
        Ok(renderer) => renderer,
        Err(e) => {
            tracing::error!("Renderer init failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let camera =
        CameraController::from_config(&config.camera, config.viewport.width, config.viewport.height);
    let mut app = app::Application::new(renderer);
    app.add_layer(demo::TexturedQuadLayer::new(args.textures, args.quads, camera));

    let result = app.run(args.frames);
    let gl = app.shutdown();

    let leaked = gl.live_buffers()
        + gl.live_vertex_arrays()
        + gl.live_textures()
        + gl.live_shaders()
        + gl.live_programs();
    if leaked > 0 {
        tracing::warn!("{leaked} GPU objects still alive after shutdown");
    }
    for error in gl.errors() {
        tracing::warn!("Backend reported misuse: {error}");
    }

    match result {
        Ok(summary) => {
            tracing::info!(
                "Rendered {} frames ({} quads, {} draw calls)",
                summary.frames,
                summary.quads,
                summary.draw_calls
            );
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Frame loop error: {e}");
            ExitCode::FAILURE
        }
    }
}
