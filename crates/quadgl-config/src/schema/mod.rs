//! Configuration schema types for quadgl.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod camera;
mod logging;
mod renderer;
mod viewport;

pub use camera::*;
pub use logging::*;
pub use renderer::*;
pub use viewport::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct QuadglConfig {
    pub renderer: RendererConfig,
    pub viewport: ViewportConfig,
    pub camera: CameraConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_renderer_section() {
        let config = QuadglConfig::default();
        assert_eq!(config.renderer.max_quads, 10_000);
        assert_eq!(config.renderer.max_texture_units, 32);
        assert_eq!(config.renderer.background, "#334b4b");
        assert!(!config.renderer.debug_output);
        assert!(config.renderer.blending);
    }

    #[test]
    fn default_viewport_and_camera() {
        let config = QuadglConfig::default();
        assert_eq!(config.viewport.width, 1024);
        assert_eq!(config.viewport.height, 768);
        assert_eq!(config.camera.projection, ProjectionKind::Orthographic);
        assert!((config.camera.fov_degrees - 45.0).abs() < f32::EPSILON);
        assert_eq!(config.camera.position, [0.0, 0.0, 2.0]);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: QuadglConfig = toml::from_str(
            r#"
[renderer]
max_quads = 64

[camera]
projection = "perspective"
"#,
        )
        .unwrap();
        assert_eq!(config.renderer.max_quads, 64);
        assert_eq!(config.renderer.max_texture_units, 32);
        assert_eq!(config.camera.projection, ProjectionKind::Perspective);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_uppercase_names() {
        let config: QuadglConfig = toml::from_str("[logging]\nlevel = \"WARNING\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Warning);
        assert_eq!(config.logging.level.as_filter(), "warn");
    }
}
