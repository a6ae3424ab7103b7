//! Renderer configuration types.

use serde::{Deserialize, Serialize};

/// Quad batch sizing and frame clear settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Quads a single batch can hold before it must be flushed (valid range: 1-100000).
    pub max_quads: u32,
    /// Distinct textures per batch (valid range: 1-32).
    pub max_texture_units: u32,
    /// Clear color, any format accepted by `colors::parse_color`.
    pub background: String,
    /// Route OpenGL debug messages to the log.
    pub debug_output: bool,
    /// Enable `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blending at init.
    pub blending: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_quads: 10_000,
            max_texture_units: 32,
            background: "#334b4b".into(),
            debug_output: false,
            blending: true,
        }
    }
}
