//! Validation for the renderer and viewport sections.

use crate::colors::parse_color;
use crate::schema::QuadglConfig;

use super::helpers::validate_range;

/// Highest texture-unit count the batch shader's sampler array can address.
pub const MAX_SAMPLER_UNITS: u32 = 32;

pub(crate) fn validate_renderer(errors: &mut Vec<String>, config: &QuadglConfig) {
    validate_range(
        errors,
        "renderer.max_quads",
        config.renderer.max_quads,
        1,
        100_000,
    );
    validate_range(
        errors,
        "renderer.max_texture_units",
        config.renderer.max_texture_units,
        1,
        MAX_SAMPLER_UNITS,
    );
    if let Err(e) = parse_color(&config.renderer.background) {
        errors.push(format!("renderer.background: {e}"));
    }
}

pub(crate) fn validate_viewport(errors: &mut Vec<String>, config: &QuadglConfig) {
    validate_range(errors, "viewport.width", config.viewport.width, 1, 16_384);
    validate_range(errors, "viewport.height", config.viewport.height, 1, 16_384);
}
