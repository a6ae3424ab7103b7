//! Full configuration validation.
//!
//! Each section has its own submodule; `validate` calls them all and
//! collects every problem into a single `ConfigError`.

mod camera;
mod helpers;
mod renderer;

#[cfg(test)]
mod tests;

pub use renderer::MAX_SAMPLER_UNITS;

use crate::schema::QuadglConfig;
use quadgl_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &QuadglConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    renderer::validate_renderer(&mut errors, config);
    renderer::validate_viewport(&mut errors, config);
    camera::validate_camera(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
