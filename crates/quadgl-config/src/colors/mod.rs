//! Color parsing.
//!
//! Supports `#RGB`, `#RRGGBB`, `#RRGGBBAA`, and `rgba(r,g,b,a)` formats.

mod parse;

#[cfg(test)]
mod tests;

use quadgl_common::types::Color;
use quadgl_common::ConfigError;

use parse::{parse_hex, parse_rgba};

/// Parse a color string into a [`Color`].
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    let s = s.trim();

    if s.starts_with('#') {
        if let Some(color) = parse_hex(s) {
            return Ok(color);
        }
        return Err(ConfigError::ParseError(format!("invalid hex color: {s}")));
    }

    if s.starts_with("rgba(") || s.starts_with("rgb(") {
        if let Some(color) = parse_rgba(s) {
            return Ok(color);
        }
        return Err(ConfigError::ParseError(format!("invalid rgba color: {s}")));
    }

    Err(ConfigError::ParseError(format!(
        "unrecognized color format: {s}"
    )))
}
