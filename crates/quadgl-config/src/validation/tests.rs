//! Tests for the full validation pipeline.

use super::*;
use crate::schema::QuadglConfig;

#[test]
fn default_config_validates() {
    let config = QuadglConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_max_quads() {
    let mut config = QuadglConfig::default();
    config.renderer.max_quads = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("renderer.max_quads"));
}

#[test]
fn catches_too_many_texture_units() {
    let mut config = QuadglConfig::default();
    config.renderer.max_texture_units = 33;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("renderer.max_texture_units"));
}

#[test]
fn catches_invalid_background() {
    let mut config = QuadglConfig::default();
    config.renderer.background = "teal".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("renderer.background"));
}

#[test]
fn background_accepted_exactly_when_it_parses() {
    for (background, ok) in [
        ("#334b4b", true),
        ("#f00", true),
        ("rgba(0,212,255,0.5)", true),
        ("#12345", false),
        ("rgb(10,20)", false),
        ("rgba(300,0,0,1.0)", false),
    ] {
        let mut config = QuadglConfig::default();
        config.renderer.background = background.into();
        assert_eq!(validate(&config).is_ok(), ok, "{background}");
    }
}

#[test]
fn catches_zero_viewport() {
    let mut config = QuadglConfig::default();
    config.viewport.height = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("viewport.height"));
}

#[test]
fn catches_inverted_clip_planes() {
    let mut config = QuadglConfig::default();
    config.camera.near = 5.0;
    config.camera.far = 1.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("camera.far"));
}

#[test]
fn catches_zero_target() {
    let mut config = QuadglConfig::default();
    config.camera.target = [0.0; 3];
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("camera.target"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = QuadglConfig::default();
    config.renderer.max_quads = 0;
    config.camera.fov_degrees = 200.0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("renderer.max_quads"));
    assert!(err.contains("camera.fov_degrees"));
    assert!(err.contains("; "));
}
