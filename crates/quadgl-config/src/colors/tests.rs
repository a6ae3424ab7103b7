//! Tests for color parsing.

use super::*;

#[test]
fn parse_hex_6_digit() {
    let c = parse_color("#334b4b").unwrap();
    assert_eq!(c, Color::from_rgba(51, 75, 75, 255));
}

#[test]
fn parse_hex_8_digit() {
    let c = parse_color("#00d4ff80").unwrap();
    assert_eq!(c, Color::from_rgba(0, 212, 255, 128));
}

#[test]
fn parse_hex_3_digit() {
    let c = parse_color("#f00").unwrap();
    assert_eq!(c, Color::from_rgba(255, 0, 0, 255));
}

#[test]
fn parse_rgba_float_alpha() {
    let c = parse_color("rgba(0,212,255,0.5)").unwrap();
    assert_eq!((c.r, c.g, c.b), (0, 212, 255));
    assert_eq!(c.a, 128);
}

#[test]
fn parse_rgba_integer_alpha() {
    let c = parse_color("rgba(10, 20, 30, 200)").unwrap();
    assert_eq!(c, Color::from_rgba(10, 20, 30, 200));
}

#[test]
fn parse_color_invalid_format() {
    assert!(parse_color("not-a-color").is_err());
    assert!(parse_color("").is_err());
    assert!(parse_color("#xyz").is_err());
    assert!(parse_color("rgba(300,0,0,1.0)").is_err());
}

#[test]
fn parse_color_rejects_malformed_hex() {
    assert!(parse_color("#12345").is_err());
    assert!(parse_color("#+f+f+f").is_err());
    assert!(parse_color("#ééé").is_err());
}

#[test]
fn parse_color_rejects_short_rgb() {
    assert!(parse_color("rgb(10,20)").is_err());
    assert!(parse_color("teal").is_err());
}
