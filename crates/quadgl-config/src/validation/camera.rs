//! Validation for the camera section.

use crate::schema::QuadglConfig;

use super::helpers::validate_range_f32;

pub(crate) fn validate_camera(errors: &mut Vec<String>, config: &QuadglConfig) {
    let camera = &config.camera;
    validate_range_f32(errors, "camera.fov_degrees", camera.fov_degrees, 1.0, 179.0);

    if camera.near <= 0.0 {
        errors.push(format!("camera.near = {} must be positive", camera.near));
    }
    if camera.far <= camera.near {
        errors.push(format!(
            "camera.far = {} must be greater than camera.near = {}",
            camera.far, camera.near
        ));
    }
    if camera.ortho_height <= 0.0 {
        errors.push(format!(
            "camera.ortho_height = {} must be positive",
            camera.ortho_height
        ));
    }
    if camera.target == [0.0, 0.0, 0.0] {
        errors.push("camera.target must not be the zero vector".into());
    }
}
