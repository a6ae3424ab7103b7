//! Camera configuration types.

use serde::{Deserialize, Serialize};

/// Projection variant used by the camera.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ProjectionKind {
    #[default]
    Orthographic,
    Perspective,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub projection: ProjectionKind,
    /// Vertical field of view for the perspective projection (valid range: 1-179).
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Visible world-space height for the orthographic projection.
    pub ortho_height: f32,
    pub position: [f32; 3],
    /// Look direction, relative to `position`.
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Orthographic,
            fov_degrees: 45.0,
            near: 0.1,
            far: 10.0,
            ortho_height: 2.0,
            position: [0.0, 0.0, 2.0],
            target: [0.0, 0.0, -1.0],
        }
    }
}
