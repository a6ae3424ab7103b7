//! Projection variants and a free-moving camera controller.

use glam::{Mat4, Vec3};
use quadgl_config::schema::{CameraConfig, ProjectionKind};

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

/// A projection that tracks the framebuffer aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Orthographic {
        /// World units visible vertically.
        view_height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn orthographic(view_height: f32, width: u32, height: u32, near: f32, far: f32) -> Self {
        let mut projection = Projection::Orthographic {
            view_height,
            aspect: 1.0,
            near,
            far,
        };
        projection.resize(width, height);
        projection
    }

    pub fn perspective(fov_degrees: f32, width: u32, height: u32, near: f32, far: f32) -> Self {
        let mut projection = Projection::Perspective {
            fov_y: fov_degrees.to_radians(),
            aspect: 1.0,
            near,
            far,
        };
        projection.resize(width, height);
        projection
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        match config.projection {
            ProjectionKind::Orthographic => Self::orthographic(
                config.ortho_height,
                width,
                height,
                config.near,
                config.far,
            ),
            ProjectionKind::Perspective => Self::perspective(
                config.fov_degrees,
                width,
                height,
                config.near,
                config.far,
            ),
        }
    }

    /// Update the aspect ratio. A zero-sized framebuffer (minimized window)
    /// keeps the previous ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        match self {
            Projection::Orthographic { aspect, .. } | Projection::Perspective { aspect, .. } => {
                *aspect = aspect_ratio(width, height);
            }
        }
    }

    pub fn aspect(&self) -> f32 {
        match *self {
            Projection::Orthographic { aspect, .. } | Projection::Perspective { aspect, .. } => {
                aspect
            }
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match *self {
            Projection::Orthographic {
                view_height,
                aspect,
                near,
                far,
            } => {
                let half_h = view_height / 2.0;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, near, far)
            }
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh_gl(fov_y, aspect, near, far),
        }
    }
}

/// Position, look direction and up vector composed with a [`Projection`].
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    position: Vec3,
    /// Look direction, relative to `position`.
    target: Vec3,
    up: Vec3,
    projection: Projection,
}

impl CameraController {
    pub fn new(projection: Projection) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            projection,
        }
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            position: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            up: Vec3::Y,
            projection: Projection::from_config(config, width, height),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.projection_matrix() * self.view_matrix()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Move along the look direction. Negative distances move back.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.target.normalize_or_zero() * distance;
    }

    /// Strafe perpendicular to the look direction. Negative distances move
    /// left.
    pub fn move_right(&mut self, distance: f32) {
        let right = self.target.normalize_or_zero().cross(self.up).normalize_or_zero();
        self.position += right * distance;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn orthographic_maps_view_height_to_ndc() {
        let proj = Projection::orthographic(2.0, 800, 400, 0.1, 10.0);
        assert!((proj.aspect() - 2.0).abs() < f32::EPSILON);
        let m = proj.projection_matrix();
        let corner = m * Vec4::new(2.0, 1.0, -1.0, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_uses_radians() {
        let proj = Projection::perspective(90.0, 100, 100, 0.1, 10.0);
        match proj {
            Projection::Perspective { fov_y, .. } => {
                assert!((fov_y - std::f32::consts::FRAC_PI_2).abs() < 1e-6)
            }
            other => panic!("unexpected projection: {other:?}"),
        }
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut proj = Projection::perspective(45.0, 1024, 768, 0.1, 10.0);
        proj.resize(1920, 1080);
        assert!((proj.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
        proj.resize(0, 1080);
        assert!((proj.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn from_config_selects_variant() {
        let mut config = CameraConfig::default();
        assert!(matches!(
            Projection::from_config(&config, 10, 10),
            Projection::Orthographic { .. }
        ));
        config.projection = ProjectionKind::Perspective;
        assert!(matches!(
            Projection::from_config(&config, 10, 10),
            Projection::Perspective { .. }
        ));
    }

    #[test]
    fn view_moves_world_opposite_to_camera() {
        let camera = CameraController::new(Projection::orthographic(2.0, 1, 1, 0.1, 10.0));
        let p = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(approx(p, Vec3::new(0.0, 0.0, -2.0)));
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let camera = CameraController::new(Projection::perspective(45.0, 1024, 768, 0.1, 10.0));
        let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn movement_helpers() {
        let mut camera = CameraController::new(Projection::orthographic(2.0, 1, 1, 0.1, 10.0));
        camera.move_forward(1.0);
        assert!(approx(camera.position(), Vec3::new(0.0, 0.0, 1.0)));
        camera.move_right(2.0);
        assert!(approx(camera.position(), Vec3::new(2.0, 0.0, 1.0)));
        camera.move_right(-2.0);
        camera.translate(Vec3::new(0.0, 0.5, 0.0));
        assert!(approx(camera.position(), Vec3::new(0.0, 0.5, 1.0)));
    }

    #[test]
    fn from_config_reads_position_and_target() {
        let config = CameraConfig {
            position: [1.0, 2.0, 3.0],
            target: [0.0, 0.0, -2.0],
            ..CameraConfig::default()
        };
        let camera = CameraController::from_config(&config, 640, 480);
        assert_eq!(camera.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.target(), Vec3::new(0.0, 0.0, -2.0));
    }
}
