use crate::core::math::transform::{TransformFactory, transform_direction};
use crate::io::config::CameraConfig;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

const PITCH_LIMIT: f32 = 89.0;

/// Movement and look intent for one update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Movement along the camera's right (x), up (y) and forward (z) axes,
    /// in units of the current speed.
    pub translation: Vector3<f32>,
    /// Yaw (x) and pitch (y) deltas in degrees. Positive pitch looks down.
    pub rotation: Vector2<f32>,
    /// Multiplies the speed by `fast_multiplier`.
    pub fast: bool,
}

/// First-person camera driven by accumulated yaw and pitch.
///
/// The basis and matrices are derived state, rebuilt on every `update`.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point3<f32>,
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,

    total_yaw: f32,
    total_pitch: f32,

    pub near: f32,
    pub far: f32,
    /// `tan(fov_y / 2)`.
    fov_scale: f32,
    aspect_ratio: f32,

    pub move_speed: f32,
    pub fast_multiplier: f32,
    /// Keep pitch within ±89°. Off by default, letting the view flip past vertical.
    pub clamp_pitch: bool,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    inverse_view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(origin: Point3<f32>, fov_degrees: f32, near: f32, far: f32, aspect_ratio: f32) -> Self {
        let mut cam = Self {
            origin,
            forward: Vector3::z(),
            right: Vector3::x(),
            up: Vector3::y(),
            total_yaw: 0.0,
            total_pitch: 0.0,
            near,
            far,
            fov_scale: (fov_degrees.to_radians() * 0.5).tan(),
            aspect_ratio,
            move_speed: 20.0,
            fast_multiplier: 2.0,
            clamp_pitch: false,
            view_matrix: Matrix4::identity(),
            inverse_view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    pub fn from_config(config: &CameraConfig, aspect_ratio: f32) -> Self {
        let mut cam = Self::new(
            Point3::from(config.position),
            config.fov,
            config.near,
            config.far,
            aspect_ratio,
        );
        cam.move_speed = config.move_speed;
        cam.fast_multiplier = config.fast_multiplier;
        cam.clamp_pitch = config.clamp_pitch;
        cam
    }

    /// Applies one frame of input, then rebuilds the basis and all matrices.
    pub fn update(&mut self, elapsed: f32, input: &CameraInput) {
        let speed = if input.fast {
            self.move_speed * self.fast_multiplier
        } else {
            self.move_speed
        };

        let t = input.translation;
        self.origin +=
            (self.right * t.x + self.up * t.y + self.forward * t.z) * speed * elapsed;

        self.total_yaw = wrap_degrees(self.total_yaw + input.rotation.x);
        self.total_pitch = if self.clamp_pitch {
            (self.total_pitch + input.rotation.y).clamp(-PITCH_LIMIT, PITCH_LIMIT)
        } else {
            wrap_degrees(self.total_pitch + input.rotation.y)
        };

        self.update_matrices();
    }

    /// Recalculates the basis, View and Projection matrices from the current state.
    pub fn update_matrices(&mut self) {
        let rotation = TransformFactory::rotation_y(self.total_yaw.to_radians())
            * TransformFactory::rotation_x(self.total_pitch.to_radians());

        self.forward = transform_direction(&rotation, &Vector3::z()).normalize();
        self.right = Vector3::y()
            .cross(&self.forward)
            .try_normalize(1e-6)
            .unwrap_or_else(|| transform_direction(&rotation, &Vector3::x()).normalize());
        self.up = self.forward.cross(&self.right).normalize();

        self.view_matrix = TransformFactory::view_lh(&self.origin, &self.right, &self.up, &self.forward);
        self.inverse_view_matrix =
            TransformFactory::look_at_basis(&self.origin, &self.right, &self.up, &self.forward);
        self.projection_matrix = TransformFactory::perspective_fov_lh(
            self.fov_scale,
            self.aspect_ratio,
            self.near,
            self.far,
        );
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.update_matrices();
    }

    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    /// Accumulated `(yaw, pitch)` in degrees.
    pub fn angles(&self) -> (f32, f32) {
        (self.total_yaw, self.total_pitch)
    }

    pub fn fov_scale(&self) -> f32 {
        self.fov_scale
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn inverse_view_matrix(&self) -> Matrix4<f32> {
        self.inverse_view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }
}

/// Wraps an angle in degrees into `[-180, 180)`.
#[inline]
fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}
