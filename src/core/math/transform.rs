use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the transformation matrices used by the pipeline.
///
/// All matrices use nalgebra's column-vector convention (`M * v`) in a
/// **left-handed** world: +X right, +Y up, +Z into the screen. Projection
/// maps view depth `[near, far]` onto NDC depth `[0, 1]`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around the X-axis.
    /// A positive angle tilts +Z towards -Y.
    pub fn rotation_x(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c,  -s,   0.0,
            0.0, s,   c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Y-axis.
    /// A positive angle turns +Z towards +X.
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,   0.0, s,   0.0,
            0.0, 1.0, 0.0, 0.0,
           -s,   0.0, c,   0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a rotation matrix around the Z-axis.
    pub fn rotation_z(angle_rad: f32) -> Matrix4<f32> {
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        Matrix4::new(
            c,  -s,   0.0, 0.0,
            s,   c,   0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation from Euler angles in degrees, applied X then Y then Z.
    pub fn rotation_euler_degrees(angles: &Vector3<f32>) -> Matrix4<f32> {
        Self::rotation_z(angles.z.to_radians())
            * Self::rotation_y(angles.y.to_radians())
            * Self::rotation_x(angles.x.to_radians())
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling_nonuniform(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Camera-to-world matrix built from an orthonormal basis and an origin.
    pub fn look_at_basis(
        origin: &Point3<f32>,
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new(
            right.x, up.x, forward.x, origin.x,
            right.y, up.y, forward.y, origin.y,
            right.z, up.z, forward.z, origin.z,
            0.0,     0.0,  0.0,       1.0,
        )
    }

    /// World-to-camera (view) matrix, left-handed.
    ///
    /// This is the analytic inverse of [`Self::look_at_basis`]: the rotation
    /// part is transposed and the translation is projected onto each axis.
    /// The basis must be orthonormal.
    pub fn view_lh(
        origin: &Point3<f32>,
        right: &Vector3<f32>,
        up: &Vector3<f32>,
        forward: &Vector3<f32>,
    ) -> Matrix4<f32> {
        let o = origin.coords;
        Matrix4::new(
            right.x,   right.y,   right.z,   -right.dot(&o),
            up.x,      up.y,      up.z,      -up.dot(&o),
            forward.x, forward.y, forward.z, -forward.dot(&o),
            0.0,       0.0,       0.0,       1.0,
        )
    }

    /// Creates a left-handed perspective projection.
    ///
    /// `fov_scale` is `tan(fov_y / 2)`. The result keeps view depth in clip `w`
    /// and maps `near..far` to NDC depth `0..1` (non-linear).
    pub fn perspective_fov_lh(fov_scale: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let range = far / (far - near);

        Matrix4::new(
            1.0 / (aspect_ratio * fov_scale), 0.0,             0.0,   0.0,
            0.0,                              1.0 / fov_scale, 0.0,   0.0,
            0.0,                              0.0,             range, -near * range,
            0.0,                              0.0,             1.0,   0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Transforms a direction by the upper-left 3x3 of `m`, ignoring translation.
#[inline]
pub fn transform_direction(m: &Matrix4<f32>, v: &Vector3<f32>) -> Vector3<f32> {
    m.fixed_view::<3, 3>(0, 0) * v
}

/// Performs perspective division: Clip Space -> NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    if w.abs() > 1e-6 {
        Point3::new(clip.x / w, clip.y / w, clip.z / w)
    } else {
        Point3::origin()
    }
}

/// Converts NDC coordinates to Screen coordinates (Viewport Transform).
/// Note: Y-axis is flipped (NDC +Y is up, Screen +Y is down).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: f32, height: f32) -> Point2<f32> {
    Point2::new((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height)
}
