use crate::core::geometry::Varying;
use nalgebra::Vector3;
use std::ops::{Add, Mul};

/// Trait for types that can be linearly interpolated across a triangle's surface.
///
/// Requirements:
/// - Copy + Clone: cheaply duplicable values for per-vertex storage and interpolation.
/// - Add + Mul<f32>: support linear combination (a + b * t) used by barycentric interpolation.
pub trait Interpolatable: Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> {}

impl Add for Varying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            color: self.color + other.color,
            uv: self.uv + other.uv,
            normal: self.normal + other.normal,
            tangent: self.tangent + other.tangent,
            view_direction: self.view_direction + other.view_direction,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            color: self.color * scalar,
            uv: self.uv * scalar,
            normal: self.normal * scalar,
            tangent: self.tangent * scalar,
            view_direction: self.view_direction * scalar,
        }
    }
}

impl Interpolatable for Varying {}

impl Interpolatable for f32 {}

impl Interpolatable for nalgebra::Vector2<f32> {}

impl Interpolatable for Vector3<f32> {}

/// Per-pixel stage of a material: turns interpolated attributes into a
/// linear color. Results may exceed 1 and are clamped by the caller.
pub trait FragmentShader {
    fn fragment(&self, varying: &Varying) -> Vector3<f32>;
}
