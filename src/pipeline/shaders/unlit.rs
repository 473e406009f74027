use crate::core::geometry::Varying;
use crate::core::pipeline::FragmentShader;
use crate::scene::material::FireMaterial;
use nalgebra::Vector3;

/// Returns the diffuse map unlit.
pub struct FireShader<'a> {
    pub material: &'a FireMaterial,
}

impl FragmentShader for FireShader<'_> {
    fn fragment(&self, varying: &Varying) -> Vector3<f32> {
        self.material.diffuse.sample(&varying.uv)
    }
}

/// Returns the interpolated vertex color.
pub struct FlatShader;

impl FragmentShader for FlatShader {
    fn fragment(&self, varying: &Varying) -> Vector3<f32> {
        varying.color
    }
}
