pub mod phong;
pub mod unlit;

use crate::core::color::clamp_preserving_hue;
use crate::core::geometry::Varying;
use crate::core::pipeline::FragmentShader;
use crate::pipeline::options::RenderOptions;
use crate::scene::material::Material;
use nalgebra::Vector3;
use phong::VehicleShader;
use unlit::{FireShader, FlatShader};

/// Final color of one pixel for the given material, clamped so no channel exceeds 1.
pub fn shade_fragment(material: &Material, varying: &Varying, options: &RenderOptions) -> Vector3<f32> {
    let color = match material {
        Material::Vehicle(vehicle) => VehicleShader {
            material: vehicle,
            lighting: &options.lighting,
            shading_mode: options.shading_mode,
            use_normal_map: options.use_normal_map,
        }
        .fragment(varying),
        Material::Fire(fire) => FireShader { material: fire }.fragment(varying),
        Material::Flat => FlatShader.fragment(varying),
    };
    clamp_preserving_hue(color)
}
