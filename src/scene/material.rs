use crate::scene::texture::Texture;
use std::sync::Arc;

/// Defines how a mesh is shaded.
///
/// Texture handles are shared: several meshes may point at the same
/// `Texture`, which lives as long as the last mesh holding it.
#[derive(Debug, Clone, Default)]
pub enum Material {
    /// Fully lit surface with diffuse, normal, specular and gloss maps.
    Vehicle(VehicleMaterial),
    /// Unlit diffuse map, hidden when the fire toggle is off.
    Fire(FireMaterial),
    /// Unlit interpolated vertex color.
    #[default]
    Flat,
}

impl Material {
    pub fn name(&self) -> &'static str {
        match self {
            Material::Vehicle(_) => "vehicle",
            Material::Fire(_) => "fire",
            Material::Flat => "flat",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VehicleMaterial {
    pub diffuse: Arc<Texture>,
    pub normal: Arc<Texture>,
    pub specular: Arc<Texture>,
    /// Red channel scales the Phong exponent.
    pub gloss: Arc<Texture>,
}

#[derive(Debug, Clone)]
pub struct FireMaterial {
    pub diffuse: Arc<Texture>,
}
