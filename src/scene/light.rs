use crate::io::config::LightingConfig;
use nalgebra::Vector3;

/// A light source that is infinitely far away. Rays are parallel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels, unit length.
    pub direction: Vector3<f32>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>, intensity: f32) -> Self {
        Self {
            direction: direction.try_normalize(1e-12).unwrap_or(-Vector3::y()),
            intensity,
        }
    }

    /// Cosine between the surface normal and the direction towards the light.
    /// Zero or negative for surfaces facing away.
    #[inline]
    pub fn observed_area(&self, normal: &Vector3<f32>) -> f32 {
        normal.dot(&-self.direction)
    }
}

/// Fixed lighting setup shared by every lit pixel of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light: DirectionalLight,
    /// Scales the gloss sample into the Phong exponent.
    pub shininess: f32,
    /// `kd` of the Lambert term.
    pub diffuse_reflectance: f32,
    pub ambient: Vector3<f32>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from_config(&LightingConfig::default())
    }
}

impl Lighting {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            light: DirectionalLight::new(Vector3::from(config.direction), config.intensity),
            shininess: config.shininess,
            diffuse_reflectance: config.diffuse_reflectance,
            ambient: Vector3::from(config.ambient),
        }
    }
}
