use crate::core::geometry::Varying;
use crate::core::pipeline::FragmentShader;
use crate::pipeline::options::ShadingMode;
use crate::scene::light::Lighting;
use crate::scene::material::VehicleMaterial;
use nalgebra::Vector3;
use std::f32::consts::PI;

/// Lambert diffuse plus Phong specular, with optional tangent-space normal mapping.
pub struct VehicleShader<'a> {
    pub material: &'a VehicleMaterial,
    pub lighting: &'a Lighting,
    pub shading_mode: ShadingMode,
    pub use_normal_map: bool,
}

impl FragmentShader for VehicleShader<'_> {
    fn fragment(&self, varying: &Varying) -> Vector3<f32> {
        let uv = &varying.uv;

        // 1. Sample Textures
        let diffuse_sample = self.material.diffuse.sample(uv);
        let specular_sample = self.material.specular.sample(uv);
        let gloss_sample = self.material.gloss.sample(uv);

        // 2. Choose Normal
        let normal = if self.use_normal_map {
            let encoded = self.material.normal.sample(uv);
            sample_normal(&varying.normal, &varying.tangent, &encoded)
        } else {
            varying.normal
        };

        // 3. Observed Area
        let light = &self.lighting.light;
        let observed_area = light.observed_area(&normal);
        if observed_area <= 0.0 {
            return Vector3::zeros();
        }

        // 4. Lambert
        let lambert = lambert(self.lighting.diffuse_reflectance, &diffuse_sample);

        // 5. Phong
        let exponent = gloss_sample.x * self.lighting.shininess;
        let specular = phong(
            &specular_sample,
            exponent,
            &light.direction,
            &varying.view_direction,
            &normal,
        );

        // 6. Combine
        match self.shading_mode {
            ShadingMode::ObservedArea => Vector3::repeat(observed_area),
            ShadingMode::Diffuse => lambert * light.intensity * observed_area,
            ShadingMode::Specular => specular * observed_area,
            ShadingMode::Combined => {
                (lambert * light.intensity + specular + self.lighting.ambient) * observed_area
            }
        }
    }
}

/// `kd * color / π`.
#[inline]
pub fn lambert(kd: f32, color: &Vector3<f32>) -> Vector3<f32> {
    color * kd / PI
}

/// Phong lobe for a light travelling along `light_direction`, seen along
/// `view_direction` (camera towards surface).
#[inline]
pub fn phong(
    specular: &Vector3<f32>,
    exponent: f32,
    light_direction: &Vector3<f32>,
    view_direction: &Vector3<f32>,
    normal: &Vector3<f32>,
) -> Vector3<f32> {
    let reflected = light_direction - normal * (2.0 * normal.dot(light_direction));
    let cos_alpha = reflected.dot(&-view_direction).max(0.0);
    specular * cos_alpha.powf(exponent)
}

/// Decodes a normal-map texel into world space using the tangent frame.
/// Falls back to the geometric normal when the frame is degenerate.
pub fn sample_normal(
    normal: &Vector3<f32>,
    tangent: &Vector3<f32>,
    encoded: &Vector3<f32>,
) -> Vector3<f32> {
    let bitangent = normal.cross(tangent);
    let local = encoded * 2.0 - Vector3::repeat(1.0);
    (tangent * local.x + bitangent * local.y + normal * local.z)
        .try_normalize(1e-8)
        .unwrap_or(*normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use nalgebra::Vector2;
    use std::sync::Arc;

    fn material(diffuse: Vector3<f32>, specular: Vector3<f32>, gloss: f32) -> VehicleMaterial {
        VehicleMaterial {
            diffuse: Arc::new(Texture::solid(diffuse)),
            normal: Arc::new(Texture::solid(Vector3::new(0.5, 0.5, 1.0))),
            specular: Arc::new(Texture::solid(specular)),
            gloss: Arc::new(Texture::solid(Vector3::repeat(gloss))),
        }
    }

    fn varying_facing(normal: Vector3<f32>) -> Varying {
        Varying {
            uv: Vector2::new(0.5, 0.5),
            normal,
            tangent: Vector3::x(),
            view_direction: Vector3::z(),
            ..Default::default()
        }
    }

    #[test]
    fn flat_normal_map_matches_geometric_normal() {
        let n = Vector3::new(0.0, 0.0, -1.0);
        let decoded = sample_normal(&n, &Vector3::x(), &Vector3::new(0.5, 0.5, 1.0));
        assert!((decoded - n).norm() < 1e-6);
    }

    #[test]
    fn back_facing_is_black_in_every_mode() {
        let mat = material(Vector3::repeat(1.0), Vector3::repeat(1.0), 1.0);
        let lighting = Lighting::default();
        let varying = varying_facing(Vector3::new(0.0, -1.0, 0.0));

        for mode in [
            ShadingMode::ObservedArea,
            ShadingMode::Diffuse,
            ShadingMode::Specular,
            ShadingMode::Combined,
        ] {
            for use_normal_map in [true, false] {
                let shader = VehicleShader {
                    material: &mat,
                    lighting: &lighting,
                    shading_mode: mode,
                    use_normal_map,
                };
                assert_eq!(shader.fragment(&varying), Vector3::zeros(), "{mode:?}");
            }
        }
    }

    #[test]
    fn diffuse_mode_scales_lambert_by_intensity() {
        let mat = material(Vector3::new(0.2, 0.4, 0.6), Vector3::zeros(), 0.0);
        let lighting = Lighting::default();
        let normal = -lighting.light.direction;
        let shader = VehicleShader {
            material: &mat,
            lighting: &lighting,
            shading_mode: ShadingMode::Diffuse,
            use_normal_map: false,
        };

        let color = shader.fragment(&varying_facing(normal));
        let diffuse = mat.diffuse.sample(&Vector2::new(0.5, 0.5));
        let expected = diffuse / PI * 7.0;
        assert!((color - expected).norm() < 1e-4);
    }

    #[test]
    fn phong_peaks_along_mirror_direction() {
        let n = Vector3::y();
        let l = Vector3::new(1.0, -1.0, 0.0).normalize();
        let mirror_view = -Vector3::new(1.0, 1.0, 0.0).normalize();

        let peak = phong(&Vector3::repeat(1.0), 25.0, &l, &mirror_view, &n);
        let off = phong(&Vector3::repeat(1.0), 25.0, &l, &Vector3::z(), &n);
        assert!((peak.x - 1.0).abs() < 1e-5);
        assert_eq!(off, Vector3::zeros());
    }
}
