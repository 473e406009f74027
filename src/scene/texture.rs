use image::{DynamicImage, RgbImage};
use log::debug;
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Represents a read-only 2D texture map, shared between meshes through `Arc`.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?;

        let texture = Self::from_image(img)?;
        debug!(
            "Loaded texture: {:?} ({}x{})",
            path_ref, texture.width, texture.height
        );
        Ok(texture)
    }

    pub fn from_image(img: DynamicImage) -> Result<Self, String> {
        let image = img.to_rgb8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err("Texture has zero size".to_string());
        }
        Ok(Self {
            image,
            width,
            height,
        })
    }

    /// A 1x1 texture of a single color.
    pub fn solid(color: Vector3<f32>) -> Self {
        Self::from_fn(1, 1, |_, _| color)
    }

    /// Builds a texture from a per-texel function returning colors in `[0, 1]`.
    /// Sizes below 1 are raised to 1.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Vector3<f32>,
    {
        let (width, height) = (width.max(1), height.max(1));
        let image = RgbImage::from_fn(width, height, |x, y| {
            let c = f(x, y);
            image::Rgb([to_byte(c.x), to_byte(c.y), to_byte(c.z)])
        });
        Self {
            image,
            width,
            height,
        }
    }

    /// Point sampling. UV `(0, 0)` is the top-left texel; coordinates are
    /// clamped so `1.0` maps onto the last row/column.
    #[inline]
    pub fn sample(&self, uv: &Vector2<f32>) -> Vector3<f32> {
        let u = uv.x.clamp(0.0, 1.0);
        let v = uv.y.clamp(0.0, 1.0);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.texel(x, y)
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> Vector3<f32> {
        let pixel = self.image.get_pixel(x, y);
        Vector3::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
