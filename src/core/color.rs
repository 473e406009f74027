use nalgebra::Vector3;

/// Scales the color down so its largest channel is at most 1.
/// Ratios between channels are kept, unlike a per-channel clamp.
pub fn clamp_preserving_hue(color: Vector3<f32>) -> Vector3<f32> {
    let max = color.x.max(color.y).max(color.z);
    if max > 1.0 { color / max } else { color }
}

/// Packs a linear [0, 1] color into `0xAARRGGBB` with opaque alpha.
/// Negative channels are clamped to 0.
#[inline]
pub fn pack_rgb(color: Vector3<f32>) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;

    (255 << 24) | (r << 16) | (g << 8) | b
}

/// Inverse of [`pack_rgb`], returning 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [
        ((pixel >> 16) & 0xFF) as u8,
        ((pixel >> 8) & 0xFF) as u8,
        (pixel & 0xFF) as u8,
    ]
}

/// Linearly maps `value` from `[min, max]` to `[0, 1]`, clamped.
#[inline]
pub fn remap(value: f32, min: f32, max: f32) -> f32 {
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Gray level for the depth-buffer visualization.
pub fn depth_to_color(depth: f32, range: [f32; 2]) -> Vector3<f32> {
    let v = remap(depth, range[0], range[1]);
    Vector3::new(v, v, v)
}
