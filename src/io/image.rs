use crate::core::color::unpack_rgb;
use image::{ImageBuffer, Rgb};
use std::path::Path;

/// Saves a packed `0xAARRGGBB` buffer to an image file; the format follows the extension.
pub fn save_buffer_to_image<P: AsRef<Path>>(
    buffer: &[u32],
    width: usize,
    height: usize,
    path: P,
) -> Result<(), String> {
    let path_ref = path.as_ref();
    if buffer.len() != width * height {
        return Err(format!(
            "Buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let img_buf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        Rgb(unpack_rgb(buffer[y as usize * width + x as usize]))
    });

    img_buf
        .save(path_ref)
        .map_err(|e| format!("Failed to save image to {:?}: {}", path_ref, e))
}
