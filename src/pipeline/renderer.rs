use crate::core::color::{depth_to_color, pack_rgb};
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{Fragment, Rasterizer};
use crate::pipeline::options::{RenderMode, RenderOptions};
use crate::pipeline::passes::vertex_pass;
use crate::pipeline::shaders::shade_fragment;
use crate::scene::context::RenderContext;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub meshes: usize,
    /// Triangles submitted to the rasterizer.
    pub triangles: usize,
    /// Triangles dropped whole before rasterization.
    pub culled: usize,
    /// Pixels that passed the depth test and were shaded.
    pub pixels: usize,
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
    initialized: bool,
}

impl Renderer {
    /// A zero-sized target leaves the renderer uninitialized; rendering is then a no-op.
    pub fn new(width: usize, height: usize, margin: f32) -> Self {
        Self {
            rasterizer: Rasterizer::new(margin),
            framebuffer: FrameBuffer::new(width, height),
            initialized: width > 0 && height > 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Renders one complete frame.
    ///
    /// Every visible mesh is transformed first, then the buffers are reset,
    /// then triangles are rasterized mesh by mesh in submission order.
    pub fn render(&mut self, context: &mut RenderContext, options: &RenderOptions) -> FrameStats {
        let mut stats = FrameStats::default();
        if !self.initialized {
            return stats;
        }

        let (width, height) = (self.framebuffer.width, self.framebuffer.height);
        for mesh in context.meshes.iter_mut().filter(|m| is_visible(m, options)) {
            vertex_pass(mesh, &context.camera, width, height);
        }

        self.framebuffer.clear(pack_rgb(options.clear_color()));

        for mesh in context.meshes.iter().filter(|m| is_visible(m, options)) {
            stats.meshes += 1;
            self.draw_mesh(mesh, options, &mut stats);
        }

        stats
    }

    /// Rasterizes a mesh whose vertex pass already ran this frame.
    pub fn draw_mesh(&mut self, mesh: &Mesh, options: &RenderOptions, stats: &mut FrameStats) {
        let transformed = mesh.transformed_vertices();
        let rasterizer = self.rasterizer;

        for [a, b, c] in mesh.triangles() {
            let triangle = [&transformed[a], &transformed[b], &transformed[c]];
            stats.triangles += 1;

            let outcome = rasterizer.rasterize_triangle(&mut self.framebuffer, triangle, |fragment| {
                shade_pixel(&mesh.material, fragment, options)
            });
            match outcome {
                Some(written) => stats.pixels += written,
                None => stats.culled += 1,
            }
        }
    }
}

fn is_visible(mesh: &Mesh, options: &RenderOptions) -> bool {
    options.show_fire || !matches!(mesh.material, Material::Fire(_))
}

#[inline]
fn shade_pixel(material: &Material, fragment: &Fragment, options: &RenderOptions) -> u32 {
    match options.render_mode {
        RenderMode::FinalColor => pack_rgb(shade_fragment(material, &fragment.varying, options)),
        RenderMode::DepthBuffer => pack_rgb(depth_to_color(fragment.depth, options.depth_remap)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::camera::Camera;
    use nalgebra::Point3;

    fn context() -> RenderContext {
        let camera = Camera::new(Point3::new(0.0, 0.0, -5.0), 45.0, 0.1, 100.0, 1.0);
        RenderContext::new(camera, vec![Mesh::create_test_triangle()])
    }

    #[test]
    fn uninitialized_renderer_does_nothing() {
        let mut renderer = Renderer::new(0, 0, 1.0);
        let stats = renderer.render(&mut context(), &RenderOptions::default());
        assert!(!renderer.is_initialized());
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn renders_visible_triangle() {
        let mut renderer = Renderer::new(64, 64, 1.0);
        let stats = renderer.render(&mut context(), &RenderOptions::default());

        assert_eq!(stats.meshes, 1);
        assert_eq!(stats.triangles, 1);
        assert_eq!(stats.culled, 0);
        assert!(stats.pixels > 0);
        assert_eq!(renderer.framebuffer.get_pixel(32, 32), Some(0xFFFF_FFFF));
    }

    #[test]
    fn clears_to_background_between_frames() {
        let mut renderer = Renderer::new(16, 16, 1.0);
        let options = RenderOptions::default();
        let mut ctx = context();
        ctx.meshes.clear();

        renderer.render(&mut ctx, &options);
        assert_eq!(renderer.framebuffer.get_pixel(0, 0), Some(pack_rgb(options.background)));
    }
}
