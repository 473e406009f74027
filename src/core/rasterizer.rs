use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{TransformedVertex, Varying};
use crate::core::math::interpolation::{
    TriangleEdges, interpolate, interpolate_depth, is_inside_triangle, normalize_weights,
    perspective_correct_barycentric,
};
use nalgebra::{Point2, Vector3};

const AREA_EPSILON: f32 = 1e-6;

/// A pixel that passed the depth test, handed to the pixel shader.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    /// Interpolated NDC depth in `[0, 1]`.
    pub depth: f32,
    /// Perspective-correct, finalized attributes.
    pub varying: Varying,
}

/// The Rasterizer is responsible for drawing screen-space triangles onto the FrameBuffer.
///
/// There is no clipping: a triangle with any vertex off-screen, behind the
/// camera or outside the depth range is dropped as a whole.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    /// Pixels added around the bounding box before clamping to the target.
    pub margin: f32,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Rasterizer {
    pub fn new(margin: f32) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    /// Whole-triangle cull.
    pub fn is_culled(triangle: [&TransformedVertex; 3], width: usize, height: usize) -> bool {
        let (w, h) = (width as f32, height as f32);
        triangle.iter().any(|v| {
            let p = &v.position;
            !(p.x >= 0.0 && p.x <= w && p.y >= 0.0 && p.y <= h)
                || !(p.z >= 0.0 && p.z <= 1.0)
                || !(v.clip_position.w > 0.0)
        })
    }

    /// Inclusive pixel bounds `(min_x, min_y, max_x, max_y)`, expanded by the
    /// margin and clamped to the target. `None` for an empty target.
    pub fn bounding_box(
        &self,
        points: &[Point2<f32>; 3],
        width: usize,
        height: usize,
    ) -> Option<(usize, usize, usize, usize)> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_x = points[0].x.min(points[1].x).min(points[2].x) - self.margin;
        let min_y = points[0].y.min(points[1].y).min(points[2].y) - self.margin;
        let max_x = points[0].x.max(points[1].x).max(points[2].x) + self.margin;
        let max_y = points[0].y.max(points[1].y).max(points[2].y) + self.margin;

        let last_x = (width - 1) as f32;
        let last_y = (height - 1) as f32;
        if max_x < 0.0 || max_y < 0.0 || min_x > last_x || min_y > last_y {
            return None;
        }

        Some((
            min_x.floor().clamp(0.0, last_x) as usize,
            min_y.floor().clamp(0.0, last_y) as usize,
            max_x.ceil().clamp(0.0, last_x) as usize,
            max_y.ceil().clamp(0.0, last_y) as usize,
        ))
    }

    /// Calls `visit(x, y, raw_weights)` once for every pixel whose center lies
    /// inside the triangle. Degenerate and clockwise triangles visit nothing.
    pub fn for_each_covered_pixel<F>(
        &self,
        screen: &[Point2<f32>; 3],
        width: usize,
        height: usize,
        mut visit: F,
    ) where
        F: FnMut(usize, usize, Vector3<f32>),
    {
        let edges = TriangleEdges::new(screen[0], screen[1], screen[2]);
        if edges.doubled_area() <= AREA_EPSILON {
            return;
        }
        let Some((min_x, min_y, max_x, max_y)) = self.bounding_box(screen, width, height) else {
            return;
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let weights = edges.weights(&center);
                if is_inside_triangle(&weights) {
                    visit(x, y, weights);
                }
            }
        }
    }

    /// Rasterizes one triangle, running `shade` for every pixel that passes the depth test.
    ///
    /// Returns `None` when the triangle was culled, otherwise the number of pixels written.
    pub fn rasterize_triangle<F>(
        &self,
        framebuffer: &mut FrameBuffer,
        triangle: [&TransformedVertex; 3],
        mut shade: F,
    ) -> Option<usize>
    where
        F: FnMut(&Fragment) -> u32,
    {
        let (width, height) = (framebuffer.width, framebuffer.height);
        if Self::is_culled(triangle, width, height) {
            return None;
        }

        let screen = triangle.map(|v| Point2::new(v.position.x, v.position.y));
        let area = TriangleEdges::new(screen[0], screen[1], screen[2]).doubled_area();
        let depths = triangle.map(|v| v.depth());
        let ws = triangle.map(|v| v.w());
        let varyings = triangle.map(|v| v.varying);

        let mut written = 0;
        self.for_each_covered_pixel(&screen, width, height, |x, y, raw| {
            let bary = normalize_weights(&raw, area);

            let depth = interpolate_depth(&bary, &depths);
            if !(0.0..=1.0).contains(&depth) {
                return;
            }
            if !framebuffer.depth_test_and_update(x, y, depth) {
                return;
            }

            let Some(weights) = perspective_correct_barycentric(&bary, &ws) else {
                return;
            };
            let fragment = Fragment {
                x,
                y,
                depth,
                varying: interpolate(varyings, &weights).finalize(),
            };
            framebuffer.set_pixel(x, y, shade(&fragment));
            written += 1;
        });

        Some(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_vertex(x: f32, y: f32, depth: f32) -> TransformedVertex {
        TransformedVertex::from_screen(x, y, depth, 1.0, Varying::default())
    }

    #[test]
    fn covered_pixels_match_edge_functions() {
        let rasterizer = Rasterizer::default();
        let screen = [
            Point2::new(400.0, 100.0),
            Point2::new(200.0, 400.0),
            Point2::new(600.0, 400.0),
        ];
        let edges = TriangleEdges::new(screen[0], screen[1], screen[2]);

        let mut visited = vec![0u8; 800 * 600];
        rasterizer.for_each_covered_pixel(&screen, 800, 600, |x, y, _| visited[y * 800 + x] += 1);

        for y in 0..600 {
            for x in 0..800 {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let expected = is_inside_triangle(&edges.weights(&center)) as u8;
                assert_eq!(visited[y * 800 + x], expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn off_screen_vertex_culls_whole_triangle() {
        let mut fb = FrameBuffer::new(100, 100);
        let (a, b, c) = (
            screen_vertex(50.0, 10.0, 0.5),
            screen_vertex(-1.0, 90.0, 0.5),
            screen_vertex(90.0, 90.0, 0.5),
        );
        let result = Rasterizer::default().rasterize_triangle(&mut fb, [&a, &b, &c], |_| 0xFFFF_FFFF);
        assert_eq!(result, None);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn behind_camera_and_out_of_range_depth_are_culled() {
        let a = screen_vertex(50.0, 10.0, 0.5);
        let b = screen_vertex(10.0, 90.0, 1.5);
        let mut c = screen_vertex(90.0, 90.0, 0.5);
        assert!(Rasterizer::is_culled([&a, &b, &c], 100, 100));

        let b = screen_vertex(10.0, 90.0, 0.5);
        assert!(!Rasterizer::is_culled([&a, &b, &c], 100, 100));
        c.clip_position.w = -1.0;
        assert!(Rasterizer::is_culled([&a, &b, &c], 100, 100));
    }

    #[test]
    fn degenerate_triangle_writes_nothing() {
        let mut fb = FrameBuffer::new(64, 64);
        let (a, b, c) = (
            screen_vertex(10.0, 10.0, 0.5),
            screen_vertex(20.0, 20.0, 0.5),
            screen_vertex(30.0, 30.0, 0.5),
        );
        let written = Rasterizer::default().rasterize_triangle(&mut fb, [&a, &b, &c], |_| 1);
        assert_eq!(written, Some(0));
    }

    #[test]
    fn bounding_box_is_margined_and_clamped() {
        let r = Rasterizer::new(1.0);
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(10.2, 3.5),
            Point2::new(4.0, 99.9),
        ];
        assert_eq!(r.bounding_box(&points, 100, 100), Some((0, 0, 12, 99)));
        assert_eq!(r.bounding_box(&points, 0, 100), None);
    }

    #[test]
    fn fragments_carry_depth_and_finalized_attributes() {
        let mut fb = FrameBuffer::new(32, 32);
        let varying = Varying {
            normal: Vector3::new(0.0, 0.0, -2.0),
            ..Default::default()
        };
        let a = TransformedVertex::from_screen(16.0, 2.0, 0.25, 3.0, varying);
        let b = TransformedVertex::from_screen(2.0, 30.0, 0.25, 3.0, varying);
        let c = TransformedVertex::from_screen(30.0, 30.0, 0.25, 3.0, varying);

        let mut seen = 0;
        Rasterizer::default().rasterize_triangle(&mut fb, [&a, &b, &c], |fragment| {
            assert!((fragment.depth - 0.25).abs() < 1e-5);
            assert!((fragment.varying.normal - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
            seen += 1;
            0xFF00_FF00
        });

        assert!(seen > 0);
        assert_eq!(fb.get_pixel(16, 20), Some(0xFF00_FF00));
        assert!(fb.get_depth(16, 20).is_some_and(|d| (d - 0.25).abs() < 1e-5));
    }

    #[test]
    fn near_plane_vertex_keeps_its_opposite_edge() {
        let mut fb = FrameBuffer::new(32, 32);
        // Row 30's pixel centers lie exactly on the edge opposite `a`.
        let a = screen_vertex(16.0, 2.0, 0.0);
        let b = screen_vertex(2.0, 30.5, 0.5);
        let c = screen_vertex(30.0, 30.5, 0.5);
        let screen = [a, b, c].map(|v| Point2::new(v.position.x, v.position.y));

        let rasterizer = Rasterizer::default();
        let mut covered = 0;
        rasterizer.for_each_covered_pixel(&screen, 32, 32, |_, _, _| covered += 1);
        let written = rasterizer.rasterize_triangle(&mut fb, [&a, &b, &c], |_| 0xFFFF_FFFF);

        assert_eq!(written, Some(covered));
        assert_eq!(fb.get_pixel(16, 30), Some(0xFFFF_FFFF));
        assert!(fb.get_depth(16, 30).is_some_and(|d| (d - 0.5).abs() < 1e-5));
    }
}
