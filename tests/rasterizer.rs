use dual_rasterizer::core::color::pack_rgb;
use dual_rasterizer::core::framebuffer::FrameBuffer;
use dual_rasterizer::core::geometry::{TransformedVertex, Varying};
use dual_rasterizer::core::math::interpolation::{
    TriangleEdges, interpolate, is_inside_triangle, perspective_correct_barycentric,
};
use dual_rasterizer::core::geometry::Vertex;
use dual_rasterizer::core::rasterizer::Rasterizer;
use dual_rasterizer::pipeline::options::RenderOptions;
use dual_rasterizer::pipeline::passes::vertex_pass;
use dual_rasterizer::pipeline::shaders::shade_fragment;
use dual_rasterizer::scene::camera::Camera;
use dual_rasterizer::scene::material::Material;
use dual_rasterizer::scene::mesh::{Mesh, Topology};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WIDTH: usize = 800;
const HEIGHT: usize = 600;

fn colored(x: f32, y: f32, depth: f32, color: Vector3<f32>) -> TransformedVertex {
    let varying = Varying {
        color,
        ..Default::default()
    };
    TransformedVertex::from_screen(x, y, depth, 1.0, varying)
}

#[test]
fn flat_white_triangle_fills_exact_edge_boundary() {
    let options = RenderOptions::default();
    let background = pack_rgb(options.clear_color());
    let white = pack_rgb(Vector3::repeat(1.0));

    let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
    fb.clear(background);

    let a = colored(400.0, 100.0, 0.5, Vector3::repeat(1.0));
    let b = colored(200.0, 400.0, 0.5, Vector3::repeat(1.0));
    let c = colored(600.0, 400.0, 0.5, Vector3::repeat(1.0));
    let written = Rasterizer::default().rasterize_triangle(&mut fb, [&a, &b, &c], |fragment| {
        pack_rgb(shade_fragment(&Material::Flat, &fragment.varying, &options))
    });

    let edges = TriangleEdges::new(
        Point2::new(400.0, 100.0),
        Point2::new(200.0, 400.0),
        Point2::new(600.0, 400.0),
    );
    let mut inside = 0;
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
            let expected = if is_inside_triangle(&edges.weights(&center)) {
                inside += 1;
                white
            } else {
                background
            };
            assert_eq!(fb.get_pixel(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
    assert_eq!(written, Some(inside));

    // No gaps: every row between the apex and the base is one contiguous run.
    for y in 101..400 {
        let row: Vec<usize> = (0..WIDTH).filter(|&x| fb.get_pixel(x, y) == Some(white)).collect();
        assert!(!row.is_empty(), "row {y} is empty");
        assert_eq!(row.len(), row[row.len() - 1] - row[0] + 1, "row {y} has a gap");
    }
}

#[test]
fn nearer_triangle_wins_regardless_of_draw_order() {
    let red = Vector3::new(1.0, 0.0, 0.0);
    let blue = Vector3::new(0.0, 0.0, 1.0);
    let near = [
        colored(100.0, 20.0, 0.3, red),
        colored(20.0, 180.0, 0.3, red),
        colored(180.0, 180.0, 0.3, red),
    ];
    let far = [
        colored(100.0, 40.0, 0.7, blue),
        colored(10.0, 190.0, 0.7, blue),
        colored(190.0, 190.0, 0.7, blue),
    ];

    let draw = |order: [&[TransformedVertex; 3]; 2]| {
        let mut fb = FrameBuffer::new(200, 200);
        fb.clear(0);
        for tri in order {
            Rasterizer::default().rasterize_triangle(&mut fb, [&tri[0], &tri[1], &tri[2]], |f| {
                pack_rgb(f.varying.color)
            });
        }
        fb
    };

    let near_first = draw([&near, &far]);
    let far_first = draw([&far, &near]);

    assert_eq!(near_first.pixels(), far_first.pixels());
    assert_eq!(near_first.get_pixel(100, 120), Some(pack_rgb(red)));
    assert_eq!(near_first.get_pixel(100, 185), Some(pack_rgb(blue)));
    let depth = near_first.get_depth(100, 120).unwrap();
    assert!((depth - 0.3).abs() < 1e-5);
}

#[test]
fn random_counter_clockwise_triangles_visit_each_inside_pixel_once() {
    let mut rng = StdRng::seed_from_u64(7);
    let rasterizer = Rasterizer::default();
    let (width, height) = (160, 120);

    for _ in 0..50 {
        let mut pts = [(); 3].map(|_| {
            Point2::new(
                rng.random_range(0.0..width as f32),
                rng.random_range(0.0..height as f32),
            )
        });
        let edges = TriangleEdges::new(pts[0], pts[1], pts[2]);
        if edges.doubled_area().abs() < 1.0 {
            continue;
        }
        if edges.doubled_area() < 0.0 {
            pts.swap(1, 2);
        }
        let edges = TriangleEdges::new(pts[0], pts[1], pts[2]);
        assert!(edges.doubled_area() > 0.0);

        let mut visits = vec![0u32; width * height];
        rasterizer.for_each_covered_pixel(&pts, width, height, |x, y, _| visits[y * width + x] += 1);

        for y in 0..height {
            for x in 0..width {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let expected = is_inside_triangle(&edges.weights(&center)) as u32;
                assert_eq!(visits[y * width + x], expected, "pixel ({x}, {y}) of {pts:?}");
            }
        }
    }
}

#[test]
fn equal_w_interpolation_is_screen_linear() {
    let mut rng = StdRng::seed_from_u64(11);
    let uvs = [
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
    ];

    for _ in 0..200 {
        let a: f32 = rng.random_range(0.0..1.0);
        let b: f32 = rng.random_range(0.0..(1.0 - a));
        let bary = Vector3::new(a, b, 1.0 - a - b);
        let w = rng.random_range(0.5..50.0);

        let corrected = perspective_correct_barycentric(&bary, &[w; 3]).unwrap();
        assert!((corrected - bary).norm() < 1e-5);

        let uv = interpolate(uvs, &corrected);
        let linear = uvs[0] * bary.x + uvs[1] * bary.y + uvs[2] * bary.z;
        assert!((uv - linear).norm() < 1e-5);
    }
}

#[test]
fn interpolated_uv_stays_in_unit_range() {
    let mut fb = FrameBuffer::new(64, 64);
    let make = |x: f32, y: f32, w: f32, uv: Vector2<f32>| {
        let varying = Varying {
            uv,
            ..Default::default()
        };
        TransformedVertex::from_screen(x, y, 0.5, w, varying)
    };
    let a = make(32.0, 0.0, 1.0, Vector2::new(0.5, 0.0));
    let b = make(0.0, 64.0, 9.0, Vector2::new(0.0, 1.0));
    let c = make(64.0, 64.0, 3.0, Vector2::new(1.0, 1.0));

    let mut checked = 0;
    Rasterizer::default().rasterize_triangle(&mut fb, [&a, &b, &c], |f| {
        let uv = f.varying.uv;
        assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y), "{uv:?}");
        checked += 1;
        0
    });
    assert!(checked > 0);
}

#[test]
fn interpolated_attributes_match_the_surface_point() {
    let (width, height) = (160, 120);
    let camera = Camera::new(Point3::origin(), 60.0, 0.1, 100.0, width as f32 / height as f32);

    // Tilted triangle: every vertex at a different view depth.
    let corners = [
        Point3::new(0.0, 2.0, 10.0),
        Point3::new(-3.0, -2.0, 6.0),
        Point3::new(3.0, -1.5, 14.0),
    ];
    let uvs = [
        Vector2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::new(0.0, 1.0),
    ];
    let normal = Vector3::new(0.0, 0.0, -1.0);
    let vertices = corners
        .iter()
        .zip(uvs)
        .map(|(p, uv)| Vertex::new(*p, normal, uv))
        .collect();
    let mut mesh = Mesh::new(vertices, vec![0, 1, 2], Topology::TriangleList, Material::Flat).unwrap();
    vertex_pass(&mut mesh, &camera, width, height);

    let transformed = mesh.transformed_vertices();
    let ws = transformed.iter().map(|v| v.w()).collect::<Vec<_>>();
    assert!((ws[0] - 10.0).abs() < 1e-4 && (ws[1] - 6.0).abs() < 1e-4 && (ws[2] - 14.0).abs() < 1e-4);

    let mut fb = FrameBuffer::new(width, height);
    let mut worst: f32 = 0.0;
    let written = Rasterizer::default().rasterize_triangle(
        &mut fb,
        [&transformed[0], &transformed[1], &transformed[2]],
        |f| {
            let uv = f.varying.uv;
            let p = corners[0] + (corners[1] - corners[0]) * uv.x + (corners[2] - corners[0]) * uv.y;
            let expected = (p - camera.origin()).normalize();
            worst = worst.max((f.varying.view_direction - expected).norm());
            0
        },
    );

    assert!(written.is_some_and(|n| n > 100), "{written:?}");
    assert!(worst < 1e-4, "worst direction error {worst}");
}
