use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Vector2, Vector3};

const EPSILON: f32 = 1e-6;

/// 2D cross product `a.x * b.y - a.y * b.x`.
#[inline(always)]
pub fn cross_2d(a: &Vector2<f32>, b: &Vector2<f32>) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Edge function of point `p` against the edge that starts at `start` and runs along `edge`.
///
/// Non-negative when `p` lies on the inner side of an edge of a triangle wound
/// counter-clockwise on screen (screen Y grows downwards).
#[inline(always)]
pub fn edge_function(start: &Point2<f32>, edge: &Vector2<f32>, p: &Point2<f32>) -> f32 {
    cross_2d(&(p - start), edge)
}

/// The three triangle edges, computed once per triangle.
///
/// Edge `i` is opposite vertex `i`, so the edge function against edge `i`
/// is the unnormalized barycentric weight of vertex `i`.
#[derive(Debug, Clone, Copy)]
pub struct TriangleEdges {
    pub starts: [Point2<f32>; 3],
    pub edges: [Vector2<f32>; 3],
}

impl TriangleEdges {
    pub fn new(v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) -> Self {
        Self {
            starts: [v1, v2, v0],
            edges: [v2 - v1, v0 - v2, v1 - v0],
        }
    }

    /// Raw (unnormalized) barycentric weights of `p`.
    #[inline(always)]
    pub fn weights(&self, p: &Point2<f32>) -> Vector3<f32> {
        Vector3::new(
            edge_function(&self.starts[0], &self.edges[0], p),
            edge_function(&self.starts[1], &self.edges[1], p),
            edge_function(&self.starts[2], &self.edges[2], p),
        )
    }

    /// Twice the signed screen area. Positive for counter-clockwise winding.
    #[inline]
    pub fn doubled_area(&self) -> f32 {
        // Weight of v0 evaluated at v0 equals the whole triangle.
        edge_function(&self.starts[0], &self.edges[0], &self.starts[2])
    }
}

/// Half-plane inside test: all three raw weights non-negative.
#[inline(always)]
pub fn is_inside_triangle(weights: &Vector3<f32>) -> bool {
    weights.x >= 0.0 && weights.y >= 0.0 && weights.z >= 0.0
}

/// Normalizes raw weights by the triangle's doubled area so they sum to 1.
#[inline]
pub fn normalize_weights(raw: &Vector3<f32>, doubled_area: f32) -> Vector3<f32> {
    raw / doubled_area
}

/// Non-linear depth at a pixel: the reciprocal of the weighted sum of
/// reciprocal vertex depths.
///
/// Vertices with zero weight are left out, so a vertex on the near plane
/// (depth 0) does not poison pixels on its opposite edge.
#[inline]
pub fn interpolate_depth(bary: &Vector3<f32>, depths: &[f32; 3]) -> f32 {
    let inverse: f32 = bary
        .iter()
        .zip(depths)
        .filter(|(b, _)| **b != 0.0)
        .map(|(b, z)| b / z)
        .sum();
    1.0 / inverse
}

/// Compute perspective-correct barycentric coordinates (alpha', beta', gamma').
///
/// The corrected barycentrics are defined as:
///   wa = alpha / w0, wb = beta / w1, wc = gamma / w2
///   w_interp = 1 / (wa + wb + wc)
///   alpha' = wa * w_interp, ...
///
/// `w` holds the clip-space w of each vertex. With equal w the result is
/// the input. Returns `None` when the sum is numerically zero.
pub fn perspective_correct_barycentric(bary: &Vector3<f32>, w: &[f32; 3]) -> Option<Vector3<f32>> {
    let wa = bary.x / w[0];
    let wb = bary.y / w[1];
    let wc = bary.z / w[2];

    let sum = wa + wb + wc;
    if sum.abs() < EPSILON || !sum.is_finite() {
        return None;
    }
    let w_interp = 1.0 / sum;
    Some(Vector3::new(wa * w_interp, wb * w_interp, wc * w_interp))
}

/// Weighted sum of three attribute sets.
#[inline]
pub fn interpolate<T: Interpolatable>(attributes: [T; 3], weights: &Vector3<f32>) -> T {
    attributes[0] * weights.x + attributes[1] * weights.y + attributes[2] * weights.z
}
