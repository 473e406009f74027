use crate::core::geometry::{TransformedVertex, Vertex};
use crate::core::math::transform::TransformFactory;
use crate::scene::material::Material;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use serde::Deserialize;

/// How the index list is assembled into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Three indices per triangle.
    #[default]
    TriangleList,
    /// Every index after the second closes a triangle with the two before it.
    TriangleStrip,
}

/// A collection of vertices and indices representing a 3D object.
///
/// The mesh owns its geometry and the transformed-vertex cache that the
/// vertex stage refills every frame. Textures are shared through the material.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub topology: Topology,
    pub material: Material,

    translation: Matrix4<f32>,
    rotation: Matrix4<f32>,
    scale: Matrix4<f32>,

    transformed: Vec<TransformedVertex>,
}

impl Mesh {
    /// Validates the geometry. Broken index data is a scene-construction
    /// error, never something the per-frame path checks.
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        topology: Topology,
        material: Material,
    ) -> Result<Self, String> {
        if vertices.is_empty() {
            return Err("Mesh has no vertices".to_string());
        }
        match topology {
            Topology::TriangleList if indices.len() % 3 != 0 => {
                return Err(format!(
                    "Triangle list needs a multiple of 3 indices, got {}",
                    indices.len()
                ));
            }
            Topology::TriangleStrip if indices.len() < 3 => {
                return Err(format!(
                    "Triangle strip needs at least 3 indices, got {}",
                    indices.len()
                ));
            }
            _ => {}
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(format!(
                "Index {} out of range for {} vertices",
                bad,
                vertices.len()
            ));
        }

        Ok(Self {
            transformed: Vec::with_capacity(vertices.len()),
            vertices,
            indices,
            topology,
            material,
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            scale: Matrix4::identity(),
        })
    }

    // --- Transform ---

    pub fn set_translation(&mut self, translation: &Vector3<f32>) {
        self.translation = TransformFactory::translation(translation);
    }

    pub fn set_rotation_degrees(&mut self, angles: &Vector3<f32>) {
        self.rotation = TransformFactory::rotation_euler_degrees(angles);
    }

    pub fn set_scale(&mut self, scale: &Vector3<f32>) {
        self.scale = TransformFactory::scaling_nonuniform(scale);
    }

    /// Spins the mesh about the world Y axis, on top of its current rotation.
    pub fn rotate_y(&mut self, angle_rad: f32) {
        self.rotation = TransformFactory::rotation_y(angle_rad) * self.rotation;
    }

    /// Object-to-world matrix: scale, then rotate, then translate.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.translation * self.rotation * self.scale
    }

    // --- Triangles ---

    /// Triangles as vertex index triples, in submission order.
    ///
    /// Odd strip triangles have their last two indices swapped so every
    /// triangle keeps the winding of the first. Triples repeating an index
    /// (strip restarts) are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let (count, stride) = match self.topology {
            Topology::TriangleList => (self.indices.len() / 3, 3),
            Topology::TriangleStrip => (self.indices.len().saturating_sub(2), 1),
        };

        (0..count).filter_map(move |t| {
            let i = &self.indices[t * stride..t * stride + 3];
            let tri = match self.topology {
                Topology::TriangleStrip if t % 2 == 1 => [i[0], i[2], i[1]],
                _ => [i[0], i[1], i[2]],
            };
            let degenerate = tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2];
            (!degenerate).then(|| tri.map(|v| v as usize))
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles().count()
    }

    /// Vertices produced by the last vertex pass.
    pub fn transformed_vertices(&self) -> &[TransformedVertex] {
        &self.transformed
    }

    /// Output slot for the vertex pass.
    pub fn transformed_vertices_mut(&mut self) -> &mut Vec<TransformedVertex> {
        &mut self.transformed
    }

    /// Generates per-vertex tangents from texture-coordinate deltas,
    /// orthogonalized against each vertex normal.
    pub fn compute_tangents(&mut self) {
        let mut accumulated = vec![Vector3::<f32>::zeros(); self.vertices.len()];

        for [a, b, c] in self.triangles() {
            let (v0, v1, v2) = (&self.vertices[a], &self.vertices[b], &self.vertices[c]);
            let e1 = v1.position - v0.position;
            let e2 = v2.position - v0.position;
            let d1 = v1.texcoord - v0.texcoord;
            let d2 = v2.texcoord - v0.texcoord;

            let r = d1.x * d2.y - d2.x * d1.y;
            if r.abs() < 1e-12 {
                continue;
            }
            let tangent = (e1 * d2.y - e2 * d1.y) / r;
            for idx in [a, b, c] {
                accumulated[idx] += tangent;
            }
        }

        for (vertex, tangent) in self.vertices.iter_mut().zip(accumulated) {
            vertex.tangent = orthogonal_tangent(&vertex.normal, &tangent);
        }
    }

    /// Creates a simple flat-shaded triangle for testing purposes.
    ///
    /// Vertices are arranged counter-clockwise on screen for a camera
    /// looking down +Z, with normals facing that camera.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.5, 0.0), normal, Vector2::new(0.5, 0.0)),
            Vertex::new(Point3::new(-0.5, -0.5, 0.0), normal, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(0.5, -0.5, 0.0), normal, Vector2::new(1.0, 1.0)),
        ];

        let mut mesh = Self {
            transformed: Vec::with_capacity(3),
            vertices,
            indices: vec![0, 1, 2],
            topology: Topology::TriangleList,
            material: Material::Flat,
            translation: Matrix4::identity(),
            rotation: Matrix4::identity(),
            scale: Matrix4::identity(),
        };
        mesh.compute_tangents();
        mesh
    }
}

/// Gram-Schmidt step. Falls back to any unit vector perpendicular to the
/// normal when the accumulated tangent is unusable.
fn orthogonal_tangent(normal: &Vector3<f32>, tangent: &Vector3<f32>) -> Vector3<f32> {
    let projected = tangent - normal * normal.dot(tangent);
    if let Some(t) = projected.try_normalize(1e-8) {
        return t;
    }
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (helper - normal * normal.dot(&helper))
        .try_normalize(1e-8)
        .unwrap_or_else(Vector3::x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_vertices() -> Vec<Vertex> {
        let n = Vector3::new(0.0, 0.0, -1.0);
        vec![
            Vertex::new(Point3::new(-1.0, 1.0, 0.0), n, Vector2::new(0.0, 0.0)),
            Vertex::new(Point3::new(-1.0, -1.0, 0.0), n, Vector2::new(0.0, 1.0)),
            Vertex::new(Point3::new(1.0, 1.0, 0.0), n, Vector2::new(1.0, 0.0)),
            Vertex::new(Point3::new(1.0, -1.0, 0.0), n, Vector2::new(1.0, 1.0)),
        ]
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(Mesh::new(vec![], vec![], Topology::TriangleList, Material::Flat).is_err());
        assert!(Mesh::new(quad_vertices(), vec![0, 1], Topology::TriangleList, Material::Flat).is_err());
        assert!(Mesh::new(quad_vertices(), vec![0, 1, 9], Topology::TriangleList, Material::Flat).is_err());
        assert!(Mesh::new(quad_vertices(), vec![0, 1], Topology::TriangleStrip, Material::Flat).is_err());
    }

    #[test]
    fn strip_alternates_winding() {
        let mesh = Mesh::new(quad_vertices(), vec![0, 1, 2, 3], Topology::TriangleStrip, Material::Flat).unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn strip_skips_degenerate_restarts() {
        let mesh = Mesh::new(
            quad_vertices(),
            vec![0, 1, 2, 2, 3, 3, 1, 3, 2],
            Topology::TriangleStrip,
            Material::Flat,
        )
        .unwrap();
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn list_groups_by_three() {
        let mesh = Mesh::new(quad_vertices(), vec![0, 1, 2, 2, 1, 3], Topology::TriangleList, Material::Flat).unwrap();
        assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 1, 2], [2, 1, 3]]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn world_matrix_scales_rotates_then_translates() {
        let mut mesh = Mesh::create_test_triangle();
        mesh.set_scale(&Vector3::new(2.0, 2.0, 2.0));
        mesh.set_rotation_degrees(&Vector3::new(0.0, 90.0, 0.0));
        mesh.set_translation(&Vector3::new(0.0, 0.0, 5.0));

        let p = mesh.world_matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((p - Point3::new(2.0, 0.0, 5.0)).norm() < 1e-5);
    }

    #[test]
    fn tangents_follow_u_and_stay_orthogonal() {
        let mut mesh =
            Mesh::new(quad_vertices(), vec![0, 1, 2, 2, 1, 3], Topology::TriangleList, Material::Flat).unwrap();
        mesh.compute_tangents();

        for v in &mesh.vertices {
            assert!((v.tangent - Vector3::x()).norm() < 1e-5);
            assert!(v.tangent.dot(&v.normal).abs() < 1e-5);
        }
    }
}
