use crate::core::geometry::Vertex;
use crate::scene::material::Material;
use crate::scene::mesh::{Mesh, Topology};
use log::{debug, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::io::BufReader;
use std::path::Path;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true, // Unifies indices for Position/Normal/UV
        ..Default::default()
    }
}

/// Loads an OBJ file into one mesh with generated tangents.
///
/// OBJ data is right-handed; z of positions and normals is negated to
/// bring it into the renderer's left-handed space, and `v` is flipped so
/// texture row 0 is the top of the image.
pub fn load_obj<P: AsRef<Path>>(path: P, material: Material) -> Result<Mesh, String> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(format!("File not found: {:?}", path_ref));
    }

    debug!("Loading OBJ file: {:?}", path_ref);
    let (models, _materials) = tobj::load_obj(path_ref, &load_options())
        .map_err(|e| format!("Failed to load OBJ {:?}: {}", path_ref, e))?;

    build_mesh(models, material).map_err(|e| format!("{:?}: {}", path_ref, e))
}

/// Parses OBJ text held in memory. `mtllib` references are ignored.
pub fn load_obj_from_str(source: &str, material: Material) -> Result<Mesh, String> {
    let mut reader = BufReader::new(source.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| format!("Failed to parse OBJ: {}", e))?;

    build_mesh(models, material)
}

fn build_mesh(models: Vec<tobj::Model>, material: Material) -> Result<Mesh, String> {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut index_offset = 0u32;

    // Sub-models are merged into one mesh sharing the material.
    for model in &models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;

        let has_normals = mesh.normals.len() == mesh.positions.len();
        let has_texcoords = mesh.texcoords.len() / 2 == num_vertices;
        let has_colors = mesh.vertex_color.len() == mesh.positions.len();

        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. Using default (0, 0, -1).",
                model.name
            );
        }

        for i in 0..num_vertices {
            let position = Point3::new(
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                -mesh.positions[i * 3 + 2],
            );

            let normal = if has_normals {
                Vector3::new(
                    mesh.normals[i * 3],
                    mesh.normals[i * 3 + 1],
                    -mesh.normals[i * 3 + 2],
                )
            } else {
                Vector3::new(0.0, 0.0, -1.0)
            };

            let texcoord = if has_texcoords {
                Vector2::new(mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1])
            } else {
                Vector2::zeros()
            };

            let mut vertex = Vertex::new(position, normal, texcoord);
            if has_colors {
                vertex = vertex.with_color(Vector3::new(
                    mesh.vertex_color[i * 3],
                    mesh.vertex_color[i * 3 + 1],
                    mesh.vertex_color[i * 3 + 2],
                ));
            }
            vertices.push(vertex);
        }

        indices.extend(mesh.indices.iter().map(|index| index + index_offset));
        index_offset += num_vertices as u32;
    }

    let mut mesh = Mesh::new(vertices, indices, Topology::TriangleList, material)?;
    mesh.compute_tangents();

    debug!(
        "OBJ loaded: {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
