use crate::core::geometry::{TransformedVertex, Varying};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen, transform_direction};
use crate::scene::camera::Camera;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix4, Vector4};

/// Vertex transform stage for one mesh.
///
/// Refills the mesh's transformed-vertex buffer from scratch; nothing from
/// the previous frame survives.
pub fn vertex_pass(mesh: &mut Mesh, camera: &Camera, width: usize, height: usize) {
    let world = mesh.world_matrix();
    let world_view_projection = camera.view_projection_matrix() * world;

    let mut output = std::mem::take(mesh.transformed_vertices_mut());
    transform_vertices(
        mesh,
        &world,
        &world_view_projection,
        camera,
        width as f32,
        height as f32,
        &mut output,
    );
    *mesh.transformed_vertices_mut() = output;
}

fn transform_vertices(
    mesh: &Mesh,
    world: &Matrix4<f32>,
    world_view_projection: &Matrix4<f32>,
    camera: &Camera,
    width: f32,
    height: f32,
    output: &mut Vec<TransformedVertex>,
) {
    let camera_origin = camera.origin();

    output.clear();
    output.extend(mesh.vertices.iter().map(|vertex| {
        // 1. Object -> Clip
        let homogeneous = vertex.position.to_homogeneous();
        let clip = world_view_projection * homogeneous;

        // 2. Directions by the world matrix only
        let normal = transform_direction(world, &vertex.normal)
            .try_normalize(1e-12)
            .unwrap_or(vertex.normal);
        let tangent = transform_direction(world, &vertex.tangent)
            .try_normalize(1e-12)
            .unwrap_or(vertex.tangent);

        // 3. View direction, normalized per pixel later
        let world_position = world * homogeneous;
        let view_direction = world_position.xyz() - camera_origin.coords;

        // 4. Clip -> NDC -> Screen, keeping clip w
        let ndc = apply_perspective_division(&clip);
        let screen = ndc_to_screen(ndc.x, ndc.y, width, height);

        TransformedVertex {
            clip_position: clip,
            position: Vector4::new(screen.x, screen.y, ndc.z, clip.w),
            varying: Varying {
                color: vertex.color,
                uv: vertex.texcoord,
                normal,
                tangent,
                view_direction,
            },
        }
    }));
}
