use crate::pipeline::options::RenderOptions;
use crate::scene::camera::{Camera, CameraInput};
use crate::scene::mesh::Mesh;

/// Holds all scene resources required for rendering.
pub struct RenderContext {
    pub camera: Camera,
    pub meshes: Vec<Mesh>,
}

impl RenderContext {
    pub fn new(camera: Camera, meshes: Vec<Mesh>) -> Self {
        Self { camera, meshes }
    }

    /// Update phase of a frame: camera first, then mesh rotation.
    pub fn update(&mut self, elapsed: f32, input: &CameraInput, options: &RenderOptions) {
        self.camera.update(elapsed, input);

        if options.rotate {
            let angle = (options.rotation_speed * elapsed).to_radians();
            for mesh in &mut self.meshes {
                mesh.rotate_y(angle);
            }
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}
