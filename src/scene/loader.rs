use crate::core::geometry::Vertex;
use crate::io::config::{Config, MaterialKind, MeshConfig};
use crate::io::obj_loader::load_obj;
use crate::scene::camera::Camera;
use crate::scene::context::RenderContext;
use crate::scene::material::{FireMaterial, Material, VehicleMaterial};
use crate::scene::mesh::{Mesh, Topology};
use crate::scene::texture::Texture;
use log::info;
use nalgebra::{Point3, Vector2, Vector3};
use std::collections::HashMap;
use std::sync::Arc;

/// Loads each texture path once and hands out shared handles.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn get(&mut self, path: &str) -> Result<Arc<Texture>, String> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(Arc::clone(texture));
        }
        let texture = Arc::new(Texture::load(path)?);
        self.textures.insert(path.to_string(), Arc::clone(&texture));
        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

fn aspect_ratio(config: &Config) -> f32 {
    config.render.width.max(1) as f32 / config.render.height.max(1) as f32
}

/// Initial resource loading (Heavy I/O). Any missing asset aborts the load.
pub fn init_scene_resources(config: &Config) -> Result<RenderContext, String> {
    let camera = Camera::from_config(&config.camera, aspect_ratio(config));

    let mut cache = TextureCache::default();
    let mut meshes = Vec::with_capacity(config.meshes.len());
    for mesh_conf in &config.meshes {
        meshes.push(load_mesh(mesh_conf, &mut cache)?);
    }

    let context = RenderContext::new(camera, meshes);
    info!(
        "Scene loaded: {} meshes, {} vertices, {} triangles, {} textures",
        context.meshes.len(),
        context.vertex_count(),
        context.triangle_count(),
        cache.len()
    );
    Ok(context)
}

fn required<'a>(slot: &'a Option<String>, name: &str, mesh: &str) -> Result<&'a str, String> {
    slot.as_deref()
        .ok_or_else(|| format!("Mesh '{}' is missing its {} texture", mesh, name))
}

fn build_material(conf: &MeshConfig, cache: &mut TextureCache) -> Result<Material, String> {
    Ok(match conf.material {
        MaterialKind::Vehicle => Material::Vehicle(VehicleMaterial {
            diffuse: cache.get(required(&conf.diffuse, "diffuse", &conf.path)?)?,
            normal: cache.get(required(&conf.normal, "normal", &conf.path)?)?,
            specular: cache.get(required(&conf.specular, "specular", &conf.path)?)?,
            gloss: cache.get(required(&conf.gloss, "gloss", &conf.path)?)?,
        }),
        MaterialKind::Fire => Material::Fire(FireMaterial {
            diffuse: cache.get(required(&conf.diffuse, "diffuse", &conf.path)?)?,
        }),
        MaterialKind::Flat => Material::Flat,
    })
}

fn load_mesh(conf: &MeshConfig, cache: &mut TextureCache) -> Result<Mesh, String> {
    let material = build_material(conf, cache)?;
    let mut mesh = load_obj(&conf.path, material)?;

    if let Some(color) = conf.color {
        for v in &mut mesh.vertices {
            v.color = Vector3::from(color);
        }
    }
    place(&mut mesh, conf.position, conf.rotation, conf.scale);
    Ok(mesh)
}

fn place(mesh: &mut Mesh, position: [f32; 3], rotation: [f32; 3], scale: [f32; 3]) {
    mesh.set_translation(&Vector3::from(position));
    mesh.set_rotation_degrees(&Vector3::from(rotation));
    mesh.set_scale(&Vector3::from(scale));
}

/// Built-in scene that needs no assets: a lit, normal-mapped strip quad
/// with procedural textures and a flat vertex-colored triangle in front.
pub fn demo_scene(config: &Config) -> Result<RenderContext, String> {
    let camera = Camera::from_config(&config.camera, aspect_ratio(config));

    let mut panel = Mesh::new(
        panel_vertices(12.0),
        vec![0, 1, 2, 3],
        Topology::TriangleStrip,
        Material::Vehicle(demo_material()),
    )?;
    panel.compute_tangents();
    place(&mut panel, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

    let normal = Vector3::new(0.0, 0.0, -1.0);
    let triangle_vertices = vec![
        Vertex::new(Point3::new(0.0, 6.0, 0.0), normal, Vector2::new(0.5, 0.0))
            .with_color(Vector3::new(1.0, 0.2, 0.2)),
        Vertex::new(Point3::new(-6.0, -5.0, 0.0), normal, Vector2::new(0.0, 1.0))
            .with_color(Vector3::new(0.2, 1.0, 0.2)),
        Vertex::new(Point3::new(6.0, -5.0, 0.0), normal, Vector2::new(1.0, 1.0))
            .with_color(Vector3::new(0.2, 0.2, 1.0)),
    ];
    let mut triangle = Mesh::new(triangle_vertices, vec![0, 1, 2], Topology::TriangleList, Material::Flat)?;
    place(&mut triangle, [-14.0, 0.0, -6.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

    let context = RenderContext::new(camera, vec![panel, triangle]);
    info!(
        "Demo scene: {} meshes, {} triangles",
        context.meshes.len(),
        context.triangle_count()
    );
    Ok(context)
}

/// Square in the XY plane facing -Z, ordered for a triangle strip.
fn panel_vertices(half: f32) -> Vec<Vertex> {
    let n = Vector3::new(0.0, 0.0, -1.0);
    vec![
        Vertex::new(Point3::new(-half, half, 0.0), n, Vector2::new(0.0, 0.0)),
        Vertex::new(Point3::new(-half, -half, 0.0), n, Vector2::new(0.0, 1.0)),
        Vertex::new(Point3::new(half, half, 0.0), n, Vector2::new(1.0, 0.0)),
        Vertex::new(Point3::new(half, -half, 0.0), n, Vector2::new(1.0, 1.0)),
    ]
}

fn demo_material() -> VehicleMaterial {
    const SIZE: u32 = 64;
    const TILES: u32 = 8;
    let tile = SIZE / TILES;

    let diffuse = Texture::from_fn(SIZE, SIZE, |x, y| {
        if (x / tile + y / tile) % 2 == 0 {
            Vector3::new(0.85, 0.55, 0.2)
        } else {
            Vector3::new(0.2, 0.35, 0.7)
        }
    });
    // Bumps: each tile's normal leans away from its center.
    let normal = Texture::from_fn(SIZE, SIZE, |x, y| {
        let center = tile as f32 / 2.0;
        let dx = ((x % tile) as f32 + 0.5 - center) / center;
        let dy = ((y % tile) as f32 + 0.5 - center) / center;
        let n = Vector3::new(dx * 0.4, dy * 0.4, 1.0).normalize();
        (n + Vector3::repeat(1.0)) * 0.5
    });
    let specular = Texture::solid(Vector3::repeat(0.6));
    let gloss = Texture::from_fn(SIZE, SIZE, |x, _| Vector3::repeat(0.2 + 0.8 * x as f32 / SIZE as f32));

    VehicleMaterial {
        diffuse: Arc::new(diffuse),
        normal: Arc::new(normal),
        specular: Arc::new(specular),
        gloss: Arc::new(gloss),
    }
}
