use crate::pipeline::options::{RenderMode, SamplerMode, ShadingMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lighting: LightingConfig,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let content = fs::read_to_string(path_ref)
            .map_err(|e| format!("Failed to read config file {:?}: {}", path_ref, e))?;
        Self::parse(&content).map_err(|e| format!("{:?}: {}", path_ref, e))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_timestep")]
    pub fixed_timestep: f32,

    // --- Background ---
    #[serde(default = "default_background")]
    pub background: [f32; 3],
    #[serde(default = "default_uniform_background")]
    pub uniform_background: [f32; 3],

    // --- Pipeline ---
    #[serde(default = "default_depth_remap")]
    pub depth_remap: [f32; 2],
    #[serde(default = "default_margin")]
    pub bounding_box_margin: f32,
    #[serde(default)]
    pub shading_mode: ShadingMode,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub sampler: SamplerMode,

    // --- Toggles ---
    #[serde(default = "default_true")]
    pub rotate: bool,
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_true")]
    pub normal_map: bool,
    #[serde(default = "default_true")]
    pub show_fire: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            frames: default_frames(),
            fixed_timestep: default_timestep(),
            background: default_background(),
            uniform_background: default_uniform_background(),
            depth_remap: default_depth_remap(),
            bounding_box_margin: default_margin(),
            shading_mode: ShadingMode::default(),
            render_mode: RenderMode::default(),
            sampler: SamplerMode::default(),
            rotate: true,
            rotation_speed: default_rotation_speed(),
            normal_map: true,
            show_fire: true,
        }
    }
}

fn default_width() -> usize {
    640
}
fn default_height() -> usize {
    480
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_timestep() -> f32 {
    1.0 / 60.0
}
fn default_background() -> [f32; 3] {
    [0.39, 0.39, 0.39]
}
fn default_uniform_background() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_depth_remap() -> [f32; 2] {
    [0.985, 1.0]
}
fn default_margin() -> f32 {
    1.0
}
fn default_rotation_speed() -> f32 {
    45.0
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_fast_multiplier")]
    pub fast_multiplier: f32,
    #[serde(default = "default_look_sensitivity")]
    pub look_sensitivity: f32,
    #[serde(default = "default_false")]
    pub clamp_pitch: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
            move_speed: default_move_speed(),
            fast_multiplier: default_fast_multiplier(),
            look_sensitivity: default_look_sensitivity(),
            clamp_pitch: false,
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -50.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    100.0
}
fn default_move_speed() -> f32 {
    20.0
}
fn default_fast_multiplier() -> f32 {
    2.0
}
fn default_look_sensitivity() -> f32 {
    0.25
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightingConfig {
    /// Direction the light travels.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default = "default_diffuse_reflectance")]
    pub diffuse_reflectance: f32,
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            intensity: default_intensity(),
            shininess: default_shininess(),
            diffuse_reflectance: default_diffuse_reflectance(),
            ambient: default_ambient(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.577, -0.577, 0.577]
}
fn default_intensity() -> f32 {
    7.0
}
fn default_shininess() -> f32 {
    25.0
}
fn default_diffuse_reflectance() -> f32 {
    1.0
}
fn default_ambient() -> [f32; 3] {
    [0.025, 0.025, 0.025]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Vehicle,
    Fire,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshConfig {
    pub path: String,
    #[serde(default)]
    pub material: MaterialKind,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],

    /// Vertex color for flat meshes whose file carries none.
    pub color: Option<[f32; 3]>,

    // --- Textures ---
    pub diffuse: Option<String>,
    pub normal: Option<String>,
    pub specular: Option<String>,
    pub gloss: Option<String>,
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
