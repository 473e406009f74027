use crate::pipeline::options::Toggle;
use crate::scene::camera::CameraInput;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window};
use nalgebra::{Vector2, Vector3};

/// Turns window keyboard and mouse state into camera input.
///
/// Keys: W/Up forward, S/Down back, D/Right right, A/Left left, LeftShift fast.
/// Mouse drag: right button looks around, left button yaws and moves
/// forward/back with the vertical drag, both buttons move vertically.
pub struct CameraController {
    /// Degrees per pixel of mouse drag.
    pub sensitivity: f32,
    last_mouse_pos: Option<(f32, f32)>,
}

impl CameraController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            sensitivity,
            last_mouse_pos: None,
        }
    }

    pub fn poll(&mut self, window: &Window) -> CameraInput {
        let left = window.get_mouse_down(MouseButton::Left);
        let right = window.get_mouse_down(MouseButton::Right);

        let mut delta = Vector2::zeros();
        if left || right {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Pass) {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    delta = Vector2::new(x - last_x, y - last_y);
                }
                self.last_mouse_pos = Some((x, y));
            }
        } else {
            self.last_mouse_pos = None;
        }

        map_controls(&window.get_keys(), left, right, delta, self.sensitivity)
    }
}

/// Pure mapping from held keys and a mouse drag (in pixels) to camera input.
///
/// Keys on different axes combine, so W with D moves diagonally. Opposing
/// keys on one axis (W with S, A with D) cancel out instead of one taking
/// precedence.
pub fn map_controls(
    keys: &[Key],
    left: bool,
    right: bool,
    delta: Vector2<f32>,
    sensitivity: f32,
) -> CameraInput {
    let held = |a: Key, b: Key| keys.contains(&a) || keys.contains(&b);

    let mut translation = Vector3::zeros();
    if held(Key::W, Key::Up) {
        translation.z += 1.0;
    }
    if held(Key::S, Key::Down) {
        translation.z -= 1.0;
    }
    if held(Key::D, Key::Right) {
        translation.x += 1.0;
    }
    if held(Key::A, Key::Left) {
        translation.x -= 1.0;
    }

    let mut rotation = Vector2::zeros();
    match (left, right) {
        (true, true) => translation.y += delta.y,
        (true, false) => {
            rotation.x += delta.x * sensitivity;
            if delta.y < 0.0 {
                translation.z += 1.0;
            } else if delta.y > 0.0 {
                translation.z -= 1.0;
            }
        }
        (false, true) => rotation += delta * sensitivity,
        (false, false) => {}
    }

    CameraInput {
        translation,
        rotation,
        fast: keys.contains(&Key::LeftShift),
    }
}

/// Key bindings for the render toggles.
pub fn toggle_for_key(key: Key) -> Option<Toggle> {
    match key {
        Key::F2 => Some(Toggle::Rotation),
        Key::F3 => Some(Toggle::Fire),
        Key::F4 => Some(Toggle::Sampler),
        Key::F5 => Some(Toggle::ShadingMode),
        Key::F6 => Some(Toggle::NormalMap),
        Key::F7 => Some(Toggle::DepthBuffer),
        Key::F10 => Some(Toggle::UniformBackground),
        _ => None,
    }
}

/// Toggles whose keys went down since the last window update.
pub fn poll_toggles(window: &Window) -> Vec<Toggle> {
    window
        .get_keys_pressed(KeyRepeat::No)
        .into_iter()
        .filter_map(toggle_for_key)
        .collect()
}
