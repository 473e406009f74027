use crate::io::config::Config;
use crate::scene::light::Lighting;
use nalgebra::Vector3;
use serde::Deserialize;

/// Which lighting terms reach the final color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingMode {
    /// Gray `n · -l`.
    ObservedArea,
    /// Lambert times light intensity.
    Diffuse,
    /// Phong highlight only.
    Specular,
    #[default]
    Combined,
}

impl ShadingMode {
    pub fn next(self) -> Self {
        match self {
            ShadingMode::ObservedArea => ShadingMode::Diffuse,
            ShadingMode::Diffuse => ShadingMode::Specular,
            ShadingMode::Specular => ShadingMode::Combined,
            ShadingMode::Combined => ShadingMode::ObservedArea,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    FinalColor,
    /// Remapped depth as gray.
    DepthBuffer,
}

/// Texture filter selection. Software sampling is always point; the value
/// is carried so the mode cycles like the hardware path's does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplerMode {
    #[default]
    Point,
    Linear,
    Anisotropic,
}

impl SamplerMode {
    pub fn next(self) -> Self {
        match self {
            SamplerMode::Point => SamplerMode::Linear,
            SamplerMode::Linear => SamplerMode::Anisotropic,
            SamplerMode::Anisotropic => SamplerMode::Point,
        }
    }
}

/// A discrete switch flipped between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Rotation,
    Fire,
    Sampler,
    ShadingMode,
    NormalMap,
    DepthBuffer,
    UniformBackground,
}

/// Per-frame render configuration.
///
/// Passed by reference into every render call; toggles produce a new value
/// instead of mutating shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub shading_mode: ShadingMode,
    pub render_mode: RenderMode,
    pub sampler: SamplerMode,
    pub rotate: bool,
    /// Degrees per second about world Y.
    pub rotation_speed: f32,
    pub use_normal_map: bool,
    pub show_fire: bool,
    pub uniform_background: bool,
    pub background: Vector3<f32>,
    pub uniform_background_color: Vector3<f32>,
    /// Depth range stretched to black..white in depth-buffer mode.
    pub depth_remap: [f32; 2],
    pub lighting: Lighting,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        let render = &config.render;
        Self {
            shading_mode: render.shading_mode,
            render_mode: render.render_mode,
            sampler: render.sampler,
            rotate: render.rotate,
            rotation_speed: render.rotation_speed,
            use_normal_map: render.normal_map,
            show_fire: render.show_fire,
            uniform_background: false,
            background: Vector3::from(render.background),
            uniform_background_color: Vector3::from(render.uniform_background),
            depth_remap: render.depth_remap,
            lighting: Lighting::from_config(&config.lighting),
        }
    }

    /// Returns the options with one switch flipped.
    #[must_use]
    pub fn apply(mut self, toggle: Toggle) -> Self {
        match toggle {
            Toggle::Rotation => self.rotate = !self.rotate,
            Toggle::Fire => self.show_fire = !self.show_fire,
            Toggle::Sampler => self.sampler = self.sampler.next(),
            Toggle::ShadingMode => self.shading_mode = self.shading_mode.next(),
            Toggle::NormalMap => self.use_normal_map = !self.use_normal_map,
            Toggle::DepthBuffer => {
                self.render_mode = match self.render_mode {
                    RenderMode::FinalColor => RenderMode::DepthBuffer,
                    RenderMode::DepthBuffer => RenderMode::FinalColor,
                }
            }
            Toggle::UniformBackground => self.uniform_background = !self.uniform_background,
        }
        self
    }

    pub fn clear_color(&self) -> Vector3<f32> {
        if self.uniform_background {
            self.uniform_background_color
        } else {
            self.background
        }
    }

    /// One-line summary for logs.
    pub fn describe(&self) -> String {
        format!(
            "shading={:?} render={:?} sampler={:?} rotate={} normal_map={} fire={}",
            self.shading_mode,
            self.render_mode,
            self.sampler,
            self.rotate,
            self.use_normal_map,
            self.show_fire
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shading_mode_cycles_through_all_four() {
        let mut mode = ShadingMode::ObservedArea;
        let mut seen = vec![mode];
        for _ in 0..3 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(mode.next(), ShadingMode::ObservedArea);
        assert_eq!(
            seen,
            vec![
                ShadingMode::ObservedArea,
                ShadingMode::Diffuse,
                ShadingMode::Specular,
                ShadingMode::Combined
            ]
        );
    }

    #[test]
    fn toggles_leave_the_original_untouched() {
        let options = RenderOptions::default();
        let toggled = options
            .apply(Toggle::DepthBuffer)
            .apply(Toggle::NormalMap)
            .apply(Toggle::Sampler);

        assert_eq!(options.render_mode, RenderMode::FinalColor);
        assert_eq!(toggled.render_mode, RenderMode::DepthBuffer);
        assert_eq!(toggled.use_normal_map, !options.use_normal_map);
        assert_eq!(toggled.sampler, SamplerMode::Linear);
    }

    #[test]
    fn toggling_twice_restores_state() {
        let options = RenderOptions::default();
        for toggle in [
            Toggle::Rotation,
            Toggle::Fire,
            Toggle::NormalMap,
            Toggle::DepthBuffer,
            Toggle::UniformBackground,
        ] {
            assert_eq!(options.apply(toggle).apply(toggle), options);
        }
    }

    #[test]
    fn uniform_background_switches_clear_color() {
        let options = RenderOptions::default();
        assert_eq!(options.clear_color(), Vector3::new(0.39, 0.39, 0.39));
        let uniform = options.apply(Toggle::UniformBackground);
        assert_eq!(uniform.clear_color(), Vector3::new(0.1, 0.1, 0.1));
    }
}
