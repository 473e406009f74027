use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// Represents a single input vertex in object space.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Per-vertex color, used by flat shading. White when the source has none.
    pub color: Vector3<f32>,
    /// Texture coordinates (UV), top-left origin.
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
    /// Tangent vector for normal mapping.
    pub tangent: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            color: Vector3::new(1.0, 1.0, 1.0),
            texcoord,
            normal,
            tangent: Vector3::zeros(),
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    pub fn with_tangent(mut self, tangent: Vector3<f32>) -> Self {
        self.tangent = tangent;
        self
    }
}

/// Attributes carried from the vertex stage to the pixel shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Varying {
    pub color: Vector3<f32>,
    pub uv: Vector2<f32>,
    /// World-space normal.
    pub normal: Vector3<f32>,
    /// World-space tangent.
    pub tangent: Vector3<f32>,
    /// World-space vector from the camera origin to the surface point.
    pub view_direction: Vector3<f32>,
}

impl Default for Varying {
    fn default() -> Self {
        Self {
            color: Vector3::new(1.0, 1.0, 1.0),
            uv: Vector2::zeros(),
            normal: Vector3::zeros(),
            tangent: Vector3::zeros(),
            view_direction: Vector3::zeros(),
        }
    }
}

impl Varying {
    /// Post-interpolation fix-up: UV clamped to `[0, 1]`, directions renormalized.
    pub fn finalize(mut self) -> Self {
        self.uv.x = self.uv.x.clamp(0.0, 1.0);
        self.uv.y = self.uv.y.clamp(0.0, 1.0);
        self.normal = self.normal.try_normalize(1e-12).unwrap_or(self.normal);
        self.tangent = self.tangent.try_normalize(1e-12).unwrap_or(self.tangent);
        self.view_direction = self
            .view_direction
            .try_normalize(1e-12)
            .unwrap_or(self.view_direction);
        self
    }
}

/// A vertex after the transform stage. Rebuilt every frame.
#[derive(Debug, Clone, Copy)]
pub struct TransformedVertex {
    /// Clip-space position before the perspective divide.
    pub clip_position: Vector4<f32>,
    /// `x`, `y` in pixels, `z` the NDC depth, `w` the clip-space w.
    pub position: Vector4<f32>,
    pub varying: Varying,
}

impl TransformedVertex {
    /// Builds a vertex that is already in screen space.
    /// `clip_position` is reconstructed as `(x, y, z, 1) * w`.
    pub fn from_screen(x: f32, y: f32, depth: f32, w: f32, varying: Varying) -> Self {
        Self {
            clip_position: Vector4::new(x * w, y * w, depth * w, w),
            position: Vector4::new(x, y, depth, w),
            varying,
        }
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.position.z
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.position.w
    }
}
