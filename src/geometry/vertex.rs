//! The vertex type shared by every pipeline stage

use nalgebra::Vector4;

use ::utils::lerp;

/// Maximum number of scalar parameters a vertex can carry between the
/// vertex and fragment programs.
pub const MAX_PARAMS: usize = 16;

/// A single vertex as it travels through the pipeline.
///
/// The vertex shader emits it in clip space. After clipping, the viewport
/// transform rewrites `x` and `y` into pixel units and `z` into the depth
/// range, leaving `w` untouched for perspective correction at raster time.
/// The same type is used for both forms; only the producing stage differs.
///
/// `params` carries user-defined interpolants (colors, UVs, normal
/// components and so on). Only the first `PARAMS_COUNT` entries of the
/// bound fragment program are ever meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderVertex {
    /// Homogeneous position, clip-space or screen-space
    pub position: Vector4<f32>,
    /// User-defined scalar interpolants
    pub params: [f32; MAX_PARAMS],
}

impl ShaderVertex {
    #[inline]
    pub fn new(position: Vector4<f32>) -> ShaderVertex {
        ShaderVertex {
            position: position,
            params: [0.0; MAX_PARAMS],
        }
    }

    /// Interpolate linearly between two vertices.
    ///
    /// Every component is linear, parameters included; perspective
    /// correction is deferred to raster time.
    pub fn lerp(t: f32, v0: &ShaderVertex, v1: &ShaderVertex) -> ShaderVertex {
        let mut out = ShaderVertex::new(v0.position * (1.0 - t) + v1.position * t);
        for i in 0..MAX_PARAMS {
            out.params[i] = lerp(t, v0.params[i], v1.params[i]);
        }
        out
    }
}

impl Default for ShaderVertex {
    #[inline]
    fn default() -> ShaderVertex {
        ShaderVertex::new(Vector4::zeros())
    }
}
