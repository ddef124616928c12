//! Face winding and culling

/// Which screen-space winding, if any, the driver culls before
/// rasterization.
///
/// The facing sign is the z-component of the cross product of two triangle
/// edges in screen space. `Clockwise` culls triangles with positive facing,
/// `CounterClockwise` culls the rest. Culling happens after the viewport
/// transform, so the winding is judged as seen in the final image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// Keep every triangle
    None,
    /// Cull triangles with positive facing
    Clockwise,
    /// Cull triangles with non-positive facing
    CounterClockwise,
}
