//! Sutherland-Hodgman polygon clipping

use smallvec::SmallVec;

use ::clipper::ClipPlane;
use ::geometry::ShaderVertex;

/// Clips a triangle against the violated planes, one plane at a time.
///
/// The polygon is kept as a ring of indices into the emitted-vertex buffer
/// rather than as vertices, so vertices created at plane crossings keep
/// their identity across the remaining planes. Clipping against six planes
/// can grow a triangle to at most nine vertices, so the ring stays on the
/// stack.
pub struct TriangleClipper<'a> {
    vertices: &'a mut Vec<ShaderVertex>,
    pub indices: SmallVec<[i32; 12]>,
}

impl<'a> TriangleClipper<'a> {
    pub fn new(vertices: &'a mut Vec<ShaderVertex>, idx0: i32, idx1: i32, idx2: i32) -> TriangleClipper<'a> {
        let mut indices = SmallVec::new();
        indices.push(idx0);
        indices.push(idx1);
        indices.push(idx2);

        TriangleClipper {
            vertices: vertices,
            indices: indices,
        }
    }

    /// The polygon degenerated; the triangle is gone.
    pub fn is_fully_clipped(&self) -> bool {
        self.indices.len() < 3
    }

    pub fn clip_to_plane(&mut self, plane: ClipPlane) {
        if self.is_fully_clipped() {
            return;
        }

        let mut result: SmallVec<[i32; 12]> = SmallVec::new();

        let mut prev_idx = self.indices[self.indices.len() - 1];
        let mut prev_value = plane.evaluate(&self.vertices[prev_idx as usize]);

        for &idx in self.indices.iter() {
            let value = plane.evaluate(&self.vertices[idx as usize]);

            if prev_value >= 0.0 {
                result.push(prev_idx);
            }

            if (prev_value < 0.0) != (value < 0.0) {
                let t = -prev_value / (value - prev_value);
                let vertex = ShaderVertex::lerp(t,
                                                &self.vertices[prev_idx as usize],
                                                &self.vertices[idx as usize]);
                self.vertices.push(vertex);
                result.push(self.vertices.len() as i32 - 1);
            }

            prev_idx = idx;
            prev_value = value;
        }

        self.indices = result;
    }
}
