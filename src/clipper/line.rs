//! Parametric line segment clipping

use ::clipper::ClipPlane;
use ::geometry::ShaderVertex;

/// Clips a segment by intersecting its parameter interval `[t0, t1]`
/// against each violated plane.
///
/// After all planes, the surviving endpoints are `lerp(t0, v0, v1)` and
/// `lerp(t1, v0, v1)`.
pub struct LineClipper<'a> {
    v0: &'a ShaderVertex,
    v1: &'a ShaderVertex,

    pub t0: f32,
    pub t1: f32,
    pub fully_clipped: bool,
}

impl<'a> LineClipper<'a> {
    pub fn new(v0: &'a ShaderVertex, v1: &'a ShaderVertex) -> LineClipper<'a> {
        LineClipper {
            v0: v0,
            v1: v1,
            t0: 0.0,
            t1: 1.0,
            fully_clipped: false,
        }
    }

    pub fn clip_to_plane(&mut self, plane: ClipPlane) {
        if self.fully_clipped {
            return;
        }

        let value0 = plane.evaluate(self.v0);
        let value1 = plane.evaluate(self.v1);

        if value0 < 0.0 && value1 < 0.0 {
            self.fully_clipped = true;
            return;
        }

        let t = -value0 / (value1 - value0);

        if value0 < 0.0 {
            self.t0 = self.t0.max(t);
        } else {
            self.t1 = self.t1.min(t);
        }
    }
}
