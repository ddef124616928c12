extern crate nalgebra;
extern crate softraster;

use nalgebra::Vector4;

use softraster::ShaderVertex;
use softraster::clipper::{self, ClipPlane, LineClipper, TriangleClipper, ALL_CLIP_PLANES};
use softraster::renderer::cache::VertexCache;

fn vertex(x: f32, y: f32, z: f32, w: f32) -> ShaderVertex {
    ShaderVertex::new(Vector4::new(x, y, z, w))
}

#[test]
fn outcode_is_zero_inside_the_canonical_cube() {
    assert_eq!(clipper::outcode(&vertex(0.0, 0.0, 0.0, 1.0)), 0);
    assert_eq!(clipper::outcode(&vertex(0.5, -0.5, 0.9, 1.0)), 0);
    assert_eq!(clipper::outcode(&vertex(1.0, 1.0, 1.0, 1.0)), 0);
}

#[test]
fn outcode_records_each_violated_plane() {
    assert_eq!(clipper::outcode(&vertex(2.0, 0.0, 0.0, 1.0)), ClipPlane::PosX.mask());
    assert_eq!(clipper::outcode(&vertex(-2.0, 0.0, 0.0, 1.0)), ClipPlane::NegX.mask());
    assert_eq!(clipper::outcode(&vertex(0.0, 2.0, 0.0, 1.0)), ClipPlane::PosY.mask());
    assert_eq!(clipper::outcode(&vertex(0.0, -2.0, 0.0, 1.0)), ClipPlane::NegY.mask());
    assert_eq!(clipper::outcode(&vertex(0.0, 0.0, 2.0, 1.0)), ClipPlane::PosZ.mask());
    assert_eq!(clipper::outcode(&vertex(0.0, 0.0, -2.0, 1.0)), ClipPlane::NegZ.mask());

    // Both x planes at once is impossible for positive w, but a vertex
    // behind the eye violates whole groups of planes together.
    let behind = clipper::outcode(&vertex(0.0, 0.0, 0.0, -1.0));
    assert_ne!(behind & ClipPlane::PosX.mask(), 0);
    assert_ne!(behind & ClipPlane::NegX.mask(), 0);
}

#[test]
fn line_clipper_shrinks_the_interval_for_one_outside_endpoint() {
    let v0 = vertex(0.0, 0.0, 0.0, 1.0);
    let v1 = vertex(2.0, 0.0, 0.0, 1.0);

    let mut clipper = LineClipper::new(&v0, &v1);
    clipper.clip_to_plane(ClipPlane::PosX);

    assert!(!clipper.fully_clipped);
    assert_eq!(clipper.t0, 0.0);
    assert_eq!(clipper.t1, 0.5);
}

#[test]
fn line_clipper_kills_a_fully_outside_segment() {
    let v0 = vertex(2.0, 0.0, 0.0, 1.0);
    let v1 = vertex(3.0, 0.0, 0.0, 1.0);

    let mut clipper = LineClipper::new(&v0, &v1);
    clipper.clip_to_plane(ClipPlane::PosX);

    assert!(clipper.fully_clipped);
}

#[test]
fn line_clipper_intersects_intervals_over_all_planes() {
    // Crosses both the +x and -x boundaries.
    let v0 = vertex(-2.0, 0.0, 0.0, 1.0);
    let v1 = vertex(2.0, 0.0, 0.0, 1.0);

    // The driver only clips against violated planes; do the same here.
    let mask = clipper::outcode(&v0) | clipper::outcode(&v1);

    let mut clipper = LineClipper::new(&v0, &v1);
    for plane in &ALL_CLIP_PLANES {
        if mask & plane.mask() != 0 {
            clipper.clip_to_plane(*plane);
        }
    }

    assert!(!clipper.fully_clipped);
    assert_eq!(clipper.t0, 0.25);
    assert_eq!(clipper.t1, 0.75);
}

#[test]
fn triangle_clipper_fans_one_outside_vertex_into_two_triangles() {
    let mut vertices = vec![
        vertex(0.0, -0.5, 0.0, 1.0),
        vertex(2.0, 0.0, 0.0, 1.0), // outside +x only
        vertex(0.0, 0.5, 0.0, 1.0),
    ];

    let mut clipper = TriangleClipper::new(&mut vertices, 0, 1, 2);
    clipper.clip_to_plane(ClipPlane::PosX);

    assert!(!clipper.is_fully_clipped());

    // One clipped corner leaves a quad: two fan triangles.
    assert_eq!(clipper.indices.len(), 4);
    let indices: Vec<i32> = clipper.indices.iter().cloned().collect();
    drop(clipper);

    // Two crossings created two vertices on the plane x = w.
    assert_eq!(vertices.len(), 5);
    for &idx in indices.iter() {
        let v = &vertices[idx as usize];
        assert!(v.position.x <= v.position.w + 1e-6);
    }
}

#[test]
fn triangle_clipper_keeps_an_untouched_polygon() {
    let mut vertices = vec![
        vertex(-0.5, -0.5, 0.0, 1.0),
        vertex(0.5, -0.5, 0.0, 1.0),
        vertex(0.0, 0.5, 0.0, 1.0),
    ];

    let mut clipper = TriangleClipper::new(&mut vertices, 0, 1, 2);
    clipper.clip_to_plane(ClipPlane::PosX);

    assert_eq!(clipper.indices.len(), 3);
    assert_eq!(vertices.len(), 3);
}

#[test]
fn triangle_clipper_kills_a_fully_outside_triangle() {
    let mut vertices = vec![
        vertex(2.0, 0.0, 0.0, 1.0),
        vertex(3.0, 0.0, 0.0, 1.0),
        vertex(2.5, 1.0, 0.0, 1.0),
    ];

    let mut clipper = TriangleClipper::new(&mut vertices, 0, 1, 2);
    clipper.clip_to_plane(ClipPlane::PosX);

    assert!(clipper.is_fully_clipped());
}

#[test]
fn triangle_clipper_interpolates_parameters_at_crossings() {
    let mut v0 = vertex(0.0, 0.0, 0.0, 1.0);
    let mut v1 = vertex(3.0, 0.0, 0.0, 1.0);
    v0.params[0] = 0.0;
    v1.params[0] = 3.0;

    let mut vertices = vec![v0, v1, vertex(0.0, 1.0, 0.0, 1.0)];

    let mut clipper = TriangleClipper::new(&mut vertices, 0, 1, 2);
    clipper.clip_to_plane(ClipPlane::PosX);

    // The crossing on the v0→v1 edge sits at x = 1 where the parameter
    // interpolates linearly to 1.
    let crossing = vertices.iter().find(|v| {
        (v.position.x - 1.0).abs() < 1e-6 && v.position.y.abs() < 1e-6 && v.params[0] != 0.0
    });

    let crossing = crossing.expect("no crossing vertex was created");
    assert!((crossing.params[0] - 1.0).abs() < 1e-6);
}

#[test]
fn vertex_cache_hits_only_exact_input_indices() {
    let mut cache = VertexCache::new();

    assert_eq!(cache.lookup(3), None);

    cache.insert(3, 7);
    assert_eq!(cache.lookup(3), Some(7));

    // Same slot, different input index: unconditional eviction.
    cache.insert(19, 8);
    assert_eq!(cache.lookup(3), None);
    assert_eq!(cache.lookup(19), Some(8));

    cache.clear();
    assert_eq!(cache.lookup(19), None);
}
