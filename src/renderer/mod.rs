//! The pipeline driver: vertex assembly, vertex-stage invocation, clip
//! dispatch, viewport transform, culling and primitive dispatch

pub mod cache;

use ::clipper::{self, LineClipper, TriangleClipper, ALL_CLIP_PLANES};
use ::framebuffer::FrameBuffer;
use ::geometry::{ShaderVertex, CullMode};
use ::raster::{Rasterizer, TriRasterMode};
use ::shader::{VertexShader, FragmentShader, VertexInputs, AttribPointer,
               DummyVertexShader, CheckVertexShader, MAX_VERTEX_ATTRIBS};

use self::cache::VertexCache;

/// Primitive topology of an index stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Point,
    Line,
    Triangle,
}

impl Primitive {
    /// Number of indices one primitive consumes
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            Primitive::Point => 1,
            Primitive::Line => 2,
            Primitive::Triangle => 3,
        }
    }
}

/// Primitives per batch before a mid-draw flush through the back half of
/// the pipeline. Checked only at whole-primitive boundaries so a primitive
/// is never split across batches.
const FLUSH_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Viewport {
    x: i32,
    y: i32,
    width: i32,
    height: i32,

    scale_x: f32,
    scale_y: f32,
    trans_x: f32,
    trans_y: f32,
}

#[derive(Debug, Clone, Copy)]
struct DepthRange {
    n: f32,
    f: f32,
}

#[derive(Clone, Copy)]
struct VertexAttrib {
    buffer: *const u8,
    stride: usize,
}

impl VertexAttrib {
    fn unbound() -> VertexAttrib {
        VertexAttrib {
            buffer: ::std::ptr::null(),
            stride: 0,
        }
    }
}

/// The renderer drives the five pipeline stages for each draw call:
/// assembly, vertex stage, clip, viewport transform with culling, and
/// rasterization. It owns the stage wiring; the rasterizer owns the
/// raster-time state.
pub struct Renderer {
    viewport: Viewport,
    depth_range: DepthRange,
    cull_mode: CullMode,
    rasterizer: Rasterizer,

    process_vertex: fn(&VertexInputs) -> ShaderVertex,
    attrib_count: usize,
    attribs: [VertexAttrib; MAX_VERTEX_ATTRIBS],

    output_vertices: Vec<ShaderVertex>,
    output_indices: Vec<i32>,
    clip_masks: Vec<u8>,
}

impl Renderer {
    /// Create a renderer with clockwise culling, depth range `(1, 100)`
    /// and placeholder programs, matching the defaults a fixed-function
    /// driver would install.
    pub fn new() -> Renderer {
        Renderer {
            viewport: Viewport {
                x: 0,
                y: 0,
                width: 0,
                height: 0,
                scale_x: 0.0,
                scale_y: 0.0,
                trans_x: 0.0,
                trans_y: 0.0,
            },
            depth_range: DepthRange { n: 1.0, f: 100.0 },
            cull_mode: CullMode::Clockwise,
            rasterizer: Rasterizer::new(),
            process_vertex: DummyVertexShader::process_vertex,
            attrib_count: 0,
            attribs: [VertexAttrib::unbound(); MAX_VERTEX_ATTRIBS],
            output_vertices: Vec::new(),
            output_indices: Vec::new(),
            clip_masks: Vec::new(),
        }
    }

    /// Set the viewport. Top-left is `(0, 0)`.
    ///
    /// Installs the NDC→screen affine and resizes the frame and depth
    /// buffers to `height × width`.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = Viewport {
            x: x,
            y: y,
            width: width,
            height: height,
            scale_x: width as f32 / 2.0,
            scale_y: height as f32 / 2.0,
            trans_x: x as f32 + width as f32 / 2.0,
            trans_y: y as f32 + height as f32 / 2.0,
        };

        self.rasterizer.resize_buffer(width.max(0) as usize, height.max(0) as usize);
    }

    /// Set the target interval for post-transform z. Any finite pair is
    /// accepted; smaller z wins the depth test under the crate's
    /// convention.
    pub fn set_depth_range(&mut self, n: f32, f: f32) {
        self.depth_range = DepthRange { n: n, f: f };
    }

    /// Set the cull mode. Default culls clockwise triangles.
    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    pub fn set_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.rasterizer.set_scissor_rect(x, y, width, height);
    }

    pub fn set_tri_raster_mode(&mut self, mode: TriRasterMode) {
        self.rasterizer.set_tri_raster_mode(mode);
    }

    /// Bind a vertex program by type.
    pub fn set_vertex_shader<V>(&mut self) where V: VertexShader {
        let () = CheckVertexShader::<V>::ATTRIBS_IN_RANGE;

        self.attrib_count = V::ATTRIB_COUNT;
        self.process_vertex = V::process_vertex;
    }

    /// Bind a fragment program by type.
    pub fn set_fragment_shader<F>(&mut self) where F: FragmentShader {
        self.rasterizer.set_fragment_shader::<F>();
    }

    /// Bind a raw strided attribute stream to a slot.
    ///
    /// # Safety
    ///
    /// `buffer + stride · i` must be readable as the attribute type the
    /// bound vertex program casts slot `slot` to, for every index `i`
    /// passed to `draw_elements` while this binding is live.
    pub unsafe fn set_vertex_attrib_pointer(&mut self, slot: usize, stride: usize, buffer: *const u8) {
        assert!(slot < MAX_VERTEX_ATTRIBS, "attribute slot out of range");

        self.attribs[slot] = VertexAttrib {
            buffer: buffer,
            stride: stride,
        };
    }

    #[inline]
    pub fn framebuffer(&self) -> &FrameBuffer {
        self.rasterizer.framebuffer()
    }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        self.rasterizer.framebuffer_mut()
    }

    #[inline]
    pub fn rasterizer(&self) -> &Rasterizer { &self.rasterizer }

    #[inline]
    pub fn rasterizer_mut(&mut self) -> &mut Rasterizer { &mut self.rasterizer }

    /// Draw a number of points, lines or triangles.
    ///
    /// Walks the index list through the vertex cache and the bound vertex
    /// program, then runs clip → viewport transform → cull → raster,
    /// flushing every 1024 primitives.
    pub fn draw_elements(&mut self, mode: Primitive, indices: &[i32]) {
        self.output_vertices.clear();
        self.output_indices.clear();

        let mut cache = VertexCache::new();
        let stride = mode.stride();

        for &elem_idx in indices {
            match cache.lookup(elem_idx) {
                Some(vertex_idx) => self.output_indices.push(vertex_idx),
                None => {
                    let input = self.vertex_input(elem_idx);

                    let vertex_idx = self.output_vertices.len() as i32;
                    self.output_indices.push(vertex_idx);
                    self.output_vertices.push((self.process_vertex)(&input));

                    cache.insert(elem_idx, vertex_idx);
                }
            }

            if self.output_indices.len() % stride == 0 &&
               self.output_indices.len() / stride >= FLUSH_THRESHOLD {
                self.process_primitives(mode);
                self.output_vertices.clear();
                self.output_indices.clear();
                cache.clear();
            }
        }

        self.process_primitives(mode);
    }

    fn vertex_input(&self, elem_idx: i32) -> VertexInputs {
        let mut input = [AttribPointer::null(); MAX_VERTEX_ATTRIBS];

        for i in 0..self.attrib_count {
            let attrib = &self.attribs[i];
            input[i] = AttribPointer::new(attrib.buffer.wrapping_add(attrib.stride * elem_idx as usize));
        }

        input
    }

    fn process_primitives(&mut self, mode: Primitive) {
        if self.output_indices.is_empty() {
            return;
        }

        self.clip_primitives(mode);
        self.transform_vertices();
        self.draw_primitives(mode);
    }

    fn compute_clip_masks(&mut self) {
        self.clip_masks.clear();
        self.clip_masks.extend(self.output_vertices.iter().map(clipper::outcode));
    }

    fn clip_primitives(&mut self, mode: Primitive) {
        match mode {
            Primitive::Point => self.clip_points(),
            Primitive::Line => self.clip_lines(),
            Primitive::Triangle => self.clip_triangles(),
        }
    }

    fn clip_points(&mut self) {
        self.compute_clip_masks();

        for idx in self.output_indices.iter_mut() {
            if self.clip_masks[*idx as usize] != 0 {
                *idx = -1;
            }
        }
    }

    fn clip_lines(&mut self) {
        self.compute_clip_masks();

        let n = self.output_indices.len() / 2 * 2;

        let mut i = 0;
        while i < n {
            let idx0 = self.output_indices[i];
            let idx1 = self.output_indices[i + 1];

            let mask = self.clip_masks[idx0 as usize] | self.clip_masks[idx1 as usize];

            if mask == 0 {
                i += 2;
                continue;
            }

            let v0 = self.output_vertices[idx0 as usize];
            let v1 = self.output_vertices[idx1 as usize];

            let mut line = LineClipper::new(&v0, &v1);
            for plane in &ALL_CLIP_PLANES {
                if mask & plane.mask() != 0 {
                    line.clip_to_plane(*plane);
                }
            }

            if line.fully_clipped {
                self.output_indices[i] = -1;
                self.output_indices[i + 1] = -1;
                i += 2;
                continue;
            }

            let (t0, t1) = (line.t0, line.t1);

            // Only endpoints that were outside get replaced.
            if self.clip_masks[idx0 as usize] != 0 {
                self.output_vertices.push(ShaderVertex::lerp(t0, &v0, &v1));
                self.output_indices[i] = self.output_vertices.len() as i32 - 1;
            }

            if self.clip_masks[idx1 as usize] != 0 {
                self.output_vertices.push(ShaderVertex::lerp(t1, &v0, &v1));
                self.output_indices[i + 1] = self.output_vertices.len() as i32 - 1;
            }

            i += 2;
        }
    }

    fn clip_triangles(&mut self) {
        self.compute_clip_masks();

        // Fan triangles appended during clipping are already clipped and
        // must not be revisited.
        let n = self.output_indices.len() / 3 * 3;

        let mut i = 0;
        while i < n {
            let idx0 = self.output_indices[i];
            let idx1 = self.output_indices[i + 1];
            let idx2 = self.output_indices[i + 2];

            let mask = self.clip_masks[idx0 as usize] |
                       self.clip_masks[idx1 as usize] |
                       self.clip_masks[idx2 as usize];

            if mask == 0 {
                i += 3;
                continue;
            }

            let mut polygon = TriangleClipper::new(&mut self.output_vertices, idx0, idx1, idx2);
            for plane in &ALL_CLIP_PLANES {
                if mask & plane.mask() != 0 {
                    polygon.clip_to_plane(*plane);
                }
            }

            if polygon.is_fully_clipped() {
                self.output_indices[i] = -1;
                self.output_indices[i + 1] = -1;
                self.output_indices[i + 2] = -1;
                i += 3;
                continue;
            }

            let ring = polygon.indices;

            self.output_indices[i] = ring[0];
            self.output_indices[i + 1] = ring[1];
            self.output_indices[i + 2] = ring[2];

            for j in 3..ring.len() {
                self.output_indices.push(ring[0]);
                self.output_indices.push(ring[j - 1]);
                self.output_indices.push(ring[j]);
            }

            i += 3;
        }
    }

    /// Perspective divide plus the viewport affine, applied exactly once
    /// per referenced vertex.
    fn transform_vertices(&mut self) {
        let Renderer {
            ref output_indices,
            ref mut output_vertices,
            viewport,
            depth_range,
            ..
        } = *self;

        let mut processed = vec![false; output_vertices.len()];

        for &index in output_indices.iter() {
            if index < 0 {
                continue;
            }

            let index = index as usize;
            if processed[index] {
                continue;
            }
            processed[index] = true;

            let v = &mut output_vertices[index];

            let invw = 1.0 / v.position.w;
            v.position.x *= invw;
            v.position.y *= invw;
            v.position.z *= invw;

            v.position.x = viewport.scale_x * v.position.x + viewport.trans_x;
            v.position.y = viewport.scale_y * v.position.y + viewport.trans_y;
            v.position.z = 0.5 * (depth_range.f - depth_range.n) * v.position.z
                + 0.5 * (depth_range.n + depth_range.f);
        }
    }

    fn draw_primitives(&mut self, mode: Primitive) {
        match mode {
            Primitive::Triangle => {
                self.cull_triangles();

                let Renderer { ref mut rasterizer, ref output_vertices, ref output_indices, .. } = *self;
                rasterizer.draw_triangle_list(output_vertices, output_indices);
            }
            Primitive::Line => {
                let Renderer { ref mut rasterizer, ref output_vertices, ref output_indices, .. } = *self;
                rasterizer.draw_line_list(output_vertices, output_indices);
            }
            Primitive::Point => {
                let Renderer { ref mut rasterizer, ref output_vertices, ref output_indices, .. } = *self;
                rasterizer.draw_point_list(output_vertices, output_indices);
            }
        }
    }

    fn cull_triangles(&mut self) {
        let n = self.output_indices.len() / 3 * 3;

        let mut i = 0;
        while i < n {
            if self.output_indices[i] < 0 {
                i += 3;
                continue;
            }

            let v0 = &self.output_vertices[self.output_indices[i] as usize];
            let v1 = &self.output_vertices[self.output_indices[i + 1] as usize];
            let v2 = &self.output_vertices[self.output_indices[i + 2] as usize];

            // z-coordinate of (v0 - v1) × (v2 - v1) in screen space
            let facing = (v0.position.x - v1.position.x) * (v2.position.y - v1.position.y)
                - (v2.position.x - v1.position.x) * (v0.position.y - v1.position.y);

            let culled = if facing > 0.0 {
                self.cull_mode == CullMode::Clockwise
            } else {
                self.cull_mode == CullMode::CounterClockwise
            };

            if culled {
                self.output_indices[i] = -1;
                self.output_indices[i + 1] = -1;
                self.output_indices[i + 2] = -1;
            }

            i += 3;
        }
    }
}
