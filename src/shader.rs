//! Vertex and fragment program contracts
//!
//! Programs are bound by type: the driver monomorphizes its dispatch over
//! the program types, so `ATTRIB_COUNT` and `PARAMS_COUNT` are known
//! wherever the interpolation loops run.

use std::marker::PhantomData;

use ::framebuffer::RasterWindow;
use ::geometry::{ShaderVertex, MAX_PARAMS};
use ::raster::BLOCK_SIZE;
use ::raster::equation::{TriangleEquation, EdgeEvals};
use ::raster::interpolant::PixelInterpolant;

/// Maximum number of attribute streams a vertex program can bind.
pub const MAX_VERTEX_ATTRIBS: usize = 8;

/// An opaque pointer into a bound attribute stream, already offset for one
/// input index.
#[derive(Debug, Clone, Copy)]
pub struct AttribPointer {
    ptr: *const u8,
}

impl AttribPointer {
    #[inline]
    pub(crate) fn new(ptr: *const u8) -> AttribPointer {
        AttribPointer { ptr: ptr }
    }

    #[inline]
    pub(crate) fn null() -> AttribPointer {
        AttribPointer { ptr: ::std::ptr::null() }
    }

    /// Reinterpret the stream element as a concrete attribute type.
    ///
    /// # Safety
    ///
    /// The slot must have been bound with a buffer of `T` laid out at the
    /// bound stride, and the drawn indices must stay inside that buffer.
    /// The vertex program is the one that knows the concrete type per
    /// slot, which is why the cast happens here and not at bind time.
    #[inline]
    pub unsafe fn get<T>(&self) -> &T {
        &*(self.ptr as *const T)
    }
}

/// The pointer table handed to a vertex program, one entry per bound slot.
pub type VertexInputs = [AttribPointer; MAX_VERTEX_ATTRIBS];

/// A vertex program: pure function from attribute pointers to one
/// clip-space vertex.
pub trait VertexShader {
    /// How many attribute slots the program reads. At most
    /// `MAX_VERTEX_ATTRIBS`, enforced when the program is bound.
    const ATTRIB_COUNT: usize;

    fn process_vertex(input: &VertexInputs) -> ShaderVertex;
}

/// A fragment program.
///
/// Programs usually implement only `draw_pixel`, which owns the depth
/// test, depth write, shading and color write through the window. The
/// provided `draw_span` and `draw_block` fillers drive `draw_pixel` with
/// incrementally stepped interpolants and never emit a pixel outside the
/// window.
pub trait FragmentShader: Sized {
    /// How many scalar parameters the program interpolates. At most
    /// `MAX_PARAMS`, enforced when the program is bound.
    const PARAMS_COUNT: usize;

    fn draw_pixel(window: &RasterWindow, p: &PixelInterpolant);

    /// Fill the span `[x1, x2)` on scanline `y`.
    fn draw_span(window: &RasterWindow, tri: &TriangleEquation, x1: i32, y: i32, x2: i32) {
        let xf = x1 as f32 + 0.5;
        let yf = y as f32 + 0.5;

        let mut p = PixelInterpolant::new(tri, xf, yf, Self::PARAMS_COUNT);
        p.y = y;

        let mut x = x1;
        while x < x2 {
            p.x = x;
            Self::draw_pixel(window, &p);
            p.step_x(tri, Self::PARAMS_COUNT, 1.0);
            x += 1;
        }
    }

    /// Fill the block whose top-left pixel is `(x, y)`.
    ///
    /// `TEST_EDGES` is false for blocks known to be fully covered, in
    /// which case only the window bounds filter pixels; partial blocks
    /// re-test the three edges per pixel.
    fn draw_block<const TEST_EDGES: bool>(window: &RasterWindow, tri: &TriangleEquation, x: i32, y: i32) {
        let xf = x as f32 + 0.5;
        let yf = y as f32 + 0.5;

        let mut pixel = PixelInterpolant::new(tri, xf, yf, Self::PARAMS_COUNT);
        let mut evals = EdgeEvals::new(tri, xf, yf);

        for i in y..y + BLOCK_SIZE as i32 {
            let mut row_pixel = pixel;
            let mut row_evals = evals;

            for j in x..x + BLOCK_SIZE as i32 {
                if (!TEST_EDGES || row_evals.in_triangle(tri)) && window.contains(j, i) {
                    row_pixel.x = j;
                    row_pixel.y = i;
                    Self::draw_pixel(window, &row_pixel);
                }

                row_pixel.step_x(tri, Self::PARAMS_COUNT, 1.0);
                if TEST_EDGES {
                    row_evals.step_x(tri, 1.0);
                }
            }

            pixel.step_y(tri, Self::PARAMS_COUNT, 1.0);
            if TEST_EDGES {
                evals.step_y(tri, 1.0);
            }
        }
    }
}

/// Placeholder program bound until the user installs a real one.
pub struct DummyVertexShader;

impl VertexShader for DummyVertexShader {
    const ATTRIB_COUNT: usize = 0;

    fn process_vertex(_: &VertexInputs) -> ShaderVertex {
        ShaderVertex::default()
    }
}

/// Placeholder program bound until the user installs a real one.
pub struct DummyFragmentShader;

impl FragmentShader for DummyFragmentShader {
    const PARAMS_COUNT: usize = 0;

    fn draw_pixel(_: &RasterWindow, _: &PixelInterpolant) {}
}

// Referencing these consts at the bind sites rejects out-of-range programs
// at compile time.

pub(crate) struct CheckVertexShader<V>(PhantomData<V>);

impl<V: VertexShader> CheckVertexShader<V> {
    pub(crate) const ATTRIBS_IN_RANGE: () =
        assert!(V::ATTRIB_COUNT <= MAX_VERTEX_ATTRIBS, "vertex program binds too many attribute streams");
}

pub(crate) struct CheckFragmentShader<F>(PhantomData<F>);

impl<F: FragmentShader> CheckFragmentShader<F> {
    pub(crate) const PARAMS_IN_RANGE: () =
        assert!(F::PARAMS_COUNT <= MAX_PARAMS, "fragment program declares too many parameters");
}
