//! Raster-time state and primitive dispatch

pub mod equation;
pub mod interpolant;
pub mod point;
pub mod line;
pub mod triangle;

use num_cpus;
use scoped_threadpool::Pool;

use ::framebuffer::{FrameBuffer, RasterWindow};
use ::geometry::ShaderVertex;
use ::shader::{FragmentShader, DummyFragmentShader, CheckFragmentShader};

/// Side of the square pixel blocks walked by the edge-equation rasterizer.
pub const BLOCK_SIZE: usize = 8;

/// Strategy used to fill triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriRasterMode {
    /// Flat-top/flat-bottom trapezoid decomposition, one span per scanline
    Scanline,
    /// 8×8 block traversal classified by corner edge tests
    EdgeEquation,
    /// Per-triangle choice between the two from the bounding-box aspect
    Adaptive,
}

/// Owns the render targets, the scissor rectangle, the triangle strategy
/// and the fragment-program dispatch table.
///
/// The fragment program is bound by type; binding monomorphizes the three
/// list-drawing entry points so the per-pixel loops see the program's
/// `PARAMS_COUNT` and `draw_pixel` statically.
pub struct Rasterizer {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,

    framebuffer: FrameBuffer,
    tri_raster_mode: TriRasterMode,

    pool: Option<Pool>,
    threads: u32,

    point_list_fn: fn(&mut Rasterizer, &[ShaderVertex], &[i32]),
    line_list_fn: fn(&mut Rasterizer, &[ShaderVertex], &[i32]),
    tri_list_fn: fn(&mut Rasterizer, &[ShaderVertex], &[i32]),
}

impl Rasterizer {
    /// Create a rasterizer with an empty scissor rect, scanline mode and a
    /// placeholder fragment program.
    pub fn new() -> Rasterizer {
        Rasterizer {
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            framebuffer: FrameBuffer::new(),
            tri_raster_mode: TriRasterMode::Scanline,
            pool: None,
            threads: num_cpus::get() as u32,
            point_list_fn: draw_point_list::<DummyFragmentShader>,
            line_list_fn: draw_line_list::<DummyFragmentShader>,
            tri_list_fn: draw_triangle_list::<DummyFragmentShader>,
        }
    }

    pub fn set_tri_raster_mode(&mut self, mode: TriRasterMode) {
        self.tri_raster_mode = mode;
    }

    /// Install the scissor rectangle. An empty rectangle disables drawing.
    pub fn set_scissor_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.min_x = x;
        self.min_y = y;
        self.max_x = x + width;
        self.max_y = y + height;
    }

    pub fn resize_buffer(&mut self, width: usize, height: usize) {
        self.framebuffer.resize(width, height);
    }

    #[inline]
    pub fn framebuffer(&self) -> &FrameBuffer { &self.framebuffer }

    #[inline]
    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer { &mut self.framebuffer }

    /// Bind a fragment program by type.
    pub fn set_fragment_shader<F>(&mut self) where F: FragmentShader {
        let () = CheckFragmentShader::<F>::PARAMS_IN_RANGE;

        self.point_list_fn = draw_point_list::<F>;
        self.line_list_fn = draw_line_list::<F>;
        self.tri_list_fn = draw_triangle_list::<F>;
    }

    /// Draw every live point in the index list. `-1` entries are skipped.
    pub fn draw_point_list(&mut self, vertices: &[ShaderVertex], indices: &[i32]) {
        (self.point_list_fn)(self, vertices, indices)
    }

    /// Draw every live line in the index list. A pair containing `-1` is
    /// skipped.
    pub fn draw_line_list(&mut self, vertices: &[ShaderVertex], indices: &[i32]) {
        (self.line_list_fn)(self, vertices, indices)
    }

    /// Draw every live triangle in the index list. A triple containing
    /// `-1` is skipped.
    pub fn draw_triangle_list(&mut self, vertices: &[ShaderVertex], indices: &[i32]) {
        (self.tri_list_fn)(self, vertices, indices)
    }

    fn window<'a>(&'a self) -> RasterWindow<'a> {
        self.framebuffer.window(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

fn draw_point_list<F>(rast: &mut Rasterizer, vertices: &[ShaderVertex], indices: &[i32])
    where F: FragmentShader
{
    let window = rast.window();

    if window.is_empty() {
        return;
    }

    for &idx in indices {
        if idx < 0 {
            continue;
        }
        point::draw_point::<F>(&window, &vertices[idx as usize]);
    }
}

fn draw_line_list<F>(rast: &mut Rasterizer, vertices: &[ShaderVertex], indices: &[i32])
    where F: FragmentShader
{
    let window = rast.window();

    if window.is_empty() {
        return;
    }

    for pair in indices.chunks_exact(2) {
        if pair[0] < 0 || pair[1] < 0 {
            continue;
        }
        line::draw_line::<F>(&window, &vertices[pair[0] as usize], &vertices[pair[1] as usize]);
    }
}

/// Triangle lists fan out over horizontal bands of the scissor rect, one
/// raster window per worker. Every worker walks the whole list; its window
/// keeps it inside the rows it owns, so the frame and depth planes are
/// written race-free without any per-pixel locking.
fn draw_triangle_list<F>(rast: &mut Rasterizer, vertices: &[ShaderVertex], indices: &[i32])
    where F: FragmentShader
{
    let rast = &mut *rast;

    let mode = rast.tri_raster_mode;
    let threads = rast.threads;

    let min_x = rast.min_x;
    let max_x = rast.max_x;

    let framebuffer = &rast.framebuffer;

    let window = framebuffer.window(min_x, rast.min_y, max_x, rast.max_y);

    if window.is_empty() {
        return;
    }

    let rows = (window.max_y() - window.min_y()) as u32;
    let bands = threads.min(rows);

    if bands <= 1 {
        draw_triangles_in_window::<F>(&window, mode, vertices, indices);
        return;
    }

    let chunk = ((rows + bands - 1) / bands) as i32;

    let pool = rast.pool.get_or_insert_with(|| Pool::new(threads));

    pool.scoped(|scope| {
        let mut band_start = window.min_y();

        while band_start < window.max_y() {
            let band_end = (band_start + chunk).min(window.max_y());
            let band = framebuffer.window(min_x, band_start, max_x, band_end);

            scope.execute(move || {
                draw_triangles_in_window::<F>(&band, mode, vertices, indices);
            });

            band_start = band_end;
        }
    });
}

fn draw_triangles_in_window<F>(window: &RasterWindow,
                               mode: TriRasterMode,
                               vertices: &[ShaderVertex],
                               indices: &[i32])
    where F: FragmentShader
{
    for tri in indices.chunks_exact(3) {
        if tri[0] < 0 || tri[1] < 0 || tri[2] < 0 {
            continue;
        }

        triangle::draw_triangle::<F>(window,
                                     mode,
                                     &vertices[tri[0] as usize],
                                     &vertices[tri[1] as usize],
                                     &vertices[tri[2] as usize]);
    }
}
