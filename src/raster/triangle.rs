//! Triangle rasterization: scanline decomposition, edge-equation block
//! traversal, and the adaptive selector between them

use std::mem;

use ::framebuffer::RasterWindow;
use ::geometry::ShaderVertex;
use ::raster::{TriRasterMode, BLOCK_SIZE};
use ::raster::equation::{TriangleEquation, EdgeEvals};
use ::shader::FragmentShader;
use ::utils::clamp;

pub fn draw_triangle<F>(window: &RasterWindow,
                        mode: TriRasterMode,
                        v0: &ShaderVertex,
                        v1: &ShaderVertex,
                        v2: &ShaderVertex)
    where F: FragmentShader
{
    match mode {
        TriRasterMode::Scanline => scanline::<F>(window, v0, v1, v2),
        TriRasterMode::EdgeEquation => edge_equation::<F>(window, v0, v1, v2),
        TriRasterMode::Adaptive => {
            let box_width = v0.position.x.max(v1.position.x).max(v2.position.x)
                - v0.position.x.min(v1.position.x).min(v2.position.x);
            let box_height = v0.position.y.max(v1.position.y).max(v2.position.y)
                - v0.position.y.min(v1.position.y).min(v2.position.y);

            match select_adaptive(box_width, box_height) {
                TriRasterMode::EdgeEquation => edge_equation::<F>(window, v0, v1, v2),
                _ => scanline::<F>(window, v0, v1, v2),
            }
        }
    }
}

/// Pick the strategy for a triangle from its bounding-box aspect ratio.
///
/// Near-square boxes go to the block walker for locality; long thin ones
/// would touch many mostly-empty blocks and go to the scanline fill.
pub fn select_adaptive(box_width: f32, box_height: f32) -> TriRasterMode {
    let orient = box_width / box_height;

    if orient > 0.4 && orient < 1.6 {
        TriRasterMode::EdgeEquation
    } else {
        TriRasterMode::Scanline
    }
}

fn scanline<F>(window: &RasterWindow, v0: &ShaderVertex, v1: &ShaderVertex, v2: &ShaderVertex)
    where F: FragmentShader
{
    let tri = TriangleEquation::new(v0, v1, v2, F::PARAMS_COUNT);

    if tri.area_twifold <= 0.0 {
        return;
    }

    let mut top = v0;
    let mut middle = v1;
    let mut bottom = v2;

    // Sort so that top has the largest y and bottom the smallest.
    if top.position.y < middle.position.y { mem::swap(&mut top, &mut middle); }
    if middle.position.y < bottom.position.y { mem::swap(&mut middle, &mut bottom); }
    if top.position.y < middle.position.y { mem::swap(&mut top, &mut middle); }

    let dy = bottom.position.y - top.position.y;
    let iy = middle.position.y - top.position.y;

    if middle.position.y == top.position.y {
        let (left, right) = if middle.position.x <= top.position.x {
            (middle, top)
        } else {
            (top, middle)
        };
        top_flat::<F>(window, &tri, left, right, bottom);
    } else if middle.position.y == bottom.position.y {
        let (left, right) = if middle.position.x <= bottom.position.x {
            (middle, bottom)
        } else {
            (bottom, middle)
        };
        bottom_flat::<F>(window, &tri, top, left, right);
    } else {
        // Split on the long edge at middle's scanline; the fourth vertex
        // interpolates in (1/w, z/w, params/w) space and recovers w.
        let mut v4 = ShaderVertex::default();
        v4.position.y = middle.position.y;
        v4.position.x = top.position.x + (bottom.position.x - top.position.x) / dy * iy;

        let invw = 1.0 / top.position.w
            + (1.0 / bottom.position.w - 1.0 / top.position.w) / dy * iy;
        v4.position.w = 1.0 / invw;

        let zdw = top.position.z / top.position.w
            + (bottom.position.z / bottom.position.w - top.position.z / top.position.w) / dy * iy;
        v4.position.z = zdw * v4.position.w;

        for i in 0..F::PARAMS_COUNT {
            let pdw = top.params[i] / top.position.w
                + (bottom.params[i] / bottom.position.w - top.params[i] / top.position.w) / dy * iy;
            v4.params[i] = pdw * v4.position.w;
        }

        let (left, right) = if middle.position.x <= v4.position.x {
            (middle, &v4)
        } else {
            (&v4, middle)
        };

        bottom_flat::<F>(window, &tri, top, left, right);
        top_flat::<F>(window, &tri, left, right, bottom);
    }
}

/// Fill the half whose flat edge is at the bottom; `v0` is the apex above
/// `v1` (left) and `v2` (right).
fn bottom_flat<F>(window: &RasterWindow,
                  tri: &TriangleEquation,
                  v0: &ShaderVertex,
                  v1: &ShaderVertex,
                  v2: &ShaderVertex)
    where F: FragmentShader
{
    let invslope1 = (v1.position.x - v0.position.x) / (v1.position.y - v0.position.y);
    let invslope2 = (v2.position.x - v0.position.x) / (v2.position.y - v0.position.y);

    let mut y = (v0.position.y - 0.5) as i32;
    let y_end = ((v1.position.y - 0.5) as i32).max(window.min_y() - 1);

    if y >= window.max_y() {
        y = window.max_y() - 1;
    }

    while y > y_end {
        let dy = (y as f32 - v0.position.y) + 0.5;
        let curx1 = v0.position.x + invslope1 * dy + 0.5;
        let curx2 = v0.position.x + invslope2 * dy + 0.5;

        let left_x = clamp(curx1 as i32, window.min_x(), window.max_x());
        let right_x = clamp(curx2 as i32, window.min_x(), window.max_x());

        F::draw_span(window, tri, left_x, y, right_x);

        y -= 1;
    }
}

/// Fill the half whose flat edge is at the top; `v0` (left) and `v1`
/// (right) sit above the apex `v2`.
fn top_flat<F>(window: &RasterWindow,
               tri: &TriangleEquation,
               v0: &ShaderVertex,
               v1: &ShaderVertex,
               v2: &ShaderVertex)
    where F: FragmentShader
{
    let invslope1 = (v2.position.x - v0.position.x) / (v2.position.y - v0.position.y);
    let invslope2 = (v2.position.x - v1.position.x) / (v2.position.y - v1.position.y);

    let mut y = (v2.position.y + 0.5) as i32;
    let mut y_end = (v0.position.y + 0.5) as i32;

    if y < window.min_y() {
        y = window.min_y();
    }
    if y_end > window.max_y() {
        y_end = window.max_y();
    }

    while y < y_end {
        let dy = (y as f32 - v2.position.y) + 0.5;
        let curx1 = v2.position.x + invslope1 * dy + 0.5;
        let curx2 = v2.position.x + invslope2 * dy + 0.5;

        let left_x = clamp(curx1 as i32, window.min_x(), window.max_x());
        let right_x = clamp(curx2 as i32, window.min_x(), window.max_x());

        F::draw_span(window, tri, left_x, y, right_x);

        y += 1;
    }
}

fn edge_equation<F>(window: &RasterWindow, v0: &ShaderVertex, v1: &ShaderVertex, v2: &ShaderVertex)
    where F: FragmentShader
{
    let tri = TriangleEquation::new(v0, v1, v2, F::PARAMS_COUNT);

    if tri.area_twifold <= 0.0 {
        return;
    }

    let block = BLOCK_SIZE as i32;

    let min_x = v0.position.x.min(v1.position.x).min(v2.position.x);
    let max_x = v0.position.x.max(v1.position.x).max(v2.position.x);
    let min_y = v0.position.y.min(v1.position.y).min(v2.position.y);
    let max_y = v0.position.y.max(v1.position.y).max(v2.position.y);

    // Clip the bounding box to the window, then snap it to the block grid.
    let box_min_x = clamp(min_x as i32, window.min_x(), window.max_x()) & !(block - 1);
    let box_max_x = clamp(max_x as i32, window.min_x(), window.max_x()) & !(block - 1);
    let box_min_y = clamp(min_y as i32, window.min_y(), window.max_y()) & !(block - 1);
    let box_max_y = clamp(max_y as i32, window.min_y(), window.max_y()) & !(block - 1);

    let s = (block - 1) as f32;

    let mut y = box_min_y;
    while y <= box_max_y {
        let mut x = box_min_x;
        while x <= box_max_x {
            // Sample the four block corners at pixel centers.
            let xf = x as f32 + 0.5;
            let yf = y as f32 + 0.5;

            let e00 = EdgeEvals::new(&tri, xf, yf);

            let mut e01 = e00;
            e01.step_y(&tri, s);

            let mut e10 = e00;
            e10.step_x(&tri, s);

            let mut e11 = e01;
            e11.step_x(&tri, s);

            if e00.in_triangle(&tri) && e01.in_triangle(&tri) &&
               e10.in_triangle(&tri) && e11.in_triangle(&tri) {
                // Fully covered.
                F::draw_block::<false>(window, &tri, x, y);
            } else {
                // Partially covered, or touching the box without any
                // covered corner.
                F::draw_block::<true>(window, &tri, x, y);
            }

            x += block;
        }
        y += block;
    }
}
