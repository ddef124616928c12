//! Line rasterization with Bresenham's algorithm

use std::mem;

use ::framebuffer::RasterWindow;
use ::geometry::ShaderVertex;
use ::raster::interpolant::PixelInterpolant;
use ::shader::FragmentShader;

/// Walk the line in its major axis, stepping the minor axis whenever the
/// decision variable flips. Interpolation uses the traversal ratio rather
/// than the decision variable, lerping in `(1/w, z/w, params/w)` space and
/// recovering the perspective-correct values per pixel.
pub fn draw_line<F>(window: &RasterWindow, v0: &ShaderVertex, v1: &ShaderVertex) where F: FragmentShader {
    let mut dx = (v1.position.x - v0.position.x) as i32;
    let mut dy = (v1.position.y - v0.position.y) as i32;

    let mut start = v0;
    let mut end = v1;

    let absdx = dx.abs();
    let absdy = dy.abs();

    let horizontal = absdx > absdy;

    let steps;
    let mut pk;

    if horizontal {
        steps = absdx;
        if dx < 0 {
            dx = -dx;
            dy = -dy;
            mem::swap(&mut start, &mut end);
        }
        pk = 2 * absdy - absdx;
    } else {
        steps = absdy;
        if dy < 0 {
            dx = -dx;
            dy = -dy;
            mem::swap(&mut start, &mut end);
        }
        pk = 2 * absdx - absdy;
    }

    let mut x = start.position.x as i32;
    let mut y = start.position.y as i32;

    let mut p = PixelInterpolant::between(start, end, 0.0, F::PARAMS_COUNT);
    p.x = x;
    p.y = y;
    if window.contains(x, y) {
        F::draw_pixel(window, &p);
    }

    for i in 0..steps {
        if horizontal {
            x += 1;
            if pk > 0 {
                if dy > 0 { y += 1 } else { y -= 1 }
                pk += 2 * absdy - 2 * absdx;
            } else {
                pk += 2 * absdy;
            }
        } else {
            y += 1;
            if pk > 0 {
                if dx > 0 { x += 1 } else { x -= 1 }
                pk += 2 * absdx - 2 * absdy;
            } else {
                pk += 2 * absdx;
            }
        }

        let ratio = i as f32 / steps as f32;
        let mut p = PixelInterpolant::between(start, end, ratio, F::PARAMS_COUNT);
        p.x = x;
        p.y = y;
        if window.contains(x, y) {
            F::draw_pixel(window, &p);
        }
    }
}
