//! Point rasterization

use ::framebuffer::RasterWindow;
use ::geometry::ShaderVertex;
use ::raster::interpolant::PixelInterpolant;
use ::shader::FragmentShader;

pub fn draw_point<F>(window: &RasterWindow, v: &ShaderVertex) where F: FragmentShader {
    if !window.contains_f(v.position.x, v.position.y) {
        return;
    }

    let p = PixelInterpolant::from_vertex(v, F::PARAMS_COUNT);
    F::draw_pixel(window, &p);
}
