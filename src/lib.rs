extern crate nalgebra;
extern crate num_cpus;
extern crate num_traits;
extern crate scoped_threadpool;
extern crate smallvec;

#[cfg(feature = "image_compat")]
extern crate image;

pub mod utils;
pub mod geometry;
pub mod clipper;
pub mod framebuffer;
pub mod shader;
pub mod raster;
pub mod renderer;

#[cfg(feature = "image_compat")]
pub mod image_compat;

pub use geometry::{ShaderVertex, CullMode, MAX_PARAMS};
pub use framebuffer::{FrameBuffer, RasterWindow};
pub use shader::{VertexShader, FragmentShader, VertexInputs, AttribPointer, MAX_VERTEX_ATTRIBS};
pub use raster::{Rasterizer, TriRasterMode, BLOCK_SIZE};
pub use raster::equation::{EdgeEquation, ParameterEquation, TriangleEquation, EdgeEvals};
pub use raster::interpolant::PixelInterpolant;
pub use renderer::{Renderer, Primitive};
