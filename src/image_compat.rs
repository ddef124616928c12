//! Interop with the `image` crate

use image::{Rgb, RgbImage};

use ::framebuffer::FrameBuffer;

/// Copy the packed color plane into an `RgbImage`, dropping the reserved
/// high byte.
pub fn to_rgb_image(framebuffer: &FrameBuffer) -> RgbImage {
    RgbImage::from_fn(framebuffer.width() as u32, framebuffer.height() as u32, |x, y| {
        let color = framebuffer.pixel(x as usize, y as usize);

        Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
    })
}
