use pixels::Pixels;

use crate::events::OFF_SURFACE;
use crate::graphics::{CpuRenderer, Renderer2d};
use crate::surface::{Surface, SurfaceSize};

/// Window presenter built on `pixels`.
///
/// The pixel buffer keeps the logical size the application asked for; the window may be any
/// size and `pixels` scales the buffer to fit, so pointer positions must be mapped back with
/// [`PixelsRenderer2d::window_to_surface`].
pub struct PixelsRenderer2d {
    pixels: Pixels,
    size: SurfaceSize,
}

impl PixelsRenderer2d {
    pub fn new(mut pixels: Pixels, size: SurfaceSize) -> Result<Self, pixels::Error> {
        pixels.resize_buffer(size.width, size.height)?;
        Ok(Self { pixels, size })
    }

    /// Follows a window resize. The drawable buffer keeps its size.
    pub fn resize_window(&mut self, width: u32, height: u32) -> Result<(), pixels::Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    /// Maps a physical window position into buffer pixels; letterbox areas map to
    /// [`OFF_SURFACE`].
    pub fn window_to_surface(&self, position: (f64, f64)) -> (u32, u32) {
        match self
            .pixels
            .window_pos_to_pixel((position.0 as f32, position.1 as f32))
        {
            Ok((x, y)) => (x as u32, y as u32),
            Err(_) => OFF_SURFACE,
        }
    }

    pub fn draw_frame<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut dyn Renderer2d) -> R,
    {
        let size = self.size;
        let mut cpu = CpuRenderer::new(self.pixels.frame_mut(), size);
        f(&mut cpu)
    }
}

impl Surface for PixelsRenderer2d {
    type Error = pixels::Error;

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.pixels.render()
    }
}
