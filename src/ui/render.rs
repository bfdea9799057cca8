use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use softbuffer::Surface;
use winit::window::Window;

use crate::error::{Result, ViewerError};
use crate::loader::Texture;
use crate::ui::view::DrawRect;

pub const BG_COLOR: [u8; 3] = [0, 0, 0];

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

// ---------------------------------------------------------------------------
// Renderer identity
// ---------------------------------------------------------------------------

/// Identifies one renderer instance. Textures remember the id they were
/// built for and are never drawn by another renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(u64);

impl RendererId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

// ---------------------------------------------------------------------------
// softbuffer-backed renderer
// ---------------------------------------------------------------------------

pub struct Renderer {
    id: RendererId,
    surface: Surface<Arc<Window>, Arc<Window>>,
    _context: softbuffer::Context<Arc<Window>>,
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

impl Renderer {
    pub fn new(window: &Arc<Window>) -> Result<Self> {
        let context = softbuffer::Context::new(Arc::clone(window))
            .map_err(|e| ViewerError::Window(format!("create context: {}", e)))?;
        let surface = Surface::new(&context, Arc::clone(window))
            .map_err(|e| ViewerError::Window(format!("create surface: {}", e)))?;

        let mut renderer = Self {
            id: RendererId::next(),
            surface,
            _context: context,
        };
        let size = window.inner_size();
        renderer.resize(size.width, size.height)?;
        log::info!("Created renderer {:?}", renderer.id);
        Ok(renderer)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.surface
            .resize(non_zero(width), non_zero(height))
            .map_err(|e| ViewerError::Render(format!("resize surface: {}", e)))
    }

    /// Size the surface to `width` x `height`, hand the framebuffer to
    /// `draw`, then present it.
    pub fn frame<F>(&mut self, width: u32, height: u32, draw: F) -> Result<()>
    where
        F: FnOnce(&mut [u32], u32, u32, RendererId) -> Result<()>,
    {
        let fb_w = width.max(1);
        let fb_h = height.max(1);
        self.resize(fb_w, fb_h)?;
        let id = self.id;
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| ViewerError::Render(format!("acquire buffer: {}", e)))?;
        draw(&mut *buffer, fb_w, fb_h, id)?;
        buffer
            .present()
            .map_err(|e| ViewerError::Render(format!("present: {}", e)))
    }
}

// ---------------------------------------------------------------------------
// Blitting
// ---------------------------------------------------------------------------

/// Nearest-neighbour copy of `src` into the `rect` area of `dst`, clipped
/// to the framebuffer.
pub fn blit_scaled(dst: &mut [u32], dst_w: u32, dst_h: u32, src: &Texture, rect: DrawRect) {
    if rect.width == 0 || rect.height == 0 || src.width == 0 || src.height == 0 {
        return;
    }

    let x0 = rect.x as i64;
    let y0 = rect.y as i64;
    let dx_start = x0.max(0);
    let dy_start = y0.max(0);
    let dx_end = (x0 + rect.width as i64).min(dst_w as i64);
    let dy_end = (y0 + rect.height as i64).min(dst_h as i64);
    if dx_start >= dx_end || dy_start >= dy_end {
        return;
    }

    let sx_scale = src.width as f64 / rect.width as f64;
    let sy_scale = src.height as f64 / rect.height as f64;

    for dy in dy_start..dy_end {
        let sy = (((dy - y0) as f64 + 0.5) * sy_scale) as u32;
        let sy = sy.min(src.height - 1) as usize;
        let src_row = &src.pixels[sy * src.width as usize..(sy + 1) * src.width as usize];
        let dst_row = dy as usize * dst_w as usize;

        for dx in dx_start..dx_end {
            let sx = (((dx - x0) as f64 + 0.5) * sx_scale) as u32;
            let sx = sx.min(src.width - 1) as usize;
            dst[dst_row + dx as usize] = src_row[sx];
        }
    }
}
