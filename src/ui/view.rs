use crate::error::{Result, ViewerError};

pub const MAX_ZOOM: f64 = 20.0;
/// Fraction of the current zoom added per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Destination rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// A zero-sized window axis counts as one pixel.
fn window_extent(window: (u32, u32)) -> (f64, f64) {
    (window.0.max(1) as f64, window.1.max(1) as f64)
}

/// Largest zoom, capped at 1.0, at which the whole image fits the window.
pub fn fit_zoom(window: (u32, u32), image: (u32, u32)) -> Result<f64> {
    let (iw, ih) = image;
    if iw == 0 || ih == 0 {
        return Err(ViewerError::InvalidDimensions {
            width: iw,
            height: ih,
        });
    }
    let (w, h) = window_extent(window);
    Ok((w / iw as f64).min(h / ih as f64).min(1.0))
}

fn clamp_axis(offset: f64, scaled: f64, window: f64) -> f64 {
    if scaled <= window {
        return 0.0;
    }
    let bound = scaled / 2.0 - window / 2.0;
    if offset.is_nan() {
        0.0
    } else {
        offset.clamp(-bound, bound)
    }
}

/// Zoom and pan state. Input is accumulated unclamped through `scroll` and
/// `drag`; `clamp` (and `layout`, which calls it) brings the state back
/// within bounds for the current window and image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[cfg(test)]
    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    /// Positive `amount` zooms in. One notch changes zoom by 10% of itself.
    pub fn scroll(&mut self, amount: f64) {
        if amount.is_finite() {
            self.zoom += amount * self.zoom * WHEEL_ZOOM_STEP;
        }
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.offset_x += dx;
            self.offset_y += dy;
        }
    }

    /// Back to zoom 1 with no offset, shrunk to fit if the image overflows.
    pub fn reset(&mut self, window: (u32, u32), image: (u32, u32)) -> Result<()> {
        *self = Self::default();
        self.zoom = fit_zoom(window, image)?;
        self.clamp(window, image)
    }

    pub fn clamp(&mut self, window: (u32, u32), image: (u32, u32)) -> Result<()> {
        let fit = fit_zoom(window, image)?;
        // Written so that NaN also falls back to the fit zoom.
        if !(self.zoom >= fit) {
            self.zoom = fit;
        }
        self.zoom = self.zoom.min(MAX_ZOOM);

        let (w, h) = window_extent(window);
        self.offset_x = clamp_axis(self.offset_x, image.0 as f64 * self.zoom, w);
        self.offset_y = clamp_axis(self.offset_y, image.1 as f64 * self.zoom, h);
        Ok(())
    }

    /// Clamp, then place the scaled image centered in the window plus offset.
    pub fn layout(&mut self, window: (u32, u32), image: (u32, u32)) -> Result<DrawRect> {
        self.clamp(window, image)?;

        // Integer window center, so odd sizes round toward the top-left.
        let cx = (window.0.max(1) / 2) as f64;
        let cy = (window.1.max(1) / 2) as f64;
        let w = image.0 as f64 * self.zoom;
        let h = image.1 as f64 * self.zoom;
        let x = cx - w / 2.0 + self.offset_x;
        let y = cy - h / 2.0 + self.offset_y;

        Ok(DrawRect {
            x: x.floor() as i32,
            y: y.floor() as i32,
            width: w.floor() as u32,
            height: h.floor() as u32,
        })
    }
}
