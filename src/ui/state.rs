use std::collections::HashSet;
use std::time::Duration;
use winit::keyboard::NamedKey;

use crate::error::Result;
use crate::files::{find_next, find_previous};
use crate::loader::ImageHandle;
use crate::timer::FrameTimer;
use crate::ui::render::{blit_scaled, rgb, RendererId, BG_COLOR};
use crate::ui::view::ViewTransform;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Target frame time, roughly 60 Hz.
pub const FRAME_BUDGET: Duration = Duration::from_millis(17);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

pub struct ViewerState {
    pub image: ImageHandle,
    pub view: ViewTransform,
    pub timer: FrameTimer,
    /// Set when the image or the window size changed; the next frame
    /// re-fits the image.
    pub needs_reset: bool,

    pub dragging: bool,
    pub mouse_pos: Option<(f64, f64)>,

    // Keys that were pressed since the last frame
    pub keys_pressed: HashSet<NamedKey>,

    // Mouse wheel accumulator for this frame
    pub wheel_y: f32,

    // Last drawn sizes, for the title
    pub window_size: (u32, u32),
    pub image_size: Option<(u32, u32)>,
}

impl ViewerState {
    pub fn new(image: ImageHandle) -> Self {
        Self {
            image,
            view: ViewTransform::new(),
            timer: FrameTimer::new(),
            needs_reset: true,
            dragging: false,
            mouse_pos: None,
            keys_pressed: HashSet::new(),
            wheel_y: 0.0,
            window_size: (0, 0),
            image_size: None,
        }
    }

    pub fn is_key_pressed_named(&self, k: NamedKey) -> bool {
        self.keys_pressed.contains(&k)
    }

    /// The view re-fits to the new window size on the next frame.
    pub fn window_resized(&mut self) {
        self.needs_reset = true;
    }

    /// Pans by the motion since the last cursor position while dragging.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if self.dragging {
            if let Some((px, py)) = self.mouse_pos {
                self.view.drag(x - px, y - py);
            }
        }
        self.mouse_pos = Some((x, y));
    }

    /// Replace the image with its previous/next sibling, if there is one.
    pub fn navigate(&mut self, direction: Direction) -> Result<()> {
        if self.image.is_empty() {
            return Ok(());
        }
        let current = self.image.path()?.to_path_buf();
        let target = match direction {
            Direction::Previous => find_previous(&current),
            Direction::Next => find_next(&current),
        };

        match target {
            Some(path) => {
                log::debug!("[nav] {} -> {}", current.display(), path.display());
                self.image.assign(path);
                self.needs_reset = true;
            }
            None => log::debug!("[nav] no {:?} image for {}", direction, current.display()),
        }
        Ok(())
    }

    /// Run the per-frame input logic. Returns true if the app should quit.
    pub fn update(&mut self) -> Result<bool> {
        if self.is_key_pressed_named(NamedKey::Escape) {
            return Ok(true);
        }

        if self.is_key_pressed_named(NamedKey::ArrowLeft) {
            self.navigate(Direction::Previous)?;
        } else if self.is_key_pressed_named(NamedKey::ArrowRight) {
            self.navigate(Direction::Next)?;
        }

        if self.wheel_y != 0.0 {
            self.view.scroll(self.wheel_y as f64);
        }

        // Clear per-frame input state
        self.keys_pressed.clear();
        self.wheel_y = 0.0;

        Ok(false)
    }

    /// Render into the softbuffer framebuffer (u32 per pixel, 0x00RRGGBB).
    pub fn render(
        &mut self,
        frame: &mut [u32],
        fb_w: u32,
        fb_h: u32,
        renderer: RendererId,
    ) -> Result<()> {
        frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
        self.window_size = (fb_w, fb_h);

        if self.image.is_empty() {
            self.image_size = None;
            return Ok(());
        }

        let texture = self.image.texture(renderer)?;
        let image_size = texture.size();
        if self.needs_reset {
            self.view.reset(self.window_size, image_size)?;
            self.needs_reset = false;
            log::debug!("View reset to zoom {:.3}", self.view.zoom());
        }

        let rect = self.view.layout(self.window_size, image_size)?;
        blit_scaled(frame, fb_w, fb_h, texture, rect);
        self.image_size = Some(image_size);
        Ok(())
    }

    pub fn title(&self) -> String {
        let (w, h) = self.window_size;
        let (iw, ih) = self.image_size.unwrap_or((0, 0));
        let name = self
            .image
            .path()
            .ok()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "PhotoViewer {}x{} {:.1}FPS :: {} {} x {}",
            w,
            h,
            self.timer.fps(),
            name,
            iw,
            ih
        )
    }

    /// Record the frame and return how long to idle before the next one.
    pub fn end_frame(&mut self) -> Duration {
        self.timer.tick();
        self.timer.idle_time(FRAME_BUDGET)
    }
}
