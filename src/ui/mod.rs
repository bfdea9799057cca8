use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

use crate::error::{Result, ViewerError};
use crate::ui::render::Renderer;
use crate::ui::state::ViewerState;

pub mod render;
pub mod state;
pub mod view;

/// Lower bound for the initial window size on either axis.
pub const MIN_WINDOW_SIZE: u32 = 200;

pub fn initial_window_size(image: (u32, u32)) -> (u32, u32) {
    (image.0.max(MIN_WINDOW_SIZE), image.1.max(MIN_WINDOW_SIZE))
}

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub state: ViewerState,
    pub initial_size: (u32, u32),
    pub window: Option<Arc<Window>>,
    pub renderer: Option<Renderer>,
    pub next_redraw: Option<Instant>,
    /// First fatal error; the event loop exits once it is set.
    pub error: Option<ViewerError>,
    title: String,
}

impl App {
    pub fn new(state: ViewerState, initial_size: (u32, u32)) -> Self {
        Self {
            state,
            initial_size,
            window: None,
            renderer: None,
            next_redraw: None,
            error: None,
            title: String::new(),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (w, h) = self.initial_size;
        let attrs = Window::default_attributes()
            .with_title("PhotoViewer loading...")
            .with_inner_size(PhysicalSize::new(w, h));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| ViewerError::Window(format!("create window: {}", e)))?,
        );
        let renderer = Renderer::new(&window)?;
        log::info!("Created {}x{} window", w, h);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    /// One iteration: input, view transform, draw, title, pacing.
    /// Returns true if the app should quit.
    fn redraw(&mut self) -> Result<bool> {
        if self.state.update()? {
            return Ok(true);
        }

        let (Some(window), Some(renderer)) = (self.window.as_ref(), self.renderer.as_mut()) else {
            return Ok(false);
        };
        let size = window.inner_size();
        let state = &mut self.state;
        renderer.frame(size.width, size.height, |frame, fb_w, fb_h, id| {
            state.render(frame, fb_w, fb_h, id)
        })?;

        let title = state.title();
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }

        let idle = state.end_frame();
        self.next_redraw = Some(Instant::now() + idle);
        Ok(false)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(_) => {
                self.state.window_resized();
                if let Some(ref window) = self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Key::Named(named) = event.logical_key {
                        self.state.keys_pressed.insert(named);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.state.dragging = state == ElementState::Pressed;
                }
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.state.cursor_moved(x, y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.state.mouse_pos = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 / 40.0,
                };
                self.state.wheel_y += y;
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(true) => event_loop.exit(),
                Ok(false) => {}
                Err(e) => self.fail(event_loop, e),
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(when) = self.next_redraw {
            if Instant::now() >= when {
                self.next_redraw = None;
                if let Some(ref window) = self.window {
                    window.request_redraw();
                }
            } else {
                event_loop.set_control_flow(ControlFlow::WaitUntil(when));
            }
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_window_size_has_minimum() {
        assert_eq!(initial_window_size((50, 80)), (200, 200));
        assert_eq!(initial_window_size((640, 120)), (640, 200));
        assert_eq!(initial_window_size((1024, 768)), (1024, 768));
    }
}
