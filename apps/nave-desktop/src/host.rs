use nave_input::Key;
use nave_render::{ContentArea, FrameSource, Viewport};
use std::sync::Arc;
use winit::keyboard::KeyCode;
use winit::window::{CursorGrabMode, Window};

/// The window as seen by the frame loop.
pub struct WindowHost {
    window: Arc<Window>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Lock the cursor for relative look, falling back to confining it on
    /// platforms without locking.
    pub fn grab_pointer(&self) {
        let grabbed = self
            .window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("pointer grab unavailable: {e}");
        }
        self.window.set_cursor_visible(false);
    }

    pub fn release_pointer(&self) {
        if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("pointer release failed: {e}");
        }
        self.window.set_cursor_visible(true);
    }
}

impl FrameSource for WindowHost {
    fn request_next_frame(&mut self) {
        self.window.request_redraw();
    }
}

impl ContentArea for WindowHost {
    fn content_size(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width, size.height)
    }
}

pub fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}
