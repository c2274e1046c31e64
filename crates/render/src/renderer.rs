use std::fmt::Write;

use crate::view::{FrameView, Viewport};

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer reads a [`FrameView`] and produces output. It never mutates
/// the session.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Called every tick before `render` with the current content size.
    fn resize(&mut self, _viewport: Viewport) {}

    /// Render one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Self::Output;
}

/// Draws nothing. Keeps the loop ticking while the host has no surface,
/// e.g. a minimized window.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    type Output = ();

    fn render(&mut self, _frame: &FrameView<'_>) {}
}

/// Renders a frame as a human-readable summary.
///
/// Used by the CLI, by logging, and to test the render interface without a
/// GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include one line per collider when proxies are visible.
    pub list_colliders: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collider_listing(mut self) -> Self {
        self.list_colliders = true;
        self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &FrameView<'_>) -> String {
        let mut out = String::new();
        let e = frame.camera.eye;
        let f = frame.camera.forward();
        let _ = writeln!(
            out,
            "=== Frame {} (t={:.2}s{}) ===",
            frame.tick,
            frame.elapsed,
            if frame.ready { ", ready" } else { ", loading" }
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) forward=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            e.x, e.y, e.z, f.x, f.y, f.z, frame.projection.fov_degrees, frame.projection.aspect
        );
        let _ = writeln!(
            out,
            "Viewport: {}x{}",
            frame.viewport.width, frame.viewport.height
        );
        let _ = writeln!(
            out,
            "Props: {}  Candles: {}  Colliders: {}{}",
            frame.props.len(),
            frame.decoratives.len(),
            frame.colliders.len(),
            if frame.colliders_visible { " (shown)" } else { "" }
        );

        if self.list_colliders && frame.colliders_visible {
            for (i, b) in frame.colliders.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  [{i:>3}] min=({:.2}, {:.2}, {:.2}) max=({:.2}, {:.2}, {:.2})",
                    b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
                );
            }
        }
        out
    }
}
