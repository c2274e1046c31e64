//! Rendering adapter and the frame loop.
//!
//! # Invariants
//! - Renderers read a [`FrameView`] and never mutate session state.
//! - Every tick runs the same fixed sequence and renders exactly one frame.
//! - The loop never stops itself; the host decides when to stop calling it.
//!
//! [`DebugTextRenderer`] renders a frame as text for the CLI and tests. GPU
//! backends implement the same [`Renderer`] trait.

mod frame_loop;
mod renderer;
mod timer;
mod view;

pub use frame_loop::{ContentArea, FrameSource, HeadlessHost, RenderLoop, TickReport};
pub use renderer::{DebugTextRenderer, NullRenderer, Renderer};
pub use timer::FrameTimer;
pub use view::{CameraView, FrameView, Projection, Viewport};

pub fn crate_info() -> &'static str {
    "nave-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
