//! Startup streaming: tracks outstanding asynchronous asset loads and the
//! one-shot readiness transition they gate.
//!
//! # Invariants
//! - The gate is passive state. Readiness is polled by the frame loop,
//!   never pushed.
//! - Load tasks run on their own threads but their results are only
//!   delivered when the owner drains them, so consumers see a single writer.
//! - Failed or stalled loads never complete the gate; they are reported.

mod gate;
mod tracker;

pub use gate::{GateError, LoadGate};
pub use tracker::{LoadCompletion, LoadFailure, LoadTracker};

pub fn crate_info() -> &'static str {
    "nave-stream v0.1.0"
}
