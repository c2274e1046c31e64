//! wgpu render backend for the walkthrough.
//!
//! Draws every prop and candle as a lit box fitted to its mesh bounds, and
//! the collision volumes as wireframes while they are toggled visible.
//!
//! # Invariants
//! - The renderer only reads the frame it is given.
//! - Candle boxes are drawn at the height computed for the current tick.

mod gpu;
mod instances;
mod shaders;

pub use gpu::{DrawStats, SurfaceTarget, WgpuRenderer};
pub use instances::{InstanceData, LineVertex, build_instances, collider_lines};
