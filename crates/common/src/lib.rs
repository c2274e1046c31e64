//! Shared types for the walkthrough: bounding volumes, placements, movement
//! intents and session configuration.
//!
//! # Invariants
//! - `Aabb` containment is inclusive on all six faces.
//! - Opposing movement intents on one axis are never active together.

pub mod config;
pub mod intent;
pub mod types;

pub use config::{ConfigError, WalkConfig};
pub use intent::{AxisLatch, AxisState, Intent, MovementIntents};
pub use types::{Aabb, Transform};
