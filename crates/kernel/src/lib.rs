//! Walkthrough kernel: the session aggregate and the mechanisms it owns.
//!
//! # Invariants
//! - Pitch is always within [-π/2, π/2].
//! - Colliders are added once, expanded exactly once, never removed.
//! - A blocked move leaves the position bit-for-bit unchanged.
//! - Movement is not simulated before every startup load has completed.
//! - All mutation flows through `Session`; there is no global state.

pub mod audio;
pub mod clock;
pub mod collision;
pub mod controller;
pub mod session;

pub use audio::{AudioSink, SilentAudio};
pub use clock::{AnimationClock, BOB_AMPLITUDE, Clock, DecorativeElement, ManualClock, MonotonicClock, height_of};
pub use collision::{COLLISION_MARGIN, CollisionResolver, CollisionWorld, PROBE_VERTICAL_SCALE, Resolution};
pub use controller::{FirstPersonController, Orientation, StepOutcome};
pub use session::{Decorative, Session, SessionError, SessionSummary};
