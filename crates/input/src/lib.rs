//! Input: raw host events routed through key bindings and the pointer
//! capture mode into walkthrough actions.
//!
//! # Invariants
//! - The session consumes actions, never raw input events.
//! - Key presses and pointer motion only act while the pointer is captured.
//!   Key releases always act, so no intent can be left stuck on.

pub mod action;
pub mod router;

pub use action::Action;
pub use router::{Binding, InputEvent, InputRouter, Key, KeyBindings};

pub fn crate_info() -> &'static str {
    "nave-input v0.1.0"
}
