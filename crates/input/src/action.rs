use nave_common::Intent;

/// A high-level action the session knows how to apply.
///
/// Hosts translate their own events into these through the router; the
/// session never sees raw keys or pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Turn by a relative pointer delta in device pixels.
    Look { dx: f32, dy: f32 },
    /// Start moving in a direction (overrides the opposite direction).
    Press(Intent),
    /// Stop moving in a direction if it is the one held.
    Release(Intent),
    /// Flip visibility of every collider debug proxy.
    ToggleColliderDebug,
    /// Pointer capture was engaged.
    CapturePointer,
    /// Pointer capture was released.
    ReleasePointer,
    /// Input with no effect in the current mode.
    Noop,
}

impl Action {
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_is_detected() {
        assert!(Action::Noop.is_noop());
        assert!(!Action::Press(Intent::Forward).is_noop());
    }

    #[test]
    fn look_carries_deltas() {
        let a = Action::Look { dx: 3.0, dy: -2.0 };
        assert!(matches!(a, Action::Look { dx, .. } if dx == 3.0));
    }
}
