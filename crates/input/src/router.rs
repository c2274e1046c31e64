use nave_common::Intent;
use std::collections::HashMap;

use crate::action::Action;

/// Host-independent key identity. Hosts map their own key codes onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    E,
    Escape,
    Other,
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Move(Intent),
    ToggleColliderDebug,
    ExitCapture,
}

/// Key → binding table.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Key, Binding>,
}

impl Default for KeyBindings {
    /// WASD to walk, E to toggle collider proxies, Escape to release the
    /// pointer.
    fn default() -> Self {
        let map = HashMap::from([
            (Key::W, Binding::Move(Intent::Forward)),
            (Key::S, Binding::Move(Intent::Back)),
            (Key::A, Binding::Move(Intent::Left)),
            (Key::D, Binding::Move(Intent::Right)),
            (Key::E, Binding::ToggleColliderDebug),
            (Key::Escape, Binding::ExitCapture),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn get(&self, key: Key) -> Option<Binding> {
        self.map.get(&key).copied()
    }

    pub fn bind(&mut self, key: Key, binding: Binding) {
        self.map.insert(key, binding);
    }
}

/// Raw events a host delivers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Relative pointer motion in device pixels.
    PointerMotion { dx: f32, dy: f32 },
    /// Primary click anywhere in the view.
    Click,
    /// The host dropped pointer capture (focus loss, browser exit gesture).
    CaptureLost,
}

/// Turns raw events into actions, tracking the pointer capture mode.
///
/// Capture is a binary mode: a click engages it, Escape or the host
/// releases it.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    bindings: KeyBindings,
    captured: bool,
}

impl InputRouter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            captured: false,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn route(&mut self, event: InputEvent) -> Action {
        match event {
            InputEvent::Click if !self.captured => {
                self.captured = true;
                tracing::debug!("pointer captured");
                Action::CapturePointer
            }
            InputEvent::Click => Action::Noop,
            InputEvent::CaptureLost => self.release_capture(),
            InputEvent::PointerMotion { dx, dy } if self.captured => Action::Look { dx, dy },
            InputEvent::PointerMotion { .. } => Action::Noop,
            InputEvent::KeyDown(key) => {
                if !self.captured {
                    return Action::Noop;
                }
                match self.bindings.get(key) {
                    Some(Binding::Move(intent)) => Action::Press(intent),
                    Some(Binding::ToggleColliderDebug) => Action::ToggleColliderDebug,
                    Some(Binding::ExitCapture) => self.release_capture(),
                    None => Action::Noop,
                }
            }
            InputEvent::KeyUp(key) => match self.bindings.get(key) {
                Some(Binding::Move(intent)) => Action::Release(intent),
                _ => Action::Noop,
            },
        }
    }

    fn release_capture(&mut self) -> Action {
        if !self.captured {
            return Action::Noop;
        }
        self.captured = false;
        tracing::debug!("pointer released");
        Action::ReleasePointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured_router() -> InputRouter {
        let mut r = InputRouter::default();
        assert_eq!(r.route(InputEvent::Click), Action::CapturePointer);
        r
    }

    #[test]
    fn presses_ignored_until_captured() {
        let mut r = InputRouter::default();
        assert_eq!(r.route(InputEvent::KeyDown(Key::W)), Action::Noop);
        assert_eq!(r.route(InputEvent::PointerMotion { dx: 1.0, dy: 1.0 }), Action::Noop);
    }

    #[test]
    fn wasd_maps_to_intents() {
        let mut r = captured_router();
        assert_eq!(r.route(InputEvent::KeyDown(Key::W)), Action::Press(Intent::Forward));
        assert_eq!(r.route(InputEvent::KeyDown(Key::S)), Action::Press(Intent::Back));
        assert_eq!(r.route(InputEvent::KeyDown(Key::A)), Action::Press(Intent::Left));
        assert_eq!(r.route(InputEvent::KeyDown(Key::D)), Action::Press(Intent::Right));
        assert_eq!(r.route(InputEvent::KeyDown(Key::E)), Action::ToggleColliderDebug);
        assert_eq!(r.route(InputEvent::KeyDown(Key::Other)), Action::Noop);
    }

    #[test]
    fn releases_apply_without_capture() {
        let mut r = captured_router();
        r.route(InputEvent::KeyDown(Key::W));
        assert_eq!(r.route(InputEvent::CaptureLost), Action::ReleasePointer);
        assert_eq!(r.route(InputEvent::KeyUp(Key::W)), Action::Release(Intent::Forward));
    }

    #[test]
    fn motion_becomes_look_while_captured() {
        let mut r = captured_router();
        assert_eq!(
            r.route(InputEvent::PointerMotion { dx: 4.0, dy: -2.0 }),
            Action::Look { dx: 4.0, dy: -2.0 }
        );
    }

    #[test]
    fn escape_exits_capture_once() {
        let mut r = captured_router();
        assert_eq!(r.route(InputEvent::KeyDown(Key::Escape)), Action::ReleasePointer);
        assert!(!r.is_captured());
        assert_eq!(r.route(InputEvent::CaptureLost), Action::Noop);
        assert_eq!(r.route(InputEvent::Click), Action::CapturePointer);
        assert_eq!(r.route(InputEvent::Click), Action::Noop);
    }

    #[test]
    fn rebinding_changes_mapping() {
        let mut bindings = KeyBindings::default();
        bindings.bind(Key::Other, Binding::Move(Intent::Forward));
        let mut r = InputRouter::new(bindings);
        r.route(InputEvent::Click);
        assert_eq!(r.route(InputEvent::KeyDown(Key::Other)), Action::Press(Intent::Forward));
    }
}
