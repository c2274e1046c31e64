use glam::{Quat, Vec3};
use nave_common::{AxisState, MovementIntents};
use std::f32::consts::FRAC_PI_2;

use crate::collision::{CollisionResolver, CollisionWorld, Resolution};

/// Look angles of the viewer.
///
/// Yaw is unbounded and wraps implicitly through the trigonometry; pitch is
/// clamped to straight up / straight down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    yaw: f32,
    pitch: f32,
}

impl Orientation {
    /// Non-finite angles are read as level/zero.
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let finite_or_zero = |a: f32| if a.is_finite() { a } else { 0.0 };
        Self {
            yaw: finite_or_zero(yaw),
            pitch: finite_or_zero(pitch).clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Rotation about the vertical axis only. Movement uses this, so looking
    /// up or down never changes walking speed.
    pub fn horizontal(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Full camera rotation: yaw, then pitch in the yawed frame.
    pub fn rotation(&self) -> Quat {
        self.horizontal() * Quat::from_rotation_x(self.pitch)
    }

    /// Unit vector the camera looks along.
    pub fn look_direction(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }
}

/// What one `step` did on each axis. `None` means the axis was idle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    pub longitudinal: Option<Resolution>,
    pub lateral: Option<Resolution>,
}

/// First-person viewer: a position and an orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonController {
    position: Vec3,
    orientation: Orientation,
}

impl FirstPersonController {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            orientation: Orientation::new(yaw, 0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Turn by a relative pointer delta. Applied immediately on each event.
    ///
    /// An angle that would become non-finite keeps its previous value.
    pub fn apply_look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        let o = self.orientation;
        let keep = |next: f32, prev: f32| if next.is_finite() { next } else { prev };
        self.orientation = Orientation::new(
            keep(o.yaw - dx * sensitivity, o.yaw),
            keep(o.pitch - dy * sensitivity, o.pitch),
        );
    }

    /// Move along the active intents as two sequential single-axis moves.
    ///
    /// The forward/back move is resolved and committed first; the left/right
    /// move is then computed from the committed position. Diagonal movement
    /// can therefore slide along a wall but never cut a box corner.
    pub fn step(
        &mut self,
        intents: &MovementIntents,
        speed: f32,
        world: &CollisionWorld,
        resolver: &CollisionResolver,
    ) -> StepOutcome {
        let facing = self.orientation.horizontal();
        let mut outcome = StepOutcome::default();

        let forward = match intents.longitudinal() {
            AxisState::Positive => Some(Vec3::new(0.0, 0.0, -speed)),
            AxisState::Negative => Some(Vec3::new(0.0, 0.0, speed)),
            AxisState::Idle => None,
        };
        if let Some(local) = forward {
            let r = resolver.resolve(self.position, facing * local, world);
            self.position = r.apply(self.position);
            outcome.longitudinal = Some(r);
        }

        let strafe = match intents.lateral() {
            AxisState::Positive => Some(Vec3::new(speed, 0.0, 0.0)),
            AxisState::Negative => Some(Vec3::new(-speed, 0.0, 0.0)),
            AxisState::Idle => None,
        };
        if let Some(local) = strafe {
            let r = resolver.resolve(self.position, facing * local, world);
            self.position = r.apply(self.position);
            outcome.lateral = Some(r);
        }

        outcome
    }
}
