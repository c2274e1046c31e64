/// One of the four discrete movement intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Back,
    Left,
    Right,
}

/// State of one axis pair (forward/back or left/right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisState {
    #[default]
    Idle,
    /// Forward on the longitudinal axis, right on the lateral axis.
    Positive,
    /// Back on the longitudinal axis, left on the lateral axis.
    Negative,
}

/// Mutual-exclusion latch for an opposing pair of intents.
///
/// A press always wins and clears the opposite direction. A release only
/// clears the latch if it names the direction currently held, so releasing
/// a key that was already overridden is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLatch {
    state: AxisState,
}

impl AxisLatch {
    pub fn state(&self) -> AxisState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != AxisState::Idle
    }

    pub fn press(&mut self, direction: AxisState) {
        if direction != AxisState::Idle {
            self.state = direction;
        }
    }

    pub fn release(&mut self, direction: AxisState) {
        if self.state == direction {
            self.state = AxisState::Idle;
        }
    }
}

/// The full movement intent set: two independent axis latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementIntents {
    longitudinal: AxisLatch,
    lateral: AxisLatch,
}

impl MovementIntents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward/back latch.
    pub fn longitudinal(&self) -> AxisState {
        self.longitudinal.state()
    }

    /// Left/right latch.
    pub fn lateral(&self) -> AxisState {
        self.lateral.state()
    }

    pub fn press(&mut self, intent: Intent) {
        let (latch, dir) = self.route(intent);
        latch.press(dir);
    }

    pub fn release(&mut self, intent: Intent) {
        let (latch, dir) = self.route(intent);
        latch.release(dir);
    }

    pub fn is_active(&self, intent: Intent) -> bool {
        match intent {
            Intent::Forward => self.longitudinal.state() == AxisState::Positive,
            Intent::Back => self.longitudinal.state() == AxisState::Negative,
            Intent::Right => self.lateral.state() == AxisState::Positive,
            Intent::Left => self.lateral.state() == AxisState::Negative,
        }
    }

    pub fn any_active(&self) -> bool {
        self.longitudinal.is_active() || self.lateral.is_active()
    }

    /// Drop every held intent (used when pointer capture is lost).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn route(&mut self, intent: Intent) -> (&mut AxisLatch, AxisState) {
        match intent {
            Intent::Forward => (&mut self.longitudinal, AxisState::Positive),
            Intent::Back => (&mut self.longitudinal, AxisState::Negative),
            Intent::Right => (&mut self.lateral, AxisState::Positive),
            Intent::Left => (&mut self.lateral, AxisState::Negative),
        }
    }
}
