/// Errors from illegal gate transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("complete_load with no loads pending ({completed} of {begun} already complete)")]
    InvalidGateTransition { begun: usize, completed: usize },
    #[error("begin_load after the gate opened ({begun} loads already complete)")]
    AlreadyReady { begun: usize },
}

/// Counts outstanding startup loads.
///
/// `ready` is derived: no loads pending and at least one was begun. Once
/// open, the gate refuses new loads so readiness can never revert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadGate {
    pending: usize,
    begun: usize,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one outstanding load.
    pub fn begin_load(&mut self) -> Result<(), GateError> {
        if self.is_ready() {
            return Err(GateError::AlreadyReady { begun: self.begun });
        }
        self.pending += 1;
        self.begun += 1;
        Ok(())
    }

    /// Mark one load complete. Returns `true` if this call opened the gate.
    pub fn complete_load(&mut self) -> Result<bool, GateError> {
        if self.pending == 0 {
            return Err(GateError::InvalidGateTransition {
                begun: self.begun,
                completed: self.completed(),
            });
        }
        self.pending -= 1;
        Ok(self.pending == 0)
    }

    pub fn is_ready(&self) -> bool {
        self.pending == 0 && self.begun > 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn begun(&self) -> usize {
        self.begun
    }

    pub fn completed(&self) -> usize {
        self.begun - self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_is_not_ready() {
        let gate = LoadGate::new();
        assert!(!gate.is_ready());
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn opens_on_last_completion_only() {
        let mut gate = LoadGate::new();
        for _ in 0..17 {
            gate.begin_load().unwrap();
        }
        let mut flips = 0;
        for n in 1..=17 {
            assert!(!gate.is_ready());
            if gate.complete_load().unwrap() {
                flips += 1;
                assert_eq!(n, 17);
            }
        }
        assert_eq!(flips, 1);
        assert!(gate.is_ready());
        assert_eq!(gate.completed(), 17);
    }

    #[test]
    fn complete_without_pending_is_invalid() {
        let mut gate = LoadGate::new();
        assert_eq!(
            gate.complete_load(),
            Err(GateError::InvalidGateTransition {
                begun: 0,
                completed: 0
            })
        );

        gate.begin_load().unwrap();
        gate.complete_load().unwrap();
        assert!(matches!(
            gate.complete_load(),
            Err(GateError::InvalidGateTransition { begun: 1, completed: 1 })
        ));
        assert!(gate.is_ready());
    }

    #[test]
    fn readiness_never_reverts() {
        let mut gate = LoadGate::new();
        gate.begin_load().unwrap();
        gate.complete_load().unwrap();
        assert_eq!(gate.begin_load(), Err(GateError::AlreadyReady { begun: 1 }));
        assert!(gate.is_ready());
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn interleaved_begin_and_complete() {
        let mut gate = LoadGate::new();
        gate.begin_load().unwrap();
        gate.begin_load().unwrap();
        assert!(!gate.complete_load().unwrap());
        gate.begin_load().unwrap();
        assert!(!gate.complete_load().unwrap());
        assert!(gate.complete_load().unwrap());
        assert_eq!(gate.begun(), 3);
    }
}
