use std::time::Duration;

/// Ring buffer of recent tick durations for the HUD.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: Vec<Duration>,
    next: usize,
    filled: bool,
}

impl FrameTimer {
    /// A timer remembering the last `capacity` ticks. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![Duration::ZERO; capacity.max(1)],
            next: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.samples[self.next] = dt;
        self.next = (self.next + 1) % self.samples.len();
        if self.next == 0 {
            self.filled = true;
        }
    }

    fn window(&self) -> &[Duration] {
        if self.filled {
            &self.samples
        } else {
            &self.samples[..self.next]
        }
    }

    pub fn average(&self) -> Duration {
        let w = self.window();
        if w.is_empty() {
            return Duration::ZERO;
        }
        w.iter().sum::<Duration>() / w.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.window().iter().copied().min().unwrap_or_default()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<Duration> {
        if self.window().is_empty() {
            return None;
        }
        let len = self.samples.len();
        Some(self.samples[(self.next + len - 1) % len])
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    /// Average ticks per second, or 0 before the first sample.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timer_reports_zero() {
        let t = FrameTimer::new(4);
        assert_eq!(t.count(), 0);
        assert_eq!(t.average(), Duration::ZERO);
        assert_eq!(t.last(), None);
        assert_eq!(t.fps(), 0.0);
    }

    #[test]
    fn ring_keeps_latest_samples() {
        let mut t = FrameTimer::new(3);
        for ms in [10, 20, 30, 40] {
            t.record(Duration::from_millis(ms));
        }
        assert_eq!(t.count(), 3);
        assert_eq!(t.min(), Duration::from_millis(20));
        assert_eq!(t.max(), Duration::from_millis(40));
        assert_eq!(t.average(), Duration::from_millis(30));
        assert_eq!(t.last(), Some(Duration::from_millis(40)));
    }

    #[test]
    fn fps_from_average() {
        let mut t = FrameTimer::new(2);
        t.record(Duration::from_millis(20));
        t.record(Duration::from_millis(20));
        assert!((t.fps() - 50.0).abs() < 1e-3);
    }
}
