use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Amplitude of the decorative bobbing, in world units.
pub const BOB_AMPLITUDE: f32 = 0.1;

/// Monotonic source of seconds elapsed since the scene started.
pub trait Clock {
    fn elapsed_secs(&self) -> f64;
}

/// Wall-clock time from `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for MonotonicClock {
    fn elapsed_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-advanced clock for headless runs and tests.
///
/// Clones share the same time, so a test can keep a handle while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Negative steps are ignored.
    pub fn advance(&self, secs: f64) {
        if secs.is_nan() || secs <= 0.0 {
            return;
        }
        let now = f64::from_bits(self.bits.load(Ordering::Acquire));
        self.bits.store((now + secs).to_bits(), Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Read-only view of scene time. Never resets, never pauses.
pub struct AnimationClock {
    source: Box<dyn Clock>,
}

impl AnimationClock {
    pub fn new(source: Box<dyn Clock>) -> Self {
        Self { source }
    }

    pub fn elapsed(&self) -> f64 {
        self.source.elapsed_secs()
    }
}

impl std::fmt::Debug for AnimationClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationClock")
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

/// An ambient element that bobs in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorativeElement {
    pub base_height: f32,
    /// Creation order; offsets each element's phase.
    pub phase_index: u32,
}

impl DecorativeElement {
    pub fn height_at(&self, elapsed: f64, amplitude: f32) -> f32 {
        self.base_height + amplitude * (elapsed + f64::from(self.phase_index)).sin() as f32
    }
}

/// Displayed height of `element` at `elapsed` seconds.
pub fn height_of(element: &DecorativeElement, elapsed: f64) -> f32 {
    element.height_at(elapsed, BOB_AMPLITUDE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_at_time_zero_is_phase_offset() {
        for phase in 0..32 {
            let e = DecorativeElement {
                base_height: 1.0,
                phase_index: phase,
            };
            let expected = 1.0 + 0.1 * (f64::from(phase)).sin() as f32;
            assert_eq!(height_of(&e, 0.0), expected);
        }
    }

    #[test]
    fn height_is_continuous_in_time() {
        let e = DecorativeElement {
            base_height: 2.5,
            phase_index: 3,
        };
        let mut t = 0.0;
        let mut prev = height_of(&e, t);
        for _ in 0..10_000 {
            t += 0.001;
            let h = height_of(&e, t);
            // |d/dt| <= amplitude, so a 1 ms step moves at most 0.1 mm.
            assert!((h - prev).abs() <= 0.1 * 0.001 + 1e-6);
            prev = h;
        }
    }

    #[test]
    fn height_stays_within_amplitude() {
        let e = DecorativeElement {
            base_height: 5.0,
            phase_index: 7,
        };
        for i in 0..1000 {
            let h = height_of(&e, i as f64 * 0.37);
            assert!((h - 5.0).abs() <= BOB_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn manual_clock_is_shared_and_monotonic() {
        let clock = ManualClock::new();
        let anim = AnimationClock::new(Box::new(clock.clone()));
        assert_eq!(anim.elapsed(), 0.0);
        clock.advance(1.5);
        clock.advance(-10.0);
        assert_eq!(anim.elapsed(), 1.5);
    }

    #[test]
    fn monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::start();
        let a = clock.elapsed_secs();
        let b = clock.elapsed_secs();
        assert!(b >= a);
    }
}
