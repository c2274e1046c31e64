use nave_kernel::{Session, SessionError, StepOutcome};
use nave_stream::LoadFailure;
use std::time::{Duration, Instant};

use crate::renderer::Renderer;
use crate::timer::FrameTimer;
use crate::view::{FrameView, Projection, Viewport};

/// Asks the host to call the loop again.
pub trait FrameSource {
    fn request_next_frame(&mut self);
}

/// Reports the current size of the area the frame is drawn into.
pub trait ContentArea {
    fn content_size(&self) -> Viewport;
}

/// Host for headless runs: a fixed-size area that counts frame requests.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    pub size: Viewport,
    requested: u64,
}

impl HeadlessHost {
    pub fn new(size: Viewport) -> Self {
        Self { size, requested: 0 }
    }

    pub fn frames_requested(&self) -> u64 {
        self.requested
    }
}

impl FrameSource for HeadlessHost {
    fn request_next_frame(&mut self) {
        self.requested += 1;
    }
}

impl ContentArea for HeadlessHost {
    fn content_size(&self) -> Viewport {
        self.size
    }
}

/// What one tick did.
#[derive(Debug, Clone)]
pub struct TickReport<O> {
    pub tick: u64,
    /// Loads delivered at the top of this tick.
    pub delivered: usize,
    pub ready: bool,
    /// Collider expansion ran during this tick.
    pub expanded_now: bool,
    /// `None` while movement is gated on loading.
    pub step: Option<StepOutcome>,
    pub load_failure: Option<LoadFailure>,
    pub duration: Duration,
    pub output: O,
}

/// Drives one session, one tick per host frame callback.
#[derive(Debug)]
pub struct RenderLoop {
    tick: u64,
    projection: Projection,
    timer: FrameTimer,
}

impl RenderLoop {
    pub fn new(session: &Session) -> Self {
        Self {
            tick: 0,
            projection: Projection::from_config(session.config()),
            timer: FrameTimer::default(),
        }
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Run one tick: deliver loads, poll readiness, animate, move, resize,
    /// render, then request the next frame.
    pub fn tick<R, H>(
        &mut self,
        session: &mut Session,
        renderer: &mut R,
        host: &mut H,
    ) -> Result<TickReport<R::Output>, SessionError>
    where
        R: Renderer,
        H: FrameSource + ContentArea,
    {
        let started = Instant::now();
        self.tick += 1;
        let span = tracing::info_span!("tick", n = self.tick);
        let _guard = span.enter();

        let delivered = session.deliver_completions(started)?;

        let expanded_now = session.poll_readiness();

        session.animate();

        let step = session.advance();

        let viewport = host.content_size();
        self.projection.resize(viewport);
        renderer.resize(viewport);

        let frame = FrameView::capture(session, self.tick, self.projection, viewport);
        let output = renderer.render(&frame);

        host.request_next_frame();

        let duration = started.elapsed();
        self.timer.record(duration);
        tracing::trace!(delivered, ?step, ?duration, "tick done");

        Ok(TickReport {
            tick: self.tick,
            delivered,
            ready: session.is_ready(),
            expanded_now,
            step,
            load_failure: session.load_failure().cloned(),
            duration,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DebugTextRenderer, NullRenderer};
    use nave_common::WalkConfig;
    use nave_kernel::{ManualClock, SilentAudio};

    fn session() -> Session {
        Session::new(
            WalkConfig::default(),
            Box::new(ManualClock::new()),
            Box::new(SilentAudio),
        )
    }

    #[test]
    fn every_tick_renders_and_requests_a_frame() {
        let mut s = session();
        let mut lp = RenderLoop::new(&s);
        let mut r = DebugTextRenderer::new();
        let mut host = HeadlessHost::new(Viewport::new(320, 240));
        for n in 1..=5 {
            let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
            assert_eq!(report.tick, n);
            assert!(report.output.contains(&format!("Frame {n}")));
        }
        assert_eq!(host.frames_requested(), 5);
        assert_eq!(lp.timer().count(), 5);
    }

    #[test]
    fn projection_tracks_host_size_each_tick() {
        let mut s = session();
        let mut lp = RenderLoop::new(&s);
        let mut r = DebugTextRenderer::new();
        let mut host = HeadlessHost::new(Viewport::new(200, 100));
        lp.tick(&mut s, &mut r, &mut host).unwrap();
        assert_eq!(lp.projection().aspect, 2.0);
        host.size = Viewport::new(100, 200);
        lp.tick(&mut s, &mut r, &mut host).unwrap();
        assert_eq!(lp.projection().aspect, 0.5);
    }

    #[test]
    fn nothing_begun_is_never_ready() {
        let mut s = session();
        let mut lp = RenderLoop::new(&s);
        let mut r = DebugTextRenderer::new();
        let mut host = HeadlessHost::new(Viewport::new(1, 1));
        for _ in 0..10 {
            let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
            assert!(!report.ready);
            assert!(report.step.is_none());
        }
    }

    #[test]
    fn minimized_host_still_advances_the_session() {
        let mut s = session();
        let mut lp = RenderLoop::new(&s);
        let mut host = HeadlessHost::new(Viewport::new(0, 0));
        s.begin_load().unwrap();
        s.complete_load(Default::default()).unwrap();

        let report = lp.tick(&mut s, &mut NullRenderer, &mut host).unwrap();
        assert!(report.ready);
        assert!(report.expanded_now);
        assert!(report.step.is_some());
        assert_eq!(host.frames_requested(), 1);
        assert!(lp.projection().aspect > 0.0);
    }
}
