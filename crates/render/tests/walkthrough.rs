use glam::Vec3;
use nave_assets::{BuiltinLoader, CHAPEL_ASSETS, SceneContribution};
use nave_common::{Aabb, WalkConfig};
use nave_input::{InputEvent, InputRouter, Key};
use nave_kernel::{ManualClock, Session, SilentAudio};
use nave_render::{DebugTextRenderer, FrameView, HeadlessHost, RenderLoop, Renderer, Viewport};
use std::sync::Arc;
use std::time::Duration;

fn session(clock: &ManualClock) -> Session {
    Session::new(
        WalkConfig::default(),
        Box::new(clock.clone()),
        Box::new(SilentAudio),
    )
}

fn boxed(x: f32) -> SceneContribution {
    SceneContribution {
        asset: "Crate",
        colliders: vec![Aabb::from_center_and_size(Vec3::new(x, 0.5, 5.0), Vec3::ONE)],
        ..Default::default()
    }
}

/// Counts what the loop hands the renderer.
#[derive(Default)]
struct CountingRenderer {
    resizes: usize,
    frames: usize,
    last_viewport: Option<Viewport>,
}

impl Renderer for CountingRenderer {
    type Output = usize;

    fn resize(&mut self, viewport: Viewport) {
        self.resizes += 1;
        self.last_viewport = Some(viewport);
    }

    fn render(&mut self, _frame: &FrameView<'_>) -> usize {
        self.frames += 1;
        self.frames
    }
}

#[test]
fn readiness_waits_for_the_last_load_then_expands_once() {
    let clock = ManualClock::new();
    let mut s = session(&clock);
    let mut lp = RenderLoop::new(&s);
    let mut r = CountingRenderer::default();
    let mut host = HeadlessHost::new(Viewport::new(800, 600));

    for _ in 0..17 {
        s.begin_load().unwrap();
    }
    for i in 0..16 {
        s.complete_load(boxed(i as f32 * 2.0)).unwrap();
    }

    for _ in 0..1000 {
        let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
        assert!(!report.ready);
        assert!(!report.expanded_now);
        assert!(report.step.is_none());
    }
    assert!(!s.world().is_expanded());
    let before: Vec<Aabb> = s.world().boxes().to_vec();

    s.complete_load(boxed(40.0)).unwrap();

    let mut expansions = 0;
    for _ in 0..500 {
        let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
        assert!(report.ready);
        assert!(report.step.is_some());
        if report.expanded_now {
            expansions += 1;
        }
    }
    assert_eq!(expansions, 1);
    assert_eq!(s.world().len(), 17);
    for (old, new) in before.iter().zip(s.world().boxes()) {
        assert_eq!(*new, old.expanded_by(WalkConfig::default().collision_margin));
    }
    assert_eq!(r.frames, 1500);
    assert_eq!(r.resizes, 1500);
    assert_eq!(r.last_viewport, Some(Viewport::new(800, 600)));
    assert_eq!(host.frames_requested(), 1500);
}

#[test]
fn builtin_chapel_walkthrough() {
    let clock = ManualClock::new();
    let mut s = session(&clock);
    s.start_loads(Arc::new(BuiltinLoader::new()), &CHAPEL_ASSETS)
        .unwrap();

    let mut lp = RenderLoop::new(&s);
    let mut r = DebugTextRenderer::new();
    let mut host = HeadlessHost::new(Viewport::new(1280, 720));
    let mut router = InputRouter::default();

    // Loads land on their own threads; keep ticking until they are all in.
    let mut ready_at = None;
    for _ in 0..2000 {
        clock.advance(1.0 / 60.0);
        let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
        assert!(report.load_failure.is_none());
        if report.ready {
            ready_at = Some(report.tick);
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    assert!(ready_at.is_some(), "chapel never finished loading");
    assert_eq!(s.loaded_assets().len(), 17);
    assert_eq!(s.decoratives().len(), 32);

    for event in [InputEvent::Click, InputEvent::KeyDown(Key::W)] {
        s.apply(router.route(event));
    }
    assert!(s.footsteps_playing());

    let start = s.controller().position();
    for _ in 0..50 {
        clock.advance(1.0 / 60.0);
        lp.tick(&mut s, &mut r, &mut host).unwrap();
    }
    let moved = s.controller().position() - start;
    // Spawn yaw π: forward walks toward +Z at 0.02 per tick.
    assert!(moved.z > 0.9 && moved.z < 1.1, "moved {moved:?}");
    assert!(moved.x.abs() < 1e-3);

    s.apply(router.route(InputEvent::KeyUp(Key::W)));
    assert!(!s.footsteps_playing());

    // Candles bob with the clock.
    let h0 = s.decoratives()[0].height;
    clock.advance(0.5);
    lp.tick(&mut s, &mut r, &mut host).unwrap();
    assert_ne!(s.decoratives()[0].height, h0);
}

#[test]
fn walking_into_a_pew_row_stops_at_the_margin() {
    let clock = ManualClock::new();
    let mut s = session(&clock);
    s.start_loads(Arc::new(BuiltinLoader::new()), &CHAPEL_ASSETS)
        .unwrap();
    s.preload(Duration::from_secs(10)).unwrap();

    let mut lp = RenderLoop::new(&s);
    let mut r = CountingRenderer::default();
    let mut host = HeadlessHost::new(Viewport::new(640, 480));
    let mut router = InputRouter::default();

    s.apply(router.route(InputEvent::Click));
    // Quarter turn: yaw π/2 faces -X, toward the pew at x = -1.8.
    s.apply(router.route(InputEvent::PointerMotion {
        dx: std::f32::consts::FRAC_PI_2 * 100.0,
        dy: 0.0,
    }));
    s.apply(router.route(InputEvent::KeyDown(Key::W)));

    let mut blocked = 0;
    for _ in 0..400 {
        let report = lp.tick(&mut s, &mut r, &mut host).unwrap();
        if report
            .step
            .and_then(|step| step.longitudinal)
            .is_some_and(|res| res.is_blocked())
        {
            blocked += 1;
        }
    }
    assert!(blocked > 0, "never reached the pews");
    let probe = {
        let p = s.controller().position();
        Vec3::new(p.x, p.y * 0.5, p.z)
    };
    assert!(!s.world().contains_point(probe));
}

#[test]
fn loop_output_reflects_collider_toggle() {
    let clock = ManualClock::new();
    let mut s = session(&clock);
    s.begin_load().unwrap();
    s.complete_load(boxed(0.0)).unwrap();

    let mut lp = RenderLoop::new(&s);
    let mut r = DebugTextRenderer::new().with_collider_listing();
    let mut host = HeadlessHost::new(Viewport::new(640, 480));
    let mut router = InputRouter::default();

    let hidden = lp.tick(&mut s, &mut r, &mut host).unwrap().output;
    assert!(!hidden.contains("(shown)"));

    s.apply(router.route(InputEvent::Click));
    s.apply(router.route(InputEvent::KeyDown(Key::E)));
    let shown = lp.tick(&mut s, &mut r, &mut host).unwrap().output;
    assert!(shown.contains("(shown)"));
    assert!(shown.contains("[  0]"));
}
