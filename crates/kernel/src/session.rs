use nave_assets::scene::{self, Prop, SceneContribution};
use nave_assets::{AssetSpec, GeometryLoader};
use nave_common::{Aabb, MovementIntents, Transform, WalkConfig};
use nave_input::Action;
use nave_stream::{GateError, LoadCompletion, LoadFailure, LoadGate, LoadTracker};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::audio::AudioSink;
use crate::clock::{AnimationClock, Clock, DecorativeElement};
use crate::collision::{CollisionResolver, CollisionWorld};
use crate::controller::{FirstPersonController, StepOutcome};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Gate(#[from] GateError),
}

/// A decorative element placed in the scene, with its height for the
/// current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decorative {
    pub element: DecorativeElement,
    pub transform: Transform,
    pub local_bounds: Aabb,
    /// Displayed height, recomputed by [`Session::animate`].
    pub height: f32,
}

/// All mutable state of one walkthrough.
///
/// Owned by the host and handed to the frame loop each tick. Loads,
/// input and simulation all mutate it through the methods below.
pub struct Session {
    config: WalkConfig,
    gate: LoadGate,
    tracker: LoadTracker,
    world: CollisionWorld,
    resolver: CollisionResolver,
    controller: FirstPersonController,
    intents: MovementIntents,
    decoratives: Vec<Decorative>,
    props: Vec<Prop>,
    clock: AnimationClock,
    audio: Box<dyn AudioSink>,
    footsteps_playing: bool,
    pointer_captured: bool,
    colliders_visible: bool,
    expanded: bool,
    load_failure: Option<LoadFailure>,
    loaded: Vec<&'static str>,
}

impl Session {
    /// Create a session at the configured spawn point and start the
    /// ambient track.
    pub fn new(config: WalkConfig, clock: Box<dyn Clock>, mut audio: Box<dyn AudioSink>) -> Self {
        audio.start_ambient();
        tracing::info!(
            spawn = ?config.spawn_position,
            yaw = config.spawn_yaw,
            "session started"
        );
        Self {
            gate: LoadGate::new(),
            tracker: LoadTracker::new(config.stall_timeout()),
            world: CollisionWorld::new(),
            resolver: CollisionResolver::new(config.probe_vertical_scale),
            controller: FirstPersonController::new(config.spawn_position, config.spawn_yaw),
            intents: MovementIntents::new(),
            decoratives: Vec::new(),
            props: Vec::new(),
            clock: AnimationClock::new(clock),
            audio,
            footsteps_playing: false,
            pointer_captured: false,
            colliders_visible: false,
            expanded: false,
            load_failure: None,
            loaded: Vec::new(),
            config,
        }
    }

    /// Spawn one load task per asset. Each begins a load on the gate.
    pub fn start_loads(
        &mut self,
        loader: Arc<dyn GeometryLoader>,
        specs: &[AssetSpec],
    ) -> Result<(), SessionError> {
        for spec in specs {
            self.tracker.spawn(&mut self.gate, Arc::clone(&loader), *spec)?;
        }
        tracing::info!(count = specs.len(), "startup loads spawned");
        Ok(())
    }

    /// Begin a load whose completion the caller will report by hand.
    pub fn begin_load(&mut self) -> Result<(), SessionError> {
        self.gate.begin_load()?;
        Ok(())
    }

    /// Add a finished load's contribution to the scene and complete it on
    /// the gate. Returns `true` if this completion drained the gate.
    pub fn complete_load(&mut self, contribution: SceneContribution) -> Result<bool, SessionError> {
        let drained = self.gate.complete_load()?;
        self.world.extend(contribution.colliders);
        self.props.extend(contribution.props);
        let elapsed = self.clock.elapsed();
        for spawn in contribution.decoratives {
            let element = DecorativeElement {
                base_height: spawn.transform.position.y,
                phase_index: self.decoratives.len() as u32,
            };
            self.decoratives.push(Decorative {
                element,
                transform: spawn.transform,
                local_bounds: spawn.local_bounds,
                height: element.height_at(elapsed, self.config.bob_amplitude),
            });
        }
        if !contribution.asset.is_empty() {
            self.loaded.push(contribution.asset);
        }
        if drained && matches!(self.load_failure, Some(LoadFailure::Stalled { .. })) {
            tracing::info!("stalled loads completed late");
            self.load_failure = None;
        }
        tracing::debug!(
            asset = contribution.asset,
            pending = self.gate.pending(),
            "load completed"
        );
        Ok(drained)
    }

    /// Apply every load result that has arrived, then look for stalls.
    ///
    /// Returns how many loads completed successfully.
    pub fn deliver_completions(&mut self, now: Instant) -> Result<usize, SessionError> {
        let completions = self.tracker.drain();
        let delivered = self.apply_completions(completions)?;
        if let Some(stall) = self.tracker.check_stalled(now) {
            self.record_failure(stall);
        }
        Ok(delivered)
    }

    /// Block until every spawned load reports or `timeout` passes, then
    /// apply the results. For headless runs.
    pub fn preload(&mut self, timeout: Duration) -> Result<usize, SessionError> {
        let completions = self.tracker.wait_all(timeout);
        let delivered = self.apply_completions(completions)?;
        if self.tracker.in_flight_count() > 0 {
            let waited = timeout;
            let assets = self.tracker.in_flight().map(str::to_string).collect();
            self.record_failure(LoadFailure::Stalled { assets, waited });
        }
        Ok(delivered)
    }

    fn apply_completions(&mut self, completions: Vec<LoadCompletion>) -> Result<usize, SessionError> {
        let mut delivered = 0;
        for completion in completions {
            match completion.result {
                Ok(geometry) => {
                    tracing::debug!(
                        asset = completion.spec.name,
                        vertices = geometry.vertex_count(),
                        elapsed_ms = completion.elapsed.as_millis() as u64,
                        "load finished"
                    );
                    let contribution = scene::contribution(&completion.spec, &geometry);
                    self.complete_load(contribution)?;
                    delivered += 1;
                }
                Err(e) => self.record_failure(LoadFailure::Failed {
                    asset: completion.spec.name.to_string(),
                    reason: e.to_string(),
                }),
            }
        }
        Ok(delivered)
    }

    fn record_failure(&mut self, failure: LoadFailure) {
        tracing::error!(%failure, "startup load will not complete");
        if self.load_failure.is_none() {
            self.load_failure = Some(failure);
        }
    }

    /// Expand every collider the first time the gate is observed ready.
    ///
    /// Returns `true` only on the call that performed the expansion.
    pub fn poll_readiness(&mut self) -> bool {
        if self.expanded || !self.gate.is_ready() {
            return false;
        }
        self.expanded = true;
        self.world.expand_all_once(self.config.collision_margin);
        tracing::info!(
            colliders = self.world.len(),
            decoratives = self.decoratives.len(),
            "scene ready"
        );
        true
    }

    /// Recompute every decorative height from the clock.
    pub fn animate(&mut self) {
        let elapsed = self.clock.elapsed();
        let amplitude = self.config.bob_amplitude;
        for d in &mut self.decoratives {
            d.height = d.element.height_at(elapsed, amplitude);
        }
    }

    /// Move the viewer along the current intents. Does nothing until every
    /// startup load has completed.
    pub fn advance(&mut self) -> Option<StepOutcome> {
        if !self.gate.is_ready() {
            return None;
        }
        let outcome = self.controller.step(
            &self.intents,
            self.config.move_speed,
            &self.world,
            &self.resolver,
        );
        tracing::trace!(position = ?self.controller.position(), "stepped");
        Some(outcome)
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Look { dx, dy } => {
                self.controller.apply_look(dx, dy, self.config.look_sensitivity);
            }
            Action::Press(intent) => {
                self.intents.press(intent);
                if !self.footsteps_playing && self.intents.any_active() {
                    self.footsteps_playing = true;
                    self.audio.set_footsteps(true);
                }
            }
            Action::Release(intent) => {
                self.intents.release(intent);
                if self.footsteps_playing && !self.intents.any_active() {
                    self.footsteps_playing = false;
                    self.audio.set_footsteps(false);
                }
            }
            Action::ToggleColliderDebug => {
                self.colliders_visible = !self.colliders_visible;
                tracing::debug!(visible = self.colliders_visible, "collider proxies toggled");
            }
            Action::CapturePointer => self.pointer_captured = true,
            Action::ReleasePointer => {
                self.pointer_captured = false;
                // Keys released after focus is lost never report a key-up.
                self.intents.clear();
                if self.footsteps_playing {
                    self.footsteps_playing = false;
                    self.audio.set_footsteps(false);
                }
            }
            Action::Noop => {}
        }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    pub fn gate(&self) -> &LoadGate {
        &self.gate
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn controller(&self) -> &FirstPersonController {
        &self.controller
    }

    pub fn intents(&self) -> &MovementIntents {
        &self.intents
    }

    pub fn decoratives(&self) -> &[Decorative] {
        &self.decoratives
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn colliders_visible(&self) -> bool {
        self.colliders_visible
    }

    pub fn pointer_captured(&self) -> bool {
        self.pointer_captured
    }

    pub fn footsteps_playing(&self) -> bool {
        self.footsteps_playing
    }

    /// First load failure observed, if any. A failed load withholds
    /// readiness for good; a stall is cleared if the late loads finish.
    pub fn load_failure(&self) -> Option<&LoadFailure> {
        self.load_failure.as_ref()
    }

    /// Names of assets that have been added to the scene, in arrival order.
    pub fn loaded_assets(&self) -> &[&'static str] {
        &self.loaded
    }

    /// Names of spawned loads still outstanding.
    pub fn pending_assets(&self) -> Vec<&'static str> {
        self.tracker.in_flight().collect()
    }

    pub fn summary(&self) -> SessionSummary {
        let o = self.controller.orientation();
        SessionSummary {
            ready: self.gate.is_ready(),
            begun: self.gate.begun(),
            completed: self.gate.completed(),
            colliders: self.world.len(),
            props: self.props.len(),
            decoratives: self.decoratives.len(),
            position: self.controller.position().to_array(),
            yaw: o.yaw(),
            pitch: o.pitch(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("gate", &self.gate)
            .field("colliders", &self.world.len())
            .field("controller", &self.controller)
            .field("intents", &self.intents)
            .field("expanded", &self.expanded)
            .field("load_failure", &self.load_failure)
            .finish_non_exhaustive()
    }
}

/// Point-in-time counters for logs and the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub ready: bool,
    pub begun: usize,
    pub completed: usize,
    pub colliders: usize,
    pub props: usize,
    pub decoratives: usize,
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        write!(
            f,
            "loads {}/{}{} | colliders {} | props {} | candles {} | pos ({x:.2}, {y:.2}, {z:.2}) yaw {:.2} pitch {:.2}",
            self.completed,
            self.begun,
            if self.ready { " ready" } else { "" },
            self.colliders,
            self.props,
            self.decoratives,
            self.yaw,
            self.pitch,
        )
    }
}
