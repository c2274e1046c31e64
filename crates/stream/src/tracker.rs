use crossbeam_channel::{Receiver, Sender, unbounded};
use nave_assets::{AssetError, AssetSpec, Geometry, GeometryLoader};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::gate::{GateError, LoadGate};

/// Result of one load task, delivered to the tracker's owner.
#[derive(Debug)]
pub struct LoadCompletion {
    pub spec: AssetSpec,
    pub result: Result<Geometry, AssetError>,
    pub elapsed: Duration,
}

/// A startup load that will never open the gate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadFailure {
    #[error("asset {asset} failed to load: {reason}")]
    Failed { asset: String, reason: String },
    #[error("{} asset(s) still pending after {waited:?}: {}", assets.len(), assets.join(", "))]
    Stalled { assets: Vec<String>, waited: Duration },
}

/// Spawns one task per asset and collects their completions.
///
/// Completions queue on a channel until [`LoadTracker::drain`] is called,
/// so the owner decides when results land. The tracker also watches for
/// loads that outlive the stall timeout.
pub struct LoadTracker {
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
    in_flight: BTreeMap<&'static str, Instant>,
    stall_timeout: Duration,
    stall_reported: bool,
}

impl LoadTracker {
    pub fn new(stall_timeout: Duration) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            in_flight: BTreeMap::new(),
            stall_timeout,
            stall_reported: false,
        }
    }

    /// Begin a load on the gate and run it on its own thread.
    ///
    /// The thread reports back over the channel exactly once, whether the
    /// loader succeeds or fails.
    pub fn spawn(
        &mut self,
        gate: &mut LoadGate,
        loader: Arc<dyn GeometryLoader>,
        spec: AssetSpec,
    ) -> Result<(), GateError> {
        gate.begin_load()?;
        self.in_flight.insert(spec.name, Instant::now());
        tracing::debug!(asset = spec.name, "load started");

        let sender = self.sender.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("load-{}", spec.name))
            .spawn(move || {
                let start = Instant::now();
                let result = loader.load(&spec);
                // The receiver is gone only when the session was torn down.
                let _ = sender.send(LoadCompletion {
                    spec,
                    result,
                    elapsed: start.elapsed(),
                });
            });

        if let Err(e) = spawned {
            tracing::error!(asset = spec.name, "failed to spawn load task: {e}");
            // Report through the channel so the failure surfaces like any other.
            let _ = self.sender.send(LoadCompletion {
                spec,
                result: Err(AssetError::Io {
                    path: spec.file.into(),
                    source: e,
                }),
                elapsed: Duration::ZERO,
            });
        }
        Ok(())
    }

    /// Take every completion that has arrived so far, in arrival order.
    pub fn drain(&mut self) -> Vec<LoadCompletion> {
        let completions: Vec<LoadCompletion> = self.receiver.try_iter().collect();
        for c in &completions {
            self.in_flight.remove(c.spec.name);
        }
        completions
    }

    /// Block until every in-flight load has reported or `timeout` passes.
    ///
    /// Returns whatever arrived. Used by headless preloading; the frame loop
    /// only ever drains.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<LoadCompletion> {
        let deadline = Instant::now().checked_add(timeout);
        let mut out = Vec::new();
        while !self.in_flight.is_empty() {
            let received = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.receiver.recv_timeout(deadline - now).map_err(|_| ())
                }
                None => self.receiver.recv().map_err(|_| ()),
            };
            match received {
                Ok(c) => {
                    self.in_flight.remove(c.spec.name);
                    out.push(c);
                }
                Err(_) => break,
            }
        }
        out
    }

    /// Report loads pending longer than the stall timeout. Reports once.
    pub fn check_stalled(&mut self, now: Instant) -> Option<LoadFailure> {
        if self.stall_reported {
            return None;
        }
        let oldest = self.in_flight.values().min().copied()?;
        let waited = now.saturating_duration_since(oldest);
        if waited < self.stall_timeout {
            return None;
        }
        self.stall_reported = true;
        let assets = self
            .in_flight
            .iter()
            .filter(|(_, started)| now.saturating_duration_since(**started) >= self.stall_timeout)
            .map(|(name, _)| name.to_string())
            .collect();
        Some(LoadFailure::Stalled { assets, waited })
    }

    /// Names of loads that have not reported yet.
    pub fn in_flight(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.in_flight.keys().copied()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nave_assets::{BuiltinLoader, CHAPEL_ASSETS};

    /// Loader that blocks until released, then fails.
    struct BlockingLoader {
        release: Receiver<()>,
    }

    impl GeometryLoader for BlockingLoader {
        fn load(&self, spec: &AssetSpec) -> Result<Geometry, AssetError> {
            let _ = self.release.recv();
            Err(AssetError::Unknown(spec.name.to_string()))
        }
    }

    #[test]
    fn all_spawned_loads_report_back() {
        let mut gate = LoadGate::new();
        let mut tracker = LoadTracker::new(Duration::from_secs(30));
        let loader: Arc<dyn GeometryLoader> = Arc::new(BuiltinLoader::new());
        for spec in CHAPEL_ASSETS {
            tracker.spawn(&mut gate, loader.clone(), spec).unwrap();
        }
        assert_eq!(gate.pending(), 17);

        let completions = tracker.wait_all(Duration::from_secs(10));
        assert_eq!(completions.len(), 17);
        assert!(completions.iter().all(|c| c.result.is_ok()));
        assert_eq!(tracker.in_flight_count(), 0);
        // The tracker never touches the gate after begin; the owner completes.
        assert_eq!(gate.pending(), 17);
    }

    #[test]
    fn stalled_loads_are_reported_once() {
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
        let mut gate = LoadGate::new();
        let mut tracker = LoadTracker::new(Duration::from_millis(50));
        let loader: Arc<dyn GeometryLoader> = Arc::new(BlockingLoader {
            release: release_rx,
        });
        tracker.spawn(&mut gate, loader, CHAPEL_ASSETS[0]).unwrap();

        let start = Instant::now();
        assert!(tracker.check_stalled(start).is_none());

        let later = start + Duration::from_secs(1);
        match tracker.check_stalled(later) {
            Some(LoadFailure::Stalled { assets, .. }) => assert_eq!(assets, vec!["Floor".to_string()]),
            other => panic!("expected stall, got {other:?}"),
        }
        assert!(tracker.check_stalled(later).is_none());
        drop(release_tx);
    }

    #[test]
    fn spawn_after_ready_is_rejected() {
        let mut gate = LoadGate::new();
        gate.begin_load().unwrap();
        gate.complete_load().unwrap();
        let mut tracker = LoadTracker::new(Duration::from_secs(1));
        let err = tracker
            .spawn(&mut gate, Arc::new(BuiltinLoader), CHAPEL_ASSETS[0])
            .unwrap_err();
        assert!(matches!(err, GateError::AlreadyReady { .. }));
        assert_eq!(tracker.in_flight_count(), 0);
    }

    #[test]
    fn stall_message_names_assets() {
        let f = LoadFailure::Stalled {
            assets: vec!["pew".into(), "Door".into()],
            waited: Duration::from_secs(31),
        };
        let msg = f.to_string();
        assert!(msg.contains("2 asset(s)"));
        assert!(msg.contains("pew, Door"));
    }
}
