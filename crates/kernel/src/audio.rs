/// Playback seam for the two looped tracks.
///
/// The session decides when tracks start and stop; sinks only play.
pub trait AudioSink {
    /// Start the ambient loop. Called once at session start.
    fn start_ambient(&mut self);
    /// Start or pause the footstep loop.
    fn set_footsteps(&mut self, playing: bool);
}

/// Sink that only logs, for headless runs and machines without audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn start_ambient(&mut self) {
        tracing::debug!("ambient track (silent)");
    }

    fn set_footsteps(&mut self, playing: bool) {
        tracing::trace!(playing, "footsteps (silent)");
    }
}
