use nave_kernel::{AudioSink, SilentAudio};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const AMBIENT_FILE: &str = "ambient.mp3";
pub const FOOTSTEPS_FILE: &str = "footstep.wav";

#[derive(Debug, thiserror::Error)]
pub enum AudioInitError {
    #[error("no audio output device: {0}")]
    Stream(#[from] rodio::StreamError),
    #[error("failed to create sink: {0}")]
    Sink(#[from] rodio::PlayError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Two looped tracks on the default output device.
pub struct RodioAudio {
    /// Must outlive the sinks.
    _stream: OutputStream,
    ambient: Sink,
    footsteps: Sink,
}

impl RodioAudio {
    pub fn open(sound_root: &Path) -> Result<Self, AudioInitError> {
        let (stream, handle) = OutputStream::try_default()?;
        let ambient = looped_sink(&handle, &sound_root.join(AMBIENT_FILE))?;
        let footsteps = looped_sink(&handle, &sound_root.join(FOOTSTEPS_FILE))?;
        Ok(Self {
            _stream: stream,
            ambient,
            footsteps,
        })
    }
}

/// A paused sink with `path` queued on repeat.
fn looped_sink(handle: &OutputStreamHandle, path: &Path) -> Result<Sink, AudioInitError> {
    let file = File::open(path).map_err(|source| AudioInitError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source = Decoder::new_looped(BufReader::new(file)).map_err(|source| AudioInitError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let sink = Sink::try_new(handle)?;
    sink.pause();
    sink.append(source);
    Ok(sink)
}

impl AudioSink for RodioAudio {
    fn start_ambient(&mut self) {
        self.ambient.play();
        tracing::debug!("ambient track playing");
    }

    fn set_footsteps(&mut self, playing: bool) {
        if playing {
            self.footsteps.play();
        } else {
            self.footsteps.pause();
        }
    }
}

/// Rodio output if the device and sound files are available, silence
/// otherwise.
pub fn open_or_silent(sound_root: &Path) -> Box<dyn AudioSink> {
    match RodioAudio::open(sound_root) {
        Ok(audio) => {
            tracing::info!(root = %sound_root.display(), "audio ready");
            Box::new(audio)
        }
        Err(e) => {
            tracing::warn!("audio disabled: {e}");
            Box::new(SilentAudio)
        }
    }
}
