use std::future::Future;
use std::path::PathBuf;

use onbeat_types::{Clock, WallClock};

use crate::decode::{DecodeError, decode_file};
use crate::sample_buffer::SampleBuffer;

/// The playing track: a playback clock plus an asynchronous decode of the
/// whole file for analysis.
pub trait AudioSource: Clock {
    /// Decodes the track. May fail, e.g. on unreadable data or when audio
    /// access is not available.
    fn decode(&self) -> impl Future<Output = Result<SampleBuffer, DecodeError>> + Send;
}

/// A track on disk timed by the wall clock.
#[derive(Debug, Clone)]
pub struct FileAudioSource {
    path: PathBuf,
    clock: WallClock,
}

impl FileAudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: WallClock::new(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Starts playback time over at zero.
    pub fn restart(&mut self) {
        self.clock.restart();
    }
}

impl Clock for FileAudioSource {
    fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl AudioSource for FileAudioSource {
    fn decode(&self) -> impl Future<Output = Result<SampleBuffer, DecodeError>> + Send {
        let path = self.path.clone();
        async move {
            tokio::task::spawn_blocking(move || decode_file(&path))
                .await
                .map_err(|e| DecodeError::Worker(e.to_string()))?
        }
    }
}
