//! Energy-based onset detection.
//!
//! Short-time RMS energy over overlapping frames, an adaptive threshold at a
//! multiple of the mean energy, local-maximum peak picking and a greedy
//! minimum-gap debounce. When too few onsets survive, or the audio could not
//! be decoded at all, a metronome grid is substituted so play is always
//! possible.
//!
//! The tempo estimate is the mean inter-onset interval over the accepted
//! span. It is a coarse approximation, not a musical analysis.

use onbeat_types::beat::{BeatTimes, metronome_grid};
use onbeat_types::tempo::{MAX_BPM, MIN_BPM};
use onbeat_types::{ChartWarning, MIN_BEAT_GAP, Tempo};

use crate::sample_buffer::SampleBuffer;

/// Detector tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetConfig {
    /// Samples per analysis frame.
    pub frame_size: usize,
    /// Samples between frame starts.
    pub hop_size: usize,
    /// Threshold as a multiple of the mean frame energy.
    pub threshold_ratio: f64,
    /// Minimum seconds between accepted onsets.
    pub min_gap: f64,
    /// Fewer accepted onsets than this triggers the fallback grid.
    pub min_onsets: usize,
    /// Beat spacing of the fallback grid in seconds.
    pub fallback_spacing: f64,
    /// Grid length when the audio duration is unknown.
    pub fallback_duration: f64,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            hop_size: 512,
            threshold_ratio: 1.25,
            min_gap: MIN_BEAT_GAP,
            min_onsets: 4,
            fallback_spacing: 0.5,
            fallback_duration: 120.0,
        }
    }
}

/// Outcome of the tempo estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TempoEstimate {
    /// Fewer than two onsets, or no time between them.
    Insufficient,
    Valid(Tempo),
    /// The raw BPM fell outside the accepted range.
    OutOfRange(f64),
}

impl TempoEstimate {
    pub fn tempo(self) -> Option<Tempo> {
        match self {
            TempoEstimate::Valid(t) => Some(t),
            _ => None,
        }
    }
}

/// Beat times and tempo derived from one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub beat_times: BeatTimes,
    pub tempo: Option<Tempo>,
    /// Fallbacks taken while detecting.
    pub warnings: Vec<ChartWarning>,
}

impl Detection {
    pub fn is_fallback(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                ChartWarning::DecodeFailure { .. } | ChartWarning::SparseChart { .. }
            )
        })
    }
}

/// RMS energy of each full frame. A frame is only produced while
/// `start + frame_size < samples.len()`.
pub fn energy_envelope(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f64> {
    if frame_size == 0 || hop_size == 0 {
        return Vec::new();
    }
    let mut energies = Vec::new();
    let mut start = 0;
    while start + frame_size < samples.len() {
        let sum: f64 = samples[start..start + frame_size]
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        energies.push((sum / frame_size as f64).sqrt());
        start += hop_size;
    }
    energies
}

/// Interior frames whose energy is above `threshold` and strictly above both
/// neighbours.
pub fn pick_peaks(energies: &[f64], threshold: f64) -> Vec<usize> {
    if energies.len() < 3 {
        return Vec::new();
    }
    (1..energies.len() - 1)
        .filter(|&i| {
            let e = energies[i];
            e > threshold && e > energies[i - 1] && e > energies[i + 1]
        })
        .collect()
}

/// Mean inter-onset interval over the whole span, converted to BPM.
pub fn estimate_tempo(beats: &BeatTimes) -> TempoEstimate {
    if beats.len() < 2 {
        return TempoEstimate::Insufficient;
    }
    let interval = beats.span() / (beats.len() - 1) as f64;
    if !(interval > 0.0) {
        return TempoEstimate::Insufficient;
    }
    let bpm = 60.0 / interval;
    match Tempo::from_bpm(bpm) {
        Some(t) => TempoEstimate::Valid(t),
        None => TempoEstimate::OutOfRange(bpm),
    }
}

/// Energy onset detector. Deterministic: the same buffer always yields the
/// same detection. Only the first channel is analysed.
#[derive(Debug, Clone, Default)]
pub struct OnsetDetector {
    config: OnsetConfig,
}

impl OnsetDetector {
    pub fn new(config: OnsetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OnsetConfig {
        &self.config
    }

    /// Detects onsets in `buffer`. Never fails: empty, silent or otherwise
    /// unusable input yields the fallback grid.
    pub fn detect(&self, buffer: &SampleBuffer) -> Detection {
        let cfg = &self.config;
        let duration = buffer.duration();

        if !buffer.validate() {
            log::warn!("empty sample buffer, using fallback grid");
            return self.fallback(duration, ChartWarning::SparseChart { found: 0 });
        }

        let energies = energy_envelope(buffer.first_channel(), cfg.frame_size, cfg.hop_size);
        if energies.is_empty() {
            log::warn!("buffer shorter than one analysis frame, using fallback grid");
            return self.fallback(duration, ChartWarning::SparseChart { found: 0 });
        }

        let mean = energies.iter().sum::<f64>() / energies.len() as f64;
        let threshold = mean * cfg.threshold_ratio;
        let hop_seconds = cfg.hop_size as f64 / buffer.sample_rate as f64;

        let candidates = pick_peaks(&energies, threshold);
        let beat_times = BeatTimes::debounced(
            candidates.iter().map(|&i| i as f64 * hop_seconds),
            cfg.min_gap,
        );
        log::debug!(
            "{} frames, mean energy {mean:.5}, {} peaks, {} onsets after debounce",
            energies.len(),
            candidates.len(),
            beat_times.len()
        );

        if beat_times.len() < cfg.min_onsets {
            log::warn!(
                "only {} onsets detected (need {}), using fallback grid",
                beat_times.len(),
                cfg.min_onsets
            );
            return self.fallback(
                duration,
                ChartWarning::SparseChart {
                    found: beat_times.len(),
                },
            );
        }

        let mut warnings = Vec::new();
        let tempo = match estimate_tempo(&beat_times) {
            TempoEstimate::Valid(t) => Some(t),
            TempoEstimate::OutOfRange(bpm) => {
                log::warn!("discarding tempo estimate {bpm:.1} (outside {MIN_BPM}..={MAX_BPM})");
                warnings.push(ChartWarning::InvalidTempo { bpm });
                None
            }
            TempoEstimate::Insufficient => None,
        };

        Detection {
            beat_times,
            tempo,
            warnings,
        }
    }

    /// The metronome grid over `duration`, or over the configured fallback
    /// duration when the length is unknown or zero.
    pub fn fallback(&self, duration: Option<f64>, reason: ChartWarning) -> Detection {
        let cfg = &self.config;
        let span = match duration {
            Some(d) if d > 0.0 && d.is_finite() => d,
            _ => cfg.fallback_duration,
        };
        Detection {
            beat_times: metronome_grid(span, cfg.fallback_spacing),
            tempo: None,
            warnings: vec![reason],
        }
    }
}
