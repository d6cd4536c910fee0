use onbeat_types::beat::metronome_grid;
use onbeat_types::{BeatTimes, Chart, ChartWarning, NoteTemplate, Tempo};

use crate::lane_policy::{LanePolicy, LanePolicyKind};

/// The metronome grid used when no beat times are available at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackGrid {
    /// Seconds between grid beats.
    pub spacing: f64,
    /// Grid length in seconds when the audio length is unknown.
    pub duration: f64,
}

impl Default for FallbackGrid {
    fn default() -> Self {
        Self {
            spacing: 0.5,
            duration: 120.0,
        }
    }
}

/// Maps beat times to note templates, one note per beat, with lanes chosen
/// by a pluggable [`LanePolicy`].
pub struct ChartGenerator {
    policy: Box<dyn LanePolicy + Send>,
    fallback: FallbackGrid,
}

impl ChartGenerator {
    pub fn new(policy: Box<dyn LanePolicy + Send>) -> Self {
        Self {
            policy,
            fallback: FallbackGrid::default(),
        }
    }

    pub fn from_kind(kind: LanePolicyKind, seed: Option<u64>) -> Self {
        Self::new(kind.build(seed))
    }

    pub fn with_fallback(mut self, fallback: FallbackGrid) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback_grid(&self) -> FallbackGrid {
        self.fallback
    }

    /// Builds a chart from accepted beat times. `warnings` are carried over
    /// unchanged so callers can see which fallback produced the beats.
    pub fn generate(
        &mut self,
        beats: &BeatTimes,
        tempo: Option<Tempo>,
        warnings: Vec<ChartWarning>,
    ) -> Chart {
        let notes: Vec<NoteTemplate> = beats
            .iter()
            .map(|time| NoteTemplate {
                time,
                lane: self.policy.next_lane(time),
            })
            .collect();
        log::info!(
            "generated chart: {} notes, tempo {}",
            notes.len(),
            tempo.map_or_else(|| "unknown".to_string(), |t| t.bpm().to_string())
        );
        Chart::new(notes, tempo).with_warnings(warnings)
    }

    /// Chart for when no sample buffer exists, e.g. decoding failed. Uses the
    /// metronome grid over `duration`, or the configured grid length when
    /// the duration is unknown.
    pub fn fallback(&mut self, duration: Option<f64>, reason: ChartWarning) -> Chart {
        let span = match duration {
            Some(d) if d > 0.0 && d.is_finite() => d,
            _ => self.fallback.duration,
        };
        log::warn!("using fallback grid ({reason:?})");
        let beats = metronome_grid(span, self.fallback.spacing);
        self.generate(&beats, None, vec![reason])
    }
}

impl std::fmt::Debug for ChartGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartGenerator")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
