// Shared gameplay data model: lanes, notes, beat times, tempo, score, judgments, input, clocks

pub mod beat;
pub mod chart;
pub mod clock;
pub mod input;
pub mod judgment;
pub mod lane;
pub mod note;
pub mod score;
pub mod tempo;

pub use beat::{BeatTimes, MIN_BEAT_GAP, metronome_grid};
pub use chart::{Chart, ChartWarning, NoteTemplate};
pub use clock::{Clock, ManualClock, WallClock};
pub use input::{InputEvent, InputSource, TraceInput};
pub use judgment::{JudgeLabel, JudgmentResult};
pub use lane::{LANE_COUNT, Lane, LaneBinding, LaneBindings};
pub use note::{DecayWindows, Note, NoteId, NoteState, Position};
pub use score::{ScoreRule, ScoreState};
pub use tempo::{Tempo, TempoChange, TempoMap};

/// Converts seconds to integer microseconds, rounding to the nearest tick.
///
/// Timing comparisons are done on integer microseconds so window boundaries
/// such as 80ms compare exactly instead of drifting with f64 error.
pub fn to_micros(seconds: f64) -> i64 {
    (seconds * 1_000_000.0).round() as i64
}
