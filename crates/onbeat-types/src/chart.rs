use serde::{Deserialize, Serialize};

use crate::lane::Lane;
use crate::tempo::Tempo;

/// One chart entry: when and where a note should appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteTemplate {
    pub time: f64,
    pub lane: Lane,
}

/// Non-fatal conditions met while preparing a chart. Each one has already
/// been recovered from by the time it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartWarning {
    /// The audio could not be decoded; the metronome grid was used.
    DecodeFailure { reason: String },
    /// Too few onsets were found; the metronome grid was used.
    SparseChart { found: usize },
    /// The tempo estimate fell outside the sane range and was discarded.
    InvalidTempo { bpm: f64 },
}

/// An ordered list of note templates ready for scheduling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    notes: Vec<NoteTemplate>,
    /// Tempo estimate, if one survived validation.
    pub tempo: Option<Tempo>,
    pub warnings: Vec<ChartWarning>,
}

impl Chart {
    /// Builds a chart. Templates are stably sorted by time so chart order is
    /// non-decreasing in time.
    pub fn new(mut notes: Vec<NoteTemplate>, tempo: Option<Tempo>) -> Self {
        notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            notes,
            tempo,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<ChartWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn notes(&self) -> &[NoteTemplate] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&NoteTemplate> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Whether the chart came from the fallback grid rather than detection.
    pub fn is_fallback(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                ChartWarning::DecodeFailure { .. } | ChartWarning::SparseChart { .. }
            )
        })
    }

    /// Time of the last note, or 0 for an empty chart.
    pub fn last_time(&self) -> f64 {
        self.notes.last().map_or(0.0, |n| n.time)
    }
}
