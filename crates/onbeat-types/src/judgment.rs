use serde::{Deserialize, Serialize};

use crate::note::Note;

/// Label of a resolved note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeLabel {
    Cool,
    Fine,
    Miss,
}

impl JudgeLabel {
    pub fn is_hit(self) -> bool {
        !matches!(self, JudgeLabel::Miss)
    }

    /// Text shown by the HUD.
    pub fn display(self) -> &'static str {
        match self {
            JudgeLabel::Cool => "COOL",
            JudgeLabel::Fine => "FINE",
            JudgeLabel::Miss => "MISS",
        }
    }
}

/// Emitted exactly once per resolved note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentResult {
    /// Snapshot of the note after its transition.
    pub note: Note,
    pub label: JudgeLabel,
    pub score_delta: u64,
    pub combo_after: u32,
    /// Input time minus note time in seconds; `None` for automatic misses.
    pub offset: Option<f64>,
}

impl JudgmentResult {
    pub fn is_automatic(&self) -> bool {
        self.offset.is_none()
    }
}
