use serde::{Deserialize, Serialize};

use crate::lane::Lane;

/// Identifier of a materialized note. Equal to its chart index.
pub type NoteId = usize;

/// Default visual decay after a hit, in seconds.
pub const HIT_DECAY: f64 = 0.4;
/// Default visual decay after a miss, in seconds.
pub const MISS_DECAY: f64 = 0.6;

/// Judgment state of a note. `Hit` and `Missed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoteState {
    #[default]
    Pending,
    Hit,
    Missed,
}

impl NoteState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, NoteState::Pending)
    }
}

/// A point on the playfield in renderer units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// How long judged notes stay in the active set for their fade effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayWindows {
    pub hit: f64,
    pub miss: f64,
}

impl Default for DecayWindows {
    fn default() -> Self {
        Self {
            hit: HIT_DECAY,
            miss: MISS_DECAY,
        }
    }
}

/// A note in the active working set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub lane: Lane,
    /// Scheduled hit time in seconds.
    pub time: f64,
    pub state: NoteState,
    /// Clock time at which the note left `Pending`.
    pub judged_at: Option<f64>,
    /// Where the note is judged on screen (pointer input).
    pub target: Position,
    /// Where the note starts its approach.
    pub spawn: Position,
}

impl Note {
    pub fn new(id: NoteId, lane: Lane, time: f64) -> Self {
        Self {
            id,
            lane,
            time,
            state: NoteState::Pending,
            judged_at: None,
            target: Position::default(),
            spawn: Position::default(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == NoteState::Pending
    }

    /// Moves the note to a terminal state.
    ///
    /// Returns `false` and leaves the note untouched when it was already judged
    /// or when `state` is `Pending`.
    pub fn resolve(&mut self, state: NoteState, at: f64) -> bool {
        if self.state.is_terminal() || !state.is_terminal() {
            return false;
        }
        self.state = state;
        self.judged_at = Some(at);
        true
    }

    /// Whether a judged note has finished its fade and can be dropped.
    /// Pending notes never expire.
    pub fn is_expired(&self, now: f64, decay: &DecayWindows) -> bool {
        let Some(at) = self.judged_at else {
            return false;
        };
        let window = match self.state {
            NoteState::Pending => return false,
            NoteState::Hit => decay.hit,
            NoteState::Missed => decay.miss,
        };
        now - at > window
    }

    /// Fraction of the approach travelled at `now`: 0 at spawn, 1 at the target.
    pub fn approach_progress(&self, now: f64, approach: f64) -> f64 {
        if approach <= 0.0 {
            return 1.0;
        }
        1.0 - (self.time - now) / approach
    }

    /// Interpolated on-screen position for a pending note.
    pub fn position_at(&self, now: f64, approach: f64) -> Position {
        let t = self.approach_progress(now, approach) as f32;
        Position::new(
            self.spawn.x + (self.target.x - self.spawn.x) * t,
            self.spawn.y + (self.target.y - self.spawn.y) * t,
        )
    }

    /// Pending notes are drawn only while their progress is within [0, 1.5].
    pub fn is_visible(&self, now: f64, approach: f64) -> bool {
        let p = self.approach_progress(now, approach);
        (0.0..=1.5).contains(&p)
    }
}
