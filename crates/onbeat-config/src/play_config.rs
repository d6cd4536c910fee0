use serde::{Deserialize, Serialize};

use crate::clamp_finite;

/// Note scheduler pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds ahead of the clock that notes are activated.
    pub lookahead: f64,
    /// Maximum number of simultaneously pending notes.
    pub max_pending: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lookahead: 8.0,
            max_pending: 4,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&mut self) {
        self.lookahead = clamp_finite(self.lookahead, 0.5, 60.0, Self::default().lookahead);
        self.max_pending = self.max_pending.clamp(1, 32);
    }
}

/// Approach-time smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachConfig {
    /// Base approach in seconds when the chart has no tempo.
    pub default_seconds: f64,
    /// Added to the target approach per active note.
    pub density_increment: f64,
    /// Fraction of the remaining distance covered per tick.
    pub smoothing: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            default_seconds: 1.4 + 240.0 / 120.0,
            density_increment: 0.12,
            smoothing: 0.18,
        }
    }
}

impl ApproachConfig {
    pub fn validate(&mut self) {
        let d = Self::default();
        self.default_seconds = clamp_finite(self.default_seconds, 0.2, 20.0, d.default_seconds);
        self.density_increment =
            clamp_finite(self.density_increment, 0.0, 2.0, d.density_increment);
        self.smoothing = clamp_finite(self.smoothing, 0.01, 1.0, d.smoothing);
    }
}

/// Playfield geometry used for note placement and pointer judging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Note radius as a fraction of the shorter playfield side.
    pub note_radius_scale: f32,
    /// Seed for note placement; absent means entropy.
    pub seed: Option<u64>,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            note_radius_scale: 0.045,
            seed: None,
        }
    }
}

impl PlayfieldConfig {
    pub fn validate(&mut self) {
        let d = Self::default();
        let fix = |v: f32, lo: f32, hi: f32, fallback: f32| {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        };
        self.width = fix(self.width, 16.0, 16384.0, d.width);
        self.height = fix(self.height, 16.0, 16384.0, d.height);
        self.note_radius_scale = fix(self.note_radius_scale, 0.005, 0.5, d.note_radius_scale);
    }

    /// Note radius in playfield units.
    pub fn note_radius(&self) -> f32 {
        self.width.min(self.height) * self.note_radius_scale
    }
}
