use serde::{Deserialize, Serialize};

/// Minimum spacing between two accepted beats, in seconds.
pub const MIN_BEAT_GAP: f64 = 0.23;

/// Strictly increasing beat timestamps in seconds with a minimum gap between
/// neighbours.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatTimes(Vec<f64>);

impl BeatTimes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Greedy left-to-right debounce: a candidate is kept only when it lies at
    /// least `min_gap` after the last kept beat. Candidates must be ascending;
    /// out-of-order and non-finite values are dropped.
    pub fn debounced<I>(candidates: I, min_gap: f64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut beats = Self::new();
        for t in candidates {
            beats.push_debounced(t, min_gap);
        }
        beats
    }

    /// Appends `t` if it keeps the gap invariant. Returns whether it was kept.
    pub fn push_debounced(&mut self, t: f64, min_gap: f64) -> bool {
        if !t.is_finite() {
            return false;
        }
        if let Some(&last) = self.0.last()
            && t - last < min_gap
        {
            return false;
        }
        self.0.push(t);
        true
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Time between the first and last beat.
    pub fn span(&self) -> f64 {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

/// Evenly spaced beats at `spacing` seconds from 0 up to (excluding) `duration`.
///
/// Used whenever detection is unavailable or unusable. Always yields at least
/// one beat for a positive duration.
pub fn metronome_grid(duration: f64, spacing: f64) -> BeatTimes {
    if !(duration > 0.0) || !(spacing > 0.0) || !duration.is_finite() {
        return BeatTimes::new();
    }
    let count = (duration / spacing).ceil() as usize;
    BeatTimes(
        (0..count)
            .map(|i| i as f64 * spacing)
            .filter(|&t| t < duration)
            .collect(),
    )
}
