use serde::{Deserialize, Serialize};

/// Lowest tempo accepted as a plausible estimate.
pub const MIN_BPM: u32 = 40;
/// Highest tempo accepted as a plausible estimate.
pub const MAX_BPM: u32 = 300;
/// Tempo assumed when no usable estimate exists.
pub const DEFAULT_BPM: u32 = 120;

/// An integer tempo in beats per minute within [`MIN_BPM`, `MAX_BPM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tempo(u32);

impl Tempo {
    pub const DEFAULT: Tempo = Tempo(DEFAULT_BPM);

    /// Returns `None` when `bpm` is outside the sane musical range.
    pub fn new(bpm: u32) -> Option<Tempo> {
        (MIN_BPM..=MAX_BPM).contains(&bpm).then_some(Tempo(bpm))
    }

    /// Rounds a fractional BPM and validates it.
    pub fn from_bpm(bpm: f64) -> Option<Tempo> {
        if !bpm.is_finite() || bpm < 0.0 {
            return None;
        }
        Self::new(bpm.round() as u32)
    }

    pub fn bpm(self) -> u32 {
        self.0
    }

    /// Length of one beat in seconds.
    pub fn beat_seconds(self) -> f64 {
        60.0 / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Tempo {
    type Error = String;

    fn try_from(bpm: u32) -> Result<Self, Self::Error> {
        Tempo::new(bpm).ok_or_else(|| format!("tempo {bpm} outside {MIN_BPM}..={MAX_BPM}"))
    }
}

impl From<Tempo> for u32 {
    fn from(t: Tempo) -> u32 {
        t.0
    }
}

/// A tempo change taking effect at `time` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub time: f64,
    pub bpm: f64,
}

impl TempoChange {
    pub fn beat_seconds(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// Piecewise-constant tempo map, sorted by change time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl TempoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with a single tempo from time 0.
    pub fn constant(tempo: Tempo) -> Self {
        let mut map = Self::new();
        map.add_change(0.0, tempo.bpm() as f64);
        map
    }

    /// Inserts a change, keeping the map sorted. Non-positive BPMs are ignored.
    pub fn add_change(&mut self, time: f64, bpm: f64) {
        if !(bpm > 0.0) || !time.is_finite() {
            log::warn!("ignoring tempo change {bpm} at {time}s");
            return;
        }
        let pos = self.changes.partition_point(|c| c.time <= time);
        self.changes.insert(pos, TempoChange { time, bpm });
    }

    pub fn reset(&mut self) {
        self.changes.clear();
    }

    pub fn changes(&self) -> &[TempoChange] {
        &self.changes
    }

    /// The change in effect at `t`. Before the first change, the first change applies.
    pub fn bpm_at(&self, t: f64) -> Option<&TempoChange> {
        let first = self.changes.first()?;
        Some(
            self.changes
                .iter()
                .take_while(|c| c.time <= t)
                .last()
                .unwrap_or(first),
        )
    }

    /// Converts a beat count to seconds by walking the segments in order.
    /// The last segment extends forever. An empty map yields 0.
    pub fn beat_to_seconds(&self, beat: f64) -> f64 {
        let mut accumulated = 0.0;
        let mut remaining = beat;
        for (i, seg) in self.changes.iter().enumerate() {
            let beats_in_seg = match self.changes.get(i + 1) {
                Some(next) => (next.time - seg.time) / seg.beat_seconds(),
                None => f64::INFINITY,
            };
            if remaining > beats_in_seg {
                accumulated += beats_in_seg * seg.beat_seconds();
                remaining -= beats_in_seg;
            } else {
                accumulated += remaining * seg.beat_seconds();
                break;
            }
        }
        accumulated
    }
}
