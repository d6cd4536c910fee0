//! Measure tables of per-subdivision lanes, used to build charts on a fixed
//! tempo grid instead of detected onsets.

use onbeat_types::{Chart, Lane, NoteTemplate, Tempo};

pub const BEATS_PER_MEASURE: usize = 4;
/// Subdivisions of one beat (sixteenth notes in 4/4).
pub const SUBDIVISIONS: usize = 4;

/// `measure[beat][subdivision]`: the lane struck there, if any.
pub type Measure = [[Option<Lane>; SUBDIVISIONS]; BEATS_PER_MEASURE];

const W: Option<Lane> = Some(Lane::Key1);
const A: Option<Lane> = Some(Lane::Key2);
const S: Option<Lane> = Some(Lane::Key3);
const D: Option<Lane> = Some(Lane::Key4);
const X: Option<Lane> = None;

/// A repeating sequence of measures.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternTable {
    measures: Vec<Measure>,
}

impl Default for PatternTable {
    /// Two measures: a sparse one, then a syncopated variation.
    fn default() -> Self {
        Self::new(vec![
            [[W, X, X, X], [A, X, S, X], [X, X, X, X], [D, X, X, X]],
            [[W, X, A, X], [X, X, S, X], [A, X, X, D], [X, W, X, X]],
        ])
    }
}

impl PatternTable {
    pub fn new(measures: Vec<Measure>) -> Self {
        Self { measures }
    }

    pub fn measures(&self) -> &[Measure] {
        &self.measures
    }

    /// Filled cells in reading order (measure, beat, subdivision).
    pub fn cells(&self) -> impl Iterator<Item = Lane> + '_ {
        self.measures
            .iter()
            .flat_map(|m| m.iter())
            .flat_map(|beat| beat.iter())
            .filter_map(|cell| *cell)
    }

    /// The pattern of global beat `beat_index`; measures repeat in order.
    pub fn beat(&self, beat_index: usize) -> Option<&[Option<Lane>; SUBDIVISIONS]> {
        if self.measures.is_empty() {
            return None;
        }
        let measure = (beat_index / BEATS_PER_MEASURE) % self.measures.len();
        Some(&self.measures[measure][beat_index % BEATS_PER_MEASURE])
    }

    /// Lays the table over a constant-tempo grid from `start` for `duration`
    /// seconds. Cells falling at or after the end are dropped. A non-finite
    /// start, or a duration that is not a finite positive number, yields an
    /// empty chart.
    pub fn generate(&self, tempo: Tempo, start: f64, duration: f64) -> Chart {
        if !start.is_finite() || !duration.is_finite() || duration <= 0.0 {
            log::warn!("no pattern chart for start {start}, duration {duration}");
            return Chart::new(Vec::new(), Some(tempo));
        }
        let end = start + duration;
        let beat = tempo.beat_seconds();
        let step = beat / SUBDIVISIONS as f64;
        let mut notes = Vec::new();

        let mut beat_index = 0;
        loop {
            let beat_time = start + beat_index as f64 * beat;
            if beat_time >= end {
                break;
            }
            let Some(cells) = self.beat(beat_index) else {
                break;
            };
            for (sub, cell) in cells.iter().enumerate() {
                let time = beat_time + sub as f64 * step;
                if let Some(lane) = *cell
                    && time < end
                {
                    notes.push(NoteTemplate { time, lane });
                }
            }
            beat_index += 1;
        }

        log::debug!(
            "pattern chart: {} notes over {} beats at {} BPM",
            notes.len(),
            beat_index,
            tempo.bpm()
        );
        Chart::new(notes, Some(tempo))
    }
}
