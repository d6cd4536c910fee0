//! Judgment engine: resolves pending notes from lane and pointer input and
//! from the passage of time, and keeps score and combo.

use onbeat_types::{
    JudgeLabel, JudgmentResult, Lane, Note, NoteState, Position, ScoreState, to_micros,
};

use crate::judge_property::{JudgeProperty, JudgeRow};

/// How long the HUD shows the most recent label, in seconds.
pub const JUDGMENT_DISPLAY_SECONDS: f64 = 0.5;

/// Divisor turning pointer distance into the tie-break term of pointer
/// selection. Distance and seconds are mixed without normalisation; this is
/// a heuristic, not an optimal matching.
const POINTER_DISTANCE_WEIGHT: f64 = 1000.0;

#[derive(Debug, Clone, Default)]
pub struct JudgeEngine {
    property: JudgeProperty,
    score: ScoreState,
    /// Most recent label and the clock time it was emitted.
    last: Option<(JudgeLabel, f64)>,
}

impl JudgeEngine {
    pub fn new(property: JudgeProperty) -> Self {
        Self {
            property,
            score: ScoreState::new(),
            last: None,
        }
    }

    pub fn property(&self) -> &JudgeProperty {
        &self.property
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn reset(&mut self) {
        self.score.reset();
        self.last = None;
    }

    /// Judges a lane tap at `at`.
    ///
    /// Picks the pending note in `lane` nearest in time (earliest on ties).
    /// Returns `None` when the lane has no pending note or the nearest one is
    /// outside every window; the note is then left untouched.
    pub fn judge_lane(
        &mut self,
        notes: &mut [Note],
        lane: Lane,
        at: f64,
    ) -> Option<JudgmentResult> {
        let at_us = to_micros(at);
        let (index, offset_us) = notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_pending() && n.lane == lane)
            .map(|(i, n)| (i, at_us - to_micros(n.time)))
            .min_by_key(|&(_, offset)| offset.abs())?;

        let Some(row) = self.property.classify_us(offset_us).copied() else {
            log::trace!("stray tap on {lane:?} at {at:.3} ({offset_us}us from nearest note)");
            return None;
        };
        Some(self.resolve(&mut notes[index], row, at, Some(offset_us as f64 / 1e6)))
    }

    /// Judges a pointer tap at `pos`.
    ///
    /// Only pending notes whose target lies within `hit_radius_scale *
    /// note_radius` of the tap are eligible; among them the note minimising
    /// `|time offset| + distance / 1000` is chosen. Its time offset is then
    /// classified like a lane tap.
    pub fn judge_pointer(
        &mut self,
        notes: &mut [Note],
        pos: Position,
        at: f64,
        note_radius: f32,
    ) -> Option<JudgmentResult> {
        let reach = note_radius * self.property.hit_radius_scale;
        let (index, _) = notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_pending())
            .filter_map(|(i, n)| {
                let dist = n.target.distance(pos);
                (dist <= reach)
                    .then(|| (i, (n.time - at).abs() + dist as f64 / POINTER_DISTANCE_WEIGHT))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        let offset_us = to_micros(at) - to_micros(notes[index].time);
        let row = self.property.classify_us(offset_us).copied()?;
        Some(self.resolve(&mut notes[index], row, at, Some(offset_us as f64 / 1e6)))
    }

    /// Misses every pending note whose automatic-miss limit has passed.
    pub fn sweep_misses(&mut self, notes: &mut [Note], now: f64) -> Vec<JudgmentResult> {
        let mut results = Vec::new();
        for note in notes.iter_mut() {
            if note.is_pending() && self.property.is_overdue(note.time, now) {
                note.resolve(NoteState::Missed, now);
                self.score.apply_miss();
                self.last = Some((JudgeLabel::Miss, now));
                log::debug!("note {} missed automatically at {now:.3}", note.id);
                results.push(JudgmentResult {
                    note: note.clone(),
                    label: JudgeLabel::Miss,
                    score_delta: 0,
                    combo_after: 0,
                    offset: None,
                });
            }
        }
        results
    }

    fn resolve(
        &mut self,
        note: &mut Note,
        row: JudgeRow,
        at: f64,
        offset: Option<f64>,
    ) -> JudgmentResult {
        let score_delta = if row.label.is_hit() {
            note.resolve(NoteState::Hit, at);
            self.score
                .apply_hit(row.label, row.base_score, &self.property.score_rule)
        } else {
            note.resolve(NoteState::Missed, at);
            self.score.apply_miss();
            0
        };
        self.last = Some((row.label, at));
        log::debug!(
            "note {} {} (+{score_delta}, combo {})",
            note.id,
            row.label.display(),
            self.score.combo
        );
        JudgmentResult {
            note: note.clone(),
            label: row.label,
            score_delta,
            combo_after: self.score.combo,
            offset,
        }
    }

    pub fn last_judgment(&self) -> Option<(JudgeLabel, f64)> {
        self.last
    }

    /// The label a HUD should show at `now`, if the last one is still fresh.
    pub fn last_judgment_visible(&self, now: f64) -> Option<JudgeLabel> {
        let (label, at) = self.last?;
        (now - at < JUDGMENT_DISPLAY_SECONDS).then_some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_at(id: usize, lane: Lane, time: f64) -> Note {
        Note::new(id, lane, time)
    }

    fn single(time: f64) -> Vec<Note> {
        vec![note_at(0, Lane::Key1, time)]
    }

    #[test]
    fn cool_fine_miss_and_stray() {
        let cases = [
            (2.03, Some(JudgeLabel::Cool)),
            (2.12, Some(JudgeLabel::Fine)),
            (2.30, Some(JudgeLabel::Miss)),
            (2.40, None),
        ];
        for (at, expected) in cases {
            let mut engine = JudgeEngine::default();
            let mut notes = single(2.0);
            let result = engine.judge_lane(&mut notes, Lane::Key1, at);
            assert_eq!(result.as_ref().map(|r| r.label), expected, "tap at {at}");
            match expected {
                Some(JudgeLabel::Miss) => assert_eq!(notes[0].state, NoteState::Missed),
                Some(_) => assert_eq!(notes[0].state, NoteState::Hit),
                None => {
                    assert!(notes[0].is_pending());
                    assert_eq!(engine.score(), &ScoreState::default());
                }
            }
        }
    }

    #[test]
    fn two_cools_score_615() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 1.0), note_at(1, Lane::Key2, 1.5)];

        let first = engine.judge_lane(&mut notes, Lane::Key1, 1.0).unwrap();
        assert_eq!((first.score_delta, first.combo_after), (300, 1));
        let second = engine.judge_lane(&mut notes, Lane::Key2, 1.5).unwrap();
        assert_eq!((second.score_delta, second.combo_after), (315, 2));
        assert_eq!(engine.score().score, 615);
        assert_eq!(engine.score().cool_count, 2);
    }

    #[test]
    fn empty_lane_is_ignored() {
        let mut engine = JudgeEngine::default();
        let mut notes = single(2.0);
        assert!(engine.judge_lane(&mut notes, Lane::Key3, 2.0).is_none());
        assert!(notes[0].is_pending());
        assert!(engine.last_judgment().is_none());
    }

    #[test]
    fn nearest_note_wins_over_first() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 1.0), note_at(1, Lane::Key1, 1.3)];
        let r = engine.judge_lane(&mut notes, Lane::Key1, 1.25).unwrap();
        assert_eq!(r.note.id, 1);
        assert_eq!(r.label, JudgeLabel::Cool);
        assert!(notes[0].is_pending());
    }

    #[test]
    fn equal_distance_prefers_earlier() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 1.0), note_at(1, Lane::Key1, 1.2)];
        let r = engine.judge_lane(&mut notes, Lane::Key1, 1.1).unwrap();
        assert_eq!(r.note.id, 0);
    }

    #[test]
    fn judged_notes_are_not_selected_again() {
        let mut engine = JudgeEngine::default();
        let mut notes = single(1.0);
        assert!(engine.judge_lane(&mut notes, Lane::Key1, 1.0).is_some());
        assert!(engine.judge_lane(&mut notes, Lane::Key1, 1.0).is_none());
        assert_eq!(engine.score().judged_count(), 1);
    }

    #[test]
    fn explicit_miss_resets_combo() {
        let mut engine = JudgeEngine::default();
        let mut notes: Vec<Note> = (0..6).map(|i| note_at(i, Lane::Key1, i as f64)).collect();
        for i in 0..5 {
            engine.judge_lane(&mut notes, Lane::Key1, i as f64).unwrap();
        }
        assert_eq!(engine.score().combo, 5);
        let miss = engine.judge_lane(&mut notes, Lane::Key1, 5.25).unwrap();
        assert_eq!(miss.label, JudgeLabel::Miss);
        assert_eq!(miss.score_delta, 0);
        assert_eq!(miss.combo_after, 0);
        assert_eq!(engine.score().combo, 0);
        assert_eq!(engine.score().max_combo, 5);
    }

    #[test]
    fn sweep_misses_overdue_only() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 1.0), note_at(1, Lane::Key2, 1.2)];
        engine.judge_lane(&mut notes, Lane::Key2, 1.2).unwrap();

        assert!(engine.sweep_misses(&mut notes, 1.38).is_empty());
        let missed = engine.sweep_misses(&mut notes, 1.39);
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].note.id, 0);
        assert!(missed[0].is_automatic());
        assert_eq!(notes[0].judged_at, Some(1.39));
        assert_eq!(engine.score().combo, 0);
        assert!(engine.sweep_misses(&mut notes, 10.0).is_empty());
    }

    #[test]
    fn pointer_prefers_timing_then_distance() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 2.0), note_at(1, Lane::Key2, 2.05)];
        notes[0].target = Position::new(100.0, 100.0);
        notes[1].target = Position::new(110.0, 100.0);

        // Tap between the two, on time for note 1.
        let r = engine
            .judge_pointer(&mut notes, Position::new(105.0, 100.0), 2.05, 30.0)
            .unwrap();
        assert_eq!(r.note.id, 1);
        assert_eq!(r.label, JudgeLabel::Cool);
    }

    #[test]
    fn pointer_outside_reach_is_ignored() {
        let mut engine = JudgeEngine::default();
        let mut notes = single(2.0);
        notes[0].target = Position::new(0.0, 0.0);
        // reach = 30 * 1.2 = 36
        assert!(
            engine
                .judge_pointer(&mut notes, Position::new(37.0, 0.0), 2.0, 30.0)
                .is_none()
        );
        assert!(
            engine
                .judge_pointer(&mut notes, Position::new(35.0, 0.0), 2.0, 30.0)
                .is_some()
        );
    }

    #[test]
    fn pointer_same_time_breaks_tie_by_distance() {
        let mut engine = JudgeEngine::default();
        let mut notes = vec![note_at(0, Lane::Key1, 2.0), note_at(1, Lane::Key2, 2.0)];
        notes[0].target = Position::new(20.0, 0.0);
        notes[1].target = Position::new(5.0, 0.0);
        let r = engine
            .judge_pointer(&mut notes, Position::new(0.0, 0.0), 2.0, 30.0)
            .unwrap();
        assert_eq!(r.note.id, 1);
    }

    #[test]
    fn hud_label_fades_after_half_a_second() {
        let mut engine = JudgeEngine::default();
        let mut notes = single(1.0);
        engine.judge_lane(&mut notes, Lane::Key1, 1.0).unwrap();
        assert_eq!(engine.last_judgment_visible(1.2), Some(JudgeLabel::Cool));
        assert_eq!(engine.last_judgment_visible(1.5), None);
    }
}
