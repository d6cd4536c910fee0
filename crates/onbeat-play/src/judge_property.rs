use serde::{Deserialize, Serialize};

use onbeat_config::{JudgeConfig, JudgeWindow};
use onbeat_types::{JudgeLabel, ScoreRule, to_micros};

/// One classifier row with its window in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeRow {
    pub label: JudgeLabel,
    /// Inclusive limit on `|input - note|` in μs.
    pub window_us: i64,
    pub base_score: u64,
}

/// Table-driven timing classifier.
///
/// Rows are ordered narrowest first; an offset takes the first row whose
/// window contains it. Offsets outside every row do not judge the note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeProperty {
    rows: Vec<JudgeRow>,
    /// Pending notes are missed automatically once the clock is more than
    /// this many μs past them.
    auto_miss_us: i64,
    pub hit_radius_scale: f32,
    pub score_rule: ScoreRule,
}

impl JudgeProperty {
    /// Builds a classifier from validated config windows.
    pub fn new(
        windows: &[JudgeWindow],
        miss_grace: f64,
        hit_radius_scale: f32,
        score_rule: ScoreRule,
    ) -> Self {
        let rows: Vec<JudgeRow> = windows
            .iter()
            .map(|w| JudgeRow {
                label: w.label,
                window_us: to_micros(w.window),
                base_score: w.base_score,
            })
            .collect();
        let widest_hit = rows
            .iter()
            .filter(|r| r.label.is_hit())
            .map(|r| r.window_us)
            .max()
            .unwrap_or(0);
        Self {
            rows,
            auto_miss_us: widest_hit + to_micros(miss_grace),
            hit_radius_scale,
            score_rule,
        }
    }

    pub fn rows(&self) -> &[JudgeRow] {
        &self.rows
    }

    pub fn auto_miss_us(&self) -> i64 {
        self.auto_miss_us
    }

    /// Widest window of the table, beyond which input is ignored.
    pub fn max_window_us(&self) -> i64 {
        self.rows.last().map_or(0, |r| r.window_us)
    }

    /// Classifies a signed offset in μs.
    pub fn classify_us(&self, offset_us: i64) -> Option<&JudgeRow> {
        let d = offset_us.abs();
        self.rows.iter().find(|r| d <= r.window_us)
    }

    /// Classifies an input at `at` against a note at `note_time`.
    pub fn classify(&self, note_time: f64, at: f64) -> Option<&JudgeRow> {
        self.classify_us(to_micros(at) - to_micros(note_time))
    }

    /// Whether a note at `note_time` is past its automatic-miss limit at `now`.
    pub fn is_overdue(&self, note_time: f64, now: f64) -> bool {
        to_micros(now) - to_micros(note_time) > self.auto_miss_us
    }
}

impl From<&JudgeConfig> for JudgeProperty {
    fn from(config: &JudgeConfig) -> Self {
        Self::new(
            &config.windows,
            config.miss_grace,
            config.hit_radius_scale,
            config.score_rule(),
        )
    }
}

impl Default for JudgeProperty {
    fn default() -> Self {
        Self::from(&JudgeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(offset_s: f64) -> Option<JudgeLabel> {
        JudgeProperty::default()
            .classify(2.0, 2.0 + offset_s)
            .map(|r| r.label)
    }

    #[test]
    fn default_rows() {
        let p = JudgeProperty::default();
        let windows: Vec<i64> = p.rows().iter().map(|r| r.window_us).collect();
        assert_eq!(windows, vec![80_000, 180_000, 350_000]);
        assert_eq!(p.auto_miss_us(), 380_000);
        assert_eq!(p.max_window_us(), 350_000);
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(label(0.0), Some(JudgeLabel::Cool));
        assert_eq!(label(0.08), Some(JudgeLabel::Cool));
        assert_eq!(label(-0.08), Some(JudgeLabel::Cool));
        assert_eq!(label(0.080001), Some(JudgeLabel::Fine));
        assert_eq!(label(0.18), Some(JudgeLabel::Fine));
        assert_eq!(label(-0.18), Some(JudgeLabel::Fine));
        assert_eq!(label(0.180001), Some(JudgeLabel::Miss));
        assert_eq!(label(0.35), Some(JudgeLabel::Miss));
        assert_eq!(label(-0.35), Some(JudgeLabel::Miss));
        assert_eq!(label(0.350001), None);
        assert_eq!(label(-0.4), None);
    }

    #[test]
    fn base_scores() {
        let p = JudgeProperty::default();
        assert_eq!(p.classify_us(0).map(|r| r.base_score), Some(300));
        assert_eq!(p.classify_us(100_000).map(|r| r.base_score), Some(100));
        assert_eq!(p.classify_us(300_000).map(|r| r.base_score), Some(0));
    }

    #[test]
    fn overdue_after_fine_window_plus_grace() {
        let p = JudgeProperty::default();
        assert!(!p.is_overdue(2.0, 2.38));
        assert!(p.is_overdue(2.0, 2.380001));
        assert!(!p.is_overdue(2.0, 1.0));
    }

    #[test]
    fn custom_table() {
        let p = JudgeProperty::new(
            &[
                JudgeWindow::new(JudgeLabel::Cool, 0.05, 500),
                JudgeWindow::new(JudgeLabel::Fine, 0.1, 200),
            ],
            0.1,
            1.0,
            ScoreRule::default(),
        );
        assert_eq!(p.auto_miss_us(), 200_000);
        assert_eq!(p.classify_us(-120_000), None);
        assert_eq!(p.classify_us(-50_000).map(|r| r.base_score), Some(500));
    }
}
