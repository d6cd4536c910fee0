use serde::{Deserialize, Serialize};

use crate::judgment::JudgeLabel;

/// Combo bonus applied per combo step, in percent of the base score.
pub const COMBO_BONUS_PERCENT: u64 = 5;

/// Scoring rule: `floor(base * (100 + combo * bonus) / 100)`.
///
/// Integer percent arithmetic keeps the floor exact for every combo value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub combo_bonus_percent: u64,
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self {
            combo_bonus_percent: COMBO_BONUS_PERCENT,
        }
    }
}

impl ScoreRule {
    /// Score for a hit given the combo *before* this hit.
    pub fn hit_score(&self, base: u64, combo_before: u32) -> u64 {
        base * (100 + combo_before as u64 * self.combo_bonus_percent) / 100
    }
}

/// Running score and combo of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub cool_count: u32,
    pub fine_count: u32,
    pub miss_count: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a hit and returns the score delta.
    pub fn apply_hit(&mut self, label: JudgeLabel, base: u64, rule: &ScoreRule) -> u64 {
        let delta = rule.hit_score(base, self.combo);
        self.combo += 1;
        self.score += delta;
        self.max_combo = self.max_combo.max(self.combo);
        match label {
            JudgeLabel::Cool => self.cool_count += 1,
            JudgeLabel::Fine => self.fine_count += 1,
            JudgeLabel::Miss => self.miss_count += 1,
        }
        delta
    }

    /// Applies a miss: combo drops to zero, score is unchanged.
    pub fn apply_miss(&mut self) {
        self.combo = 0;
        self.miss_count += 1;
    }

    pub fn judged_count(&self) -> u32 {
        self.cool_count + self.fine_count + self.miss_count
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_cools_from_zero() {
        let rule = ScoreRule::default();
        let mut s = ScoreState::new();
        assert_eq!(s.apply_hit(JudgeLabel::Cool, 300, &rule), 300);
        assert_eq!(s.combo, 1);
        assert_eq!(s.apply_hit(JudgeLabel::Cool, 300, &rule), 315);
        assert_eq!(s.combo, 2);
        assert_eq!(s.score, 615);
    }

    #[test]
    fn floor_is_exact_at_awkward_combos() {
        let rule = ScoreRule::default();
        // 100 * (1 + 3 * 0.05) is 114.99999999999999 in f64.
        assert_eq!(rule.hit_score(100, 3), 115);
        assert_eq!(rule.hit_score(100, 21), 205);
        assert_eq!(rule.hit_score(100, 1), 105);
        assert_eq!(rule.hit_score(100, 7), 135);
    }

    #[test]
    fn miss_resets_combo_keeps_max() {
        let rule = ScoreRule::default();
        let mut s = ScoreState::new();
        for _ in 0..5 {
            s.apply_hit(JudgeLabel::Fine, 100, &rule);
        }
        let before = s.score;
        s.apply_miss();
        assert_eq!(s.combo, 0);
        assert_eq!(s.max_combo, 5);
        assert_eq!(s.score, before);
        assert_eq!(s.judged_count(), 6);
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = ScoreState::new();
        s.apply_hit(JudgeLabel::Cool, 300, &ScoreRule::default());
        s.reset();
        assert_eq!(s, ScoreState::default());
    }
}
