use serde::{Deserialize, Serialize};

use onbeat_types::score::COMBO_BONUS_PERCENT;
use onbeat_types::{JudgeLabel, ScoreRule};

use crate::clamp_finite;
use crate::error::ConfigError;

/// One row of the judge table: inputs within `window` seconds of the note
/// (and outside every narrower row) get `label` and `base_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JudgeWindow {
    pub label: JudgeLabel,
    pub window: f64,
    pub base_score: u64,
}

impl JudgeWindow {
    pub const fn new(label: JudgeLabel, window: f64, base_score: u64) -> Self {
        Self {
            label,
            window,
            base_score,
        }
    }
}

/// The default table: COOL within 80 ms, FINE within 180 ms and an explicit
/// MISS band out to 350 ms.
pub const DEFAULT_WINDOWS: [JudgeWindow; 3] = [
    JudgeWindow::new(JudgeLabel::Cool, 0.08, 300),
    JudgeWindow::new(JudgeLabel::Fine, 0.18, 100),
    JudgeWindow::new(JudgeLabel::Miss, 0.35, 0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Ordered narrowest first.
    #[serde(default = "default_windows")]
    pub windows: Vec<JudgeWindow>,
    /// Extra seconds after the widest hit window before a pending note is
    /// missed automatically.
    #[serde(default = "default_miss_grace")]
    pub miss_grace: f64,
    /// Pointer taps reach notes within this multiple of the note radius.
    #[serde(default = "default_hit_radius_scale")]
    pub hit_radius_scale: f32,
    #[serde(default = "default_combo_bonus_percent")]
    pub combo_bonus_percent: u64,
}

fn default_windows() -> Vec<JudgeWindow> {
    DEFAULT_WINDOWS.to_vec()
}

fn default_miss_grace() -> f64 {
    0.20
}

fn default_hit_radius_scale() -> f32 {
    1.2
}

fn default_combo_bonus_percent() -> u64 {
    COMBO_BONUS_PERCENT
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            windows: default_windows(),
            miss_grace: default_miss_grace(),
            hit_radius_scale: default_hit_radius_scale(),
            combo_bonus_percent: default_combo_bonus_percent(),
        }
    }
}

impl JudgeConfig {
    /// Clamps scalar settings and checks the window table.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.miss_grace = clamp_finite(self.miss_grace, 0.0, 2.0, default_miss_grace());
        self.hit_radius_scale = if self.hit_radius_scale.is_finite() {
            self.hit_radius_scale.clamp(0.1, 10.0)
        } else {
            default_hit_radius_scale()
        };
        self.combo_bonus_percent = self.combo_bonus_percent.min(100);

        if self.windows.is_empty() {
            return Err(ConfigError::EmptyWindowTable);
        }
        let mut previous = 0.0;
        for (index, w) in self.windows.iter().enumerate() {
            if !w.window.is_finite() || w.window <= 0.0 {
                return Err(ConfigError::InvalidWindow {
                    index,
                    window: w.window,
                });
            }
            if index > 0 && w.window <= previous {
                return Err(ConfigError::WindowsNotAscending {
                    index,
                    window: w.window,
                });
            }
            previous = w.window;
        }
        if !self.windows.iter().any(|w| w.label.is_hit()) {
            return Err(ConfigError::NoHitWindow);
        }
        Ok(())
    }

    pub fn score_rule(&self) -> ScoreRule {
        ScoreRule {
            combo_bonus_percent: self.combo_bonus_percent,
        }
    }
}
