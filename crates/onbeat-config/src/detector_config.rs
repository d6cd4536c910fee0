use serde::{Deserialize, Serialize};

use onbeat_audio::OnsetConfig;
use onbeat_pattern::FallbackGrid;
use onbeat_types::MIN_BEAT_GAP;

use crate::clamp_finite;

/// Onset detector tuning as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub frame_size: usize,
    pub hop_size: usize,
    pub threshold_ratio: f64,
    /// Seconds. Never below the beat-gap invariant.
    pub min_gap: f64,
    pub min_onsets: usize,
    pub fallback_spacing: f64,
    pub fallback_duration: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let onset = OnsetConfig::default();
        Self {
            frame_size: onset.frame_size,
            hop_size: onset.hop_size,
            threshold_ratio: onset.threshold_ratio,
            min_gap: onset.min_gap,
            min_onsets: onset.min_onsets,
            fallback_spacing: onset.fallback_spacing,
            fallback_duration: onset.fallback_duration,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&mut self) {
        let d = Self::default();
        self.frame_size = self.frame_size.clamp(64, 1 << 16);
        self.hop_size = self.hop_size.clamp(1, self.frame_size);
        self.threshold_ratio = clamp_finite(self.threshold_ratio, 0.5, 10.0, d.threshold_ratio);
        self.min_gap = clamp_finite(self.min_gap, MIN_BEAT_GAP, 5.0, d.min_gap);
        self.min_onsets = self.min_onsets.clamp(2, 64);
        self.fallback_spacing =
            clamp_finite(self.fallback_spacing, MIN_BEAT_GAP, 10.0, d.fallback_spacing);
        self.fallback_duration =
            clamp_finite(self.fallback_duration, 1.0, 3600.0, d.fallback_duration);
    }

    pub fn onset_config(&self) -> OnsetConfig {
        OnsetConfig {
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            threshold_ratio: self.threshold_ratio,
            min_gap: self.min_gap,
            min_onsets: self.min_onsets,
            fallback_spacing: self.fallback_spacing,
            fallback_duration: self.fallback_duration,
        }
    }

    pub fn fallback_grid(&self) -> FallbackGrid {
        FallbackGrid {
            spacing: self.fallback_spacing,
            duration: self.fallback_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_detector() {
        assert_eq!(DetectorConfig::default().onset_config(), OnsetConfig::default());
    }

    #[test]
    fn validate_keeps_gap_invariant() {
        let mut c = DetectorConfig {
            min_gap: 0.01,
            fallback_spacing: 0.1,
            hop_size: 4096,
            ..Default::default()
        };
        c.validate();
        assert_eq!(c.min_gap, MIN_BEAT_GAP);
        assert_eq!(c.fallback_spacing, MIN_BEAT_GAP);
        assert_eq!(c.hop_size, c.frame_size);
    }
}
