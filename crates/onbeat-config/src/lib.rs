// Game configuration: detector, scheduler, judge table, approach, playfield

pub mod detector_config;
pub mod error;
pub mod game_config;
pub mod judge_config;
pub mod pattern_config;
pub mod play_config;

pub use detector_config::DetectorConfig;
pub use error::ConfigError;
pub use game_config::GameConfig;
pub use judge_config::{JudgeConfig, JudgeWindow};
pub use pattern_config::PatternConfig;
pub use play_config::{ApproachConfig, PlayfieldConfig, SchedulerConfig};

/// Clamps `value` into `[lo, hi]`, replacing non-finite values with `fallback`.
pub(crate) fn clamp_finite(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_finite_replaces_nan() {
        assert_eq!(clamp_finite(f64::NAN, 0.0, 1.0, 0.5), 0.5);
        assert_eq!(clamp_finite(f64::INFINITY, 0.0, 1.0, 0.5), 0.5);
        assert_eq!(clamp_finite(3.0, 0.0, 1.0, 0.5), 1.0);
    }
}
