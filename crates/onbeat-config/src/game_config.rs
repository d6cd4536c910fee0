use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use onbeat_pattern::ChartGenerator;
use onbeat_types::DecayWindows;

use crate::clamp_finite;
use crate::detector_config::DetectorConfig;
use crate::error::ConfigError;
use crate::judge_config::JudgeConfig;
use crate::pattern_config::PatternConfig;
use crate::play_config::{ApproachConfig, PlayfieldConfig, SchedulerConfig};

/// All gameplay tuning. Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub detector: DetectorConfig,
    pub scheduler: SchedulerConfig,
    pub judge: JudgeConfig,
    pub approach: ApproachConfig,
    pub decay: DecayWindows,
    pub pattern: PatternConfig,
    pub playfield: PlayfieldConfig,
}

impl GameConfig {
    /// Clamps every section into range. Fails only on a judge table that
    /// cannot be repaired.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.detector.validate();
        self.scheduler.validate();
        self.approach.validate();
        self.playfield.validate();
        let d = DecayWindows::default();
        self.decay.hit = clamp_finite(self.decay.hit, 0.0, 5.0, d.hit);
        self.decay.miss = clamp_finite(self.decay.miss, 0.0, 5.0, d.miss);
        self.judge.validate()
    }

    /// Chart generator using the configured lane policy and fallback grid.
    pub fn chart_generator(&self) -> ChartGenerator {
        self.pattern.generator(self.detector.fallback_grid())
    }

    /// Read config from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut config: GameConfig = serde_json::from_str(&data)?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write config to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
