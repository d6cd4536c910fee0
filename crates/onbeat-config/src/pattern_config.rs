use serde::{Deserialize, Serialize};

use onbeat_pattern::{ChartGenerator, FallbackGrid, LanePolicyKind};

/// Lane assignment for generated charts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub policy: LanePolicyKind,
    /// Seed for the uniform policy; absent means entropy.
    pub seed: Option<u64>,
}

impl PatternConfig {
    pub fn generator(&self, fallback: FallbackGrid) -> ChartGenerator {
        ChartGenerator::from_kind(self.policy, self.seed).with_fallback(fallback)
    }
}
