use onbeat_config::ApproachConfig;
use onbeat_types::Tempo;

/// Base approach time for a tempo: `1.4 + 240 / bpm` seconds.
pub fn base_approach(tempo: Tempo) -> f64 {
    1.4 + 240.0 / tempo.bpm() as f64
}

/// Exponentially damped note travel time. Busier screens get longer travel.
///
/// Purely visual: judgment never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachSmoother {
    base: f64,
    density_increment: f64,
    smoothing: f64,
    smoothed: f64,
}

impl ApproachSmoother {
    /// Uses the tempo-derived base when a tempo exists, else
    /// `config.default_seconds`.
    pub fn new(tempo: Option<Tempo>, config: &ApproachConfig) -> Self {
        let base = tempo.map_or(config.default_seconds, base_approach);
        Self {
            base,
            density_increment: config.density_increment,
            smoothing: config.smoothing,
            smoothed: base,
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn value(&self) -> f64 {
        self.smoothed
    }

    /// One per-frame step toward `base + active * increment`.
    pub fn update(&mut self, active: usize) -> f64 {
        let target = self.base + active as f64 * self.density_increment;
        self.smoothed += (target - self.smoothed) * self.smoothing;
        self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = self.base;
    }
}
