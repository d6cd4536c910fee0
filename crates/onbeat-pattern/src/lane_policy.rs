use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use onbeat_types::{LANE_COUNT, Lane};

use crate::subdivision::PatternTable;

/// Chooses the lane of each generated note.
pub trait LanePolicy {
    /// Lane for the note at `time`. Called once per note in chart order.
    fn next_lane(&mut self, time: f64) -> Lane;
}

/// Uniformly random lanes. Seeded policies are fully reproducible.
#[derive(Debug, Clone)]
pub struct UniformLanes {
    rng: StdRng,
}

impl UniformLanes {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl LanePolicy for UniformLanes {
    fn next_lane(&mut self, _time: f64) -> Lane {
        let index = self.rng.gen_range(0..LANE_COUNT);
        Lane::from_index(index).unwrap_or_default()
    }
}

/// Cycles Key1, Key2, Key3, Key4, Key1, ...
#[derive(Debug, Clone, Default)]
pub struct RotateLanes {
    next: usize,
}

impl RotateLanes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LanePolicy for RotateLanes {
    fn next_lane(&mut self, _time: f64) -> Lane {
        let lane = Lane::from_index(self.next % LANE_COUNT).unwrap_or_default();
        self.next = (self.next + 1) % LANE_COUNT;
        lane
    }
}

/// Walks the filled cells of a pattern table in reading order and wraps.
#[derive(Debug, Clone)]
pub struct TableLanes {
    cells: Vec<Lane>,
    cursor: usize,
}

impl TableLanes {
    /// A table with no filled cells degrades to rotating through all lanes.
    pub fn new(table: &PatternTable) -> Self {
        let mut cells: Vec<Lane> = table.cells().collect();
        if cells.is_empty() {
            cells = Lane::all().to_vec();
        }
        Self { cells, cursor: 0 }
    }
}

impl Default for TableLanes {
    fn default() -> Self {
        Self::new(&PatternTable::default())
    }
}

impl LanePolicy for TableLanes {
    fn next_lane(&mut self, _time: f64) -> Lane {
        let lane = self.cells[self.cursor];
        self.cursor = (self.cursor + 1) % self.cells.len();
        lane
    }
}

/// Configurable choice of lane policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanePolicyKind {
    #[default]
    Uniform,
    Table,
    Rotate,
}

impl LanePolicyKind {
    /// Builds the policy. `seed` only matters for `Uniform`; without one the
    /// generator is seeded from entropy.
    pub fn build(self, seed: Option<u64>) -> Box<dyn LanePolicy + Send> {
        match self {
            LanePolicyKind::Uniform => match seed {
                Some(seed) => Box::new(UniformLanes::seeded(seed)),
                None => Box::new(UniformLanes::from_entropy()),
            },
            LanePolicyKind::Table => Box::new(TableLanes::default()),
            LanePolicyKind::Rotate => Box::new(RotateLanes::new()),
        }
    }
}
