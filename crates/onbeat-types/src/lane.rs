use serde::{Deserialize, Serialize};

/// Number of playable lanes.
pub const LANE_COUNT: usize = 4;

/// A playable lane. Each lane has its own input binding.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Lane {
    #[default]
    Key1,
    Key2,
    Key3,
    Key4,
}

impl Lane {
    /// Returns all lanes in order.
    pub fn all() -> &'static [Lane] {
        &[Lane::Key1, Lane::Key2, Lane::Key3, Lane::Key4]
    }

    /// Returns the 0-based index of this lane.
    pub fn index(self) -> usize {
        match self {
            Lane::Key1 => 0,
            Lane::Key2 => 1,
            Lane::Key3 => 2,
            Lane::Key4 => 3,
        }
    }

    /// Creates a lane from a 0-based index.
    pub fn from_index(index: usize) -> Option<Lane> {
        Self::all().get(index).copied()
    }
}

/// Input binding and display attributes of one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneBinding {
    pub lane: Lane,
    /// Keyboard key (lowercase) that taps this lane.
    pub key: char,
    pub label: String,
    /// Display colour as `#RRGGBB`.
    pub color: String,
}

/// Key bindings for all lanes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneBindings {
    bindings: Vec<LaneBinding>,
}

impl Default for LaneBindings {
    fn default() -> Self {
        let keys = [
            ('w', "W", "#FFD447"),
            ('a', "A", "#47FFA3"),
            ('s', "S", "#FF69B4"),
            ('d', "D", "#6AB4FF"),
        ];
        let bindings = Lane::all()
            .iter()
            .zip(keys)
            .map(|(&lane, (key, label, color))| LaneBinding {
                lane,
                key,
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect();
        Self { bindings }
    }
}

impl LaneBindings {
    /// Looks up the lane bound to `key`. Matching ignores ASCII case.
    pub fn lane_for_key(&self, key: char) -> Option<Lane> {
        let key = key.to_ascii_lowercase();
        self.bindings.iter().find(|b| b.key == key).map(|b| b.lane)
    }

    pub fn binding(&self, lane: Lane) -> Option<&LaneBinding> {
        self.bindings.iter().find(|b| b.lane == lane)
    }

    /// Rebinds `lane` to `key`. Any other lane already using `key` loses it.
    pub fn rebind(&mut self, lane: Lane, key: char) {
        let key = key.to_ascii_lowercase();
        for b in &mut self.bindings {
            if b.lane != lane && b.key == key {
                b.key = '\0';
            }
        }
        if let Some(b) = self.bindings.iter_mut().find(|b| b.lane == lane) {
            b.key = key;
        }
    }
}
