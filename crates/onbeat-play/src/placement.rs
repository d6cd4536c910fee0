use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use onbeat_types::{Note, Position};

/// Assigns on-screen target and spawn points to newly activated notes.
pub trait Placement {
    fn place(&mut self, note: &mut Note);
}

/// Fraction of each playfield side kept free of targets.
const MARGIN: f32 = 0.15;
/// Spawn offset from the target as a fraction of the longer side.
const SPAWN_DISTANCE: f32 = 0.45;

/// Random targets inside the playfield margins. Each note spawns on the line
/// through the playfield centre and its target, offset back toward and past
/// the centre.
#[derive(Debug, Clone)]
pub struct ScatterPlacement {
    width: f32,
    height: f32,
    rng: StdRng,
}

impl ScatterPlacement {
    pub fn new(width: f32, height: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { width, height, rng }
    }

    pub fn centre(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Spawn point for a target.
    pub fn spawn_for(&self, target: Position) -> Position {
        let centre = self.centre();
        let (dx, dy) = (target.x - centre.x, target.y - centre.y);
        let len = dx.hypot(dy);
        let len = if len > 0.0 { len } else { 1.0 };
        let dist = self.width.max(self.height) * SPAWN_DISTANCE;
        Position::new(target.x - dx / len * dist, target.y - dy / len * dist)
    }
}

impl Placement for ScatterPlacement {
    fn place(&mut self, note: &mut Note) {
        let (mx, my) = (self.width * MARGIN, self.height * MARGIN);
        let target = Position::new(
            mx + self.rng.gen_range(0.0..=1.0f32) * (self.width - mx * 2.0),
            my + self.rng.gen_range(0.0..=1.0f32) * (self.height - my * 2.0),
        );
        note.target = target;
        note.spawn = self.spawn_for(target);
    }
}
