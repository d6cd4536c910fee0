// Gameplay core: note scheduling, judgment, approach smoothing, session driver

pub mod approach;
pub mod game_state;
pub mod judge_manager;
pub mod judge_property;
pub mod placement;
pub mod scheduler;
pub mod session;

pub use approach::{ApproachSmoother, base_approach};
pub use game_state::{GameState, JudgmentListener, TickReport};
pub use judge_manager::{JUDGMENT_DISPLAY_SECONDS, JudgeEngine};
pub use judge_property::{JudgeProperty, JudgeRow};
pub use placement::{Placement, ScatterPlacement};
pub use scheduler::NoteScheduler;
pub use session::{GameLoop, Replay, ScoreSnapshot, autoplay_trace, prepare_chart, replay};
