// Chart generation: lane policies, beat-driven charts, subdivision pattern tables

pub mod generator;
pub mod lane_policy;
pub mod subdivision;

pub use generator::{ChartGenerator, FallbackGrid};
pub use lane_policy::{LanePolicy, LanePolicyKind, RotateLanes, TableLanes, UniformLanes};
pub use subdivision::{BEATS_PER_MEASURE, Measure, PatternTable, SUBDIVISIONS};
