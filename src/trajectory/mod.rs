// Trajectory playback: cursor state, stepping strategies and the per-frame advancer

pub mod advancer;
pub mod cursor;
pub mod math;
pub mod strategy;

pub use advancer::{StepAdvancer, StepOutcome};
pub use cursor::{PlaybackState, TrajectoryCursor};
pub use strategy::StepStrategy;
