// Per-frame waypoint stepping

use super::cursor::TrajectoryCursor;
use super::math::{lerp_vec3, step_towards};
use super::strategy::StepStrategy;
use crate::ephemeris::EphemerisSeries;

/// What a single update did to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing changed: unloaded cursor or a non-positive delta
    Idle,
    /// Moved towards the target without reaching it
    Moved,
    /// Reached the target and now heads for `next_index`
    Arrived { next_index: usize },
    /// Reached the end of the series and restarted the loop
    Wrapped,
}

impl StepOutcome {
    pub fn reached_waypoint(&self) -> bool {
        matches!(self, StepOutcome::Arrived { .. } | StepOutcome::Wrapped)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StepAdvancer {
    strategy: StepStrategy,
}

impl StepAdvancer {
    pub fn new(strategy: StepStrategy) -> Self {
        Self {
            strategy: strategy.validated(),
        }
    }

    pub fn strategy(&self) -> StepStrategy {
        self.strategy
    }

    /// Advance `cursor` by one frame of `delta` seconds at `speed` units/second
    pub fn step(
        &self,
        cursor: &mut TrajectoryCursor,
        series: &EphemerisSeries,
        speed: f64,
        delta: f64,
    ) -> StepOutcome {
        if !cursor.is_ready() || !delta.is_finite() || delta <= 0.0 {
            return StepOutcome::Idle;
        }
        cursor.mark_playing();

        match self.strategy {
            StepStrategy::ConstantSpeed => step_constant_speed(cursor, series, speed, delta),
            StepStrategy::ExponentialEase {
                fraction,
                threshold,
            } => step_exponential_ease(cursor, series, fraction, threshold, delta),
        }
    }
}

fn step_constant_speed(
    cursor: &mut TrajectoryCursor,
    series: &EphemerisSeries,
    speed: f64,
    delta: f64,
) -> StepOutcome {
    let budget = speed * delta;
    let budget = if budget.is_finite() { budget.max(0.0) } else { 0.0 };

    let (position, arrived) =
        step_towards(&cursor.current_position, &cursor.target_position, budget);
    cursor.current_position = position;

    if !arrived {
        return StepOutcome::Moved;
    }
    if cursor.advance_with_restart(series) {
        StepOutcome::Wrapped
    } else {
        StepOutcome::Arrived {
            next_index: cursor.next_index,
        }
    }
}

fn step_exponential_ease(
    cursor: &mut TrajectoryCursor,
    series: &EphemerisSeries,
    fraction: f64,
    threshold: f64,
    delta: f64,
) -> StepOutcome {
    cursor.elapsed_time += delta;

    if cursor.remaining_distance() < threshold {
        return if cursor.advance_pair(series) {
            StepOutcome::Wrapped
        } else {
            StepOutcome::Arrived {
                next_index: cursor.next_index,
            }
        };
    }

    cursor.current_position =
        lerp_vec3(&cursor.current_position, &cursor.target_position, fraction);
    StepOutcome::Moved
}
