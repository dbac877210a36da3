use serde::{Deserialize, Serialize};

pub const DEFAULT_EASE_FRACTION: f64 = 0.1;
pub const DEFAULT_ARRIVAL_THRESHOLD: f64 = 1e-4;

/// How a body closes the gap to its next waypoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepStrategy {
    /// Move `speed * delta` scene units per frame, snapping on arrival.
    /// Frame-rate independent.
    #[default]
    ConstantSpeed,
    /// Cover a fixed fraction of the remaining gap every frame and treat
    /// anything closer than `threshold` as arrived. Ignores speed and delta.
    ExponentialEase { fraction: f64, threshold: f64 },
}

impl StepStrategy {
    pub fn exponential_ease() -> Self {
        StepStrategy::ExponentialEase {
            fraction: DEFAULT_EASE_FRACTION,
            threshold: DEFAULT_ARRIVAL_THRESHOLD,
        }
    }

    /// Replace ease parameters that would stall playback with the defaults.
    /// The fraction must lie in `(0, 1]` and the threshold must be finite and
    /// positive, otherwise a body never registers an arrival.
    pub fn validated(self) -> Self {
        match self {
            StepStrategy::ConstantSpeed => self,
            StepStrategy::ExponentialEase {
                fraction,
                threshold,
            } => {
                let fraction = if fraction > 0.0 && fraction <= 1.0 {
                    fraction
                } else {
                    log::warn!(
                        "Ease fraction {} outside (0, 1], using {}",
                        fraction,
                        DEFAULT_EASE_FRACTION
                    );
                    DEFAULT_EASE_FRACTION
                };
                let threshold = if threshold.is_finite() && threshold > 0.0 {
                    threshold
                } else {
                    log::warn!(
                        "Arrival threshold {} must be positive, using {}",
                        threshold,
                        DEFAULT_ARRIVAL_THRESHOLD
                    );
                    DEFAULT_ARRIVAL_THRESHOLD
                };
                StepStrategy::ExponentialEase {
                    fraction,
                    threshold,
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepStrategy::ConstantSpeed => "constant-speed",
            StepStrategy::ExponentialEase { .. } => "exponential-ease",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_keeps_sane_parameters() {
        let eased = StepStrategy::ExponentialEase {
            fraction: 0.25,
            threshold: 0.01,
        };
        assert_eq!(eased.validated(), eased);
        assert_eq!(StepStrategy::ConstantSpeed.validated(), StepStrategy::ConstantSpeed);
    }

    #[test]
    fn test_validated_replaces_stalling_parameters() {
        let bad = [
            (0.0, 0.0),
            (-1.0, -1e-3),
            (f64::NAN, f64::INFINITY),
            (1.5, f64::NAN),
        ];
        for (fraction, threshold) in bad {
            let fixed = StepStrategy::ExponentialEase {
                fraction,
                threshold,
            }
            .validated();
            assert_eq!(fixed, StepStrategy::exponential_ease());
        }

        let fixed = StepStrategy::ExponentialEase {
            fraction: 1.0,
            threshold: 0.0,
        }
        .validated();
        assert_eq!(
            fixed,
            StepStrategy::ExponentialEase {
                fraction: 1.0,
                threshold: DEFAULT_ARRIVAL_THRESHOLD
            }
        );
    }
}
