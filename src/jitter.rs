//! Jitter strategies for backoff delays
//!
//! When many clients fail at the same moment, identical backoff schedules make them retry in
//! lockstep. Jitter spreads the retries out:
//! - `None`: deterministic delays for tests or tightly controlled workflows.
//! - `Full`: uniform in `[0, bound]`, the default.
//! - `Equal`: uniform in `[bound/2, bound]`, keeps a floor while adding randomness.
//!
//! The jittered value never exceeds the bound it was drawn from. Randomness comes from `rand`'s
//! thread-local RNG; tests inject a seeded RNG through [`Jitter::apply_with_rng`].

use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Jitter strategy for randomizing retry delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jitter {
    /// No jitter - use exact backoff delay
    None,
    /// Full jitter: random between 0 and the bound
    #[default]
    Full,
    /// Equal jitter: random between half the bound and the bound
    Equal,
}

impl Jitter {
    pub fn full() -> Self {
        Jitter::Full
    }

    pub fn equal() -> Self {
        Jitter::Equal
    }

    /// Apply jitter to a delay bound
    pub fn apply(&self, bound: Duration) -> Duration {
        let mut rng = rng();
        self.apply_with_rng(bound, &mut rng)
    }

    /// Apply jitter with a caller-provided RNG
    pub fn apply_with_rng<R: Rng>(&self, bound: Duration, rng: &mut R) -> Duration {
        match self {
            Jitter::None => bound,
            Jitter::Full => {
                let nanos = as_nanos_saturated(bound);
                if nanos == 0 {
                    return Duration::ZERO;
                }
                Duration::from_nanos(rng.random_range(0..=nanos))
            }
            Jitter::Equal => {
                let nanos = as_nanos_saturated(bound);
                if nanos == 0 {
                    return Duration::ZERO;
                }
                Duration::from_nanos(rng.random_range(nanos / 2..=nanos))
            }
        }
    }
}

// Durations beyond ~584 years saturate; they are far past any sane backoff cap.
fn as_nanos_saturated(duration: Duration) -> u64 {
    duration.as_nanos().try_into().unwrap_or(u64::MAX)
}
