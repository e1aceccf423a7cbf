//! Study and optimize-loop configuration.
//!
//! Both configs are plain data with builder-style setters. With the `serde`
//! feature they can be read from any serde format; `timeout` is written as
//! fractional seconds.
//!
//! ```
//! use core::time::Duration;
//!
//! use hyperstudy::{Direction, OptimizeConfig, StudyConfig};
//!
//! let study = StudyConfig::new(Direction::Maximize).with_seed(7);
//! let run = OptimizeConfig::trials(100).with_timeout(Duration::from_secs(30));
//! assert!(run.validate().is_ok());
//! # let _ = study;
//! ```

use core::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Direction;

/// Settings fixed for the lifetime of a study.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StudyConfig {
    /// Whether to minimize or maximize the objective. Defaults to minimize.
    pub direction: Direction,
    /// Seed for the study's random source; entropy when unset.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

impl StudyConfig {
    /// A config with the given direction and no seed.
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            seed: None,
        }
    }

    /// Fixes the seed of the study's random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Stopping policy for one optimize call.
///
/// Every condition is optional and the loop stops at the first one that is
/// satisfied. With no condition set the loop runs until it is cancelled.
/// All conditions are checked between trials, never during one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizeConfig {
    /// Number of trials to run in this call.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub n_trials: Option<usize>,
    /// Wall-clock budget measured from the start of this call.
    #[cfg_attr(
        feature = "serde",
        serde(with = "seconds", skip_serializing_if = "Option::is_none")
    )]
    pub timeout: Option<Duration>,
    /// Stop once this many trials in a row have failed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub max_consecutive_failures: Option<usize>,
}

impl OptimizeConfig {
    /// A config with no stopping condition: runs until cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that runs exactly `n_trials` trials.
    #[must_use]
    pub fn trials(n_trials: usize) -> Self {
        Self::new().with_n_trials(n_trials)
    }

    /// Sets the trial budget.
    #[must_use]
    pub fn with_n_trials(mut self, n_trials: usize) -> Self {
        self.n_trials = Some(n_trials);
        self
    }

    /// Sets the wall-clock budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the wall-clock budget in seconds.
    ///
    /// Negative, NaN, or overflowing values are kept as a zero timeout and
    /// rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn with_timeout_secs(self, seconds: f64) -> Self {
        self.with_timeout(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO))
    }

    /// Stops the loop after `limit` consecutive failed trials.
    #[must_use]
    pub fn with_max_consecutive_failures(mut self, limit: usize) -> Self {
        self.max_consecutive_failures = Some(limit);
        self
    }

    /// Returns `true` if no stopping condition other than cancellation is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.n_trials.is_none() && self.timeout.is_none()
    }

    /// Checks that every configured limit is positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.n_trials == Some(0) {
            return Err(Error::InvalidConfig {
                field: "n_trials",
                reason: "must be a positive integer".to_string(),
            });
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfig {
                field: "timeout",
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        if self.max_consecutive_failures == Some(0) {
            return Err(Error::InvalidConfig {
                field: "max_consecutive_failures",
                reason: "must be a positive integer".to_string(),
            });
        }
        Ok(())
    }
}

/// (De)serializes `Option<Duration>` as fractional seconds.
#[cfg(feature = "serde")]
mod seconds {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    serde::de::Error::custom(format!(
                        "timeout must be a non-negative number of seconds, got {secs}"
                    ))
                })
            })
            .transpose()
    }
}
