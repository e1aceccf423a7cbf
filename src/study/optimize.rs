use core::fmt;
use core::time::Duration;
use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::OptimizeConfig;
use crate::objective::Objective;
use crate::sampler::FinishedTrial;
use crate::trial::Trial;

use super::Study;

/// Why an optimize loop stopped.
///
/// Stopping is never an error: every reason is a normal end of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// The configured number of trials ran.
    TrialBudget,
    /// The wall-clock budget ran out.
    Timeout,
    /// A [`StopHandle`](crate::StopHandle) was triggered.
    Cancelled,
    /// An [`Objective`] hook returned `Break`.
    ObjectiveRequested,
    /// Too many trials in a row failed.
    TooManyFailures,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::TrialBudget => "trial budget reached",
            StopReason::Timeout => "timeout",
            StopReason::Cancelled => "cancelled",
            StopReason::ObjectiveRequested => "stopped by objective",
            StopReason::TooManyFailures => "too many consecutive failures",
        };
        f.write_str(s)
    }
}

/// The state of a study's optimize loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    /// No loop has run yet.
    #[default]
    Idle,
    /// A loop is running trials.
    Running,
    /// The last loop stopped for the given reason.
    Stopped(StopReason),
}

/// Summary of one optimize call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizeReport {
    /// Why the loop stopped.
    pub reason: StopReason,
    /// Trials run by this call, complete or failed.
    pub n_trials: usize,
    /// Wall-clock time spent in this call.
    pub elapsed: Duration,
}

impl Study {
    /// Run `n_trials` trials of a closure objective.
    ///
    /// Trials that fail are recorded and the loop carries on.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if `n_trials` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::{Study, StopReason};
    ///
    /// let study = Study::builder().seed(42).build();
    ///
    /// let report = study
    ///     .optimize(10, |trial| {
    ///         let x = trial.suggest_uniform("x", -10.0, 10.0)?;
    ///         Ok::<_, hyperstudy::Error>(x * x)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(report.reason, StopReason::TrialBudget);
    /// assert_eq!(study.n_trials(), 10);
    /// assert!(study.best_value().unwrap() >= 0.0);
    /// ```
    pub fn optimize<F, E>(&self, n_trials: usize, objective: F) -> crate::Result<OptimizeReport>
    where
        F: FnMut(&mut Trial) -> Result<f64, E>,
        E: ToString,
    {
        self.optimize_with(&OptimizeConfig::trials(n_trials), objective)
    }

    /// Run a closure objective under a full stopping policy.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the config does not validate.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::time::Duration;
    ///
    /// use hyperstudy::{OptimizeConfig, Study};
    ///
    /// let study = Study::minimize();
    /// let config = OptimizeConfig::new().with_timeout(Duration::from_millis(20));
    ///
    /// study
    ///     .optimize_config(&config, |trial| {
    ///         let x = trial.suggest_uniform("x", 0.0, 1.0)?;
    ///         Ok::<_, hyperstudy::Error>(x)
    ///     })
    ///     .unwrap();
    /// assert!(study.n_trials() >= 1);
    /// ```
    pub fn optimize_config<F, E>(
        &self,
        config: &OptimizeConfig,
        objective: F,
    ) -> crate::Result<OptimizeReport>
    where
        F: FnMut(&mut Trial) -> Result<f64, E>,
        E: ToString,
    {
        self.optimize_with(config, objective)
    }

    /// Run a closure objective until the loop is cancelled.
    ///
    /// Cancel through [`Study::stop`], a [`StopHandle`](crate::StopHandle),
    /// or by returning `Break` from an [`Objective`] hook via
    /// [`optimize_with`](Self::optimize_with).
    ///
    /// # Errors
    ///
    /// This call has no configuration to reject and always returns `Ok`.
    pub fn optimize_unbounded<F, E>(&self, objective: F) -> crate::Result<OptimizeReport>
    where
        F: FnMut(&mut Trial) -> Result<f64, E>,
        E: ToString,
    {
        self.optimize_with(&OptimizeConfig::new(), objective)
    }

    /// Run optimization with any [`Objective`] implementation.
    ///
    /// Trials run one at a time. Between trials the loop checks, in order:
    /// the trial budget, the consecutive-failure limit, cancellation, and
    /// the timeout, and stops at the first one that is met. A trial in
    /// flight is never interrupted, so a slow objective can overrun the
    /// timeout by up to its own duration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the config does not validate.
    /// Objective failures are recorded on their trials, not returned.
    #[allow(clippy::needless_pass_by_value)]
    pub fn optimize_with(
        &self,
        config: &OptimizeConfig,
        mut objective: impl Objective,
    ) -> crate::Result<OptimizeReport> {
        config.validate()?;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "optimize",
            n_trials = ?config.n_trials,
            timeout = ?config.timeout,
            direction = %self.direction,
        )
        .entered();

        *self.loop_state.lock() = super::LoopState::Running;
        let start = Instant::now();
        let mut n_run = 0_usize;
        let mut consecutive_failures = 0_usize;

        let reason = loop {
            if let Some(reason) = self.stop_reason(config, n_run, consecutive_failures, start) {
                break reason;
            }
            if objective.before_trial(self).is_break() {
                break StopReason::ObjectiveRequested;
            }

            let finished = self.run_one(|trial| objective.evaluate(trial));
            n_run += 1;
            if finished.is_complete() {
                consecutive_failures = 0;
            } else {
                consecutive_failures += 1;
            }

            if objective.after_trial(self, &finished).is_break() {
                break StopReason::ObjectiveRequested;
            }
        };

        if reason == StopReason::Cancelled {
            self.stop.reset();
        }
        *self.loop_state.lock() = super::LoopState::Stopped(reason);
        trace_info!(%reason, n_trials = n_run, "optimization stopped");

        Ok(OptimizeReport {
            reason,
            n_trials: n_run,
            elapsed: start.elapsed(),
        })
    }

    /// Evaluate a single trial and record it.
    ///
    /// The trial gets the next index. `Ok` with a finite value completes
    /// it; an error or a non-finite value fails it. Either way it is
    /// appended to the study and returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::{Study, TrialState};
    ///
    /// let study = Study::minimize();
    /// let finished = study.run_one(|trial| {
    ///     let n = trial.suggest_int("n", 1, 3)?;
    ///     Ok::<_, hyperstudy::Error>(n as f64)
    /// });
    /// assert_eq!(finished.index, 0);
    /// assert_eq!(finished.state, TrialState::Complete);
    /// ```
    pub fn run_one<F, E>(&self, objective: F) -> FinishedTrial
    where
        F: FnOnce(&mut Trial) -> Result<f64, E>,
        E: ToString,
    {
        let mut trial = self.create_trial();
        let outcome = objective(&mut trial).map_err(|e| e.to_string());
        self.record(trial, outcome)
    }

    fn stop_reason(
        &self,
        config: &OptimizeConfig,
        n_run: usize,
        consecutive_failures: usize,
        start: Instant,
    ) -> Option<StopReason> {
        if config.n_trials.is_some_and(|n| n_run >= n) {
            return Some(StopReason::TrialBudget);
        }
        if config
            .max_consecutive_failures
            .is_some_and(|limit| consecutive_failures >= limit)
        {
            return Some(StopReason::TooManyFailures);
        }
        if self.stop.is_cancelled() {
            return Some(StopReason::Cancelled);
        }
        if config.timeout.is_some_and(|t| start.elapsed() >= t) {
            return Some(StopReason::Timeout);
        }
        None
    }
}
