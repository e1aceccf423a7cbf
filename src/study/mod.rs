//! Study implementation for managing optimization trials.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::StudyConfig;
use crate::error::{Error, Result};
use crate::sampler::random::RandomSampler;
use crate::sampler::{FinishedTrial, Sampler};
use crate::stop::StopHandle;
use crate::trial::Trial;
use crate::types::Direction;

mod analysis;
mod builder;
mod export;
mod iter;
mod optimize;

pub use builder::StudyBuilder;
pub use export::{TrialRow, TrialTable};
pub use optimize::{LoopState, OptimizeReport, StopReason};

/// The append-only record of a study's finished trials.
///
/// `best` is the position in `trials` of the best complete trial. It is
/// updated on every append by a single comparison, never by a rescan.
#[derive(Debug, Default)]
pub(crate) struct TrialLog {
    pub(crate) trials: Vec<FinishedTrial>,
    best: Option<usize>,
    next_index: u64,
}

impl TrialLog {
    pub(crate) fn best(&self) -> Option<&FinishedTrial> {
        self.best.map(|pos| &self.trials[pos])
    }
}

/// A study manages the optimization process, tracking trials and their results.
///
/// The study owns the sequence of finished trials, the optimization
/// direction, the sampler, and the random source the sampler draws from.
/// All methods take `&self`; the trial log sits behind a lock, so a trial's
/// sampler always sees a consistent snapshot of finished trials.
///
/// # Examples
///
/// ```
/// use hyperstudy::{Direction, Study};
///
/// // Create a study to minimize an objective function
/// let study = Study::new(Direction::Minimize);
/// assert_eq!(study.direction(), Direction::Minimize);
/// ```
pub struct Study {
    /// The optimization direction.
    pub(crate) direction: Direction,
    /// The sampler used to generate parameter values.
    pub(crate) sampler: Arc<dyn Sampler>,
    /// Finished trials and best-trial tracking, shared with running trials.
    pub(crate) log: Arc<RwLock<TrialLog>>,
    /// The random source lent to the sampler.
    pub(crate) rng: Arc<Mutex<fastrand::Rng>>,
    /// Cooperative cancellation of the optimize loop.
    pub(crate) stop: StopHandle,
    /// Where the optimize loop currently is.
    pub(crate) loop_state: Mutex<LoopState>,
}

impl core::fmt::Debug for Study {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Study")
            .field("direction", &self.direction)
            .field("n_trials", &self.n_trials())
            .field("loop_state", &self.loop_state())
            .finish_non_exhaustive()
    }
}

impl Study {
    /// Create a new study with the given optimization direction.
    ///
    /// Uses the [`RandomSampler`] and an entropy-seeded random source.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::{Direction, Study};
    ///
    /// let study = Study::new(Direction::Maximize);
    /// assert_eq!(study.direction(), Direction::Maximize);
    /// ```
    #[must_use]
    pub fn new(direction: Direction) -> Self {
        Self::with_sampler(direction, RandomSampler::new())
    }

    /// Return a [`StudyBuilder`] for constructing a study with a fluent API.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::prelude::*;
    ///
    /// let study = Study::builder()
    ///     .maximize()
    ///     .sampler(TpeSampler::new())
    ///     .seed(42)
    ///     .build();
    /// assert_eq!(study.direction(), Direction::Maximize);
    /// ```
    #[must_use]
    pub fn builder() -> StudyBuilder {
        StudyBuilder::new()
    }

    /// Create a random-search study that minimizes the objective value.
    #[must_use]
    pub fn minimize() -> Self {
        Self::new(Direction::Minimize)
    }

    /// Create a random-search study that maximizes the objective value.
    #[must_use]
    pub fn maximize() -> Self {
        Self::new(Direction::Maximize)
    }

    /// Create a new study with a custom sampler.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::sampler::TpeSampler;
    /// use hyperstudy::{Direction, Study};
    ///
    /// let study = Study::with_sampler(Direction::Minimize, TpeSampler::new());
    /// ```
    pub fn with_sampler(direction: Direction, sampler: impl Sampler + 'static) -> Self {
        Self::from_parts(direction, Arc::new(sampler), fastrand::Rng::new())
    }

    /// Create a random-search study from a [`StudyConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::{Direction, Study, StudyConfig};
    ///
    /// let config = StudyConfig::new(Direction::Maximize).with_seed(1);
    /// let study = Study::from_config(&config);
    /// assert_eq!(study.direction(), Direction::Maximize);
    /// ```
    #[must_use]
    pub fn from_config(config: &StudyConfig) -> Self {
        Self::builder().config(*config).build()
    }

    pub(crate) fn from_parts(
        direction: Direction,
        sampler: Arc<dyn Sampler>,
        rng: fastrand::Rng,
    ) -> Self {
        Self {
            direction,
            sampler,
            log: Arc::new(RwLock::new(TrialLog::default())),
            rng: Arc::new(Mutex::new(rng)),
            stop: StopHandle::new(),
            loop_state: Mutex::new(LoopState::Idle),
        }
    }

    /// Return the optimization direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Replace the sampler used for future parameter suggestions.
    ///
    /// Already-finished trials are unaffected.
    pub fn set_sampler(&mut self, sampler: impl Sampler + 'static) {
        self.sampler = Arc::new(sampler);
    }

    /// Create a new running trial bound to this study.
    ///
    /// Indices are allocated in creation order starting at 0. The trial
    /// samples with the study's sampler and sees the study's complete
    /// trials. Record it with [`tell`](Self::tell),
    /// [`complete_trial`](Self::complete_trial), or
    /// [`fail_trial`](Self::fail_trial).
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    /// assert_eq!(study.create_trial().index(), 0);
    /// assert_eq!(study.create_trial().index(), 1);
    /// ```
    #[must_use]
    pub fn create_trial(&self) -> Trial {
        let index = {
            let mut log = self.log.write();
            let index = log.next_index;
            log.next_index += 1;
            index
        };
        Trial::bound(
            index,
            Arc::clone(&self.sampler),
            Arc::clone(&self.log),
            Arc::clone(&self.rng),
            self.direction,
        )
    }

    /// Request a new trial with suggested parameters.
    ///
    /// This is the first half of the ask-and-tell interface. Suggest values
    /// on the returned trial, evaluate your objective externally, then pass
    /// the trial back to [`tell()`](Self::tell) with the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    ///
    /// let mut trial = study.ask();
    /// let x = trial.suggest_uniform("x", 0.0, 10.0).unwrap();
    /// study.tell(trial, Ok::<_, &str>(x * x)).unwrap();
    /// assert_eq!(study.n_trials(), 1);
    /// ```
    #[must_use]
    pub fn ask(&self) -> Trial {
        self.create_trial()
    }

    /// Report the result of a trial obtained from [`ask()`](Self::ask).
    ///
    /// `Ok(value)` completes the trial; `Err(reason)` records it as failed.
    /// A non-finite value is recorded as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTrial`] if the trial was not created by this study.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::{Study, TrialState};
    ///
    /// let study = Study::minimize();
    ///
    /// study.tell(study.ask(), Ok::<_, &str>(42.0)).unwrap();
    /// study.tell(study.ask(), Err::<f64, _>("evaluation failed")).unwrap();
    ///
    /// assert_eq!(study.n_trials(), 2);
    /// assert_eq!(study.n_complete_trials(), 1);
    /// assert_eq!(study.trials()[1].state, TrialState::Failed);
    /// ```
    pub fn tell(&self, trial: Trial, value: core::result::Result<f64, impl ToString>) -> Result<()> {
        if !trial.belongs_to(&self.log) {
            return Err(Error::UnknownTrial(trial.index()));
        }
        self.record(trial, value.map_err(|e| e.to_string()));
        Ok(())
    }

    /// Record a trial as complete with its objective value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTrial`] if the trial was not created by this study.
    pub fn complete_trial(&self, trial: Trial, value: f64) -> Result<()> {
        self.tell(trial, Ok::<_, String>(value))
    }

    /// Record a trial as failed with an error message.
    ///
    /// Failed trials are kept for inspection but are never best and are
    /// never shown to the sampler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTrial`] if the trial was not created by this study.
    pub fn fail_trial(&self, trial: Trial, error: impl ToString) -> Result<()> {
        self.tell(trial, Err::<f64, _>(error))
    }

    /// Append a finished trial and update best-trial tracking.
    pub(crate) fn record(
        &self,
        trial: Trial,
        outcome: core::result::Result<f64, String>,
    ) -> FinishedTrial {
        let outcome = match outcome {
            Ok(value) if !value.is_finite() => {
                Err(format!("objective returned a non-finite value: {value}"))
            }
            other => other,
        };
        let finished = trial.finish(outcome);

        let mut log = self.log.write();
        let position = log.trials.len();
        let improved = finished.value.is_some_and(|value| {
            log.best()
                .and_then(|best| best.value)
                .is_none_or(|incumbent| self.direction.is_better(value, incumbent))
        });
        log.trials.push(finished.clone());
        if improved {
            log.best = Some(position);
        }
        drop(log);

        #[cfg(feature = "tracing")]
        match finished.value {
            Some(value) => {
                tracing::info!(trial = finished.index, value, "trial completed");
                if improved {
                    tracing::info!(trial = finished.index, value, "new best value found");
                }
            }
            None => {
                tracing::debug!(trial = finished.index, error = ?finished.error, "trial failed");
            }
        }

        finished
    }

    /// Return a snapshot of all finished trials, in the order they finished.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    /// let mut trial = study.create_trial();
    /// trial.suggest_uniform("x", 0.0, 1.0).unwrap();
    /// study.complete_trial(trial, 0.5).unwrap();
    ///
    /// for finished in study.trials() {
    ///     println!("Trial {} has value {:?}", finished.index, finished.value);
    /// }
    /// ```
    #[must_use]
    pub fn trials(&self) -> Vec<FinishedTrial> {
        self.log.read().trials.clone()
    }

    /// Ask a running optimize loop to stop before its next trial.
    ///
    /// The trial in flight finishes and is recorded. If no loop is running,
    /// the next optimize call stops before its first trial.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// A cloneable handle that can stop the optimize loop from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Where the optimize loop currently is.
    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        *self.loop_state.lock()
    }
}
