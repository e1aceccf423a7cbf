//! Trial implementation for tracking sampled parameters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::distribution::{Distribution, ParamSpec};
use crate::error::{Error, Result};
use crate::param::{CategoricalValue, ParamValue};
use crate::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam, Parameter};
use crate::sampler::{FinishedTrial, History, RandomSampler, Sampler};
use crate::study::TrialLog;
use crate::types::{Direction, TrialState};

/// Where a trial gets its values from.
#[derive(Clone)]
enum Source {
    /// Bound to a study: its sampler, its finished trials, its random source.
    Study {
        sampler: Arc<dyn Sampler>,
        log: Arc<RwLock<TrialLog>>,
        rng: Arc<Mutex<fastrand::Rng>>,
        direction: Direction,
    },
    /// A free-standing trial drawing uniformly from its own random source.
    Standalone(fastrand::Rng),
}

/// A trial represents a single evaluation of the objective function.
///
/// A `Trial` is always running: it is handed to the objective, collects the
/// parameters suggested during that one call, and is then consumed by the
/// study, which turns it into a read-only [`FinishedTrial`].
///
/// Trials created through `Study::ask()` or the optimize loop sample with
/// the study's sampler, informed by the study's complete trials.
#[derive(Clone)]
pub struct Trial {
    index: u64,
    params: HashMap<String, ParamValue>,
    distributions: HashMap<String, Distribution>,
    source: Source,
    started: Instant,
}

impl core::fmt::Debug for Trial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Trial")
            .field("index", &self.index)
            .field("params", &self.params)
            .field("distributions", &self.distributions)
            .field("bound_to_study", &matches!(self.source, Source::Study { .. }))
            .finish_non_exhaustive()
    }
}

impl Trial {
    /// Creates a free-standing trial with the given index.
    ///
    /// The trial samples uniformly at random from an entropy-seeded source.
    /// Use [`Trial::seeded`] for reproducible draws, or `Study::ask()` for a
    /// trial that uses a study's sampler and history.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Trial;
    ///
    /// let trial = Trial::new(0);
    /// assert_eq!(trial.index(), 0);
    /// ```
    #[must_use]
    pub fn new(index: u64) -> Self {
        Self::standalone(index, fastrand::Rng::new())
    }

    /// Creates a free-standing trial whose draws are determined by `seed`.
    #[must_use]
    pub fn seeded(index: u64, seed: u64) -> Self {
        Self::standalone(index, fastrand::Rng::with_seed(seed))
    }

    fn standalone(index: u64, rng: fastrand::Rng) -> Self {
        Self {
            index,
            params: HashMap::new(),
            distributions: HashMap::new(),
            source: Source::Standalone(rng),
            started: Instant::now(),
        }
    }

    pub(crate) fn bound(
        index: u64,
        sampler: Arc<dyn Sampler>,
        log: Arc<RwLock<TrialLog>>,
        rng: Arc<Mutex<fastrand::Rng>>,
        direction: Direction,
    ) -> Self {
        Self {
            index,
            params: HashMap::new(),
            distributions: HashMap::new(),
            source: Source::Study {
                sampler,
                log,
                rng,
                direction,
            },
            started: Instant::now(),
        }
    }

    /// Returns the 0-based index of this trial within its study.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Running trials are always in [`TrialState::Running`].
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn state(&self) -> TrialState {
        TrialState::Running
    }

    /// Returns the parameters suggested so far, keyed by name.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, ParamValue> {
        &self.params
    }

    /// Returns the distributions of the parameters suggested so far.
    #[must_use]
    pub fn distributions(&self) -> &HashMap<String, Distribution> {
        &self.distributions
    }

    /// Returns the value suggested for `name`, if any.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    fn sample_value(&mut self, spec: &ParamSpec) -> ParamValue {
        match &mut self.source {
            Source::Study {
                sampler,
                log,
                rng,
                direction,
            } => {
                let log = log.read();
                let history = History::new(&log.trials, *direction);
                let mut rng = rng.lock();
                sampler.sample(spec, &history, &mut rng)
            }
            Source::Standalone(rng) => {
                RandomSampler.sample(spec, &History::empty(Direction::default()), rng)
            }
        }
    }

    /// Suggests a parameter value using a [`Parameter`] definition.
    ///
    /// This is the single path every `suggest_*` method goes through:
    ///
    /// 1. The domain is validated.
    /// 2. If the name was already suggested in this trial with an identical
    ///    domain, the recorded value is returned again.
    /// 3. If it was suggested with a different domain, the call fails.
    /// 4. Otherwise the sampler draws a value, which is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if the domain is malformed, or
    /// [`Error::ParameterConflict`] if the name is already bound to a
    /// different domain in this trial.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Trial;
    /// use hyperstudy::parameter::{FloatParam, IntParam};
    ///
    /// let mut trial = Trial::new(0);
    ///
    /// let x = trial.suggest_param(&FloatParam::new("x", 0.0, 1.0)).unwrap();
    /// let again = trial.suggest_param(&FloatParam::new("x", 0.0, 1.0)).unwrap();
    /// assert_eq!(x, again);
    ///
    /// assert!(trial.suggest_param(&IntParam::new("x", 0, 1)).is_err());
    /// ```
    pub fn suggest_param<P: Parameter>(&mut self, param: &P) -> Result<P::Value> {
        let spec = param.spec()?;
        let value = self.suggest_spec(&spec)?;
        param.cast_param_value(&value)
    }

    fn suggest_spec(&mut self, spec: &ParamSpec) -> Result<ParamValue> {
        if let Some(existing) = self.distributions.get(spec.name()) {
            if existing == spec.distribution()
                && let Some(value) = self.params.get(spec.name())
            {
                return Ok(value.clone());
            }
            return Err(Error::ParameterConflict {
                name: spec.name().to_string(),
                reason: format!(
                    "already suggested as {} {existing:?}, now requested as {} {:?}",
                    existing.kind(),
                    spec.kind(),
                    spec.distribution()
                ),
            });
        }

        let value = self.sample_value(spec);
        self.params.insert(spec.name().to_string(), value.clone());
        self.distributions
            .insert(spec.name().to_string(), spec.distribution().clone());
        Ok(value)
    }

    /// Suggests one of `choices`.
    ///
    /// # Errors
    ///
    /// Fails if `choices` is empty or `name` is already bound to a different domain.
    pub fn suggest_categorical<T>(&mut self, name: &str, choices: &[T]) -> Result<T>
    where
        T: Clone + core::fmt::Debug + Into<CategoricalValue>,
    {
        self.suggest_param(&CategoricalParam::new(name, choices.to_vec()))
    }

    /// Suggests an integer in `[low, high]`, both inclusive.
    ///
    /// # Errors
    ///
    /// Fails if `low > high` or `name` is already bound to a different domain.
    pub fn suggest_int(&mut self, name: &str, low: i64, high: i64) -> Result<i64> {
        self.suggest_param(&IntParam::new(name, low, high))
    }

    /// Suggests a real value drawn uniformly from `[low, high]`.
    ///
    /// # Errors
    ///
    /// Fails if the bounds are reversed or not finite, or `name` is already
    /// bound to a different domain.
    pub fn suggest_uniform(&mut self, name: &str, low: f64, high: f64) -> Result<f64> {
        self.suggest_param(&FloatParam::new(name, low, high))
    }

    /// Suggests a real value drawn log-uniformly from `[low, high]`.
    ///
    /// # Errors
    ///
    /// Fails if `low <= 0`, the bounds are reversed, or `name` is already
    /// bound to a different domain.
    pub fn suggest_loguniform(&mut self, name: &str, low: f64, high: f64) -> Result<f64> {
        self.suggest_param(&FloatParam::new(name, low, high).log_scale())
    }

    /// Suggests a real value from the grid `low, low + step, ..., high`.
    ///
    /// # Errors
    ///
    /// Fails if `step` is not positive or does not divide `high - low`.
    pub fn suggest_discrete_uniform(
        &mut self,
        name: &str,
        low: f64,
        high: f64,
        step: f64,
    ) -> Result<f64> {
        self.suggest_param(&FloatParam::new(name, low, high).step(step))
    }

    /// Suggests `false` or `true`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already bound to a different domain.
    pub fn suggest_bool(&mut self, name: &str) -> Result<bool> {
        self.suggest_param(&BoolParam::new(name))
    }

    /// Returns `true` if this trial was created by the study that owns `log`.
    pub(crate) fn belongs_to(&self, log: &Arc<RwLock<TrialLog>>) -> bool {
        match &self.source {
            Source::Study { log: own, .. } => Arc::ptr_eq(own, log),
            Source::Standalone(_) => false,
        }
    }

    /// Consumes the trial into its read-only record.
    ///
    /// `Ok` becomes a complete trial, `Err` a failed one with the message kept.
    pub(crate) fn finish(self, outcome: core::result::Result<f64, String>) -> FinishedTrial {
        let (state, value, error) = match outcome {
            Ok(value) => (TrialState::Complete, Some(value), None),
            Err(message) => (TrialState::Failed, None, Some(message)),
        };
        FinishedTrial {
            index: self.index,
            state,
            value,
            params: self.params,
            distributions: self.distributions,
            error,
            duration: self.started.elapsed(),
        }
    }
}
