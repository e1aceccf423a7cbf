//! Sampler trait and implementations for parameter sampling.
//!
//! A [`Sampler`] proposes one value for one parameter. It is handed the
//! validated [`ParamSpec`], a read-only [`History`] of the study's finished
//! trials, and the study's random source; it owns no random state of its
//! own, so a study seeded with the same value replays exactly.

pub mod random;
pub mod tpe;

use core::time::Duration;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::distribution::{Distribution, ParamSpec};
use crate::param::ParamValue;
use crate::parameter::Parameter;
use crate::types::{Direction, TrialState};

pub use random::RandomSampler;
pub use tpe::{TpeSampler, TpeSamplerBuilder};

/// A finished trial: its parameter assignment, outcome, and timing.
///
/// Finished trials are read-only. Both complete and failed trials are kept
/// in the study, in the order they finished.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FinishedTrial {
    /// 0-based trial index, allocated when the trial was created.
    pub index: u64,
    /// `Complete` or `Failed`.
    pub state: TrialState,
    /// The objective value; `None` for failed trials.
    pub value: Option<f64>,
    /// The sampled parameter values, keyed by parameter name.
    pub params: HashMap<String, ParamValue>,
    /// The distributions the parameters were drawn from, keyed by name.
    pub distributions: HashMap<String, Distribution>,
    /// Why the trial failed, if it did.
    pub error: Option<String>,
    /// Wall-clock time spent in the objective.
    pub duration: Duration,
}

impl FinishedTrial {
    /// Returns `true` if the trial completed with a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == TrialState::Complete
    }

    /// Returns the raw value recorded for `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns the typed value for the given parameter definition.
    ///
    /// Returns `None` if the parameter was not used in this trial or the
    /// recorded value does not fit the definition's type.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::parameter::{FloatParam, Parameter};
    /// use hyperstudy::{Direction, Study};
    ///
    /// let study = Study::builder().direction(Direction::Minimize).seed(1).build();
    /// let x = FloatParam::new("x", -10.0, 10.0);
    ///
    /// study
    ///     .optimize(5, |trial| {
    ///         let val = x.suggest(trial)?;
    ///         Ok::<_, hyperstudy::Error>(val * val)
    ///     })
    ///     .unwrap();
    ///
    /// let best = study.best_trial().unwrap();
    /// let x_val: f64 = best.get(&x).unwrap();
    /// assert!((-10.0..=10.0).contains(&x_val));
    /// ```
    #[must_use]
    pub fn get<P: Parameter>(&self, param: &P) -> Option<P::Value> {
        self.params
            .get(param.name())
            .and_then(|v| param.cast_param_value(v).ok())
    }
}

/// A read-only view of a study's finished trials as seen by a sampler.
///
/// Iteration yields only complete trials; failed trials and trials that
/// are still running are never visible.
#[derive(Clone, Copy, Debug)]
pub struct History<'a> {
    trials: &'a [FinishedTrial],
    direction: Direction,
}

impl<'a> History<'a> {
    /// Wraps a slice of finished trials.
    #[must_use]
    pub fn new(trials: &'a [FinishedTrial], direction: Direction) -> Self {
        Self { trials, direction }
    }

    /// An empty history, as seen by the first trial of a study.
    #[must_use]
    pub fn empty(direction: Direction) -> Self {
        Self::new(&[], direction)
    }

    /// The direction of the study that owns this history.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over complete trials in the order they finished.
    pub fn iter(self) -> impl Iterator<Item = &'a FinishedTrial> {
        self.trials.iter().filter(|t| t.is_complete())
    }

    /// Number of complete trials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if no trial has completed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// `(objective value, parameter value)` pairs for `spec`.
    ///
    /// Only complete trials that drew the parameter from exactly the same
    /// distribution contribute.
    #[must_use]
    pub fn observations(&self, spec: &ParamSpec) -> Vec<(f64, &'a ParamValue)> {
        self.iter()
            .filter(|t| t.distributions.get(spec.name()) == Some(spec.distribution()))
            .filter_map(|t| Some((t.value?, t.params.get(spec.name())?)))
            .collect()
    }
}

/// Trait for pluggable parameter sampling strategies.
///
/// Samplers are responsible for generating parameter values based on
/// the parameter's domain and historical trial data. The trait requires
/// `Send + Sync` so a study can be shared across threads; a sampler that
/// keeps summary statistics must guard them itself.
///
/// # Contract
///
/// The returned value must satisfy `spec.distribution().contains(&value)`.
pub trait Sampler: Send + Sync {
    /// Samples a value for `spec`.
    ///
    /// # Arguments
    ///
    /// * `spec` - The validated parameter domain.
    /// * `history` - Complete trials of the study, for informed sampling.
    /// * `rng` - The study's random source.
    fn sample(
        &self,
        spec: &ParamSpec,
        history: &History<'_>,
        rng: &mut fastrand::Rng,
    ) -> ParamValue;
}
