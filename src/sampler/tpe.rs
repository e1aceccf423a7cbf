//! Tree-Parzen Estimator (TPE) sampler implementation.
//!
//! TPE is a Bayesian optimization algorithm that models the objective function
//! using two probability distributions: one for promising (good) parameter values
//! and one for unpromising (bad) parameter values.

use crate::distribution::{Distribution, ParamSpec};
use crate::error::{Error, Result};
use crate::kde::KernelDensityEstimator;
use crate::param::ParamValue;
use crate::rng_util;
use crate::sampler::random::sample_uniform;
use crate::sampler::{History, Sampler};
use crate::types::Direction;

/// A Tree-Parzen Estimator (TPE) sampler for Bayesian optimization.
///
/// TPE works by splitting completed trials into two groups based on their
/// objective values: good trials (the best `gamma` fraction, respecting the
/// study direction) and bad trials (the rest). It then fits kernel density
/// estimators to each group and picks the candidate that maximizes the
/// ratio l(x)/g(x), where l(x) is the density of good trials and g(x) is the
/// density of bad trials.
///
/// Each parameter is modelled independently, using only the complete trials
/// that drew it from the same distribution. Until `n_startup_trials` such
/// observations exist, TPE falls back to uniform random sampling.
///
/// # Examples
///
/// ```
/// use hyperstudy::sampler::TpeSampler;
///
/// // Default settings
/// let sampler = TpeSampler::new();
///
/// // Custom settings
/// let sampler = TpeSampler::builder()
///     .gamma(0.15)
///     .n_startup_trials(20)
///     .n_ei_candidates(32)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct TpeSampler {
    /// Fraction of trials to consider as "good" (gamma quantile).
    gamma: f64,
    /// Number of observations before TPE kicks in.
    n_startup_trials: usize,
    /// Number of candidate samples to evaluate when selecting the next point.
    n_ei_candidates: usize,
    /// Optional fixed bandwidth for KDE. If None, uses Scott's rule.
    kde_bandwidth: Option<f64>,
}

impl TpeSampler {
    /// Creates a new TPE sampler with default settings.
    ///
    /// - gamma: 0.25
    /// - `n_startup_trials`: 10
    /// - `n_ei_candidates`: 24
    /// - `kde_bandwidth`: Scott's rule
    #[must_use]
    pub fn new() -> Self {
        Self {
            gamma: 0.25,
            n_startup_trials: 10,
            n_ei_candidates: 24,
            kde_bandwidth: None,
        }
    }

    /// Creates a builder for configuring a TPE sampler.
    #[must_use]
    pub fn builder() -> TpeSamplerBuilder {
        TpeSamplerBuilder::new()
    }

    /// Orders observations best-first and splits them at the gamma quantile.
    ///
    /// Both groups are non-empty whenever there are at least two observations.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn split<'a>(
        &self,
        mut observations: Vec<(f64, &'a ParamValue)>,
        direction: Direction,
    ) -> (Vec<&'a ParamValue>, Vec<&'a ParamValue>) {
        observations.sort_by(|a, b| match direction {
            Direction::Minimize => a.0.total_cmp(&b.0),
            Direction::Maximize => b.0.total_cmp(&a.0),
        });

        let n = observations.len();
        let n_good = ((n as f64 * self.gamma).ceil() as usize).clamp(1, n - 1);

        let mut values = observations.into_iter().map(|(_, v)| v);
        let good: Vec<_> = values.by_ref().take(n_good).collect();
        let bad: Vec<_> = values.collect();
        (good, bad)
    }

    /// Picks the best of `n_ei_candidates` draws from l(x) on `[low, high]`.
    ///
    /// All values are in the internal (possibly log-transformed) space.
    fn sample_continuous(
        &self,
        low: f64,
        high: f64,
        good: Vec<f64>,
        bad: Vec<f64>,
        rng: &mut fastrand::Rng,
    ) -> Option<f64> {
        if high <= low {
            return Some(low);
        }
        // The densities are fitted on [0, 1]; halving first keeps the width
        // finite for bounds near `f64::MAX`.
        let half_width = high / 2.0 - low / 2.0;
        let to_unit = |v: f64| ((v / 2.0 - low / 2.0) / half_width).clamp(0.0, 1.0);
        let good = good.into_iter().map(to_unit).collect();
        let bad = bad.into_iter().map(to_unit).collect();

        let (l_kde, g_kde) = match self.kde_bandwidth {
            Some(bw) => {
                let bw = bw / 2.0 / half_width;
                (
                    KernelDensityEstimator::with_bandwidth(good, bw).ok()?,
                    KernelDensityEstimator::with_bandwidth(bad, bw).ok()?,
                )
            }
            None => (
                KernelDensityEstimator::new(good, 0.1).ok()?,
                KernelDensityEstimator::new(bad, 0.1).ok()?,
            ),
        };

        let mut best_candidate = 0.0;
        let mut best_ratio = f64::NEG_INFINITY;

        for _ in 0..self.n_ei_candidates.max(1) {
            let candidate = l_kde.sample(rng).clamp(0.0, 1.0);

            let l_density = l_kde.pdf(candidate);
            let g_density = g_kde.pdf(candidate);

            let ratio = if g_density < f64::EPSILON {
                if l_density > f64::EPSILON {
                    f64::INFINITY
                } else {
                    0.0
                }
            } else {
                l_density / g_density
            };

            if ratio > best_ratio {
                best_ratio = ratio;
                best_candidate = candidate;
            }
        }

        Some(rng_util::lerp(low, high, best_candidate))
    }

    /// Samples a categorical index weighted by smoothed l(x)/g(x).
    #[allow(clippy::cast_precision_loss)]
    fn sample_categorical(
        n_choices: usize,
        good: &[usize],
        bad: &[usize],
        rng: &mut fastrand::Rng,
    ) -> usize {
        let mut good_counts = vec![0usize; n_choices];
        let mut bad_counts = vec![0usize; n_choices];
        for &idx in good {
            good_counts[idx] += 1;
        }
        for &idx in bad {
            bad_counts[idx] += 1;
        }

        // Laplace smoothing keeps every choice reachable.
        let good_total = good.len() as f64 + n_choices as f64;
        let bad_total = bad.len() as f64 + n_choices as f64;

        let weights: Vec<f64> = (0..n_choices)
            .map(|i| {
                let l_prob = (good_counts[i] as f64 + 1.0) / good_total;
                let g_prob = (bad_counts[i] as f64 + 1.0) / bad_total;
                l_prob / g_prob
            })
            .collect();

        rng_util::weighted_index(rng, &weights)
    }

    #[allow(clippy::cast_precision_loss)]
    fn sample_informed(
        &self,
        distribution: &Distribution,
        good: &[&ParamValue],
        bad: &[&ParamValue],
        rng: &mut fastrand::Rng,
    ) -> Option<ParamValue> {
        match distribution {
            Distribution::Float(d) => {
                let to_internal = |v: f64| if d.log_scale { v.ln() } else { v };
                let collect = |group: &[&ParamValue]| -> Vec<f64> {
                    group.iter().filter_map(|v| v.as_f64()).map(to_internal).collect()
                };
                let internal = self.sample_continuous(
                    to_internal(d.low),
                    to_internal(d.high),
                    collect(good),
                    collect(bad),
                    rng,
                )?;
                let value = if d.log_scale { internal.exp() } else { internal };
                Some(ParamValue::Float(d.snap(value)))
            }
            Distribution::Int(d) => {
                let to_internal = |v: f64| if d.log_scale { v.ln() } else { v };
                let collect = |group: &[&ParamValue]| -> Vec<f64> {
                    group.iter().filter_map(|v| v.as_f64()).map(to_internal).collect()
                };
                let internal = self.sample_continuous(
                    to_internal(d.low as f64),
                    to_internal(d.high as f64),
                    collect(good),
                    collect(bad),
                    rng,
                )?;
                let value = if d.log_scale { internal.exp() } else { internal };
                Some(ParamValue::Int(d.snap(value)))
            }
            Distribution::Categorical(d) => {
                let indices = |group: &[&ParamValue]| -> Vec<usize> {
                    group
                        .iter()
                        .filter_map(|v| v.as_categorical())
                        .filter_map(|c| d.index_of(c))
                        .collect()
                };
                let index =
                    Self::sample_categorical(d.choices.len(), &indices(good), &indices(bad), rng);
                Some(ParamValue::Categorical(d.choices[index].clone()))
            }
        }
    }
}

impl Default for TpeSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`TpeSampler`].
///
/// # Examples
///
/// ```
/// use hyperstudy::sampler::TpeSamplerBuilder;
///
/// let sampler = TpeSamplerBuilder::new()
///     .gamma(0.15)
///     .n_startup_trials(20)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TpeSamplerBuilder {
    gamma: f64,
    n_startup_trials: usize,
    n_ei_candidates: usize,
    kde_bandwidth: Option<f64>,
}

impl TpeSamplerBuilder {
    /// Creates a new builder with the default settings of [`TpeSampler::new`].
    #[must_use]
    pub fn new() -> Self {
        let defaults = TpeSampler::new();
        Self {
            gamma: defaults.gamma,
            n_startup_trials: defaults.n_startup_trials,
            n_ei_candidates: defaults.n_ei_candidates,
            kde_bandwidth: defaults.kde_bandwidth,
        }
    }

    /// Sets the fraction of trials considered "good". Must be in (0.0, 1.0).
    #[must_use]
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the number of observations gathered by random sampling first.
    #[must_use]
    pub fn n_startup_trials(mut self, n: usize) -> Self {
        self.n_startup_trials = n;
        self
    }

    /// Sets how many candidates are drawn from l(x) per suggestion.
    #[must_use]
    pub fn n_ei_candidates(mut self, n: usize) -> Self {
        self.n_ei_candidates = n;
        self
    }

    /// Uses a fixed KDE bandwidth instead of Scott's rule. Must be positive.
    #[must_use]
    pub fn kde_bandwidth(mut self, bandwidth: f64) -> Self {
        self.kde_bandwidth = Some(bandwidth);
        self
    }

    /// Builds the configured [`TpeSampler`].
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGamma` if gamma is not in (0.0, 1.0), or
    /// `Error::InvalidBandwidth` if a fixed bandwidth is not positive.
    pub fn build(self) -> Result<TpeSampler> {
        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(Error::InvalidGamma(self.gamma));
        }
        if let Some(bw) = self.kde_bandwidth
            && !(bw > 0.0 && bw.is_finite())
        {
            return Err(Error::InvalidBandwidth(bw));
        }
        Ok(TpeSampler {
            gamma: self.gamma,
            n_startup_trials: self.n_startup_trials,
            n_ei_candidates: self.n_ei_candidates,
            kde_bandwidth: self.kde_bandwidth,
        })
    }
}

impl Default for TpeSamplerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for TpeSampler {
    fn sample(
        &self,
        spec: &ParamSpec,
        history: &History<'_>,
        rng: &mut fastrand::Rng,
    ) -> ParamValue {
        let observations = history.observations(spec);

        // Fall back to random sampling during startup phase
        if observations.len() < self.n_startup_trials.max(2) {
            return sample_uniform(spec.distribution(), rng);
        }

        let (good, bad) = self.split(observations, history.direction());
        self.sample_informed(spec.distribution(), &good, &bad, rng)
            .unwrap_or_else(|| sample_uniform(spec.distribution(), rng))
    }
}
