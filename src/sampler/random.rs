//! Random sampler implementation.

use crate::distribution::{Distribution, ParamSpec};
use crate::param::ParamValue;
use crate::rng_util;
use crate::sampler::{History, Sampler};

/// A simple random sampler that samples uniformly from distributions.
///
/// This sampler ignores the trial history and samples uniformly at random,
/// respecting log scale and step size constraints. It serves as a baseline
/// sampler and is used during the startup phase of more sophisticated samplers.
///
/// The sampler is stateless: reproducibility comes from the random source
/// the study passes in, so seed the study rather than the sampler.
///
/// # Examples
///
/// ```
/// use hyperstudy::sampler::RandomSampler;
/// use hyperstudy::Study;
///
/// let study = Study::builder().sampler(RandomSampler::new()).seed(42).build();
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSampler;

impl RandomSampler {
    /// Creates a new random sampler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Draws one value uniformly from `distribution`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn sample_uniform(distribution: &Distribution, rng: &mut fastrand::Rng) -> ParamValue {
    match distribution {
        Distribution::Float(d) => {
            let value = if d.log_scale {
                // Sample uniformly in log space
                let log_value = rng_util::f64_range(rng, d.low.ln(), d.high.ln());
                log_value.exp().clamp(d.low, d.high)
            } else if d.step.is_some() {
                // Sample from step grid
                let k = rng.i64(0..=d.n_steps());
                d.grid_point(k)
            } else {
                rng_util::f64_range(rng, d.low, d.high)
            };
            ParamValue::Float(value)
        }
        Distribution::Int(d) => {
            let value = if d.log_scale {
                // Sample uniformly in log space, then round
                let log_low = (d.low as f64).ln();
                let log_high = (d.high as f64 + 1.0).ln();
                let raw = rng_util::f64_range(rng, log_low, log_high).exp();
                d.snap(raw.floor())
            } else {
                let k = rng.u64(0..=d.n_steps());
                d.grid_point(k)
            };
            ParamValue::Int(value)
        }
        Distribution::Categorical(d) => {
            let index = rng.usize(0..d.choices.len());
            ParamValue::Categorical(d.choices[index].clone())
        }
    }
}

impl Sampler for RandomSampler {
    fn sample(
        &self,
        spec: &ParamSpec,
        _history: &History<'_>,
        rng: &mut fastrand::Rng,
    ) -> ParamValue {
        sample_uniform(spec.distribution(), rng)
    }
}
