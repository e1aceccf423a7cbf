use std::sync::Arc;

use crate::config::StudyConfig;
use crate::sampler::Sampler;
use crate::sampler::random::RandomSampler;
use crate::types::Direction;

use super::Study;

/// Fluent construction of a [`Study`], created by [`Study::builder()`].
///
/// Unless overridden the study minimizes, samples with [`RandomSampler`],
/// and seeds its random source from entropy.
///
/// # Examples
///
/// ```
/// use hyperstudy::prelude::*;
///
/// let study = Study::builder()
///     .maximize()
///     .sampler(TpeSampler::builder().n_startup_trials(5).build().unwrap())
///     .seed(7)
///     .build();
///
/// assert_eq!(study.direction(), Direction::Maximize);
/// ```
pub struct StudyBuilder {
    config: StudyConfig,
    sampler: Arc<dyn Sampler>,
}

impl StudyBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: StudyConfig::default(),
            sampler: Arc::new(RandomSampler::new()),
        }
    }

    /// Take direction and seed from `config`, replacing earlier settings.
    #[must_use]
    pub fn config(mut self, config: StudyConfig) -> Self {
        self.config = config;
        self
    }

    /// Minimize the objective (the default).
    #[must_use]
    pub fn minimize(self) -> Self {
        self.direction(Direction::Minimize)
    }

    /// Maximize the objective.
    #[must_use]
    pub fn maximize(self) -> Self {
        self.direction(Direction::Maximize)
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.config.direction = direction;
        self
    }

    /// Use `sampler` for every parameter suggestion.
    #[must_use]
    pub fn sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    /// Seed the study's random source.
    ///
    /// Two studies built with the same seed, sampler, and objective record
    /// identical trials.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config = self.config.with_seed(seed);
        self
    }

    #[must_use]
    pub fn build(self) -> Study {
        let rng = self
            .config
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Study::from_parts(self.config.direction, self.sampler, rng)
    }
}
