//! Gaussian Parzen windows over a single real axis.
//!
//! The TPE sampler fits one of these to the good observations and one to
//! the bad observations of a parameter, then scores candidates by the ratio
//! of the two densities.

use crate::error::{Error, Result};
use crate::rng_util;

/// `sqrt(2 * pi)`.
const SQRT_TAU: f64 = 2.506_628_274_631;

/// An equal-weight mixture of Gaussians, one per observed point.
#[derive(Clone, Debug)]
pub(crate) struct KernelDensityEstimator {
    centers: Vec<f64>,
    bandwidth: f64,
    /// `1 / (n * h * sqrt(2 * pi))`, so `pdf` is a plain sum.
    scale: f64,
}

impl KernelDensityEstimator {
    /// Fits the mixture with a bandwidth from Scott's rule.
    ///
    /// `fallback` is used when the centers have no spread, e.g. a single
    /// observation or repeated identical values.
    ///
    /// # Errors
    ///
    /// `Error::EmptySamples` when there are no centers.
    pub(crate) fn new(centers: Vec<f64>, fallback: f64) -> Result<Self> {
        let bandwidth = scott_bandwidth(&centers).unwrap_or(fallback);
        Self::with_bandwidth(centers, bandwidth)
    }

    /// Fits the mixture with a fixed bandwidth.
    ///
    /// # Errors
    ///
    /// `Error::EmptySamples` when there are no centers, and
    /// `Error::InvalidBandwidth` when `bandwidth` is not a positive number.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn with_bandwidth(centers: Vec<f64>, bandwidth: f64) -> Result<Self> {
        if centers.is_empty() {
            return Err(Error::EmptySamples);
        }
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(Error::InvalidBandwidth(bandwidth));
        }
        let scale = 1.0 / (centers.len() as f64 * bandwidth * SQRT_TAU);
        Ok(Self {
            centers,
            bandwidth,
            scale,
        })
    }

    pub(crate) fn pdf(&self, x: f64) -> f64 {
        let kernels: f64 = self
            .centers
            .iter()
            .map(|&c| {
                let z = (x - c) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        kernels * self.scale
    }

    /// Draws from the mixture: a uniform center plus Gaussian noise.
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng) -> f64 {
        let center = self.centers[rng.usize(..self.centers.len())];
        rng_util::standard_normal(rng).mul_add(self.bandwidth, center)
    }

    #[cfg(test)]
    fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Scott's rule, `h = sigma * n^(-1/5)`; `None` when the spread is zero.
#[allow(clippy::cast_precision_loss)]
fn scott_bandwidth(centers: &[f64]) -> Option<f64> {
    if centers.len() < 2 {
        return None;
    }
    let n = centers.len() as f64;
    let mean = centers.iter().sum::<f64>() / n;
    let sigma = (centers.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n).sqrt();
    (sigma > f64::EPSILON).then(|| sigma * n.powf(-0.2))
}
