//! Parameter distribution types.
//!
//! A [`Distribution`] is the domain a parameter is drawn from; a
//! [`ParamSpec`] pairs it with the parameter's name and is only ever
//! constructed in a validated state.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Error, Result};
use crate::param::{CategoricalValue, ParamValue};

/// Tolerance, in steps, used when checking that a float step divides its range.
const STEP_TOLERANCE: f64 = 1e-8;

/// Most grid steps a float domain may span.
const MAX_FLOAT_STEPS: f64 = 1e12;

/// Allowed distance, in steps, between `range / step` and a whole number.
///
/// Rounding in the division grows with the ratio, so the bound does too,
/// but it stays far below half a step up to [`MAX_FLOAT_STEPS`].
fn step_residual_tolerance(ratio: f64) -> f64 {
    STEP_TOLERANCE.max(16.0 * f64::EPSILON * ratio)
}

/// Distribution for floating-point parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Whether to sample in log space.
    pub log_scale: bool,
    /// Optional step size for discretization.
    pub step: Option<f64>,
}

impl FloatDistribution {
    /// Number of steps between `low` and `high` on the discrete grid.
    ///
    /// Only meaningful when `step` is set; a validated distribution
    /// guarantees the range is a whole number of steps.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn n_steps(&self) -> i64 {
        match self.step {
            Some(step) => ((self.high - self.low) / step).round() as i64,
            None => 0,
        }
    }

    /// The `k`-th grid point, clamped to `high` against rounding drift.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn grid_point(&self, k: i64) -> f64 {
        let step = self.step.unwrap_or(0.0);
        (self.low + k as f64 * step).min(self.high)
    }

    /// Snaps `value` to the nearest grid point (or clamps it when there is no step).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snap(&self, value: f64) -> f64 {
        match self.step {
            Some(step) => {
                let k = ((value - self.low) / step).round() as i64;
                self.grid_point(k.clamp(0, self.n_steps()))
            }
            None => value.clamp(self.low, self.high),
        }
    }

    fn validate(&self) -> core::result::Result<(), DomainError> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(DomainError::NonFiniteBounds);
        }
        if self.low > self.high {
            return Err(DomainError::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        if self.log_scale && self.low <= 0.0 {
            return Err(DomainError::InvalidLogBounds);
        }
        if let Some(step) = self.step {
            if self.log_scale {
                return Err(DomainError::LogWithStep);
            }
            if !step.is_finite() || step <= 0.0 {
                return Err(DomainError::InvalidStep);
            }
            let range = self.high - self.low;
            let ratio = range / step;
            if ratio > MAX_FLOAT_STEPS {
                return Err(DomainError::TooManySteps { step, range });
            }
            if (ratio - ratio.round()).abs() > step_residual_tolerance(ratio) {
                return Err(DomainError::StepMismatch { step, range });
            }
        }
        Ok(())
    }

    fn contains(&self, value: f64) -> bool {
        if !(self.low..=self.high).contains(&value) {
            return false;
        }
        match self.step {
            Some(step) => {
                let k = ((value - self.low) / step).round();
                (value - self.snap(value)).abs() <= STEP_TOLERANCE * step.max(k.abs() * step)
            }
            None => true,
        }
    }
}

/// Distribution for integer parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Whether to sample in log space.
    pub log_scale: bool,
    /// Optional step size for discretization (defaults to 1).
    pub step: Option<i64>,
}

impl IntDistribution {
    /// The effective step (1 when unset).
    #[must_use]
    pub fn effective_step(&self) -> i64 {
        self.step.unwrap_or(1)
    }

    /// Number of steps between `low` and `high`.
    ///
    /// Counted in `u64`, which holds the width of any `i64` range.
    #[must_use]
    pub fn n_steps(&self) -> u64 {
        self.high.abs_diff(self.low) / self.effective_step().unsigned_abs().max(1)
    }

    /// The `k`-th value on the step grid, saturating at the type bounds.
    #[must_use]
    pub fn grid_point(&self, k: u64) -> i64 {
        let offset = k.saturating_mul(self.effective_step().unsigned_abs());
        self.low.saturating_add_unsigned(offset).min(self.high)
    }

    /// Snaps `value` to the nearest valid integer in the domain.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn snap(&self, value: f64) -> i64 {
        let step = self.effective_step().unsigned_abs().max(1) as f64;
        // `as` saturates, so a value below `low` lands on step 0.
        let k = ((value - self.low as f64) / step).round().max(0.0) as u64;
        self.grid_point(k.min(self.n_steps()))
    }

    #[allow(clippy::cast_precision_loss)]
    fn validate(&self) -> core::result::Result<(), DomainError> {
        if self.low > self.high {
            return Err(DomainError::InvalidBounds {
                low: self.low as f64,
                high: self.high as f64,
            });
        }
        if self.log_scale && self.low < 1 {
            return Err(DomainError::InvalidLogBounds);
        }
        if let Some(step) = self.step {
            if self.log_scale && step != 1 {
                return Err(DomainError::LogWithStep);
            }
            if step <= 0 {
                return Err(DomainError::InvalidStep);
            }
            let range = self.high.abs_diff(self.low);
            if range % step.unsigned_abs() != 0 {
                return Err(DomainError::StepMismatch {
                    step: step as f64,
                    range: range as f64,
                });
            }
        }
        Ok(())
    }

    fn contains(&self, value: i64) -> bool {
        (self.low..=self.high).contains(&value)
            && value
                .abs_diff(self.low)
                .checked_rem(self.effective_step().unsigned_abs())
                == Some(0)
    }
}

/// Distribution for categorical parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalDistribution {
    /// The ordered list of choices.
    pub choices: Vec<CategoricalValue>,
}

impl CategoricalDistribution {
    /// Position of `value` among the choices.
    #[must_use]
    pub fn index_of(&self, value: &CategoricalValue) -> Option<usize> {
        self.choices.iter().position(|c| c == value)
    }
}

/// Enum wrapping all parameter distribution types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// A floating-point distribution.
    Float(FloatDistribution),
    /// An integer distribution.
    Int(IntDistribution),
    /// A categorical distribution.
    Categorical(CategoricalDistribution),
}

impl Distribution {
    /// Uniform real range `[low, high]`.
    #[must_use]
    pub fn uniform(low: f64, high: f64) -> Self {
        Distribution::Float(FloatDistribution {
            low,
            high,
            log_scale: false,
            step: None,
        })
    }

    /// Log-uniform real range `[low, high]`.
    #[must_use]
    pub fn log_uniform(low: f64, high: f64) -> Self {
        Distribution::Float(FloatDistribution {
            low,
            high,
            log_scale: true,
            step: None,
        })
    }

    /// Real range `[low, high]` restricted to `low + k * step`.
    #[must_use]
    pub fn discrete_uniform(low: f64, high: f64, step: f64) -> Self {
        Distribution::Float(FloatDistribution {
            low,
            high,
            log_scale: false,
            step: Some(step),
        })
    }

    /// Integer range `[low, high]`, both inclusive.
    #[must_use]
    pub fn int(low: i64, high: i64) -> Self {
        Distribution::Int(IntDistribution {
            low,
            high,
            log_scale: false,
            step: None,
        })
    }

    /// Ordered list of categorical choices.
    #[must_use]
    pub fn categorical(choices: Vec<CategoricalValue>) -> Self {
        Distribution::Categorical(CategoricalDistribution { choices })
    }

    /// The kind of domain this distribution describes.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Distribution::Float(d) if d.log_scale => ParamKind::LogUniform,
            Distribution::Float(d) if d.step.is_some() => ParamKind::DiscreteUniform,
            Distribution::Float(_) => ParamKind::Uniform,
            Distribution::Int(_) => ParamKind::Int,
            Distribution::Categorical(_) => ParamKind::Categorical,
        }
    }

    /// Checks the domain for well-formedness.
    ///
    /// # Errors
    ///
    /// Returns the [`DomainError`] describing the first problem found.
    pub fn validate(&self) -> core::result::Result<(), DomainError> {
        match self {
            Distribution::Float(d) => d.validate(),
            Distribution::Int(d) => d.validate(),
            Distribution::Categorical(d) if d.choices.is_empty() => Err(DomainError::EmptyChoices),
            Distribution::Categorical(d) => match d
                .choices
                .iter()
                .position(|c| matches!(c, CategoricalValue::Float(v) if v.is_nan()))
            {
                Some(position) => Err(DomainError::NanChoice(position)),
                None => Ok(()),
            },
        }
    }

    /// Returns `true` if `value` is a legal draw from this distribution.
    ///
    /// Float values must lie in `[low, high]` (and on the grid when a step is
    /// set), integers must lie in `[low, high]` on the step grid, and
    /// categorical values must be one of the declared choices.
    #[must_use]
    pub fn contains(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (Distribution::Float(d), ParamValue::Float(v)) => d.contains(*v),
            (Distribution::Int(d), ParamValue::Int(v)) => d.contains(*v),
            (Distribution::Categorical(d), ParamValue::Categorical(v)) => d.index_of(v).is_some(),
            _ => false,
        }
    }
}

/// The kind of domain a parameter is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamKind {
    /// One of an ordered list of choices.
    Categorical,
    /// An integer range.
    Int,
    /// A uniform real range.
    Uniform,
    /// A log-uniform real range.
    LogUniform,
    /// A real range on a fixed step grid.
    DiscreteUniform,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Categorical => "categorical",
            ParamKind::Int => "int",
            ParamKind::Uniform => "uniform",
            ParamKind::LogUniform => "loguniform",
            ParamKind::DiscreteUniform => "discrete_uniform",
        };
        f.write_str(s)
    }
}

/// A named, validated parameter domain.
///
/// Construction fails eagerly on a malformed domain, so every `ParamSpec`
/// that exists is safe to hand to a sampler.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParamSpec {
    name: String,
    distribution: Distribution,
}

impl ParamSpec {
    /// Validates `distribution` and binds it to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if the distribution is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::distribution::{Distribution, ParamSpec};
    ///
    /// assert!(ParamSpec::new("x", Distribution::uniform(-1.0, 1.0)).is_ok());
    /// assert!(ParamSpec::new("x", Distribution::uniform(1.0, -1.0)).is_err());
    /// assert!(ParamSpec::new("c", Distribution::categorical(vec![])).is_err());
    /// ```
    pub fn new(name: impl Into<String>, distribution: Distribution) -> Result<Self> {
        let name = name.into();
        if let Err(reason) = distribution.validate() {
            return Err(Error::InvalidDomain { name, reason });
        }
        Ok(Self { name, distribution })
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validated distribution.
    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The kind of domain.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.distribution.kind()
    }
}
