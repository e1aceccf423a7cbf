//! Typed, reusable parameter definitions.
//!
//! A [`Parameter`] bundles a name with a domain and knows how to turn the
//! recorded [`ParamValue`] back into a typed value. Definitions go through
//! the same validation, replay, and conflict checks as the
//! `Trial::suggest_*` methods, so the two styles can be mixed freely.
//!
//! # Example
//!
//! ```
//! use hyperstudy::Trial;
//! use hyperstudy::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam, Parameter};
//!
//! let mut trial = Trial::new(0);
//!
//! let lr = FloatParam::new("lr", 1e-5, 1e-1)
//!     .log_scale()
//!     .suggest(&mut trial)
//!     .unwrap();
//! let layers = IntParam::new("layers", 1, 10).suggest(&mut trial).unwrap();
//! let optimizer = CategoricalParam::new("optimizer", vec!["sgd", "adam"])
//!     .suggest(&mut trial)
//!     .unwrap();
//! let dropout = BoolParam::new("dropout").suggest(&mut trial).unwrap();
//! ```

use core::fmt::Debug;

use crate::distribution::{
    CategoricalDistribution, Distribution, FloatDistribution, IntDistribution, ParamSpec,
};
use crate::error::{Error, Result};
use crate::param::{CategoricalValue, ParamValue};
use crate::trial::Trial;

/// A named parameter definition that can be suggested by a [`Trial`].
///
/// Implementors specify the distribution to sample from and how to convert
/// the raw [`ParamValue`] back into a typed value. Two definitions with the
/// same name refer to the same parameter within a trial.
pub trait Parameter: Debug {
    /// The typed value returned after sampling.
    type Value;

    /// The parameter name, unique within a trial.
    fn name(&self) -> &str;

    /// Returns the distribution that this parameter samples from.
    fn distribution(&self) -> Distribution;

    /// Converts a raw [`ParamValue`] into the typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the `ParamValue` variant doesn't match what this parameter expects.
    fn cast_param_value(&self, param_value: &ParamValue) -> Result<Self::Value>;

    /// Validates the domain and binds it to the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDomain`] if the domain is malformed.
    fn spec(&self) -> Result<ParamSpec> {
        ParamSpec::new(self.name(), self.distribution())
    }

    /// Suggests a value for this parameter from the given trial.
    ///
    /// This is a convenience method that delegates to [`Trial::suggest_param`].
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is invalid or the name was already
    /// suggested in this trial with a different domain.
    fn suggest(&self, trial: &mut Trial) -> Result<Self::Value>
    where
        Self: Sized,
    {
        trial.suggest_param(self)
    }
}

/// A real-valued parameter, optionally log-scaled or stepped.
///
/// # Example
///
/// ```
/// use hyperstudy::Trial;
/// use hyperstudy::parameter::{FloatParam, Parameter};
///
/// let mut trial = Trial::new(0);
///
/// // Simple range
/// let x = FloatParam::new("x", 0.0, 1.0).suggest(&mut trial).unwrap();
///
/// // Log-scale
/// let lr = FloatParam::new("lr", 1e-5, 1e-1)
///     .log_scale()
///     .suggest(&mut trial)
///     .unwrap();
///
/// // Stepped
/// let ratio = FloatParam::new("ratio", 0.0, 1.0)
///     .step(0.25)
///     .suggest(&mut trial)
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FloatParam {
    name: String,
    domain: FloatDistribution,
}

impl FloatParam {
    /// Creates a new float parameter over `[low, high]`.
    #[must_use]
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        let domain = FloatDistribution {
            low,
            high,
            log_scale: false,
            step: None,
        };
        Self {
            name: name.into(),
            domain,
        }
    }

    /// Samples uniformly in `ln` space. Requires `low > 0`.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.domain.log_scale = true;
        self
    }

    /// Restricts values to `low + k * step`; `step` must divide the range.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.domain.step = Some(step);
        self
    }
}

impl Parameter for FloatParam {
    type Value = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Float(self.domain.clone())
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<f64> {
        if let ParamValue::Float(v) = param_value {
            Ok(*v)
        } else {
            Err(Error::Internal("float parameter recorded a non-float value"))
        }
    }
}

/// An integer parameter with optional log-scale and step size.
///
/// # Example
///
/// ```
/// use hyperstudy::Trial;
/// use hyperstudy::parameter::{IntParam, Parameter};
///
/// let mut trial = Trial::new(0);
///
/// let n = IntParam::new("n", 1, 10).suggest(&mut trial).unwrap();
/// let batch = IntParam::new("batch", 1, 1024)
///     .log_scale()
///     .suggest(&mut trial)
///     .unwrap();
/// let units = IntParam::new("units", 32, 512)
///     .step(32)
///     .suggest(&mut trial)
///     .unwrap();
/// assert_eq!(units % 32, 0);
/// ```
#[derive(Clone, Debug)]
pub struct IntParam {
    name: String,
    domain: IntDistribution,
}

impl IntParam {
    /// Creates a new integer parameter over `[low, high]`, both inclusive.
    #[must_use]
    pub fn new(name: impl Into<String>, low: i64, high: i64) -> Self {
        let domain = IntDistribution {
            low,
            high,
            log_scale: false,
            step: None,
        };
        Self {
            name: name.into(),
            domain,
        }
    }

    /// Enables log-scale sampling. Requires `low >= 1`.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.domain.log_scale = true;
        self
    }

    /// Sets a step size; it must divide `high - low`.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.domain.step = Some(step);
        self
    }
}

impl Parameter for IntParam {
    type Value = i64;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Int(self.domain.clone())
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<i64> {
        param_value
            .as_i64()
            .ok_or(Error::Internal("int parameter recorded a non-integer value"))
    }
}

/// A categorical parameter that selects from a list of choices.
///
/// Any type convertible into a [`CategoricalValue`] can be used as a
/// choice; the sampled choice is handed back as the original type.
///
/// # Example
///
/// ```
/// use hyperstudy::Trial;
/// use hyperstudy::parameter::{CategoricalParam, Parameter};
///
/// let mut trial = Trial::new(0);
/// let opt = CategoricalParam::new("optimizer", vec!["sgd", "adam", "rmsprop"])
///     .suggest(&mut trial)
///     .unwrap();
/// assert!(["sgd", "adam", "rmsprop"].contains(&opt));
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalParam<T> {
    name: String,
    choices: Vec<T>,
    values: Vec<CategoricalValue>,
}

impl<T: Clone + Into<CategoricalValue>> CategoricalParam<T> {
    /// Creates a new categorical parameter with the given choices.
    #[must_use]
    pub fn new(name: impl Into<String>, choices: Vec<T>) -> Self {
        let values = choices.iter().cloned().map(Into::into).collect();
        Self {
            name: name.into(),
            choices,
            values,
        }
    }
}

impl<T: Clone + Debug> Parameter for CategoricalParam<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Categorical(CategoricalDistribution {
            choices: self.values.clone(),
        })
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<T> {
        let ParamValue::Categorical(value) = param_value else {
            return Err(Error::Internal(
                "categorical parameter recorded a non-categorical value",
            ));
        };
        self.values
            .iter()
            .position(|v| v == value)
            .map(|index| self.choices[index].clone())
            .ok_or(Error::Internal("categorical value is not one of the choices"))
    }
}

/// A boolean parameter, drawn as the categorical `[false, true]`.
///
/// # Example
///
/// ```
/// use hyperstudy::Trial;
/// use hyperstudy::parameter::{BoolParam, Parameter};
///
/// let mut trial = Trial::new(0);
/// let dropout = BoolParam::new("dropout").suggest(&mut trial).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct BoolParam {
    name: String,
}

impl BoolParam {
    /// Creates a new boolean parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Parameter for BoolParam {
    type Value = bool;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::categorical(vec![false.into(), true.into()])
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<bool> {
        param_value
            .as_categorical()
            .and_then(CategoricalValue::as_bool)
            .ok_or(Error::Internal("bool parameter recorded a non-boolean value"))
    }
}
