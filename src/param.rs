//! Parameter value storage types.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One choice of a categorical parameter.
///
/// Choices are stored by value so that a recorded trial can be read back
/// without the parameter definition that produced it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CategoricalValue {
    /// A boolean choice.
    Bool(bool),
    /// An integer choice.
    Int(i64),
    /// A floating-point choice.
    Float(f64),
    /// A string choice.
    Str(String),
}

impl CategoricalValue {
    /// Returns the string choice, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CategoricalValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean choice, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CategoricalValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for CategoricalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoricalValue::Bool(v) => write!(f, "{v}"),
            CategoricalValue::Int(v) => write!(f, "{v}"),
            CategoricalValue::Float(v) => write!(f, "{v}"),
            CategoricalValue::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for CategoricalValue {
    fn from(v: bool) -> Self {
        CategoricalValue::Bool(v)
    }
}

impl From<i64> for CategoricalValue {
    fn from(v: i64) -> Self {
        CategoricalValue::Int(v)
    }
}

impl From<i32> for CategoricalValue {
    fn from(v: i32) -> Self {
        CategoricalValue::Int(i64::from(v))
    }
}

impl From<f64> for CategoricalValue {
    fn from(v: f64) -> Self {
        CategoricalValue::Float(v)
    }
}

impl From<&str> for CategoricalValue {
    fn from(v: &str) -> Self {
        CategoricalValue::Str(v.to_string())
    }
}

impl From<String> for CategoricalValue {
    fn from(v: String) -> Self {
        CategoricalValue::Str(v)
    }
}

/// Represents a sampled parameter value.
///
/// This enum stores different parameter value types uniformly so that a
/// trial's assignment can be kept in a single name-keyed map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParamValue {
    /// A floating-point parameter value.
    Float(f64),
    /// An integer parameter value.
    Int(i64),
    /// A categorical parameter value.
    Categorical(CategoricalValue),
}

impl ParamValue {
    /// Returns the value as `f64` for float and integer parameters.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Categorical(_) => None,
        }
    }

    /// Returns the value for integer parameters.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the chosen value for categorical parameters.
    #[must_use]
    pub fn as_categorical(&self) -> Option<&CategoricalValue> {
        match self {
            ParamValue::Categorical(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Categorical(v) => write!(f, "{v}"),
        }
    }
}
