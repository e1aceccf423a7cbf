/// Errors returned by studies, trials, and parameter definitions.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when a parameter's domain is malformed.
    ///
    /// Surfaced to the objective from the `suggest_*` call that declared it.
    #[error("invalid domain for parameter '{name}': {reason}")]
    InvalidDomain {
        /// The name of the offending parameter.
        name: String,
        /// What is wrong with the domain.
        #[source]
        reason: DomainError,
    },

    /// Returned when a parameter is suggested again with a different domain.
    #[error("parameter conflict for '{name}': {reason}")]
    ParameterConflict {
        /// The name of the conflicting parameter.
        name: String,
        /// The reason for the conflict.
        reason: String,
    },

    /// Returned when requesting the best trial but no trials have completed.
    #[error("no completed trials available")]
    NoCompletedTrials,

    /// Returned when a study or optimize configuration is rejected.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// The configuration field that was rejected.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when a direction string is neither `minimize` nor `maximize`.
    #[error("unknown direction '{0}': expected 'minimize' or 'maximize'")]
    UnknownDirection(String),

    /// Returned when gamma is not in the valid range (0.0, 1.0).
    #[error("invalid gamma: {0} must be in (0.0, 1.0)")]
    InvalidGamma(f64),

    /// Returned when bandwidth is not positive.
    #[error("invalid bandwidth: {0} must be positive")]
    InvalidBandwidth(f64),

    /// Returned when a trial handed to `tell` was not created by this study.
    #[error("trial {0} was not created by this study")]
    UnknownTrial(u64),

    /// Returned when a KDE is created with empty samples.
    #[error("KDE requires at least one sample")]
    EmptySamples,

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),

    /// Returned when the Ctrl-C handler cannot be installed.
    #[cfg(feature = "ctrlc")]
    #[error("failed to install signal handler: {0}")]
    SignalHandler(String),
}

/// Why a parameter domain was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The lower bound is greater than the upper bound.
    #[error("low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// A bound is NaN or infinite.
    #[error("bounds must be finite")]
    NonFiniteBounds,

    /// Log scale was requested with a non-positive lower bound.
    #[error("low must be positive for log scale")]
    InvalidLogBounds,

    /// The step is zero, negative, or not finite.
    #[error("step must be positive")]
    InvalidStep,

    /// The step does not evenly divide the range.
    #[error("step {step} does not evenly divide the range {range}")]
    StepMismatch {
        /// The requested step.
        step: f64,
        /// `high - low`.
        range: f64,
    },

    /// The range holds more grid steps than a float can tell apart.
    #[error("step {step} splits the range {range} into too many points")]
    TooManySteps {
        /// The requested step.
        step: f64,
        /// `high - low`.
        range: f64,
    },

    /// Log scale and a step were both requested.
    #[error("log scale cannot be combined with a step")]
    LogWithStep,

    /// A categorical parameter has no choices.
    #[error("categorical choices cannot be empty")]
    EmptyChoices,

    /// A categorical choice is a NaN float, which never equals itself.
    #[error("categorical choice at position {0} is NaN")]
    NanChoice(usize),
}

pub type Result<T> = core::result::Result<T, Error>;
