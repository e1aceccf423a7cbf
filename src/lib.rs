#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Define-by-run hyperparameter optimization for single-objective,
//! sequential studies.
//!
//! A [`Study`] repeatedly calls your objective with a fresh [`Trial`]. The
//! objective asks the trial for parameter values (`suggest_*`), returns a
//! score, and the study records the result and tracks the best trial so far.
//! The loop stops on a trial budget, a timeout, or cancellation.
//!
//! # Getting Started
//!
//! ```
//! use hyperstudy::prelude::*;
//!
//! let study = Study::builder().seed(42).build();
//!
//! study
//!     .optimize(50, |trial| {
//!         let x = trial.suggest_uniform("x", -10.0, 10.0)?;
//!         let kind = trial.suggest_categorical("kind", &["linear", "square"])?;
//!         let value = match kind {
//!             "linear" => (x - 3.0).abs(),
//!             _ => (x - 3.0).powi(2),
//!         };
//!         Ok::<_, Error>(value)
//!     })
//!     .unwrap();
//!
//! let best = study.best_trial().unwrap();
//! println!("best {:?} with {:?}", best.value, best.params);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Study`] | Drive an optimization loop: create trials, record results, track the best. |
//! | [`Trial`] | A single evaluation of the objective function, carrying suggested parameter values. |
//! | [`ParamSpec`](distribution::ParamSpec) | A named, validated parameter domain. |
//! | [`Parameter`](parameter::Parameter) | Reusable typed definitions: [`FloatParam`](parameter::FloatParam), [`IntParam`](parameter::IntParam), [`CategoricalParam`](parameter::CategoricalParam), [`BoolParam`](parameter::BoolParam). |
//! | [`Sampler`](sampler::Sampler) | Strategy for choosing the next value: [`RandomSampler`](sampler::RandomSampler) or [`TpeSampler`](sampler::TpeSampler). |
//! | [`OptimizeConfig`] | Trial budget, timeout, and failure limit for one optimize call. |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key optimization points | on |
//! | `serde` | `Serialize`/`Deserialize` on configs, trial records, and the trial table | off |
//! | `ctrlc` | `StopHandle::install_ctrlc_handler` to stop the loop on Ctrl-C | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

mod config;
pub mod distribution;
mod error;
mod kde;
pub mod objective;
mod param;
pub mod parameter;
mod rng_util;
pub mod sampler;
mod stop;
mod study;
mod trial;
mod types;

pub use config::{OptimizeConfig, StudyConfig};
pub use error::{DomainError, Error, Result};
pub use objective::Objective;
pub use param::{CategoricalValue, ParamValue};
pub use sampler::FinishedTrial;
pub use stop::StopHandle;
pub use study::{LoopState, OptimizeReport, StopReason, Study, StudyBuilder, TrialRow, TrialTable};
pub use trial::Trial;
pub use types::{Direction, TrialState};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use hyperstudy::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{OptimizeConfig, StudyConfig};
    pub use crate::distribution::{Distribution, ParamKind, ParamSpec};
    pub use crate::error::{Error, Result};
    pub use crate::objective::Objective;
    pub use crate::param::{CategoricalValue, ParamValue};
    pub use crate::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam, Parameter};
    pub use crate::sampler::{FinishedTrial, RandomSampler, Sampler, TpeSampler};
    pub use crate::stop::StopHandle;
    pub use crate::study::{LoopState, OptimizeReport, StopReason, Study, StudyBuilder};
    pub use crate::trial::Trial;
    pub use crate::types::{Direction, TrialState};
}
