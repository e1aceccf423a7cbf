//! The [`Objective`] trait defines what gets optimized.
//!
//! For simple closures, pass them directly to
//! [`Study::optimize`](crate::Study::optimize):
//!
//! ```
//! use hyperstudy::prelude::*;
//!
//! let study = Study::minimize();
//!
//! study
//!     .optimize(50, |trial: &mut Trial| {
//!         let v = trial.suggest_uniform("x", -10.0, 10.0)?;
//!         Ok::<_, Error>((v - 3.0).powi(2))
//!     })
//!     .unwrap();
//! ```
//!
//! For early stopping or per-trial bookkeeping, implement [`Objective`] on
//! a struct and pass it to [`Study::optimize_with`](crate::Study::optimize_with):
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use hyperstudy::prelude::*;
//!
//! struct QuadraticWithTarget {
//!     target: f64,
//! }
//!
//! impl Objective for QuadraticWithTarget {
//!     type Error = Error;
//!
//!     fn evaluate(&mut self, trial: &mut Trial) -> Result<f64> {
//!         let v = trial.suggest_uniform("x", -10.0, 10.0)?;
//!         Ok((v - 3.0).powi(2))
//!     }
//!
//!     fn after_trial(&mut self, _study: &Study, trial: &FinishedTrial) -> ControlFlow<()> {
//!         match trial.value {
//!             Some(v) if v < self.target => ControlFlow::Break(()),
//!             _ => ControlFlow::Continue(()),
//!         }
//!     }
//! }
//!
//! let study = Study::builder().seed(3).build();
//! let report = study
//!     .optimize_with(&OptimizeConfig::trials(500), QuadraticWithTarget { target: 1.0 })
//!     .unwrap();
//! assert_eq!(report.reason, StopReason::ObjectiveRequested);
//! assert!(study.best_value().unwrap() < 1.0);
//! ```

use core::ops::ControlFlow;

use crate::sampler::FinishedTrial;
use crate::study::Study;
use crate::trial::Trial;

/// Defines an objective function with lifecycle hooks for optimization.
///
/// The only required method is [`evaluate`](Objective::evaluate), which
/// computes the objective value for a given trial. The optional hooks let
/// the objective end the loop early; a `Break` from either hook stops the
/// loop with [`StopReason::ObjectiveRequested`](crate::StopReason::ObjectiveRequested).
///
/// Closures `FnMut(&mut Trial) -> Result<f64, E>` implement this trait.
pub trait Objective {
    /// The error type returned by [`evaluate`](Objective::evaluate).
    ///
    /// Its message is recorded on the failed trial.
    type Error: ToString;

    /// Evaluate the objective function for a single trial.
    ///
    /// Suggest parameters from `trial` and return the objective value.
    ///
    /// # Errors
    ///
    /// Any error marks the trial as failed; the loop carries on with the
    /// next trial.
    fn evaluate(&mut self, trial: &mut Trial) -> Result<f64, Self::Error>;

    /// Called before each trial is created.
    ///
    /// Return `ControlFlow::Break(())` to stop before the next trial starts.
    fn before_trial(&mut self, _study: &Study) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Called after each trial has been recorded, complete or failed.
    ///
    /// Return `ControlFlow::Break(())` to stop the optimization loop.
    fn after_trial(&mut self, _study: &Study, _trial: &FinishedTrial) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F, E> Objective for F
where
    F: FnMut(&mut Trial) -> Result<f64, E>,
    E: ToString,
{
    type Error = E;

    fn evaluate(&mut self, trial: &mut Trial) -> Result<f64, E> {
        self(trial)
    }
}
