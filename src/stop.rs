//! Cooperative cancellation of the optimize loop.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable flag that asks a running optimize loop to stop.
///
/// The loop checks the flag between trials only: a trial that is already
/// running always finishes and is recorded before the loop halts. Clones
/// share the flag and can be moved to other threads.
///
/// # Examples
///
/// ```
/// use hyperstudy::{Study, StopReason, Trial};
///
/// let study = Study::minimize();
/// let handle = study.stop_handle();
///
/// let report = study
///     .optimize_unbounded(|trial: &mut Trial| {
///         let x = trial.suggest_uniform("x", 0.0, 1.0)?;
///         if trial.index() == 9 {
///             handle.cancel();
///         }
///         Ok::<_, hyperstudy::Error>(x)
///     })
///     .unwrap();
///
/// assert_eq!(report.reason, StopReason::Cancelled);
/// assert_eq!(study.n_trials(), 10);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// A new, untriggered handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the loop stop before its next trial.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears a pending request so the next loop can run.
    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Trips this handle when the process receives Ctrl-C.
    ///
    /// Only one handler may be installed per process.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignalHandler`](crate::Error::SignalHandler) if a
    /// handler is already installed or the platform refuses it.
    #[cfg(feature = "ctrlc")]
    pub fn install_ctrlc_handler(&self) -> crate::Result<()> {
        let handle = self.clone();
        ctrlc::set_handler(move || handle.cancel())
            .map_err(|e| crate::Error::SignalHandler(e.to_string()))
    }
}
