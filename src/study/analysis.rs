use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::sampler::FinishedTrial;
use crate::types::{Direction, TrialState};

use super::Study;

impl Study {
    /// Return the trial with the best objective value.
    ///
    /// The "best" trial depends on the optimization direction:
    /// - `Direction::Minimize`: the trial with the lowest objective value.
    /// - `Direction::Maximize`: the trial with the highest objective value.
    ///
    /// On a tie the trial that finished first stays best. The lookup is a
    /// direct index into the trial log, not a scan.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCompletedTrials` if no trials have been completed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    ///
    /// // Error when no trials completed
    /// assert!(study.best_trial().is_err());
    ///
    /// study.complete_trial(study.ask(), 0.8).unwrap();
    /// study.complete_trial(study.ask(), 0.3).unwrap();
    ///
    /// let best = study.best_trial().unwrap();
    /// assert_eq!(best.value, Some(0.3)); // Minimize: lower is better
    /// ```
    pub fn best_trial(&self) -> Result<FinishedTrial> {
        self.log
            .read()
            .best()
            .cloned()
            .ok_or(Error::NoCompletedTrials)
    }

    /// Return the best objective value found so far.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCompletedTrials` if no trials have been completed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::maximize();
    /// assert!(study.best_value().is_err());
    ///
    /// study.complete_trial(study.ask(), 0.3).unwrap();
    /// study.complete_trial(study.ask(), 0.8).unwrap();
    ///
    /// assert_eq!(study.best_value().unwrap(), 0.8); // Maximize: higher is better
    /// ```
    pub fn best_value(&self) -> Result<f64> {
        self.log
            .read()
            .best()
            .and_then(|t| t.value)
            .ok_or(Error::NoCompletedTrials)
    }

    /// Return the parameters of the best trial, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoCompletedTrials` if no trials have been completed.
    pub fn best_params(&self) -> Result<HashMap<String, ParamValue>> {
        self.log
            .read()
            .best()
            .map(|t| t.params.clone())
            .ok_or(Error::NoCompletedTrials)
    }

    /// Return the index of the best trial, if any trial has completed.
    #[must_use]
    pub fn best_trial_index(&self) -> Option<u64> {
        self.log.read().best().map(|t| t.index)
    }

    /// Return the top `n` complete trials, best first.
    ///
    /// Trials with equal values keep the order in which they finished.
    /// If fewer than `n` complete trials exist, returns all of them.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    /// for val in [5.0, 1.0, 3.0] {
    ///     study.complete_trial(study.ask(), val).unwrap();
    /// }
    ///
    /// let top2 = study.top_trials(2);
    /// assert_eq!(top2.len(), 2);
    /// assert_eq!(top2[0].value, Some(1.0));
    /// assert_eq!(top2[1].value, Some(3.0));
    /// ```
    #[must_use]
    pub fn top_trials(&self, n: usize) -> Vec<FinishedTrial> {
        let log = self.log.read();
        let mut complete: Vec<(f64, &FinishedTrial)> = log
            .trials
            .iter()
            .filter_map(|t| Some((t.value?, t)))
            .collect();

        // `sort_by` is stable, so ties keep finish order.
        complete.sort_by(|(a, _), (b, _)| match self.direction {
            Direction::Minimize => a.total_cmp(b),
            Direction::Maximize => b.total_cmp(a),
        });

        complete
            .into_iter()
            .take(n)
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Return the number of finished trials, complete or failed.
    #[must_use]
    pub fn n_trials(&self) -> usize {
        self.log.read().trials.len()
    }

    /// Return the number of complete trials.
    #[must_use]
    pub fn n_complete_trials(&self) -> usize {
        self.count_state(TrialState::Complete)
    }

    /// Return the number of failed trials.
    #[must_use]
    pub fn n_failed_trials(&self) -> usize {
        self.count_state(TrialState::Failed)
    }

    fn count_state(&self, state: TrialState) -> usize {
        self.log
            .read()
            .trials
            .iter()
            .filter(|t| t.state == state)
            .count()
    }
}
