use core::fmt;
use core::time::Duration;
use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::param::ParamValue;
use crate::types::TrialState;

use super::Study;

/// Finished trials flattened into rows with one cell per parameter.
///
/// The table is plain data for a reporting collaborator to render; the
/// study never writes it anywhere itself.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialTable {
    /// Every parameter name seen in any trial, sorted.
    pub param_columns: Vec<String>,
    /// One row per finished trial, in the order they finished.
    pub rows: Vec<TrialRow>,
}

/// One finished trial in a [`TrialTable`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrialRow {
    /// Trial index.
    pub index: u64,
    /// `Complete` or `Failed`.
    pub state: TrialState,
    /// Objective value; empty for failed trials.
    pub value: Option<f64>,
    /// Time spent in the objective.
    pub duration: Duration,
    /// Cells aligned with [`TrialTable::param_columns`]; empty where the
    /// trial did not suggest that parameter.
    pub params: Vec<Option<ParamValue>>,
}

impl TrialTable {
    /// Position of the column for `name`.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.param_columns
            .binary_search_by(|c| c.as_str().cmp(name))
            .ok()
    }

    /// Every row's cell for parameter `name`, or `None` for an unknown name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<Option<&ParamValue>>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.params[col].as_ref()).collect())
    }
}

impl Study {
    /// Flatten finished trials into a [`TrialTable`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    ///
    /// let mut trial = study.ask();
    /// trial.suggest_uniform("x", 0.0, 1.0).unwrap();
    /// study.complete_trial(trial, 0.5).unwrap();
    ///
    /// let mut trial = study.ask();
    /// trial.suggest_int("n", 1, 3).unwrap();
    /// study.fail_trial(trial, "diverged").unwrap();
    ///
    /// let table = study.trials_table();
    /// assert_eq!(table.param_columns, vec!["n", "x"]);
    /// assert_eq!(table.rows.len(), 2);
    /// assert!(table.rows[0].params[0].is_none());
    /// assert!(table.rows[1].value.is_none());
    /// ```
    #[must_use]
    pub fn trials_table(&self) -> TrialTable {
        let log = self.log.read();

        let param_columns: Vec<String> = log
            .trials
            .iter()
            .flat_map(|t| t.params.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();

        let rows = log
            .trials
            .iter()
            .map(|t| TrialRow {
                index: t.index,
                state: t.state,
                value: t.value,
                duration: t.duration,
                params: param_columns
                    .iter()
                    .map(|name| t.params.get(name).cloned())
                    .collect(),
            })
            .collect();

        TrialTable {
            param_columns,
            rows,
        }
    }

    /// Return a human-readable summary of the study.
    ///
    /// The summary includes:
    /// - Optimization direction and total trial count
    /// - Breakdown by state when any trial failed
    /// - Best trial value and parameters (if any completed trials exist)
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    ///
    /// let mut trial = study.ask();
    /// trial.suggest_uniform("x", 0.0, 10.0).unwrap();
    /// study.complete_trial(trial, 0.42).unwrap();
    ///
    /// let summary = study.summary();
    /// assert!(summary.contains("minimize"));
    /// assert!(summary.contains("0.42"));
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        use fmt::Write;

        let n_trials = self.n_trials();
        let n_failed = self.n_failed_trials();

        let mut s = format!("Study: {} | {n_trials} trials", self.direction);
        if n_failed > 0 {
            let _ = write!(s, " ({} complete, {n_failed} failed)", n_trials - n_failed);
        }

        if let Ok(best) = self.best_trial()
            && let Some(value) = best.value
        {
            let _ = write!(s, "\nBest value: {value} (trial #{})", best.index);
            if !best.params.is_empty() {
                s.push_str("\nBest parameters:");
                let mut params: Vec<_> = best.params.iter().collect();
                params.sort_by(|(a, _), (b, _)| a.cmp(b));
                for (name, value) in params {
                    let _ = write!(s, "\n  {name} = {value}");
                }
            }
        }

        s
    }
}

impl fmt::Display for Study {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
