use core::time::Duration;
use std::thread;

use hyperstudy::{Error, ParamValue, Study, TrialState};

#[test]
fn table_has_one_row_per_finished_trial() {
    let study = Study::builder().seed(1).build();
    study
        .optimize(6, |trial| {
            let x = trial.suggest_uniform("x", 0.0, 1.0)?;
            if x > 0.5 {
                let depth = trial.suggest_int("depth", 1, 4)?;
                return Ok::<_, Error>(x + depth as f64);
            }
            Ok(x)
        })
        .unwrap();

    let table = study.trials_table();
    assert_eq!(table.rows.len(), 6);
    assert_eq!(table.param_columns, vec!["depth", "x"]);

    let depth_col = table.column_index("depth").unwrap();
    let x_col = table.column_index("x").unwrap();
    for (row, trial) in table.rows.iter().zip(study.trials()) {
        assert_eq!(row.index, trial.index);
        assert_eq!(row.value, trial.value);
        assert_eq!(row.params[x_col].as_ref(), trial.param("x"));
        assert_eq!(row.params[depth_col].is_some(), trial.param("depth").is_some());
    }
}

#[test]
fn table_records_failures_and_durations() {
    let study = Study::minimize();
    study
        .optimize(2, |trial| {
            let slow = trial.suggest_bool("slow")?;
            if slow {
                thread::sleep(Duration::from_millis(5));
            }
            Err::<f64, _>(Error::NoCompletedTrials)
        })
        .unwrap();

    let table = study.trials_table();
    assert!(table.rows.iter().all(|r| r.state == TrialState::Failed));
    assert!(table.rows.iter().all(|r| r.value.is_none()));
    for row in &table.rows {
        let slow = row.params[0] == Some(ParamValue::Categorical(true.into()));
        if slow {
            assert!(row.duration >= Duration::from_millis(5));
        }
    }
}

#[test]
fn empty_study_has_empty_table_and_short_summary() {
    let study = Study::maximize();
    let table = study.trials_table();
    assert!(table.param_columns.is_empty());
    assert!(table.rows.is_empty());
    assert_eq!(study.summary(), "Study: maximize | 0 trials");
}

#[test]
fn summary_lists_best_params_sorted() {
    let study = Study::minimize();
    let mut trial = study.ask();
    trial.suggest_int("b", 3, 3).unwrap();
    trial.suggest_int("a", 7, 7).unwrap();
    study.complete_trial(trial, 1.5).unwrap();

    let summary = study.summary();
    assert!(summary.contains("Best value: 1.5 (trial #0)"));
    let a = summary.find("a = 7").unwrap();
    let b = summary.find("b = 3").unwrap();
    assert!(a < b);
}

#[test]
fn iterating_a_study_yields_finished_trials() {
    let study = Study::minimize();
    study.optimize(3, |_| Ok::<_, Error>(1.0)).unwrap();

    let mut count = 0;
    for trial in &study {
        assert!(trial.is_complete());
        count += 1;
    }
    assert_eq!(count, 3);
    assert_eq!(study.iter().count(), 3);
}
