use hyperstudy::{Direction, Error, Study};

fn study_with_values(direction: Direction, values: &[f64]) -> Study {
    let study = Study::new(direction);
    for &value in values {
        study.complete_trial(study.ask(), value).unwrap();
    }
    study
}

#[test]
fn ties_keep_the_first_trial_in_any_order() {
    // The minimum 1.0 appears twice; the earlier one must win.
    let orders: [&[f64]; 4] = [
        &[1.0, 1.0, 3.0],
        &[3.0, 1.0, 1.0],
        &[1.0, 3.0, 1.0],
        &[2.0, 1.0, 3.0, 1.0],
    ];
    let expected = [0, 1, 0, 1];

    for (values, expected) in orders.iter().zip(expected) {
        let study = study_with_values(Direction::Minimize, values);
        assert_eq!(
            study.best_trial_index(),
            Some(expected),
            "values {values:?}"
        );
    }
}

#[test]
fn ties_keep_the_first_trial_when_maximizing() {
    let study = study_with_values(Direction::Maximize, &[5.0, 2.0, 5.0, 4.0]);
    assert_eq!(study.best_trial_index(), Some(0));
    assert_eq!(study.best_value().unwrap(), 5.0);
}

#[test]
fn best_matches_a_full_scan() {
    let study = Study::builder().seed(99).build();
    study
        .optimize(50, |trial| {
            let x = trial.suggest_uniform("x", -3.0, 3.0)?;
            let y = trial.suggest_int("y", -3, 3)?;
            Ok::<_, Error>(x.sin() + y as f64)
        })
        .unwrap();

    let scanned = study
        .trials()
        .into_iter()
        .filter(|t| t.is_complete())
        .min_by(|a, b| {
            a.value
                .unwrap()
                .total_cmp(&b.value.unwrap())
                .then(a.index.cmp(&b.index))
        })
        .unwrap();
    let best = study.best_trial().unwrap();
    assert_eq!(best.index, scanned.index);
    assert_eq!(best.value, scanned.value);
}

#[test]
fn failed_trials_never_become_best() {
    let study = study_with_values(Direction::Minimize, &[4.0, 2.0]);
    study.fail_trial(study.ask(), "crashed").unwrap();
    study.complete_trial(study.ask(), 3.0).unwrap();

    assert_eq!(study.best_trial_index(), Some(1));
    assert_eq!(study.best_value().unwrap(), 2.0);
}

#[test]
fn best_params_come_from_the_best_trial() {
    let study = Study::minimize();

    let mut trial = study.ask();
    trial.suggest_uniform("x", 0.0, 1.0).unwrap();
    let mode = trial.suggest_categorical("mode", &["fast", "slow"]).unwrap();
    study.complete_trial(trial, 0.25).unwrap();

    let mut trial = study.ask();
    trial.suggest_uniform("x", 0.0, 1.0).unwrap();
    study.complete_trial(trial, 0.75).unwrap();

    let params = study.best_params().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(
        params["mode"].as_categorical().and_then(|c| c.as_str()),
        Some(mode)
    );
}

#[test]
fn top_trials_skip_failures_and_respect_direction() {
    let study = study_with_values(Direction::Minimize, &[3.0, 1.0, 2.0]);
    study.fail_trial(study.ask(), "nope").unwrap();

    let top: Vec<Option<f64>> = study.top_trials(5).iter().map(|t| t.value).collect();
    assert_eq!(top, vec![Some(1.0), Some(2.0), Some(3.0)]);
    assert!(study.top_trials(0).is_empty());
}
