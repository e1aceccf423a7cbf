use hyperstudy::parameter::{FloatParam, IntParam, Parameter};
use hyperstudy::sampler::TpeSampler;
use hyperstudy::{Direction, Error, ParamValue, StopReason, Study, StudyConfig, TrialState};

#[test]
fn quadratic_five_trials() {
    let study = Study::builder().seed(7).build();

    let report = study
        .optimize(5, |trial| {
            let x = trial.suggest_uniform("x", -20.0, 20.0)?;
            Ok::<_, Error>((x - 2.0).powi(2))
        })
        .expect("optimization should succeed");

    assert_eq!(report.reason, StopReason::TrialBudget);
    assert_eq!(report.n_trials, 5);
    assert_eq!(study.n_trials(), 5);
    assert!(study.best_value().unwrap() >= 0.0);

    let params = study.best_params().unwrap();
    let x = params["x"].as_f64().unwrap();
    assert!((-20.0..=20.0).contains(&x));
}

#[test]
fn trial_indices_are_sequential() {
    let study = Study::minimize();
    study
        .optimize(4, |trial| Ok::<_, Error>(trial.suggest_uniform("x", 0.0, 1.0)?))
        .unwrap();

    let indices: Vec<u64> = study.trials().iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn failures_are_recorded_and_loop_continues() {
    let study = Study::minimize();
    let mut counter = 0;

    study
        .optimize(10, |trial| {
            counter += 1;
            if counter % 2 == 0 {
                return Err("intentional failure".to_string());
            }
            let x = trial
                .suggest_uniform("x", -5.0, 5.0)
                .map_err(|e| e.to_string())?;
            Ok(x * x)
        })
        .unwrap();

    assert_eq!(study.n_trials(), 10);
    assert_eq!(study.n_complete_trials(), 5);
    assert_eq!(study.n_failed_trials(), 5);

    let failed = &study.trials()[1];
    assert_eq!(failed.state, TrialState::Failed);
    assert_eq!(failed.error.as_deref(), Some("intentional failure"));
    assert!(failed.value.is_none());
}

#[test]
fn non_finite_value_fails_the_trial() {
    let study = Study::minimize();
    study.optimize(1, |_| Ok::<_, Error>(f64::NAN)).unwrap();
    study.optimize(1, |_| Ok::<_, Error>(f64::INFINITY)).unwrap();

    assert_eq!(study.n_failed_trials(), 2);
    assert!(study.best_trial().is_err());
    let trial = &study.trials()[0];
    assert!(trial.error.as_deref().unwrap().contains("non-finite"));
}

#[test]
fn invalid_domain_surfaces_as_failed_trial() {
    let study = Study::minimize();
    study
        .optimize(1, |trial| {
            let x = trial.suggest_uniform("x", 1.0, 0.0)?;
            Ok::<_, Error>(x)
        })
        .unwrap();

    let trial = &study.trials()[0];
    assert_eq!(trial.state, TrialState::Failed);
    assert!(trial.error.as_deref().unwrap().contains("invalid domain"));
}

#[test]
fn seeded_studies_replay_exactly() {
    let run = |seed| {
        let study = Study::builder().seed(seed).build();
        study
            .optimize(20, |trial| {
                let x = trial.suggest_uniform("x", -10.0, 10.0)?;
                let n = trial.suggest_int("n", 1, 100)?;
                let c = trial.suggest_categorical("c", &["a", "b", "c"])?;
                Ok::<_, Error>(x * x + n as f64 + c.len() as f64)
            })
            .unwrap();
        study
            .trials()
            .into_iter()
            .map(|t| t.params)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn seeded_tpe_replays_exactly() {
    let run = || {
        let study = Study::builder()
            .sampler(TpeSampler::builder().n_startup_trials(5).build().unwrap())
            .seed(3)
            .build();
        study
            .optimize(25, |trial| {
                let x = trial.suggest_uniform("x", -5.0, 5.0)?;
                Ok::<_, Error>((x - 1.0).powi(2))
            })
            .unwrap();
        study.trials().into_iter().map(|t| t.value).collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn direction_changes_the_best_trial() {
    let objective = |trial: &mut hyperstudy::Trial| {
        let x = trial.suggest_uniform("x", -10.0, 10.0)?;
        Ok::<_, Error>(x)
    };

    let min = Study::from_config(&StudyConfig::new(Direction::Minimize).with_seed(11));
    min.optimize(10, objective).unwrap();
    let max = Study::from_config(&StudyConfig::new(Direction::Maximize).with_seed(11));
    max.optimize(10, objective).unwrap();

    // Same seed, same sampled values, opposite ends of them.
    assert!(min.best_value().unwrap() < max.best_value().unwrap());
    let values: Vec<f64> = min.trials().iter().filter_map(|t| t.value).collect();
    let lowest = values.iter().copied().fold(f64::INFINITY, f64::min);
    let highest = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(min.best_value().unwrap(), lowest);
    assert_eq!(max.best_value().unwrap(), highest);
}

#[test]
fn typed_parameters_round_trip_through_best_trial() {
    let study = Study::builder().seed(5).build();
    let lr = FloatParam::new("lr", 1e-5, 1e-1).log_scale();
    let layers = IntParam::new("layers", 1, 8);

    study
        .optimize(15, |trial| {
            let lr_val = lr.suggest(trial)?;
            let n = layers.suggest(trial)?;
            Ok::<_, Error>(lr_val * n as f64)
        })
        .unwrap();

    let best = study.best_trial().unwrap();
    let lr_val: f64 = best.get(&lr).unwrap();
    let n: i64 = best.get(&layers).unwrap();
    assert!((1e-5..=1e-1).contains(&lr_val));
    assert!((1..=8).contains(&n));
    assert_eq!(best.param("layers"), Some(&ParamValue::Int(n)));
}

#[test]
fn optimize_calls_accumulate_trials() {
    let study = Study::minimize();
    let first = study.optimize(3, |_| Ok::<_, Error>(1.0)).unwrap();
    let second = study.optimize(2, |_| Ok::<_, Error>(0.5)).unwrap();

    assert_eq!(first.n_trials, 3);
    assert_eq!(second.n_trials, 2);
    assert_eq!(study.n_trials(), 5);
    assert_eq!(study.best_trial_index(), Some(3));
}
