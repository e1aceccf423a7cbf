use hyperstudy::sampler::TpeSampler;
use hyperstudy::{Error, Study, Trial, TrialState};

#[test]
fn ask_tell_round() {
    let study = Study::minimize();

    for _ in 0..5 {
        let mut trial = study.ask();
        let x = trial.suggest_uniform("x", -1.0, 1.0).unwrap();
        study.tell(trial, Ok::<_, &str>(x * x)).unwrap();
    }

    assert_eq!(study.n_trials(), 5);
    assert!(study.best_value().unwrap() <= 1.0);
}

#[test]
fn trials_may_finish_out_of_order() {
    let study = Study::minimize();
    let a = study.ask();
    let b = study.ask();
    assert_eq!((a.index(), b.index()), (0, 1));

    study.complete_trial(b, 2.0).unwrap();
    study.complete_trial(a, 1.0).unwrap();

    // Finish order, with the indices allocated at creation.
    let indices: Vec<u64> = study.trials().iter().map(|t| t.index).collect();
    assert_eq!(indices, vec![1, 0]);
    assert_eq!(study.best_trial_index(), Some(0));
}

#[test]
fn tell_rejects_foreign_trials() {
    let study = Study::minimize();
    let other = Study::minimize();

    let foreign = other.ask();
    assert!(matches!(
        study.tell(foreign, Ok::<_, &str>(1.0)),
        Err(Error::UnknownTrial(0))
    ));
    assert!(matches!(
        study.complete_trial(Trial::new(3), 1.0),
        Err(Error::UnknownTrial(3))
    ));
    assert_eq!(study.n_trials(), 0);
}

#[test]
fn tell_error_records_failure_message() {
    let study = Study::maximize();
    study
        .tell(study.ask(), Err::<f64, _>(Error::NoCompletedTrials))
        .unwrap();

    let trial = &study.trials()[0];
    assert_eq!(trial.state, TrialState::Failed);
    assert_eq!(trial.error.as_deref(), Some("no completed trials available"));
}

#[test]
fn running_trial_is_not_visible_until_told() {
    let study = Study::minimize();
    let mut trial = study.ask();
    trial.suggest_int("n", 0, 10).unwrap();

    assert_eq!(trial.state(), TrialState::Running);
    assert_eq!(study.n_trials(), 0);
    assert!(study.best_trial().is_err());

    study.complete_trial(trial, 0.0).unwrap();
    assert_eq!(study.n_trials(), 1);
}

#[test]
fn ask_tell_with_tpe_stays_in_domain() {
    let sampler = TpeSampler::builder()
        .n_startup_trials(4)
        .build()
        .expect("valid sampler");
    let study = Study::builder().sampler(sampler).seed(21).build();

    for _ in 0..30 {
        let mut trial = study.ask();
        let x = trial.suggest_uniform("x", -4.0, 4.0).unwrap();
        let k = trial.suggest_int("k", 0, 5).unwrap();
        assert!((-4.0..=4.0).contains(&x));
        assert!((0..=5).contains(&k));
        study.complete_trial(trial, x.abs() + k as f64).unwrap();
    }

    assert_eq!(study.n_complete_trials(), 30);
}
