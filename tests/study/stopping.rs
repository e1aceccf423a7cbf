use core::time::Duration;
use std::thread;

use hyperstudy::{Error, LoopState, OptimizeConfig, StopReason, Study};

#[test]
fn runs_exactly_the_requested_trials() {
    for n in [1, 7, 30] {
        let study = Study::minimize();
        let mut calls = 0;
        let report = study
            .optimize(n, |trial| {
                calls += 1;
                Ok::<_, Error>(trial.suggest_uniform("x", 0.0, 1.0)?)
            })
            .unwrap();

        assert_eq!(calls, n);
        assert_eq!(report.n_trials, n);
        assert_eq!(study.n_trials(), n);
    }
}

#[test]
fn timeout_stops_the_loop() {
    let study = Study::minimize();
    let config = OptimizeConfig::new().with_timeout(Duration::from_millis(50));

    let report = study
        .optimize_config(&config, |_| {
            thread::sleep(Duration::from_millis(5));
            Ok::<_, Error>(1.0)
        })
        .unwrap();

    assert_eq!(report.reason, StopReason::Timeout);
    assert!(report.n_trials >= 1);
    assert!(report.elapsed >= Duration::from_millis(50));
    assert_eq!(study.loop_state(), LoopState::Stopped(StopReason::Timeout));
}

#[test]
fn slow_trial_is_never_interrupted() {
    let study = Study::minimize();
    let config = OptimizeConfig::new().with_timeout(Duration::from_millis(10));

    let report = study
        .optimize_config(&config, |_| {
            thread::sleep(Duration::from_millis(40));
            Ok::<_, Error>(1.0)
        })
        .unwrap();

    assert_eq!(report.reason, StopReason::Timeout);
    assert_eq!(report.n_trials, 1);
    assert_eq!(study.n_complete_trials(), 1);
}

#[test]
fn budget_or_timeout_whichever_first() {
    let study = Study::minimize();
    let config = OptimizeConfig::trials(3).with_timeout(Duration::from_secs(60));

    let report = study
        .optimize_config(&config, |_| Ok::<_, Error>(0.0))
        .unwrap();
    assert_eq!(report.reason, StopReason::TrialBudget);
    assert_eq!(report.n_trials, 3);
}

#[test]
fn cancel_from_inside_the_objective() {
    let study = Study::minimize();
    let handle = study.stop_handle();
    let mut calls = 0;

    let report = study
        .optimize_unbounded(|_| {
            calls += 1;
            if calls == 4 {
                handle.cancel();
            }
            Ok::<_, Error>(calls as f64)
        })
        .unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert_eq!(report.n_trials, 4);
    assert_eq!(study.n_trials(), 4);
    // The flag is cleared, so the study can run again.
    assert!(!handle.is_cancelled());
    let again = study.optimize(2, |_| Ok::<_, Error>(0.0)).unwrap();
    assert_eq!(again.reason, StopReason::TrialBudget);
}

#[test]
fn cancel_from_another_thread() {
    let study = Study::minimize();
    let handle = study.stop_handle();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        handle.cancel();
    });

    let report = study
        .optimize_unbounded(|_| {
            thread::sleep(Duration::from_millis(2));
            Ok::<_, Error>(1.0)
        })
        .unwrap();
    canceller.join().unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert!(report.n_trials >= 1);
}

#[test]
fn consecutive_failures_stop_the_loop() {
    let study = Study::minimize();
    let config = OptimizeConfig::trials(100).with_max_consecutive_failures(3);

    let report = study
        .optimize_config(&config, |_| Err::<f64, _>("always broken"))
        .unwrap();

    assert_eq!(report.reason, StopReason::TooManyFailures);
    assert_eq!(report.n_trials, 3);
    assert_eq!(study.n_failed_trials(), 3);
}

#[test]
fn a_success_resets_the_failure_streak() {
    let study = Study::minimize();
    let config = OptimizeConfig::trials(9).with_max_consecutive_failures(3);
    let mut calls = 0;

    // Two failures, one success, repeated: the streak never reaches three.
    let report = study
        .optimize_config(&config, |_| {
            calls += 1;
            if calls % 3 == 0 {
                Ok(1.0)
            } else {
                Err("flaky")
            }
        })
        .unwrap();

    assert_eq!(report.reason, StopReason::TrialBudget);
    assert_eq!(study.n_complete_trials(), 3);
    assert_eq!(study.n_failed_trials(), 6);
}

#[test]
fn invalid_configs_are_rejected_before_running() {
    let study = Study::minimize();
    let mut called = false;

    let zero_timeout = OptimizeConfig::new().with_timeout(Duration::ZERO);
    let result = study.optimize_config(&zero_timeout, |_| {
        called = true;
        Ok::<_, Error>(0.0)
    });
    assert!(matches!(
        result,
        Err(Error::InvalidConfig { field: "timeout", .. })
    ));

    let zero_failures = OptimizeConfig::trials(5).with_max_consecutive_failures(0);
    assert!(matches!(
        study.optimize_config(&zero_failures, |_| Ok::<_, Error>(0.0)),
        Err(Error::InvalidConfig {
            field: "max_consecutive_failures",
            ..
        })
    ));

    assert!(!called);
    assert_eq!(study.n_trials(), 0);
}
