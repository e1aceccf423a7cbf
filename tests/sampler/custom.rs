use std::sync::Arc;

use hyperstudy::distribution::{Distribution, ParamSpec};
use hyperstudy::sampler::{History, Sampler};
use hyperstudy::{Error, ParamValue, Study};
use parking_lot::Mutex;

/// Always proposes the lower bound; categorical parameters get the first choice.
struct LowestSampler;

impl Sampler for LowestSampler {
    fn sample(
        &self,
        spec: &ParamSpec,
        _history: &History<'_>,
        _rng: &mut fastrand::Rng,
    ) -> ParamValue {
        match spec.distribution() {
            Distribution::Float(d) => ParamValue::Float(d.low),
            Distribution::Int(d) => ParamValue::Int(d.low),
            Distribution::Categorical(d) => ParamValue::Categorical(d.choices[0].clone()),
        }
    }
}

/// Records how many complete trials each call could see.
struct HistoryProbe(Arc<Mutex<Vec<usize>>>);

impl Sampler for HistoryProbe {
    fn sample(
        &self,
        spec: &ParamSpec,
        history: &History<'_>,
        _rng: &mut fastrand::Rng,
    ) -> ParamValue {
        self.0.lock().push(history.len());
        match spec.distribution() {
            Distribution::Float(d) => ParamValue::Float(d.high),
            Distribution::Int(d) => ParamValue::Int(d.high),
            Distribution::Categorical(d) => ParamValue::Categorical(d.choices[0].clone()),
        }
    }
}

#[test]
fn custom_sampler_drives_suggestions() {
    let study = Study::builder().sampler(LowestSampler).build();
    study
        .optimize(3, |trial| {
            let x = trial.suggest_uniform("x", -2.0, 2.0)?;
            let n = trial.suggest_int("n", 5, 9)?;
            let c = trial.suggest_categorical("c", &["first", "second"])?;
            assert_eq!((x, n, c), (-2.0, 5, "first"));
            Ok::<_, Error>(x)
        })
        .unwrap();
    assert_eq!(study.n_complete_trials(), 3);
}

#[test]
fn sampler_sees_only_complete_trials() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let study = Study::builder()
        .sampler(HistoryProbe(Arc::clone(&seen)))
        .build();
    let mut calls = 0;
    study
        .optimize(4, |trial| {
            calls += 1;
            trial.suggest_uniform("x", 0.0, 1.0)?;
            if calls == 2 {
                return Err(Error::NoCompletedTrials);
            }
            Ok(1.0)
        })
        .unwrap();

    // The second trial failed, so the third sees the same history as the second.
    assert_eq!(*seen.lock(), vec![0, 1, 1, 2]);
}
