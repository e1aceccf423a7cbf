use hyperstudy::sampler::{RandomSampler, TpeSampler};
use hyperstudy::{Direction, Error, Study};

fn quadratic(trial: &mut hyperstudy::Trial) -> hyperstudy::Result<f64> {
    let x = trial.suggest_uniform("x", -10.0, 10.0)?;
    let y = trial.suggest_uniform("y", -10.0, 10.0)?;
    Ok((x - 3.0).powi(2) + (y + 1.0).powi(2))
}

fn mean_best(study_for_seed: impl Fn(u64) -> Study) -> f64 {
    let seeds = 0..8_u64;
    let total: f64 = seeds
        .clone()
        .map(|seed| {
            let study = study_for_seed(seed);
            study.optimize(60, quadratic).unwrap();
            study.best_value().unwrap()
        })
        .sum();
    total / seeds.count() as f64
}

#[test]
fn tpe_beats_random_on_a_bowl() {
    let tpe = mean_best(|seed| {
        Study::builder()
            .sampler(TpeSampler::builder().n_startup_trials(10).build().unwrap())
            .seed(seed)
            .build()
    });
    let random = mean_best(|seed| {
        Study::builder()
            .sampler(RandomSampler::new())
            .seed(seed)
            .build()
    });

    assert!(tpe < random, "tpe {tpe} vs random {random}");
}

#[test]
fn tpe_maximizes_toward_the_peak() {
    let study = Study::builder()
        .direction(Direction::Maximize)
        .sampler(TpeSampler::new())
        .seed(12)
        .build();

    study
        .optimize(80, |trial| {
            let x = trial.suggest_uniform("x", 0.0, 10.0)?;
            Ok::<_, Error>(-(x - 7.0).powi(2))
        })
        .unwrap();

    assert!(study.best_value().unwrap() > -0.5);
}

#[test]
fn tpe_prefers_the_good_category() {
    let study = Study::builder()
        .sampler(TpeSampler::builder().n_startup_trials(8).build().unwrap())
        .seed(4)
        .build();

    study
        .optimize(80, |trial| {
            let opt = trial.suggest_categorical("opt", &["sgd", "adam", "rmsprop"])?;
            Ok::<_, Error>(if opt == "adam" { 0.0 } else { 1.0 })
        })
        .unwrap();

    let late_adam = study
        .trials()
        .iter()
        .skip(40)
        .filter(|t| t.value == Some(0.0))
        .count();
    assert!(late_adam > 18, "adam drawn {late_adam} of the last 40 trials");
}

#[test]
fn tpe_handles_mixed_and_conditional_spaces() {
    let study = Study::builder()
        .sampler(TpeSampler::builder().n_startup_trials(5).build().unwrap())
        .seed(9)
        .build();

    study
        .optimize(40, |trial| {
            let use_reg = trial.suggest_bool("use_reg")?;
            let layers = trial.suggest_int("layers", 1, 6)?;
            let mut value = layers as f64;
            if use_reg {
                value += trial.suggest_loguniform("alpha", 1e-4, 1.0)?;
            }
            Ok::<_, Error>(value)
        })
        .unwrap();

    for trial in study.trials() {
        assert!(trial.is_complete());
        let reg = trial.param("use_reg").unwrap().as_categorical().unwrap();
        assert_eq!(reg.as_bool().unwrap(), trial.param("alpha").is_some());
    }
}
