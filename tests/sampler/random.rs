use std::collections::HashSet;

use hyperstudy::parameter::{CategoricalParam, FloatParam, IntParam, Parameter};
use hyperstudy::sampler::RandomSampler;
use hyperstudy::{Error, Study};

fn random_study(seed: u64) -> Study {
    Study::builder()
        .sampler(RandomSampler::new())
        .seed(seed)
        .build()
}

#[test]
fn float_samples_cover_the_range() {
    let study = random_study(42);
    study
        .optimize(200, |trial| Ok::<_, Error>(trial.suggest_uniform("x", -1.0, 1.0)?))
        .unwrap();

    let xs: Vec<f64> = study
        .trials()
        .iter()
        .map(|t| t.param("x").unwrap().as_f64().unwrap())
        .collect();
    assert!(xs.iter().all(|x| (-1.0..=1.0).contains(x)));
    assert!(xs.iter().any(|&x| x < -0.5));
    assert!(xs.iter().any(|&x| x > 0.5));
}

#[test]
fn log_scale_samples_spread_over_decades() {
    let study = random_study(7);
    let lr = FloatParam::new("lr", 1e-6, 1.0).log_scale();
    study
        .optimize(300, |trial| Ok::<_, Error>(lr.suggest(trial)?))
        .unwrap();

    let below = study
        .trials()
        .iter()
        .filter_map(|t| t.get(&lr))
        .filter(|&v| v < 1e-3)
        .count();
    // Half the log range lies below 1e-3; a linear sampler would put ~0.1% there.
    assert!(below > 90, "only {below} of 300 samples below 1e-3");
}

#[test]
fn stepped_int_hits_only_grid_points() {
    let study = random_study(3);
    let batch = IntParam::new("batch", 16, 128).step(16);
    study
        .optimize(100, |trial| Ok::<_, Error>(batch.suggest(trial)? as f64))
        .unwrap();

    let seen: HashSet<i64> = study.trials().iter().filter_map(|t| t.get(&batch)).collect();
    assert!(seen.iter().all(|v| (v - 16) % 16 == 0 && (16..=128).contains(v)));
    assert!(seen.len() > 4);
}

#[test]
fn discrete_float_hits_only_grid_points() {
    let study = random_study(5);
    study
        .optimize(60, |trial| {
            Ok::<_, Error>(trial.suggest_discrete_uniform("d", 0.0, 1.0, 0.25)?)
        })
        .unwrap();

    for trial in study.trials() {
        let d = trial.param("d").unwrap().as_f64().unwrap();
        let k = d / 0.25;
        assert!((k - k.round()).abs() < 1e-9, "{d} is off the grid");
    }
}

#[test]
fn every_category_is_drawn() {
    let study = random_study(11);
    let color = CategoricalParam::new("color", vec!["red", "green", "blue"]);
    study
        .optimize(60, |trial| {
            let c = color.suggest(trial)?;
            Ok::<_, Error>(c.len() as f64)
        })
        .unwrap();

    let seen: HashSet<&str> = study.trials().iter().filter_map(|t| t.get(&color)).collect();
    assert_eq!(seen.len(), 3);
}
