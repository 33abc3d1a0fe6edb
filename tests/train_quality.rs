//! Quality smoke tests: the full pipeline on data with a known structure.

use cardiorisk::data::{scrub_invalid_zeros, stratified_split, ClinicalTable};
use cardiorisk::testing::training_table;
use cardiorisk::training::{Accuracy, MetricFn};
use cardiorisk::{BoostConfig, RiskPipeline};

use rand::prelude::*;

/// Synthetic records where risk is a deterministic function of a few
/// fields: exertion angina plus ST depression drive the label.
fn synthetic_table(n: usize, seed: u64) -> ClinicalTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);

    for _ in 0..n {
        let age = rng.gen_range(30.0f32..75.0);
        let sex = rng.gen_range(0..2) as f32;
        let chest_pain = rng.gen_range(0..4) as f32;
        let resting_bp = rng.gen_range(100.0f32..180.0);
        let cholesterol = rng.gen_range(150.0f32..350.0);
        let fasting_bs = rng.gen_range(0..2) as f32;
        let resting_ecg = rng.gen_range(0..3) as f32;
        let max_hr = rng.gen_range(80.0f32..190.0);
        let angina = rng.gen_range(0..2) as f32;
        let oldpeak = rng.gen_range(0.0f32..4.0);
        let st_slope = rng.gen_range(0..3) as f32;

        let label = if angina == 1.0 && oldpeak > 1.0 { 1.0 } else { 0.0 };

        rows.push([
            age, sex, chest_pain, resting_bp, cholesterol, fasting_bs, resting_ecg, max_hr,
            angina, oldpeak, st_slope,
        ]);
        labels.push(label);
    }

    ClinicalTable::from_rows(&rows, Some(labels))
}

#[test]
fn learns_a_deterministic_rule() {
    let table = synthetic_table(400, 7);
    let (train, test) = stratified_split(&table, 0.2, 42).unwrap();

    let config = BoostConfig::builder()
        .n_trees(50)
        .max_depth(4)
        .min_child_weight(0.0)
        .build()
        .unwrap();
    let pipeline = RiskPipeline::fit(&train, config, None, 1).unwrap();

    let probabilities = pipeline.predict_table(&test).unwrap();
    let targets: Vec<f32> = test.labels().unwrap().to_vec();
    let accuracy = Accuracy::default().compute(&probabilities, &targets);

    assert!(accuracy > 0.9, "holdout accuracy {accuracy}");
}

#[test]
fn subsampling_still_learns() {
    let table = synthetic_table(400, 11);
    let (train, test) = stratified_split(&table, 0.2, 42).unwrap();

    let config = BoostConfig::builder()
        .n_trees(60)
        .max_depth(4)
        .subsample(0.8)
        .min_child_weight(0.0)
        .build()
        .unwrap();
    let pipeline = RiskPipeline::fit(&train, config, None, 1).unwrap();

    let probabilities = pipeline.predict_table(&test).unwrap();
    let targets: Vec<f32> = test.labels().unwrap().to_vec();
    let accuracy = Accuracy::default().compute(&probabilities, &targets);

    assert!(accuracy > 0.85, "holdout accuracy {accuracy}");
}

#[test]
fn end_to_end_on_the_clinical_fixture() {
    let table = scrub_invalid_zeros(training_table());
    let (train, test) = stratified_split(&table, 0.25, 42).unwrap();

    let config = BoostConfig::builder()
        .n_trees(40)
        .max_depth(3)
        .min_child_weight(0.0)
        .build()
        .unwrap();
    let pipeline = RiskPipeline::fit(&train, config, Some(&test), 1).unwrap();

    // The fixture is small; just require the model to beat the majority
    // class on data it trained on.
    let probabilities = pipeline.predict_table(&train).unwrap();
    let targets: Vec<f32> = train.labels().unwrap().to_vec();
    let accuracy = Accuracy::default().compute(&probabilities, &targets);
    assert!(accuracy > 0.8, "training accuracy {accuracy}");
}

#[test]
fn fit_is_reproducible() {
    let table = synthetic_table(200, 3);
    let config = BoostConfig::builder()
        .n_trees(15)
        .max_depth(3)
        .subsample(0.7)
        .min_child_weight(0.0)
        .build()
        .unwrap();

    let a = RiskPipeline::fit(&table, config.clone(), None, 1).unwrap();
    let b = RiskPipeline::fit(&table, config, None, 1).unwrap();

    let probe = synthetic_table(10, 99);
    assert_eq!(a.predict_table(&probe).unwrap(), b.predict_table(&probe).unwrap());
}
