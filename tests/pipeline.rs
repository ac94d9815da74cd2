mod support;

use logit_harness::config::{self, HarnessSettings};
use logit_harness::dataset::{DatasetError, load_prediction_csv, load_train_test_csv};
use logit_harness::ml::persist::{SavedModel, load_model, save_model};
use logit_harness::ml::predict::Predictor;
use logit_harness::ml::selection::{HyperparameterGrid, ModelSelector, SelectionMode};
use support::{
    data::{TEST_ROWS, TRAIN_ROWS, write_csv, write_text},
    harness_env::HarnessEnvGuard,
};
use tempfile::tempdir;

#[test]
fn csv_to_saved_model_to_prediction() {
    let dir = tempdir().unwrap();
    let train = write_csv(dir.path(), "train.csv", TRAIN_ROWS);
    let test = write_csv(dir.path(), "test.csv", TEST_ROWS);
    let data = load_train_test_csv(&train, &test, b',').unwrap();

    let record = ModelSelector::default()
        .run(&data, &SelectionMode::Grid(HyperparameterGrid::default()))
        .unwrap();
    assert_eq!(record.accuracy, 1.0);

    let model_path = dir.path().join("out").join("model.json");
    save_model(&model_path, &SavedModel::from(&record)).unwrap();
    let predictor = load_model(&model_path).unwrap().into_predictor().unwrap();

    let unlabeled = write_text(dir.path(), "new.csv", "4,4\n-4,-4\n");
    let rows = load_prediction_csv(&unlabeled, b',', false).unwrap();
    assert_eq!(predictor.predict(&rows).unwrap(), vec![1, 0]);
    assert_eq!(
        predictor.predict(&rows).unwrap(),
        Predictor::from(&record).predict(&rows).unwrap()
    );

    let labeled = load_prediction_csv(&test, b',', true).unwrap();
    assert_eq!(predictor.predict(&labeled).unwrap(), vec![1, 1, 0, 0]);
}

#[test]
fn mismatched_partitions_are_rejected() {
    let dir = tempdir().unwrap();
    let train = write_csv(dir.path(), "train.csv", TRAIN_ROWS);
    let test = write_text(dir.path(), "test.csv", "1,1,1,1\n-1,-1,-1,0\n");
    assert!(matches!(
        load_train_test_csv(&train, &test, b','),
        Err(DatasetError::ShapeMismatch { .. })
    ));
}

#[test]
fn remembered_pair_is_read_back_from_config_home() {
    let base = tempdir().unwrap();
    let _guard = HarnessEnvGuard::set_config_home(base.path());
    let dir = tempdir().unwrap();
    let train = write_csv(dir.path(), "train.csv", TRAIN_ROWS);
    let test = write_csv(dir.path(), "test.csv", TEST_ROWS);
    let data = load_train_test_csv(&train, &test, b',').unwrap();

    let record = ModelSelector::default()
        .run(&data, &SelectionMode::default())
        .unwrap();
    let mut settings = config::load_or_default().unwrap();
    assert_eq!(settings, HarnessSettings::default());
    settings.selection.remember(record.hyperparameters);
    config::save(&settings).unwrap();

    let reloaded = config::load_or_default().unwrap();
    assert!(config::config_path().unwrap().starts_with(base.path()));
    assert_eq!(
        reloaded.selection_mode(),
        SelectionMode::Fixed(record.hyperparameters)
    );
    let fixed = ModelSelector::default()
        .run(&data, &reloaded.selection_mode())
        .unwrap();
    assert_eq!(fixed.model, record.model);
}
