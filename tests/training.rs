// End-to-end checks of the training loop on a tiny synthetic problem:
// dark images are class 0, bright images are class 1.

use burn::backend::{Autodiff, NdArray};
use burn::data::dataset::InMemDataset;
use fashion_quickstart::{
    application::train_use_case::TrainConfig,
    data::transform::ImageSample,
    infra::{checkpoint::CheckpointManager, metrics::MetricsLogger},
    ml::trainer::train_loop,
};

type B = Autodiff<NdArray>;

fn synthetic(n: usize) -> InMemDataset<ImageSample> {
    let items = (0..n)
        .map(|i| {
            let label = (i % 2) as u8;
            let value = if label == 0 { 0.05 } else { 0.95 };
            ImageSample { pixels: vec![value; 784], rows: 28, cols: 28, label }
        })
        .collect();
    InMemDataset::new(items)
}

fn config(dir: &std::path::Path, epochs: usize) -> TrainConfig {
    TrainConfig {
        data_dir:       dir.join("data").display().to_string(),
        checkpoint_dir: dir.display().to_string(),
        download:       false,
        epochs,
        batch_size:     8,
        lr:             0.05,
        hidden_size:    16,
        seed:           7,
        log_interval:   2,
    }
}

#[test]
fn loss_goes_down_and_model_is_saved() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 6);
    let ckpt    = CheckpointManager::new(dir.path());
    let metrics = MetricsLogger::new(dir.path()).unwrap();

    let mut out = Vec::new();
    let outcome = train_loop::<B, _, _, _>(
        &cfg, synthetic(64), synthetic(16), &ckpt, &metrics, Default::default(), &mut out,
    )
    .unwrap();

    assert_eq!(outcome.history.len(), 6);
    let first = outcome.history.first().unwrap();
    let last  = outcome.history.last().unwrap();
    assert!(last.train_loss < first.train_loss, "{} !< {}", last.train_loss, first.train_loss);
    assert!(last.accuracy >= 0.5);

    assert!(ckpt.model_exists());
    let csv = std::fs::read_to_string(metrics.csv_path()).unwrap();
    assert_eq!(csv.lines().count(), 7);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Epoch 1\n"));
    assert!(text.contains("Test Error:"));
    assert!(text.contains("[    8/   64]"));
    assert!(text.trim_end().ends_with("Done!"));
}

#[test]
fn zero_batch_size_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = TrainConfig { batch_size: 0, ..config(dir.path(), 1) };
    let ckpt    = CheckpointManager::new(dir.path());
    let metrics = MetricsLogger::new(dir.path()).unwrap();

    let mut out = Vec::new();
    let result = train_loop::<B, _, _, _>(
        &cfg, synthetic(4), synthetic(4), &ckpt, &metrics, Default::default(), &mut out,
    );

    let err = result.err().unwrap();
    assert!(err.to_string().contains("batch_size"));
    assert!(!ckpt.model_exists());
    assert!(out.is_empty());
}

#[test]
fn zero_epochs_still_saves() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 0);
    let ckpt    = CheckpointManager::new(dir.path());
    let metrics = MetricsLogger::new(dir.path()).unwrap();

    let mut out = Vec::new();
    let outcome = train_loop::<B, _, _, _>(
        &cfg, synthetic(8), synthetic(4), &ckpt, &metrics, Default::default(), &mut out,
    )
    .unwrap();

    assert!(outcome.history.is_empty());
    assert!(ckpt.model_exists());
}
