// The data tour and the training use case read cached IDX files
// from <root>/FashionMNIST/raw without touching the network.

use std::{fs::File, path::Path};

use fashion_quickstart::{
    application::{data_tour, train_use_case::{TrainConfig, TrainUseCase}},
    data::{
        download::{raw_dir, Split},
        idx,
    },
    domain::image::GrayImage,
};

fn write_split(root: &Path, split: Split, n: usize) {
    let dir = raw_dir(root);
    std::fs::create_dir_all(&dir).unwrap();

    let labels: Vec<u8> = (0..n).map(|i| (i % 10) as u8).collect();
    let images: Vec<GrayImage> = labels
        .iter()
        .map(|&l| GrayImage::new(28, 28, vec![l * 25; 784]).unwrap())
        .collect();

    idx::write_images(&mut File::create(dir.join(split.images_file())).unwrap(), &images).unwrap();
    idx::write_labels(&mut File::create(dir.join(split.labels_file())).unwrap(), &labels).unwrap();
}

#[test]
fn data_tour_on_cached_files() {
    let root = tempfile::tempdir().unwrap();
    write_split(root.path(), Split::Train, 80);
    write_split(root.path(), Split::Test, 20);

    let mut out = Vec::new();
    let summary = data_tour::run(&mut out, root.path(), false).unwrap();
    assert_eq!(summary.feature_dims, [64, 28, 28]);
    assert_eq!(summary.label_dims, [64]);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Training samples: 80"));
    assert!(text.contains("Test samples: 20"));
}

#[test]
fn missing_files_without_download_is_an_error() {
    let root = tempfile::tempdir().unwrap();
    let err  = data_tour::run(&mut Vec::new(), root.path(), false).unwrap_err();
    assert!(format!("{err:#}").contains("--download"));
}

#[test]
fn train_use_case_writes_checkpoint_files() {
    let root = tempfile::tempdir().unwrap();
    write_split(root.path(), Split::Train, 40);
    write_split(root.path(), Split::Test, 10);
    let ckpt_dir = root.path().join("ckpt");

    let cfg = TrainConfig {
        data_dir:       root.path().display().to_string(),
        checkpoint_dir: ckpt_dir.display().to_string(),
        epochs:         1,
        batch_size:     16,
        hidden_size:    8,
        ..TrainConfig::default()
    };

    let mut out = Vec::new();
    let outcome = TrainUseCase::new(cfg.clone()).execute(&mut out).unwrap();
    assert_eq!(outcome.history.len(), 1);

    assert!(ckpt_dir.join("model.mpk").exists());
    assert!(ckpt_dir.join("metrics.csv").exists());
    let saved: TrainConfig = serde_json::from_str(
        &std::fs::read_to_string(ckpt_dir.join("train_config.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved, cfg);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Saved model state to"));
}
