// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the quickstart training run in order:
//
//   Step 1: Load the training and test splits  (Layer 4 - data)
//   Step 2: Apply the ToTensor transform       (Layer 4 - data)
//   Step 3: Save config for later inference    (Layer 6 - infra)
//   Step 4: Open the metrics log               (Layer 6 - infra)
//   Step 5: Run the epoch loop, save the model (Layer 5 - ml)

use anyhow::{bail, Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::Path};

use crate::data::{dataset::FashionMnistDataset, download::Split, transform::to_tensor_dataset};
use crate::domain::traits::Persistable;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{backend::ComputeBackend, trainer::{run_training, TrainOutcome}};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can
// be saved next to the checkpoint and reloaded for inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:       String,
    pub checkpoint_dir: String,
    pub download:       bool,
    pub epochs:         usize,
    pub batch_size:     usize,
    pub lr:             f64,
    pub hidden_size:    usize,
    pub seed:           u64,
    pub log_interval:   usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       "data".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            download:       false,
            epochs:         5,
            batch_size:     64,
            lr:             1e-3,
            hidden_size:    512,
            seed:           42,
            log_interval:   100,
        }
    }
}

impl Persistable for TrainConfig {
    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    /// Progress lines go to `out`; diagnostics go to tracing.
    pub fn execute<W: Write>(&self, out: &mut W) -> Result<TrainOutcome<ComputeBackend>> {
        let cfg = &self.config;
        if cfg.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }

        // ── Step 1: Load both splits ──────────────────────────────────────────
        tracing::info!("Loading Fashion-MNIST from '{}'", cfg.data_dir);
        let training_data = FashionMnistDataset::new(&cfg.data_dir, Split::Train, cfg.download)?;
        let test_data     = FashionMnistDataset::new(&cfg.data_dir, Split::Test, cfg.download)?;

        // ── Step 2: Pixels as floats in [0, 1] ────────────────────────────────
        let training_data = to_tensor_dataset(training_data);
        let test_data     = to_tensor_dataset(test_data);
        tracing::info!("Split: {} train, {} test", training_data.len(), test_data.len());

        // ── Step 3: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        // ── Step 4: Metrics CSV ───────────────────────────────────────────────
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 5: Epoch loop (Layer 5) ──────────────────────────────────────
        let outcome = run_training(cfg, training_data, test_data, &ckpt_manager, &metrics, out)?;
        writeln!(out, "Saved model state to {}", ckpt_manager.model_path().display())?;

        Ok(outcome)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_config.json");
        let cfg  = TrainConfig { epochs: 2, hidden_size: 64, ..TrainConfig::default() };

        cfg.save(&path).unwrap();
        assert_eq!(TrainConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn test_zero_batch_size_fails_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            data_dir:       dir.path().display().to_string(),
            checkpoint_dir: dir.path().join("ckpt").display().to_string(),
            batch_size:     0,
            ..TrainConfig::default()
        };

        let err = TrainUseCase::new(cfg).execute(&mut Vec::new()).err().unwrap();
        assert!(err.to_string().contains("batch_size"));
        assert!(!dir.path().join("ckpt").exists());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TrainConfig::load(&dir.path().join("nope.json")).is_err());
    }
}
