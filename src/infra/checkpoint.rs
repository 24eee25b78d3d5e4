// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores the model's state dictionary: the Burn
// Record holding every learned weight and bias, keyed by field
// name.
//
// Files in the checkpoint directory:
//
//   checkpoints/
//     model.mpk            ← parameter record (MessagePack, full precision)
//     train_config.json    ← hyper-parameters, incl. hidden size
//     metrics.csv          ← written by MetricsLogger
//
// The config must be read first: loading a record only works
// into a model of exactly the same architecture.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::traits::Persistable;
use crate::ml::model::NeuralNetwork;

const MODEL_STEM:  &str = "model";
const CONFIG_FILE: &str = "train_config.json";

type StateRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create checkpoint dir '{}': {}", dir.display(), e);
        }
        Self { dir }
    }

    /// Path of the parameter file as written by the recorder
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{MODEL_STEM}.mpk"))
    }

    pub fn model_exists(&self) -> bool {
        self.model_path().exists()
    }

    /// Write the model's parameter record to `model.mpk`.
    /// Returns the path that was written.
    pub fn save_model<B: Backend>(&self, model: &NeuralNetwork<B>) -> Result<PathBuf> {
        // The recorder appends the extension itself
        let stem = self.dir.join(MODEL_STEM);

        StateRecorder::new()
            .record(model.clone().into_record(), stem)
            .with_context(|| {
                format!("Failed to save model to '{}'", self.model_path().display())
            })?;

        tracing::info!("Saved model state to '{}'", self.model_path().display());
        Ok(self.model_path())
    }

    /// Load the saved parameter record into `model`.
    ///
    /// `model` only provides the architecture; its current weights
    /// are replaced by the ones on disk.
    pub fn load_model<B: Backend>(
        &self,
        model:  NeuralNetwork<B>,
        device: &B::Device,
    ) -> Result<NeuralNetwork<B>> {
        let stem = self.dir.join(MODEL_STEM);

        let record = StateRecorder::new()
            .load(stem, device)
            .with_context(|| {
                format!(
                    "Cannot load model '{}'. Have you run 'train' first?",
                    self.model_path().display()
                )
            })?;

        tracing::debug!("Loaded model state from '{}'", self.model_path().display());
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        cfg.save(&self.dir.join(CONFIG_FILE))
    }

    /// Load the training configuration saved alongside the model.
    pub fn load_config(&self) -> Result<TrainConfig> {
        TrainConfig::load(&self.dir.join(CONFIG_FILE))
            .context("Make sure you have run 'train' before 'predict'.")
    }
}
