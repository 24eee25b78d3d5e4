// ============================================================
// Layer 5 - Inferencer
// ============================================================
// Rebuilds the classifier from a checkpoint and labels single
// images. The architecture comes from train_config.json, the
// weights from model.mpk.

use anyhow::{anyhow, Context, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{batcher::FashionBatcher, transform::ImageSample};
use crate::domain::labels::FashionClass;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{NeuralNetwork, NeuralNetworkConfig};

/// The winning class and the full softmax distribution
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class:         FashionClass,
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// Probability assigned to the predicted class
    pub fn confidence(&self) -> f32 {
        self.probabilities.get(self.class.index()).copied().unwrap_or(0.0)
    }
}

pub struct Inferencer<B: Backend> {
    model:   NeuralNetwork<B>,
    batcher: FashionBatcher<B>,
}

impl<B: Backend> Inferencer<B> {
    /// Wrap a model that is already in memory
    pub fn new(model: NeuralNetwork<B>, device: B::Device) -> Self {
        Self { model, batcher: FashionBatcher::new(device) }
    }

    /// Rebuild the model described by the saved config and load its weights.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> Result<Self> {
        let cfg = ckpt_manager.load_config()?;
        let model: NeuralNetwork<B> = NeuralNetworkConfig::new()
            .with_hidden_size(cfg.hidden_size)
            .init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from '{}'", ckpt_manager.model_path().display());
        Ok(Self::new(model, device))
    }

    /// Classify one transformed image.
    pub fn predict(&self, sample: &ImageSample) -> Result<Prediction> {
        let batch  = self.batcher.batch(vec![sample.clone()]);
        let logits = self.model.forward(batch.images);
        let probs  = burn::tensor::activation::softmax(logits, 1);

        let probabilities = probs
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read probabilities: {e:?}"))?;

        let best = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .context("model produced no outputs")?;
        let class = FashionClass::from_index(best)
            .with_context(|| format!("class index {best} out of range"))?;

        tracing::debug!("Predicted {} with p={:.4}", class, probabilities[best]);
        Ok(Prediction { class, probabilities })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_probabilities_sum_to_one() {
        let device = Default::default();
        let model: NeuralNetwork<NdArray> = NeuralNetworkConfig::new()
            .with_hidden_size(16)
            .init(&device);
        let inferencer = Inferencer::new(model, device);

        let sample = ImageSample { pixels: vec![0.5; 784], rows: 28, cols: 28, label: 0 };
        let prediction = inferencer.predict(&sample).unwrap();

        assert_eq!(prediction.probabilities.len(), 10);
        let total: f32 = prediction.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        let max = prediction.probabilities.iter().cloned().fold(f32::MIN, f32::max);
        assert_eq!(prediction.confidence(), max);
    }
}
