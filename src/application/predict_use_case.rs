// ============================================================
// Layer 2 - PredictUseCase
// ============================================================
// The last step of the quickstart: load the saved state into a
// freshly built model and classify one image of the test split.

use anyhow::{Context, Result};
use burn::data::dataset::transform::Mapper;
use std::io::Write;

use crate::data::{
    dataset::FashionMnistDataset,
    download::Split,
    transform::ToTensor,
};
use crate::domain::{labels::FashionClass, traits::SampleSource};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{
    backend::{default_device, ComputeBackend},
    inferencer::{Inferencer, Prediction},
};

pub struct PredictUseCase {
    inferencer: Inferencer<ComputeBackend>,
    test_data:  FashionMnistDataset,
}

/// What was predicted for one test item, next to the truth
#[derive(Debug, Clone)]
pub struct PredictOutcome {
    pub prediction: Prediction,
    pub actual:     FashionClass,
}

impl PredictOutcome {
    pub fn is_correct(&self) -> bool {
        self.prediction.class == self.actual
    }
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: &str, data_dir: &str, download: bool) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt, default_device())?;
        let test_data  = FashionMnistDataset::new(data_dir, Split::Test, download)?;
        Ok(Self { inferencer, test_data })
    }

    /// Build from parts already in memory
    pub fn from_parts(inferencer: Inferencer<ComputeBackend>, test_data: FashionMnistDataset) -> Self {
        Self { inferencer, test_data }
    }

    /// Classify test item `index` and print the quickstart's verdict line.
    pub fn execute<W: Write>(&self, index: usize, out: &mut W) -> Result<PredictOutcome> {
        let item = self.test_data.sample(index).with_context(|| {
            format!("Index {index} out of range: the test split has {} items", self.test_data.sample_count())
        })?;
        let actual = FashionClass::from_index(item.label as usize)
            .with_context(|| format!("Test item {index} has invalid label {}", item.label))?;

        let prediction = self.inferencer.predict(&ToTensor.map(&item))?;
        writeln!(out, "Predicted: \"{}\", Actual: \"{}\"", prediction.class, actual)?;

        Ok(PredictOutcome { prediction, actual })
    }
}
