// ============================================================
// Layer 2 - Datasets & DataLoaders Tour
// ============================================================
// Loads Fashion-MNIST and shows how the data pipeline fits
// together:
//
//   FashionMnistDataset ─ToTensor─► ImageSample ─FashionBatcher─► FashionBatch
//
// Steps printed:
//   1. Split sizes and the label → class name table
//   2. A 3x3 grid of random training samples drawn as ASCII art
//   3. What the ToTensor and one-hot transforms produce
//   4. One shuffled batch of 64 from a DataLoader

use anyhow::{anyhow, bail, Result};
use burn::{
    data::{
        dataloader::DataLoaderBuilder,
        dataset::{transform::Mapper, Dataset},
    },
    prelude::*,
};
use rand::Rng;
use std::{io::Write, path::Path};

use crate::data::{
    batcher::FashionBatcher,
    dataset::FashionMnistDataset,
    download::Split,
    transform::{to_tensor_dataset, OneHotTarget, ToTensor},
};
use crate::domain::{image::GrayImage, labels::FashionClass};
use crate::ml::backend::{default_device, ComputeBackend};

pub const GRID_SIDE:  usize = 3;
pub const BATCH_SIZE: usize = 64;

/// What the tour looked at, for callers that want more than the text
#[derive(Debug, Clone, PartialEq)]
pub struct DataTourSummary {
    /// (dataset index, label) of every grid cell, row by row
    pub grid:          Vec<(usize, u8)>,
    /// [batch, rows, cols] of the first loader batch
    pub feature_dims:  [usize; 3],
    /// [batch] of the first loader batch
    pub label_dims:    [usize; 1],
    /// Label of the first image in that batch
    pub first_label:   u8,
}

/// Load both splits from `root` and run the tour on the training split.
pub fn run<W: Write>(out: &mut W, root: &Path, download: bool) -> Result<DataTourSummary> {
    let training = FashionMnistDataset::new(root, Split::Train, download)?;
    let test     = FashionMnistDataset::new(root, Split::Test, download)?;

    writeln!(out, "Training samples: {}", training.len())?;
    writeln!(out, "Test samples: {}\n", test.len())?;

    tour::<ComputeBackend, _, _>(out, training, &mut rand::thread_rng(), &default_device())
}

/// The tour proper over an already loaded dataset.
pub fn tour<B, W, R>(
    out:     &mut W,
    dataset: FashionMnistDataset,
    rng:     &mut R,
    device:  &B::Device,
) -> Result<DataTourSummary>
where
    B: Backend,
    W: Write,
    R: Rng,
{
    if dataset.is_empty() {
        bail!("The dataset is empty, nothing to show");
    }

    // ── 1. Labels map ─────────────────────────────────────────────────────────
    writeln!(out, "## Labels\n")?;
    for (index, name) in FashionMnistDataset::labels_map() {
        writeln!(out, "{index}: {name}")?;
    }
    writeln!(out)?;

    // ── 2. Random sample grid ─────────────────────────────────────────────────
    writeln!(out, "## Random samples\n")?;
    let mut grid = Vec::with_capacity(GRID_SIDE * GRID_SIDE);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let index = rng.gen_range(0..dataset.len());
            let item  = dataset
                .get(index)
                .ok_or_else(|| anyhow!("Sample {index} vanished from the dataset"))?;

            writeln!(
                out,
                "[{row},{col}] sample {index}: {} (mean intensity {:.1})",
                class_name(item.label),
                item.image.mean_intensity(),
            )?;
            writeln!(out, "{}", item.image.to_ascii())?;
            grid.push((index, item.label));
        }
    }

    // ── 3. Transforms ─────────────────────────────────────────────────────────
    writeln!(out, "## Transforms\n")?;
    let raw    = dataset.get(0).ok_or_else(|| anyhow!("Dataset has no first sample"))?;
    let sample = ToTensor.map(&raw);
    let (lo, hi) = sample
        .pixels
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    writeln!(out, "ToTensor: {} floats, min {lo:.3}, max {hi:.3}", sample.pixels.len())?;

    let encoded = OneHotTarget.map(&sample);
    writeln!(out, "One-hot target for label {}: {:?}\n", sample.label, encoded.target)?;

    // ── 4. DataLoader ─────────────────────────────────────────────────────────
    writeln!(out, "## DataLoader\n")?;
    let loader = DataLoaderBuilder::new(FashionBatcher::<B>::new(device.clone()))
        .batch_size(BATCH_SIZE)
        .shuffle(rng.gen::<u64>())
        .num_workers(1)
        .build(to_tensor_dataset(dataset));

    let batch = loader
        .iter()
        .next()
        .ok_or_else(|| anyhow!("DataLoader produced no batch"))?;

    let feature_dims = batch.images.dims();
    let label_dims   = batch.targets.dims();
    writeln!(out, "Feature batch shape: {feature_dims:?}")?;
    writeln!(out, "Labels batch shape: {label_dims:?}")?;

    let [_, rows, cols] = feature_dims;
    let first = batch
        .images
        .slice([0..1, 0..rows, 0..cols])
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read batch image: {e:?}"))?;
    let bytes = first.iter().map(|&p| (p * 255.0).round().clamp(0.0, 255.0) as u8).collect();
    writeln!(out, "{}", GrayImage::new(rows, cols, bytes)?.to_ascii())?;

    let first_label = batch
        .targets
        .slice([0..1])
        .into_data()
        .convert::<i64>()
        .to_vec::<i64>()
        .map_err(|e| anyhow!("Cannot read batch label: {e:?}"))?
        .first()
        .copied()
        .ok_or_else(|| anyhow!("Batch has no label"))? as u8;
    writeln!(out, "Label: {first_label} ({})", class_name(first_label))?;

    Ok(DataTourSummary { grid, feature_dims, label_dims, first_label })
}

fn class_name(label: u8) -> &'static str {
    FashionClass::from_index(label as usize).map_or("unknown", FashionClass::name)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::FashionItem;
    use burn::backend::NdArray;
    use rand::{rngs::StdRng, SeedableRng};

    fn dataset(n: usize) -> FashionMnistDataset {
        let items = (0..n)
            .map(|i| FashionItem {
                image: GrayImage::new(28, 28, vec![(i % 256) as u8; 784]).unwrap(),
                label: (i % 10) as u8,
            })
            .collect();
        FashionMnistDataset::from_items(items)
    }

    #[test]
    fn test_tour_batch_shapes() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(7);
        let summary = tour::<NdArray, _, _>(&mut out, dataset(100), &mut rng, &Default::default()).unwrap();

        assert_eq!(summary.grid.len(), 9);
        assert!(summary.grid.iter().all(|&(i, label)| i < 100 && label as usize == i % 10));
        assert_eq!(summary.feature_dims, [64, 28, 28]);
        assert_eq!(summary.label_dims, [64]);
        assert!(summary.first_label < 10);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("9: Ankle boot"));
        assert!(text.contains("Feature batch shape: [64, 28, 28]"));
        assert!(text.contains("Labels batch shape: [64]"));
    }

    #[test]
    fn test_small_dataset_gives_short_batch() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let summary = tour::<NdArray, _, _>(&mut out, dataset(5), &mut rng, &Default::default()).unwrap();
        assert_eq!(summary.feature_dims, [5, 28, 28]);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let result = tour::<NdArray, _, _>(&mut out, dataset(0), &mut rng, &Default::default());
        assert!(result.is_err());
    }
}
