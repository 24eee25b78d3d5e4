// ============================================================
// Layer 4 - Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<ImageSample>
// into two tensors:
//
//   images:  [batch_size, rows, cols]  float, values in [0, 1]
//   targets: [batch_size]              int, class index 0..=9
//
// All pixels are flattened into one Vec and reshaped once,
// which is cheaper than creating a tensor per sample and
// concatenating them.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::transform::ImageSample;

// ─── FashionBatch ─────────────────────────────────────────────────────────────
/// A batch of images ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct FashionBatch<B: Backend> {
    /// shape: [batch_size, rows, cols]
    pub images: Tensor<B, 3>,

    /// shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

// ─── FashionBatcher ───────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right CPU/GPU.
#[derive(Clone, Debug)]
pub struct FashionBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FashionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageSample, FashionBatch<B>> for FashionBatcher<B> {
    fn batch(&self, items: Vec<ImageSample>) -> FashionBatch<B> {
        let batch_size   = items.len();
        let (rows, cols) = items
            .first()
            .map(|s| (s.rows, s.cols))
            .unwrap_or((28, 28));

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| s.pixels.iter().copied())
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| s.label as i32)
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, rows, cols]);

        let targets = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        FashionBatch { images, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    fn sample(label: u8, value: f32) -> ImageSample {
        ImageSample { pixels: vec![value; 28 * 28], rows: 28, cols: 28, label }
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = FashionBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![sample(1, 0.0), sample(7, 0.5), sample(9, 1.0)]);

        assert_eq!(batch.images.dims(), [3, 28, 28]);
        assert_eq!(batch.targets.dims(), [3]);

        let labels = batch.targets.into_data().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![1, 7, 9]);
    }

    #[test]
    fn test_batch_keeps_sample_order() {
        let batcher = FashionBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![sample(0, 0.25), sample(0, 0.75)]);

        let second: f32 = batch.images.slice([1..2, 0..28, 0..28]).mean().into_scalar();
        assert!((second - 0.75).abs() < 1e-6);
    }
}
