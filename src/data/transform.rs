// ============================================================
// Layer 4 - Sample Transforms
// ============================================================
// Raw Fashion-MNIST items are byte images with byte labels.
// Training wants floats, so two transforms are offered, each a
// Burn Mapper that MapperDataset applies lazily on every get():
//
//   ToTensor      u8 pixels → f32 in [0.0, 1.0]  (p / 255)
//   OneHotTarget  label 3  → [0, 0, 0, 1, 0, 0, 0, 0, 0, 0]
//
// The one-hot form is what a mean-squared-error style loss
// would consume; the cross-entropy training loop keeps the
// integer label instead.

use burn::data::dataset::{
    transform::{Mapper, MapperDataset},
    Dataset,
};

use crate::domain::{labels::NUM_CLASSES, traits::FashionItem};

/// A float image ready to be batched
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    /// Row-major intensities in [0.0, 1.0]
    pub pixels: Vec<f32>,
    pub rows:   usize,
    pub cols:   usize,
    pub label:  u8,
}

/// A float image paired with a one-hot target vector
#[derive(Debug, Clone, PartialEq)]
pub struct OneHotSample {
    pub pixels: Vec<f32>,
    pub rows:   usize,
    pub cols:   usize,
    pub target: Vec<f32>,
}

/// Scales pixel bytes into [0, 1] floats
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Mapper<FashionItem, ImageSample> for ToTensor {
    fn map(&self, item: &FashionItem) -> ImageSample {
        ImageSample {
            pixels: item.image.pixels().iter().map(|&p| p as f32 / 255.0).collect(),
            rows:   item.image.rows(),
            cols:   item.image.cols(),
            label:  item.label,
        }
    }
}

/// Replaces the integer label by a one-hot vector of NUM_CLASSES floats
#[derive(Debug, Clone, Copy, Default)]
pub struct OneHotTarget;

impl Mapper<ImageSample, OneHotSample> for OneHotTarget {
    fn map(&self, item: &ImageSample) -> OneHotSample {
        OneHotSample {
            pixels: item.pixels.clone(),
            rows:   item.rows,
            cols:   item.cols,
            target: one_hot(item.label as usize, NUM_CLASSES),
        }
    }
}

/// `num_classes` zeros with a single 1.0 at `label`.
/// A label outside the range yields all zeros.
pub fn one_hot(label: usize, num_classes: usize) -> Vec<f32> {
    let mut target = vec![0.0; num_classes];
    if let Some(slot) = target.get_mut(label) {
        *slot = 1.0;
    }
    target
}

pub type TensorDataset<D> = MapperDataset<D, ToTensor, FashionItem>;

pub type OneHotDataset<D> = MapperDataset<TensorDataset<D>, OneHotTarget, ImageSample>;

/// Apply ToTensor to every item of `dataset`
pub fn to_tensor_dataset<D: Dataset<FashionItem>>(dataset: D) -> TensorDataset<D> {
    MapperDataset::new(dataset, ToTensor)
}

/// Apply ToTensor, then OneHotTarget
pub fn one_hot_dataset<D: Dataset<FashionItem>>(dataset: D) -> OneHotDataset<D> {
    MapperDataset::new(to_tensor_dataset(dataset), OneHotTarget)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::FashionMnistDataset;
    use crate::domain::image::GrayImage;

    fn item(label: u8) -> FashionItem {
        FashionItem {
            image: GrayImage::new(2, 2, vec![0, 51, 255, 102]).unwrap(),
            label,
        }
    }

    #[test]
    fn test_to_tensor_scales_into_unit_range() {
        let sample = ToTensor.map(&item(4));
        assert_eq!(sample.pixels, vec![0.0, 0.2, 1.0, 0.4]);
        assert_eq!(sample.label, 4);
        assert!(sample.pixels.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_one_hot_single_one() {
        let target = one_hot(3, 10);
        assert_eq!(target.iter().sum::<f32>(), 1.0);
        assert_eq!(target[3], 1.0);
        assert_eq!(one_hot(12, 10), vec![0.0; 10]);
    }

    #[test]
    fn test_mapped_dataset() {
        let ds = one_hot_dataset(FashionMnistDataset::from_items(vec![item(0), item(9)]));
        assert_eq!(ds.len(), 2);
        let second = ds.get(1).unwrap();
        assert_eq!(second.target[9], 1.0);
        assert_eq!(second.pixels[2], 1.0);
    }
}
