// ============================================================
// Layer 4 - Fashion-MNIST Dataset
// ============================================================
// Implements Burn's Dataset trait over raw labelled images.
//
// The whole split is decoded into memory up front: 60,000
// images of 784 bytes is under 50 MB, and random access by
// index is then a plain Vec lookup. The DataLoader only ever
// calls get(index) and len().

use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use std::{fs::File, io::BufReader, path::Path};

use crate::data::download::{ensure_split, Split};
use crate::data::idx;
use crate::domain::{
    labels::FashionClass,
    traits::{FashionItem, SampleSource},
};

pub struct FashionMnistDataset {
    items: Vec<FashionItem>,
}

impl FashionMnistDataset {
    /// Load one split from `root`, downloading it first if asked to.
    pub fn new(root: impl AsRef<Path>, split: Split, download: bool) -> Result<Self> {
        let files = ensure_split(root.as_ref(), split, download)?;

        let images = {
            let file = File::open(&files.images)
                .with_context(|| format!("Cannot open '{}'", files.images.display()))?;
            idx::read_images(&mut BufReader::new(file))
                .with_context(|| format!("Invalid image file '{}'", files.images.display()))?
        };
        let labels = {
            let file = File::open(&files.labels)
                .with_context(|| format!("Cannot open '{}'", files.labels.display()))?;
            idx::read_labels(&mut BufReader::new(file))
                .with_context(|| format!("Invalid label file '{}'", files.labels.display()))?
        };
        idx::check_counts(images.len(), labels.len())?;

        let items: Vec<FashionItem> = images
            .into_iter()
            .zip(labels)
            .map(|(image, label)| FashionItem { image, label })
            .collect();

        tracing::info!("Loaded {:?} split: {} items", split, items.len());
        Ok(Self { items })
    }

    /// Wrap items that are already in memory
    pub fn from_items(items: Vec<FashionItem>) -> Self {
        Self { items }
    }

    /// Label index → class name table
    pub fn labels_map() -> Vec<(usize, &'static str)> {
        FashionClass::ALL.iter().map(|c| (c.index(), c.name())).collect()
    }
}

impl Dataset<FashionItem> for FashionMnistDataset {
    fn get(&self, index: usize) -> Option<FashionItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl SampleSource for FashionMnistDataset {
    fn sample(&self, index: usize) -> Option<FashionItem> {
        self.get(index)
    }

    fn sample_count(&self) -> usize {
        self.len()
    }
}
