// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer talks to datasets and checkpoints
// through these traits, so an in-memory dataset used in tests
// and the on-disk Fashion-MNIST dataset are interchangeable.

use anyhow::Result;
use std::path::Path;

use crate::domain::image::GrayImage;

/// One raw labelled picture as stored in the dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FashionItem {
    pub image: GrayImage,
    pub label: u8,
}

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can hand out labelled images by index.
///
/// Implementations:
///   - FashionMnistDataset → the IDX files on disk, or items held in memory
pub trait SampleSource {
    /// Item at `index`, or None past the end
    fn sample(&self, index: usize) -> Option<FashionItem>;

    /// Total number of items
    fn sample_count(&self) -> usize;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
///
/// Implementations:
///   - TrainConfig → JSON next to the checkpoint
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}
