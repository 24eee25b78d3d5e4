// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// From gzip archives on a web mirror to tensor batches:
//
//   download.rs   → fetch + gunzip + cache the IDX files
//       │
//       ▼
//   idx.rs        → decode IDX headers and payloads
//       │
//       ▼
//   dataset.rs    → FashionMnistDataset (Burn Dataset trait)
//       │
//       ▼
//   transform.rs  → ToTensor / OneHotTarget mappers
//       │
//       ▼
//   batcher.rs    → FashionBatcher stacks samples into tensors
//       │
//       ▼
//   DataLoader    → Burn shuffles and feeds the training loop

/// IDX binary format reader and writer
pub mod idx;

/// Mirror download and local cache
pub mod download;

/// Implements Burn's Dataset trait for Fashion-MNIST
pub mod dataset;

/// Burn Mappers that turn raw items into float samples
pub mod transform;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
