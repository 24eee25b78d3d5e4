// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// Everything that builds, trains or runs the classifier.
//
//   backend.rs    - compile-time backend choice (NdArray / Wgpu)
//   model.rs      - the flatten + Linear/ReLU classifier
//   trainer.rs    - SGD train loop and test loop per epoch
//   inferencer.rs - checkpoint loading and single-image prediction
//   bridge.rs     - copies between Burn tensors and ndarray arrays

pub mod backend;

pub mod model;

pub mod trainer;

pub mod inferencer;

pub mod bridge;
