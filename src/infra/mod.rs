// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting persistence used by the training and predict
// workflows:
//
//   checkpoint.rs  - Saving and loading the model's parameter
//                    record (Burn's NamedMpkFileRecorder) plus
//                    the TrainConfig JSON needed to rebuild the
//                    architecture before loading weights.
//
//   metrics.rs     - Per-epoch loss/accuracy appended to a CSV
//                    file for plotting learning curves later.

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
