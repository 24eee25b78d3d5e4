// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Each module here is one stage of the quickstart. They
// coordinate the lower layers and write their human-readable
// output to a caller-supplied sink; no model math lives here.

// Tensor basics
pub mod tensors_tour;

// Dataset, transforms and DataLoader
pub mod data_tour;

// Building and inspecting the classifier
pub mod model_tour;

// The training workflow
pub mod train_use_case;

// Classifying one test image with the saved model
pub mod predict_use_case;
