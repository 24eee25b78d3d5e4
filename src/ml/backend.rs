// ============================================================
// Layer 5 - Backend Selection
// ============================================================
// Burn code is generic over a Backend. The binary picks one at
// compile time:
//
//   default            NdArray (CPU, always available)
//   --features wgpu    Wgpu (Vulkan / Metal / DX12 accelerator)
//
// Training wraps the backend in Autodiff so backward() works;
// evaluation and inference use the plain inner backend.

use burn::prelude::Backend;

#[cfg(feature = "wgpu")]
pub type ComputeBackend = burn::backend::Wgpu;

#[cfg(not(feature = "wgpu"))]
pub type ComputeBackend = burn::backend::NdArray;

pub type TrainBackend = burn::backend::Autodiff<ComputeBackend>;

pub type ComputeDevice = <ComputeBackend as Backend>::Device;

/// The default device of the selected backend
pub fn default_device() -> ComputeDevice {
    Default::default()
}

/// Short label for log lines and the model tour
pub fn backend_name() -> &'static str {
    if cfg!(feature = "wgpu") { "wgpu" } else { "ndarray (cpu)" }
}
