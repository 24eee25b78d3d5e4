// ============================================================
// Layer 5 - ndarray Bridge
// ============================================================
// Moves numbers between Burn tensors and ndarray arrays.
//
// Both directions COPY. A tensor built from an array does not
// share storage with it, so mutating one side afterwards is not
// visible on the other.

use anyhow::{anyhow, Result};
use burn::prelude::*;
use ndarray::{ArrayD, IxDyn};

/// Copy a float tensor into a dynamic-rank ndarray of the same shape
pub fn tensor_to_ndarray<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<ArrayD<f32>> {
    let dims = tensor.dims().to_vec();
    let values = tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read tensor values: {e:?}"))?;
    Ok(ArrayD::from_shape_vec(IxDyn(&dims), values)?)
}

/// Copy an ndarray into a new tensor of rank D on `device`.
/// Fails when the array rank differs from D.
pub fn ndarray_to_tensor<B: Backend, const D: usize>(
    array:  &ArrayD<f32>,
    device: &B::Device,
) -> Result<Tensor<B, D>> {
    if array.ndim() != D {
        return Err(anyhow!("array has rank {}, expected {}", array.ndim(), D));
    }
    let shape = array.shape().to_vec();
    // iter() walks in logical (row-major) order even for non-standard layouts
    let values: Vec<f32> = array.iter().copied().collect();
    Ok(Tensor::from_data(TensorData::new(values, shape), device))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_tensor_to_array_keeps_shape() {
        let device = Default::default();
        let t = Tensor::<NdArray, 2>::from_floats([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], &device);
        let a = tensor_to_ndarray(t).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(a[[1, 0]], 4.0);
    }

    #[test]
    fn test_array_to_tensor_is_a_copy() {
        let device = Default::default();
        let mut a = ArrayD::<f32>::ones(IxDyn(&[5]));
        let t: Tensor<NdArray, 1> = ndarray_to_tensor(&a, &device).unwrap();
        a += 1.0;
        let sum: f32 = t.sum().into_scalar();
        assert_eq!(sum, 5.0);
        assert_eq!(a[[0]], 2.0);
    }

    #[test]
    fn test_rank_mismatch() {
        let device = Default::default();
        let a = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        assert!(ndarray_to_tensor::<NdArray, 3>(&a, &device).is_err());
    }
}
