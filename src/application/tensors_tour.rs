// ============================================================
// Layer 2 - Tensors Tour
// ============================================================
// Walks through the everyday tensor API, printing each step:
//
//   1. Initialising   from data, from ndarray, from another tensor, from a shape
//   2. Attributes     shape, element type, device
//   3. Operations     slicing, assignment, concatenation, arithmetic
//   4. Scalars        reducing to one value and reading it out
//   5. ndarray bridge copies in both directions
//
// Burn tensors are immutable values: operations that look
// "in-place" elsewhere return a new tensor here and the name
// is simply rebound.

use anyhow::{anyhow, Result};
use burn::{
    prelude::*,
    tensor::{Distribution, Element, ElementConversion},
};
use ndarray::{array, ArrayD, IxDyn};
use std::{fmt::Debug, io::Write};

use crate::ml::bridge::{ndarray_to_tensor, tensor_to_ndarray};

/// A few values computed on the way, for callers that want
/// more than the printed text
#[derive(Debug, Clone, PartialEq)]
pub struct TensorTourSummary {
    /// Sum of the 4x4 ones tensor after zeroing column 1
    pub total:       f32,
    /// `tensor @ tensor.T` for that same tensor, row-major
    pub matmul:      Vec<f32>,
    /// Shape of three copies concatenated along dim 1
    pub cat_dims:    [usize; 2],
    /// The tensor after adding 5 to every element
    pub shifted:     Vec<f32>,
}

pub fn run<B: Backend, W: Write>(out: &mut W, device: &B::Device) -> Result<TensorTourSummary> {
    // ── 1. Initialising a tensor ─────────────────────────────────────────────
    section(out, "Initializing a Tensor")?;

    let x_data = Tensor::<B, 2, Int>::from_ints([[1, 2], [3, 4]], device);
    writeln!(out, "Directly from data:\n{}\n", render::<i64>(x_data.to_data())?)?;

    let np_array = array![[1.0f32, 2.0], [3.0, 4.0]].into_dyn();
    let x_np: Tensor<B, 2> = ndarray_to_tensor(&np_array, device)?;
    writeln!(out, "From an ndarray:\n{}\n", render::<f32>(x_np.to_data())?)?;

    let x_ones = x_data.ones_like();
    writeln!(out, "Ones Tensor:\n{}\n", render::<i64>(x_ones.to_data())?)?;

    // The int tensor is converted to float before drawing random values
    let x_rand = x_data.float().random_like(Distribution::Default);
    writeln!(out, "Random Tensor:\n{}\n", render::<f32>(x_rand.to_data())?)?;

    let shape = [2, 3];
    let rand_tensor  = Tensor::<B, 2>::random(shape, Distribution::Default, device);
    let ones_tensor  = Tensor::<B, 2>::ones(shape, device);
    let zeros_tensor = Tensor::<B, 2>::zeros(shape, device);
    writeln!(out, "Random Tensor:\n{}\n", render::<f32>(rand_tensor.to_data())?)?;
    writeln!(out, "Ones Tensor:\n{}\n", render::<f32>(ones_tensor.to_data())?)?;
    writeln!(out, "Zeros Tensor:\n{}\n", render::<f32>(zeros_tensor.to_data())?)?;

    // ── 2. Attributes ─────────────────────────────────────────────────────────
    section(out, "Attributes of a Tensor")?;

    let tensor = Tensor::<B, 2>::random([3, 4], Distribution::Default, device);
    writeln!(out, "Shape of tensor: {:?}", tensor.dims())?;
    writeln!(out, "Datatype of tensor: {:?}", tensor.to_data().dtype)?;
    writeln!(out, "Device tensor is stored on: {:?}\n", tensor.device())?;

    // ── 3. Operations ─────────────────────────────────────────────────────────
    section(out, "Operations on Tensors")?;

    let tensor = Tensor::<B, 2>::ones([4, 4], device);
    writeln!(out, "First row: {}", render::<f32>(tensor.clone().slice([0..1, 0..4]).to_data())?)?;
    writeln!(out, "First column: {}", render::<f32>(tensor.clone().slice([0..4, 0..1]).flatten::<1>(0, 1).to_data())?)?;
    writeln!(out, "Last column: {}", render::<f32>(tensor.clone().slice([0..4, 3..4]).flatten::<1>(0, 1).to_data())?)?;

    // Zero the second column
    let tensor = tensor.slice_assign([0..4, 1..2], Tensor::zeros([4, 1], device));
    writeln!(out, "{}\n", render::<f32>(tensor.to_data())?)?;

    let t1 = Tensor::cat(vec![tensor.clone(), tensor.clone(), tensor.clone()], 1);
    let cat_dims = t1.dims();
    writeln!(out, "Joined along dim 1, shape {:?}:\n{}\n", cat_dims, render::<f32>(t1.to_data())?)?;

    // Matrix multiplication, two spellings of the same thing
    let y1 = tensor.clone().matmul(tensor.clone().transpose());
    let y2 = tensor.clone().matmul(tensor.clone().swap_dims(0, 1));
    writeln!(out, "Matrix product:\n{}\n", render::<f32>(y1.to_data())?)?;
    let same = y1.clone().equal(y2).all().into_scalar();
    writeln!(out, "Both spellings agree: {same}\n")?;

    // Element-wise product
    let z1 = tensor.clone() * tensor.clone();
    let z2 = tensor.clone().mul(tensor.clone());
    writeln!(out, "Element-wise product:\n{}\n", render::<f32>(z1.to_data())?)?;
    let same = z1.equal(z2).all().into_scalar();
    writeln!(out, "Both spellings agree: {same}\n")?;

    // ── 4. Single-element tensors ─────────────────────────────────────────────
    section(out, "Single-element Tensors")?;

    let agg = tensor.clone().sum();
    let agg_item: f32 = agg.into_scalar().elem();
    writeln!(out, "{agg_item} f32\n")?;

    writeln!(out, "{}\n", render::<f32>(tensor.to_data())?)?;
    let tensor = tensor.add_scalar(5.0);
    writeln!(out, "{}\n", render::<f32>(tensor.to_data())?)?;

    // ── 5. Bridge with ndarray ────────────────────────────────────────────────
    section(out, "Bridge with ndarray")?;

    let t = Tensor::<B, 1>::ones([5], device);
    writeln!(out, "t: {}", render::<f32>(t.to_data())?)?;
    let n = tensor_to_ndarray(t.clone())?;
    writeln!(out, "n: {:?}", n.iter().collect::<Vec<_>>())?;

    // The array is a copy: changing the tensor leaves it untouched
    let t = t.add_scalar(1.0);
    writeln!(out, "t: {}", render::<f32>(t.to_data())?)?;
    writeln!(out, "n: {:?}\n", n.iter().collect::<Vec<_>>())?;

    let mut n = ArrayD::<f32>::ones(IxDyn(&[5]));
    let t: Tensor<B, 1> = ndarray_to_tensor(&n, device)?;
    n += 1.0;
    writeln!(out, "t: {}", render::<f32>(t.to_data())?)?;
    writeln!(out, "n: {:?}", n.iter().collect::<Vec<_>>())?;

    Ok(TensorTourSummary {
        total:    agg_item,
        matmul:   values::<f32>(y1.to_data())?,
        cat_dims,
        shifted:  values::<f32>(tensor.to_data())?,
    })
}

fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "## {title}\n")?;
    Ok(())
}

fn values<E: Element>(data: TensorData) -> Result<Vec<E>> {
    data.convert::<E>()
        .to_vec::<E>()
        .map_err(|e| anyhow!("Cannot read tensor values: {e:?}"))
}

/// Nested-bracket text for rank 1 and 2 data, one row per line.
fn render<E: Element + Debug>(data: TensorData) -> Result<String> {
    let shape = data.shape.clone();
    let vals  = values::<E>(data)?;

    if shape.len() < 2 {
        return Ok(format!("{vals:?}"));
    }
    let width = shape.last().copied().unwrap_or(1).max(1);
    let rows: Vec<String> = vals.chunks(width).map(|row| format!("{row:?}")).collect();
    Ok(format!("[{}]", rows.join(",\n ")))
}
