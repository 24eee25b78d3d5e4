// ============================================================
// Layer 5 - Image Classifier
// ============================================================
// A plain multilayer perceptron over flattened 28x28 images:
//
//   [N, 28, 28] ─flatten─► [N, 784]
//               ─Linear(784→512)─► ReLU
//               ─Linear(512→512)─► ReLU
//               ─Linear(512→10)──► logits [N, 10]
//
// The logits are unnormalised; softmax turns them into class
// probabilities at inference time and cross-entropy consumes
// them directly during training.

use anyhow::{anyhow, Result};
use burn::{
    nn::{loss::CrossEntropyLossConfig, Linear, LinearConfig, Relu},
    prelude::*,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally, so they are not derived again here.
#[derive(Config, Debug)]
pub struct NeuralNetworkConfig {
    #[config(default = 784)]
    pub input_size: usize,
    #[config(default = 512)]
    pub hidden_size: usize,
    #[config(default = 10)]
    pub num_classes: usize,
}

impl NeuralNetworkConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> NeuralNetwork<B> {
        NeuralNetwork {
            linear1:    LinearConfig::new(self.input_size, self.hidden_size).init(device),
            linear2:    LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            linear3:    LinearConfig::new(self.hidden_size, self.num_classes).init(device),
            activation: Relu::new(),
        }
    }
}

#[derive(Module, Debug)]
pub struct NeuralNetwork<B: Backend> {
    pub linear1:    Linear<B>,
    pub linear2:    Linear<B>,
    pub linear3:    Linear<B>,
    pub activation: Relu,
}

/// Name, shape and leading values of one learned tensor
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSummary {
    pub name:   String,
    pub dims:   Vec<usize>,
    pub values: Vec<f32>,
}

impl<B: Backend> NeuralNetwork<B> {
    /// images: [batch, rows, cols] → logits: [batch, num_classes]
    pub fn forward(&self, images: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = images.flatten::<2>(1, 2);
        let x = self.activation.forward(self.linear1.forward(x));
        let x = self.activation.forward(self.linear2.forward(x));
        self.linear3.forward(x)
    }

    /// Logits plus the mean cross-entropy against integer targets
    pub fn forward_classification(
        &self,
        images:  Tensor<B, 3>,
        targets: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(images);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }

    /// Weights and biases of every layer, in forward order.
    ///
    /// Names follow the `linear_relu_stack.<position>.<kind>` scheme
    /// where positions 1 and 3 are the ReLUs and hold nothing.
    /// `preview` bounds how many leading values are copied out.
    pub fn named_parameters(&self, preview: usize) -> Result<Vec<ParameterSummary>> {
        let mut out = Vec::new();
        for (position, layer) in [(0, &self.linear1), (2, &self.linear2), (4, &self.linear3)] {
            let weight = layer.weight.val();
            out.push(ParameterSummary {
                name:   format!("linear_relu_stack.{position}.weight"),
                dims:   weight.dims().to_vec(),
                values: leading_values(weight.flatten::<1>(0, 1), preview)?,
            });
            if let Some(bias) = &layer.bias {
                let bias = bias.val();
                out.push(ParameterSummary {
                    name:   format!("linear_relu_stack.{position}.bias"),
                    dims:   bias.dims().to_vec(),
                    values: leading_values(bias, preview)?,
                });
            }
        }
        Ok(out)
    }
}

fn leading_values<B: Backend>(flat: Tensor<B, 1>, preview: usize) -> Result<Vec<f32>> {
    let [len] = flat.dims();
    let take = preview.min(len);
    if take == 0 {
        return Ok(Vec::new());
    }
    flat.slice([0..take])
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read parameter values: {e:?}"))
}
