// ============================================================
// Layer 5 - Training Loop
// ============================================================
// Epoch loop built from two halves:
//
//   train_epoch  forward → cross-entropy → backward → SGD step,
//                once per batch, with a progress line every
//                `log_interval` batches
//   test_epoch   forward only on the inner (non-autodiff)
//                backend, reporting mean loss and accuracy
//
// Key Burn insight:
//   - Training runs on Autodiff<Backend> so loss.backward() works
//   - model.valid() returns the same model on the inner backend
//   - The test batcher therefore uses B::InnerBackend
//   - argmax(1) returns [batch, 1], so it is flattened before .equal()

use anyhow::{bail, Result};
use burn::{
    data::{
        dataloader::{DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    module::AutodiffModule,
    optim::{GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use std::io::Write;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{FashionBatch, FashionBatcher},
    transform::ImageSample,
};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::{EpochMetrics, MetricsLogger},
};
use crate::ml::backend::{default_device, ComputeBackend, TrainBackend};
use crate::ml::model::{NeuralNetwork, NeuralNetworkConfig};

/// Result of one pass over the test set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestReport {
    pub avg_loss: f64,
    pub accuracy: f64,
    pub correct:  usize,
    pub total:    usize,
}

/// Trained model (on the inner backend) plus one metrics row per epoch
pub struct TrainOutcome<B: Backend> {
    pub model:   NeuralNetwork<B>,
    pub history: Vec<EpochMetrics>,
}

/// Train with the compile-time selected backend and its default device.
pub fn run_training<D, T, W>(
    cfg:           &TrainConfig,
    train_dataset: D,
    test_dataset:  T,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    out:           &mut W,
) -> Result<TrainOutcome<ComputeBackend>>
where
    D: Dataset<ImageSample> + 'static,
    T: Dataset<ImageSample> + 'static,
    W: Write,
{
    let device = default_device();
    tracing::info!("Using device: {:?}", device);
    train_loop::<TrainBackend, _, _, _>(
        cfg, train_dataset, test_dataset, ckpt_manager, metrics, device, out,
    )
}

/// The full epoch loop, generic over the autodiff backend.
pub fn train_loop<B, D, T, W>(
    cfg:           &TrainConfig,
    train_dataset: D,
    test_dataset:  T,
    ckpt_manager:  &CheckpointManager,
    metrics:       &MetricsLogger,
    device:        B::Device,
    out:           &mut W,
) -> Result<TrainOutcome<B::InnerBackend>>
where
    B: AutodiffBackend,
    D: Dataset<ImageSample> + 'static,
    T: Dataset<ImageSample> + 'static,
    W: Write,
{
    if cfg.batch_size == 0 {
        bail!("batch_size must be at least 1");
    }
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = NeuralNetworkConfig::new().with_hidden_size(cfg.hidden_size);
    let mut model: NeuralNetwork<B> = model_cfg.init(&device);
    tracing::info!("Model ready: hidden_size={}, params={}", cfg.hidden_size, model.num_params());

    // ── Plain SGD, no momentum or weight decay ────────────────────────────────
    // θ = θ - lr * ∇θ
    let mut optim = SgdConfig::new().init::<B, NeuralNetwork<B>>();

    let train_size = train_dataset.len();
    let test_size  = test_dataset.len();

    // ── Training data loader (autodiff backend) ───────────────────────────────
    let train_loader = DataLoaderBuilder::new(FashionBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Test data loader (inner backend, no autodiff overhead) ────────────────
    let test_loader = DataLoaderBuilder::new(FashionBatcher::<B::InnerBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(test_dataset);

    let mut history   = Vec::with_capacity(cfg.epochs);
    let mut best_loss = f64::INFINITY;

    for epoch in 1..=cfg.epochs {
        writeln!(out, "Epoch {epoch}\n-------------------------------")?;

        let (trained, train_loss) = train_epoch(
            model, &mut optim, train_loader.as_ref(), train_size, cfg.lr, cfg.log_interval, out,
        )?;
        model = trained;

        let report = test_epoch(&model.valid(), test_loader.as_ref(), test_size, out)?;

        let row = EpochMetrics::new(epoch, train_loss, report.avg_loss, report.accuracy);
        metrics.log(&row)?;
        if row.is_improvement(best_loss) {
            tracing::info!("Epoch {}: test loss improved to {:.4}", epoch, row.test_loss);
            best_loss = row.test_loss;
        }
        history.push(row);
    }

    ckpt_manager.save_model(&model)?;
    writeln!(out, "Done!")?;
    tracing::info!("Training complete!");

    Ok(TrainOutcome { model: model.valid(), history })
}

/// One pass over the training loader. Returns the updated model and
/// the mean batch loss (NaN when the loader is empty).
pub fn train_epoch<B, O, W>(
    mut model:    NeuralNetwork<B>,
    optim:        &mut O,
    loader:       &dyn DataLoader<FashionBatch<B>>,
    size:         usize,
    lr:           f64,
    log_interval: usize,
    out:          &mut W,
) -> Result<(NeuralNetwork<B>, f64)>
where
    B: AutodiffBackend,
    O: Optimizer<NeuralNetwork<B>, B>,
    W: Write,
{
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut seen     = 0usize;

    for (batch_idx, batch) in loader.iter().enumerate() {
        let [batch_len, _, _] = batch.images.dims();
        let (loss, _) = model.forward_classification(batch.images, batch.targets);

        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
        loss_sum += loss_val;
        batches  += 1;
        seen     += batch_len;

        // Backpropagation
        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(lr, model, grads);

        if log_interval > 0 && batch_idx % log_interval == 0 {
            writeln!(out, "loss: {loss_val:>10.6}  [{seen:>5}/{size:>5}]")?;
        }
    }

    let mean = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    Ok((model, mean))
}

/// Evaluate `model` over every batch of `loader` without tracking gradients.
pub fn test_epoch<B, W>(
    model:  &NeuralNetwork<B>,
    loader: &dyn DataLoader<FashionBatch<B>>,
    size:   usize,
    out:    &mut W,
) -> Result<TestReport>
where
    B: Backend,
    W: Write,
{
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut correct  = 0usize;
    let mut total    = 0usize;

    for batch in loader.iter() {
        let [batch_len] = batch.targets.dims();
        let (loss, logits) = model.forward_classification(batch.images, batch.targets.clone());

        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;
        total    += batch_len;

        // argmax(1) returns shape [batch, 1]; flatten to [batch]
        let predicted = logits.argmax(1).flatten::<1>(0, 1);
        let hits: i64 = predicted
            .equal(batch.targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct += hits as usize;
    }

    if total != size {
        tracing::warn!("Test loader yielded {} items, dataset reports {}", total, size);
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let accuracy = if total   > 0 { correct as f64 / total as f64 } else { 0.0 };

    writeln!(
        out,
        "Test Error: \n Accuracy: {:.1}%, Avg loss: {:>8.6} \n",
        accuracy * 100.0, avg_loss,
    )?;

    Ok(TestReport { avg_loss, accuracy, correct, total })
}
