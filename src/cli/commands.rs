// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// One subcommand per quickstart stage:
//
//   tensors   tensor creation, attributes, operations, ndarray bridge
//   data      dataset loading, transforms, one DataLoader batch
//   model     the classifier's structure and a layer-by-layer walk
//   train     SGD training with a test pass per epoch
//   predict   classify one test image with the saved model
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create tensors and run everyday operations on them
    Tensors,

    /// Load Fashion-MNIST and show samples and a batch
    Data(DataArgs),

    /// Build the classifier and inspect it layer by layer
    Model,

    /// Train the classifier and save its parameters
    Train(TrainArgs),

    /// Classify one test image with the saved classifier
    Predict(PredictArgs),
}

/// Where the dataset lives
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Root directory; files go under <data-dir>/FashionMNIST/raw
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Fetch missing files from the public mirror
    #[arg(long)]
    pub download: bool,
}

/// All arguments for the `train` command
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory for model.mpk, train_config.json and metrics.csv
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Full passes over the training split
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// Images per optimisation step, at least 1
    #[arg(
        long,
        default_value_t = 64,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
    )]
    pub batch_size: usize,

    /// SGD learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Width of both hidden layers
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    /// Seeds weight init and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Print the running loss every N batches
    #[arg(long, default_value_t = 100)]
    pub log_interval: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:       a.data.data_dir,
            checkpoint_dir: a.checkpoint_dir,
            download:       a.data.download,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            hidden_size:    a.hidden_size,
            seed:           a.seed,
            log_interval:   a.log_interval,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory written by `train`
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Position of the image in the test split
    #[arg(long, default_value_t = 0)]
    pub index: usize,
}
