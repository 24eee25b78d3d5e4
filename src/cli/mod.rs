// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to
// Layer 2. Tutorial output goes to stdout; diagnostics go
// through tracing.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::{io::Write, path::Path};

use commands::{Commands, DataArgs, PredictArgs, TrainArgs};
use crate::ml::backend::{default_device, ComputeBackend};

#[derive(Parser, Debug)]
#[command(
    name = "fashion-quickstart",
    version,
    about = "Tensors, datasets, a small classifier and its training loop on Fashion-MNIST."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case, writing to stdout.
    pub fn run(self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Same as `run` with an explicit sink
    pub fn run_with<W: Write>(self, out: &mut W) -> Result<()> {
        match self.command {
            Commands::Tensors        => run_tensors(out),
            Commands::Data(args)     => run_data(args, out),
            Commands::Model          => run_model(out),
            Commands::Train(args)    => run_train(args, out),
            Commands::Predict(args)  => run_predict(args, out),
        }
    }
}

fn run_tensors<W: Write>(out: &mut W) -> Result<()> {
    use crate::application::tensors_tour;
    tensors_tour::run::<ComputeBackend, _>(out, &default_device())?;
    Ok(())
}

fn run_data<W: Write>(args: DataArgs, out: &mut W) -> Result<()> {
    use crate::application::data_tour;
    tracing::info!("Reading Fashion-MNIST from '{}'", args.data_dir);
    data_tour::run(out, Path::new(&args.data_dir), args.download)?;
    Ok(())
}

fn run_model<W: Write>(out: &mut W) -> Result<()> {
    use crate::application::model_tour;
    model_tour::run::<ComputeBackend, _>(out, &default_device())?;
    Ok(())
}

fn run_train<W: Write>(args: TrainArgs, out: &mut W) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    // Convert CLI args → application config
    let use_case = TrainUseCase::new(args.into());
    let outcome  = use_case.execute(out)?;

    if let Some(last) = outcome.history.last() {
        tracing::info!(
            "Final epoch {}: test loss {:.4}, accuracy {:.1}%",
            last.epoch, last.test_loss, last.accuracy * 100.0,
        );
    }
    Ok(())
}

fn run_predict<W: Write>(args: PredictArgs, out: &mut W) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.checkpoint_dir, &args.data.data_dir, args.data.download)?;
    let outcome  = use_case.execute(args.index, out)?;
    tracing::info!(
        "Confidence {:.3}, correct: {}",
        outcome.prediction.confidence(),
        outcome.is_correct(),
    );
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_defaults_match_config() {
        let cli = Cli::try_parse_from(["fashion-quickstart", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_train_flags() {
        let cli = Cli::try_parse_from([
            "fashion-quickstart", "train",
            "--epochs", "2", "--lr", "0.01", "--download", "--data-dir", "/tmp/fm",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.epochs, 2);
        assert_eq!(cfg.lr, 0.01);
        assert!(cfg.download);
        assert_eq!(cfg.data_dir, "/tmp/fm");
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let result = Cli::try_parse_from(["fashion-quickstart", "train", "--batch-size", "0"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["fashion-quickstart", "train", "--batch-size", "1"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.batch_size, 1);
    }

    #[test]
    fn test_predict_index() {
        let cli = Cli::try_parse_from(["fashion-quickstart", "predict", "--index", "7"]).unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.index, 7);
        assert_eq!(args.checkpoint_dir, "checkpoints");
        assert!(!args.data.download);
    }

    #[test]
    fn test_tensors_command_writes_output() {
        let cli = Cli::try_parse_from(["fashion-quickstart", "tensors"]).unwrap();
        let mut out = Vec::new();
        cli.run_with(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("## Initializing a Tensor"));
    }
}
