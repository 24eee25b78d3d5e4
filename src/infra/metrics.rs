// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean cross-entropy over the training batches
//   - test_loss:  mean cross-entropy over the test batches
//   - accuracy:   fraction of test images classified correctly
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,test_loss,accuracy
//   1,2.152310,2.141882,0.447100
//   2,1.870544,1.862090,0.582300
//
// Each training run starts the file afresh, so the rows always
// belong to the most recent run.
//
// Loss should fall and accuracy rise from row to row. A test
// loss that climbs while train loss keeps falling is overfitting.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean loss over all training batches
    pub train_loss: f64,

    /// Mean loss over all test batches
    pub test_loss: f64,

    /// Fraction of correct test predictions, in [0.0, 1.0]
    pub accuracy: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, test_loss: f64, accuracy: f64) -> Self {
        Self { epoch, train_loss, test_loss, accuracy }
    }

    /// Returns true if this epoch beat the previous best test loss
    pub fn is_improvement(&self, best_test_loss: f64) -> bool {
        self.test_loss < best_test_loss
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger in `dir`, replacing any earlier
    /// metrics.csv with one holding only the header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");

        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,test_loss,accuracy")?;
        tracing::debug!("Started metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.test_loss, m.accuracy,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_loss={:.4}",
            m.epoch, m.train_loss, m.test_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 0.9, 0.8, 0.7);
        assert!(m.is_improvement(1.0));
        assert!(!m.is_improvement(0.8));
    }

    #[test]
    fn test_rows_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&EpochMetrics::new(1, 2.0, 1.5, 0.25)).unwrap();
        logger.log(&EpochMetrics::new(2, 1.0, 0.5, 0.5)).unwrap();

        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![
            "epoch,train_loss,test_loss,accuracy",
            "1,2.000000,1.500000,0.250000",
            "2,1.000000,0.500000,0.500000",
        ]);
    }

    #[test]
    fn test_new_run_starts_a_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = MetricsLogger::new(dir.path()).unwrap();
        first.log(&EpochMetrics::new(1, 2.0, 1.5, 0.25)).unwrap();
        first.log(&EpochMetrics::new(2, 1.0, 0.5, 0.5)).unwrap();

        let second = MetricsLogger::new(dir.path()).unwrap();
        second.log(&EpochMetrics::new(1, 0.9, 0.4, 0.6)).unwrap();

        let csv = fs::read_to_string(second.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec![
            "epoch,train_loss,test_loss,accuracy",
            "1,0.900000,0.400000,0.600000",
        ]);
    }
}
