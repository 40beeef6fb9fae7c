// ============================================================
// Layer 3 — Training History and Evaluation Metrics
// ============================================================
// Plain numeric results that cross the service boundary.
//
// Everything in here is stored as f64, never a framework
// tensor element type, so it serialises directly to JSON:
//
//   {
//     "loss":         [1.79, 1.62, ...],
//     "accuracy":     [0.21, 0.33, ...],
//     "val_loss":     [1.75, 1.60, ...],
//     "val_accuracy": [0.25, 0.31, ...]
//   }
//
// One entry per epoch, in epoch order.

use serde::{Deserialize, Serialize};

/// Metrics recorded for one finished epoch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean categorical cross-entropy over the training partition
    pub loss: f64,

    /// Fraction of training samples classified correctly
    pub accuracy: f64,

    /// Mean categorical cross-entropy over the validation partition.
    /// NaN when the validation partition is empty.
    pub val_loss: f64,

    /// Fraction of validation samples classified correctly
    pub val_accuracy: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:        usize,
        loss:         f64,
        accuracy:     f64,
        val_loss:     f64,
        val_accuracy: f64,
    ) -> Self {
        Self { epoch, loss, accuracy, val_loss, val_accuracy }
    }
}

/// Per-epoch metric sequences for a whole training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub loss:         Vec<f64>,
    pub accuracy:     Vec<f64>,
    pub val_loss:     Vec<f64>,
    pub val_accuracy: Vec<f64>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one epoch to every metric sequence
    pub fn record(&mut self, m: &EpochMetrics) {
        self.loss.push(m.loss);
        self.accuracy.push(m.accuracy);
        self.val_loss.push(m.val_loss);
        self.val_accuracy.push(m.val_accuracy);
    }

    /// Number of epochs recorded so far
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    /// Metric name → values, in a stable order
    pub fn metrics(&self) -> [(&'static str, &[f64]); 4] {
        [
            ("loss",         &self.loss),
            ("accuracy",     &self.accuracy),
            ("val_loss",     &self.val_loss),
            ("val_accuracy", &self.val_accuracy),
        ]
    }
}

/// Result of evaluating a persisted model on a validation partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub loss:     f64,
    pub accuracy: f64,
}
