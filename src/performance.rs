//! Threshold-dependent performance figures for the stacked score.
//!
//! Compares the flag decision (`final_score >= threshold`) against the
//! labels attached to the generated records.

use crate::types::transaction::TransactionRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Flag decision vs. label counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: u64,
    pub false_positives: u64,
    pub true_negatives: u64,
    pub false_negatives: u64,
}

impl ConfusionMatrix {
    /// Tally records at a threshold
    pub fn from_records<'a, I>(records: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut matrix = Self::default();
        for record in records {
            match (record.is_flagged(threshold), record.is_fraud_label) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (false, true) => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    pub fn total(&self) -> u64 {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Also the true positive rate
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn false_positive_rate(&self) -> f64 {
        ratio(self.false_positives, self.false_positives + self.true_negatives)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        numerator as f64 / denominator as f64
    } else {
        0.0
    }
}

/// One operating point of the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

/// Performance report at the current threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub roc: Vec<RocPoint>,
    pub roc_auc: f64,
}

impl PerformanceReport {
    /// Evaluate records at `threshold`, with an ROC sweep over 0.0..=1.0
    pub fn evaluate(records: &[&TransactionRecord], threshold: f64) -> Self {
        let confusion = ConfusionMatrix::from_records(records.iter().copied(), threshold);
        let roc = roc_curve(records);
        let roc_auc = auc(&roc);

        Self {
            threshold,
            confusion,
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            accuracy: confusion.accuracy(),
            roc,
            roc_auc,
        }
    }

    /// Log a boxed summary
    pub fn print_summary(&self) {
        let c = &self.confusion;
        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          HYBRID STACKING MODEL - PERFORMANCE SUMMARY         ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Threshold: {:>5.2}            │  Records evaluated: {:>8} ║",
            self.threshold,
            c.total()
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ TP: {:>6}  FP: {:>6}  TN: {:>6}  FN: {:>6}              ║",
            c.true_positives, c.false_positives, c.true_negatives, c.false_negatives
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Precision: {:>5.3}  Recall: {:>5.3}  F1: {:>5.3}  ROC-AUC: {:>5.3} ║",
            self.precision, self.recall, self.f1, self.roc_auc
        );
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

/// ROC points at thresholds 1.0, 0.9, ... 0.0 (increasing FPR)
pub fn roc_curve(records: &[&TransactionRecord]) -> Vec<RocPoint> {
    (0..=10)
        .rev()
        .map(|step| {
            let threshold = step as f64 / 10.0;
            let matrix = ConfusionMatrix::from_records(records.iter().copied(), threshold);
            RocPoint {
                threshold,
                fpr: matrix.false_positive_rate(),
                tpr: matrix.recall(),
            }
        })
        .collect()
}

/// Trapezoidal area under an ROC curve ordered by FPR
pub fn auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[0].tpr + w[1].tpr) / 2.0)
        .sum()
}
