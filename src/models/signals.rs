//! Agreement analysis across the base model layers

use crate::types::risk::ScoreBand;
use crate::types::transaction::{BaseModel, ModelScores};
use serde::{Deserialize, Serialize};

/// A base model counts as voting "fraud" above this score
pub const VOTE_THRESHOLD: f64 = 0.5;

/// How the supervised and unsupervised layers relate for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agreement {
    /// Every base model is above the vote threshold
    AllHigh,
    /// No base model is above the vote threshold
    AllLow,
    /// Supervised models fire while anomaly detectors stay quiet
    KnownPattern,
    /// Mixed signals; manual review recommended
    PossibleNovel,
}

impl Agreement {
    pub fn label(self) -> &'static str {
        match self {
            Agreement::AllHigh => "All Models Agree (HIGH)",
            Agreement::AllLow => "All Models Agree (LOW)",
            Agreement::KnownPattern => "Known Pattern Fraud",
            Agreement::PossibleNovel => "Possible Novel Fraud",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Agreement::AllHigh => {
                "High confidence fraud detected by both supervised and unsupervised layers."
            }
            Agreement::AllLow => "Strong consistency for a legitimate transaction.",
            Agreement::KnownPattern => {
                "Supervised models flagged it, but anomaly detectors are quiet."
            }
            Agreement::PossibleNovel => {
                "Anomaly detectors show high scores while supervised models are lower. \
                 Manual review recommended."
            }
        }
    }
}

/// One base model's reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReading {
    pub model: BaseModel,
    /// Display name, e.g. "Isolation Forest"
    pub name: String,
    pub score: f64,
    pub band: ScoreBand,
}

/// Signal summary for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub readings: Vec<ModelReading>,
    pub supervised_mean: f64,
    pub unsupervised_mean: f64,
    pub votes_for_fraud: usize,
    pub voting_score: f64,
    pub agreement: Agreement,
    pub agreement_label: String,
    pub agreement_description: String,
}

/// Mean of the supervised (label-trained) models
pub fn supervised_mean(scores: &ModelScores) -> f64 {
    layer_mean(scores, true)
}

/// Mean of the anomaly detectors
pub fn unsupervised_mean(scores: &ModelScores) -> f64 {
    layer_mean(scores, false)
}

fn layer_mean(scores: &ModelScores, supervised: bool) -> f64 {
    let layer: Vec<f64> = scores
        .iter()
        .filter(|(model, _)| model.is_supervised() == supervised)
        .map(|(_, score)| score)
        .collect();

    if layer.is_empty() {
        return 0.0;
    }
    layer.iter().sum::<f64>() / layer.len() as f64
}

/// Number of base models above the vote threshold
pub fn votes_for_fraud(scores: &ModelScores) -> usize {
    scores.iter().filter(|&(_, score)| score > VOTE_THRESHOLD).count()
}

/// Fraction of base models above the vote threshold
pub fn voting_score(scores: &ModelScores) -> f64 {
    votes_for_fraud(scores) as f64 / BaseModel::ALL.len() as f64
}

/// Classify how the layers agree
pub fn classify(scores: &ModelScores) -> Agreement {
    let votes = votes_for_fraud(scores);
    if votes == BaseModel::ALL.len() {
        Agreement::AllHigh
    } else if votes == 0 {
        Agreement::AllLow
    } else if scores.lightgbm > 0.6 && scores.isolation_forest < 0.4 {
        Agreement::KnownPattern
    } else {
        Agreement::PossibleNovel
    }
}

/// Build the full signal report for a record's base scores
pub fn analyze(scores: &ModelScores) -> SignalReport {
    let agreement = classify(scores);
    let readings = scores
        .iter()
        .map(|(model, score)| ModelReading {
            model,
            name: model.name().to_string(),
            score,
            band: ScoreBand::from_score(score),
        })
        .collect();

    SignalReport {
        readings,
        supervised_mean: supervised_mean(scores),
        unsupervised_mean: unsupervised_mean(scores),
        votes_for_fraud: votes_for_fraud(scores),
        voting_score: voting_score(scores),
        agreement,
        agreement_label: agreement.label().to_string(),
        agreement_description: agreement.description().to_string(),
    }
}
