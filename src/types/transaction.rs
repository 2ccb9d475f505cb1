//! Scored transaction records shown on the analyst dashboard

use crate::features::EngineeredFeature;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base models feeding the stacking layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BaseModel {
    #[serde(rename = "LightGBM")]
    LightGbm,
    #[serde(rename = "CatBoost")]
    CatBoost,
    #[serde(rename = "IsolationForest")]
    IsolationForest,
    #[serde(rename = "Autoencoder")]
    Autoencoder,
}

impl BaseModel {
    /// All base models in display order.
    pub const ALL: [BaseModel; 4] = [
        BaseModel::LightGbm,
        BaseModel::CatBoost,
        BaseModel::IsolationForest,
        BaseModel::Autoencoder,
    ];

    /// Display name used by the presentation layer
    pub fn name(self) -> &'static str {
        match self {
            BaseModel::LightGbm => "LightGBM",
            BaseModel::CatBoost => "CatBoost",
            BaseModel::IsolationForest => "Isolation Forest",
            BaseModel::Autoencoder => "Autoencoder",
        }
    }

    /// Supervised models learn known fraud patterns from labels;
    /// the others are anomaly detectors.
    pub fn is_supervised(self) -> bool {
        matches!(self, BaseModel::LightGbm | BaseModel::CatBoost)
    }
}

/// Per-model probabilities for one transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub lightgbm: f64,
    pub catboost: f64,
    pub isolation_forest: f64,
    pub autoencoder: f64,
}

impl ModelScores {
    /// Score of a single base model
    pub fn get(&self, model: BaseModel) -> f64 {
        match model {
            BaseModel::LightGbm => self.lightgbm,
            BaseModel::CatBoost => self.catboost,
            BaseModel::IsolationForest => self.isolation_forest,
            BaseModel::Autoencoder => self.autoencoder,
        }
    }

    /// Iterate `(model, score)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (BaseModel, f64)> + '_ {
        BaseModel::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// Value of an engineered feature: either a count/magnitude or a flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
}

/// A transaction scored by every base model and the stacking meta-model.
///
/// Records are created once by the generator and never mutated; views
/// borrow or clone them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unique identifier, `TXN-<number>`
    pub id: String,

    /// When the transaction happened
    pub timestamp: DateTime<Utc>,

    /// Transaction amount
    pub amount: f64,

    /// Card identifier
    pub card_id: String,

    /// Device reported by the client
    pub device_type: String,

    /// Base model probabilities
    pub model_scores: ModelScores,

    /// Stacking meta-model probability (0.0 - 1.0)
    pub final_score: f64,

    /// Ground-truth style label attached to the record
    pub is_fraud_label: bool,

    /// Human-interpretable engineered features
    pub engineered_features: BTreeMap<EngineeredFeature, FeatureValue>,

    /// Local per-feature attribution weights
    pub attributions: BTreeMap<EngineeredFeature, f64>,
}

impl TransactionRecord {
    /// Whether the meta-model score reaches the alert threshold
    pub fn is_flagged(&self, threshold: f64) -> bool {
        self.final_score >= threshold
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Duration;

    /// Record with neutral features, for tests that only care about
    /// identity, time and score.
    pub fn record(index: usize, final_score: f64, age: Duration, now: DateTime<Utc>) -> TransactionRecord {
        let engineered_features = EngineeredFeature::ALL
            .into_iter()
            .map(|f| (f, FeatureValue::Number(0.0)))
            .collect();
        let attributions = EngineeredFeature::ALL.into_iter().map(|f| (f, 0.0)).collect();

        TransactionRecord {
            id: format!("TXN-{}", 100000 + index),
            timestamp: now - age,
            amount: 42.0,
            card_id: format!("{}", 1000 + index),
            device_type: "iOS".to_string(),
            model_scores: ModelScores {
                lightgbm: final_score,
                catboost: final_score,
                isolation_forest: 0.5,
                autoencoder: 0.5,
            },
            final_score,
            is_fraud_label: final_score > 0.8,
            engineered_features,
            attributions,
        }
    }
}
