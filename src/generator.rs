//! Synthetic scored transaction generator.
//!
//! Produces the in-memory collection the dashboard runs on. Scores are
//! sampled, not inferred: the stacked score is drawn first and the
//! supervised base scores are jittered around it, while the anomaly
//! detectors are independent.

use crate::config::GeneratorConfig;
use crate::features::EngineeredFeature;
use crate::types::transaction::{FeatureValue, ModelScores, TransactionRecord};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

const DEVICES: [&str; 6] = ["Windows", "iOS", "Android", "MacOS", "Linux", "Other"];

/// First numeric suffix used for record ids
const ID_BASE: usize = 100_000;

/// Scores above this are always labelled fraud
const LABEL_SCORE_CUTOFF: f64 = 0.8;

/// Chance a record is labelled fraud regardless of score
const LABEL_NOISE_RATE: f64 = 0.05;

/// Maximum deviation of a supervised score from the stacked score
const SUPERVISED_JITTER: f64 = 0.1;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Transaction generator with an explicit random source
pub struct RecordGenerator {
    rng: StdRng,
    lookback_days: u32,
}

impl RecordGenerator {
    /// Create a generator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            lookback_days: 30,
        }
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            lookback_days: 30,
        }
    }

    /// Create a generator from configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        };
        generator.with_lookback_days(config.lookback_days)
    }

    /// Spread timestamps over this many days before `now`
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Generate `count` records timestamped relative to `now`.
    ///
    /// Ids are `TXN-<100000 + index>` and therefore unique within one call.
    pub fn generate(&mut self, count: usize, now: DateTime<Utc>) -> Vec<TransactionRecord> {
        let records: Vec<TransactionRecord> =
            (0..count).map(|index| self.generate_one(index, now)).collect();

        let labelled = records.iter().filter(|r| r.is_fraud_label).count();
        info!(
            count = records.len(),
            labelled_fraud = labelled,
            lookback_days = self.lookback_days,
            "Generated synthetic transactions"
        );

        records
    }

    fn generate_one(&mut self, index: usize, now: DateTime<Utc>) -> TransactionRecord {
        let final_score: f64 = self.rng.gen();
        // Independent override keeps a trickle of labelled fraud below the cutoff
        let noise_label = self.rng.gen_bool(LABEL_NOISE_RATE);
        let is_fraud_label = final_score > LABEL_SCORE_CUTOFF || noise_label;

        let attributions = self.sample_attributions(final_score);

        let window_ms = i64::from(self.lookback_days) * MILLIS_PER_DAY;
        let offset_ms = if window_ms > 0 {
            self.rng.gen_range(0..window_ms)
        } else {
            0
        };

        let amount: f64 = self.rng.gen_range(10.0..510.0);
        let amount = (amount * 100.0).round() / 100.0;

        let card_id = self.rng.gen_range(1000..10000).to_string();
        let device_type = self.random_choice(&DEVICES).to_string();

        let model_scores = ModelScores {
            lightgbm: self.jitter(final_score),
            catboost: self.jitter(final_score),
            isolation_forest: self.rng.gen(),
            autoencoder: self.rng.gen(),
        };

        let engineered_features = self.sample_features();

        let record = TransactionRecord {
            id: format!("TXN-{}", ID_BASE + index),
            timestamp: now - Duration::milliseconds(offset_ms),
            amount,
            card_id,
            device_type,
            model_scores,
            final_score,
            is_fraud_label,
            engineered_features,
            attributions,
        };

        debug!(
            id = %record.id,
            final_score = record.final_score,
            is_fraud_label = record.is_fraud_label,
            "Generated transaction"
        );

        record
    }

    /// Supervised score: the stacked score nudged by at most the jitter, clamped
    fn jitter(&mut self, score: f64) -> f64 {
        let offset = self.rng.gen_range(-SUPERVISED_JITTER..=SUPERVISED_JITTER);
        (score + offset).clamp(0.0, 1.0)
    }

    /// Directional attributions: risky records push features positive
    fn sample_attributions(&mut self, final_score: f64) -> BTreeMap<EngineeredFeature, f64> {
        EngineeredFeature::ALL
            .into_iter()
            .map(|feature| {
                let magnitude: f64 = self.rng.gen();
                let weight = if final_score > 0.5 {
                    magnitude * 0.4
                } else {
                    -magnitude * 0.2
                };
                (feature, weight)
            })
            .collect()
    }

    fn sample_features(&mut self) -> BTreeMap<EngineeredFeature, FeatureValue> {
        EngineeredFeature::ALL
            .into_iter()
            .map(|feature| {
                let value = match feature {
                    EngineeredFeature::TransLast1hCard => {
                        FeatureValue::Number(f64::from(self.rng.gen_range(0..10u32)))
                    }
                    EngineeredFeature::DeviceChangeFlag => FeatureValue::Flag(self.rng.gen_bool(0.2)),
                    EngineeredFeature::AvgStdPerCard => {
                        FeatureValue::Number(self.rng.gen_range(0.0..2.0))
                    }
                    EngineeredFeature::CardsPerDevice24h => {
                        FeatureValue::Number(f64::from(self.rng.gen_range(0..5u32)))
                    }
                    EngineeredFeature::TimeSinceLastTxnCard => {
                        FeatureValue::Number(f64::from(self.rng.gen_range(0..10_000u32)))
                    }
                    EngineeredFeature::FreqRatioCardAmt => {
                        FeatureValue::Number(self.rng.gen_range(0.0..1.5))
                    }
                    EngineeredFeature::GeoChangeFlag => FeatureValue::Flag(self.rng.gen_bool(0.1)),
                    EngineeredFeature::IsNightTxn => FeatureValue::Flag(self.rng.gen_bool(0.3)),
                };
                (feature, value)
            })
            .collect()
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}
