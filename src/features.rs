//! Engineered feature catalog.
//!
//! The dashboard explains every decision in terms of eight
//! human-interpretable features. Their order here is the order used for
//! display and for the static global importance table.

use serde::{Deserialize, Serialize};

/// One of the fixed engineered features attached to every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EngineeredFeature {
    #[serde(rename = "Trans_last_1h_card")]
    TransLast1hCard,
    #[serde(rename = "Device_change_flag")]
    DeviceChangeFlag,
    #[serde(rename = "Avg_std_per_card")]
    AvgStdPerCard,
    #[serde(rename = "Cards_per_device_24h")]
    CardsPerDevice24h,
    #[serde(rename = "Time_since_last_txn_card")]
    TimeSinceLastTxnCard,
    #[serde(rename = "Freq_ratio_card_amt")]
    FreqRatioCardAmt,
    #[serde(rename = "Geo_change_flag")]
    GeoChangeFlag,
    #[serde(rename = "Is_night_txn")]
    IsNightTxn,
}

impl EngineeredFeature {
    /// All features in catalog order.
    pub const ALL: [EngineeredFeature; 8] = [
        EngineeredFeature::TransLast1hCard,
        EngineeredFeature::DeviceChangeFlag,
        EngineeredFeature::AvgStdPerCard,
        EngineeredFeature::CardsPerDevice24h,
        EngineeredFeature::TimeSinceLastTxnCard,
        EngineeredFeature::FreqRatioCardAmt,
        EngineeredFeature::GeoChangeFlag,
        EngineeredFeature::IsNightTxn,
    ];

    /// Feature name as shown to analysts (matches the serialized key)
    pub fn name(self) -> &'static str {
        match self {
            EngineeredFeature::TransLast1hCard => "Trans_last_1h_card",
            EngineeredFeature::DeviceChangeFlag => "Device_change_flag",
            EngineeredFeature::AvgStdPerCard => "Avg_std_per_card",
            EngineeredFeature::CardsPerDevice24h => "Cards_per_device_24h",
            EngineeredFeature::TimeSinceLastTxnCard => "Time_since_last_txn_card",
            EngineeredFeature::FreqRatioCardAmt => "Freq_ratio_card_amt",
            EngineeredFeature::GeoChangeFlag => "Geo_change_flag",
            EngineeredFeature::IsNightTxn => "Is_night_txn",
        }
    }

    /// Look a feature up by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the feature is a binary flag rather than a magnitude
    pub fn is_flag(self) -> bool {
        matches!(
            self,
            EngineeredFeature::DeviceChangeFlag
                | EngineeredFeature::GeoChangeFlag
                | EngineeredFeature::IsNightTxn
        )
    }

    /// Analyst-facing explanation, where one has been written
    pub fn description(self) -> Option<&'static str> {
        match self {
            EngineeredFeature::TransLast1hCard => Some(
                "Count of successful transactions using the same card in the last 60 minutes. \
                 High values often indicate automated/scripted fraud.",
            ),
            EngineeredFeature::DeviceChangeFlag => Some(
                "Binary flag indicating if the transaction device differs from the device used \
                 in the previous 5 transactions for this card.",
            ),
            EngineeredFeature::AvgStdPerCard => Some(
                "Standard deviation of transaction amounts relative to the card's historical \
                 average. Spikes suggest unusual spending behavior.",
            ),
            EngineeredFeature::FreqRatioCardAmt => Some(
                "Ratio of current transaction amount vs historical median. Identifies outliers \
                 in card usage behavior.",
            ),
            _ => None,
        }
    }

    /// Static model-level importance (0.0 - 1.0)
    pub fn global_importance(self) -> f64 {
        match self {
            EngineeredFeature::TransLast1hCard => 0.92,
            EngineeredFeature::DeviceChangeFlag => 0.88,
            EngineeredFeature::AvgStdPerCard => 0.84,
            EngineeredFeature::CardsPerDevice24h => 0.76,
            EngineeredFeature::TimeSinceLastTxnCard => 0.71,
            EngineeredFeature::FreqRatioCardAmt => 0.65,
            EngineeredFeature::GeoChangeFlag => 0.58,
            EngineeredFeature::IsNightTxn => 0.42,
        }
    }
}

impl std::fmt::Display for EngineeredFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Model-level importance of one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalFeatureImportance {
    pub feature: EngineeredFeature,
    pub importance: f64,
    /// Analyst-facing explanation, absent for features without one
    pub description: Option<String>,
}

/// The global importance table, most important first
pub fn global_importance() -> Vec<GlobalFeatureImportance> {
    let mut table: Vec<GlobalFeatureImportance> = EngineeredFeature::ALL
        .into_iter()
        .map(|feature| GlobalFeatureImportance {
            feature,
            importance: feature.global_importance(),
            description: feature.description().map(str::to_string),
        })
        .collect();
    table.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    table
}
