//! Risk classification of a record relative to the alert threshold

use serde::{Deserialize, Serialize};

/// Scores above this are at least `Medium` even below the alert threshold
pub const MEDIUM_RISK_FLOOR: f64 = 0.3;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Determine risk level from the meta-model score and the alert threshold
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            RiskLevel::High
        } else if score > MEDIUM_RISK_FLOOR {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// What the analyst should do with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriageDecision {
    ImmediateAlert,
    LikelyPass,
}

impl TriageDecision {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            TriageDecision::ImmediateAlert
        } else {
            TriageDecision::LikelyPass
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriageDecision::ImmediateAlert => "Immediate Alert",
            TriageDecision::LikelyPass => "Likely Pass",
        }
    }
}

/// Status band for an individual base model score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Normal,
    Watch,
    Alert,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            ScoreBand::Alert
        } else if score > 0.4 {
            ScoreBand::Watch
        } else {
            ScoreBand::Normal
        }
    }
}
