//! Type definitions for the fraud dashboard

pub mod risk;
pub mod transaction;

pub use risk::{RiskLevel, ScoreBand, TriageDecision};
pub use transaction::{BaseModel, FeatureValue, ModelScores, TransactionRecord};
