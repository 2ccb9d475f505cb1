//! Hybrid Fraud Dashboard Library
//!
//! Synthetic scored transactions and the derived views behind an analyst
//! dashboard for a hybrid (supervised + unsupervised) stacking model.

pub mod config;
pub mod features;
pub mod generator;
pub mod models;
pub mod performance;
pub mod state;
pub mod types;
pub mod view;

pub use config::AppConfig;
pub use generator::RecordGenerator;
pub use state::{DashboardState, DashboardViews};
pub use types::transaction::TransactionRecord;
pub use view::{DateRange, SortDirection, Summary};
