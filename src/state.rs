//! Dashboard session state and the views derived from it.
//!
//! The state is plain data owned by the caller. Every selector change is
//! followed by a call to [`DashboardState::views`], which recomputes the
//! whole view set from the read-only record collection.

use crate::config::DashboardConfig;
use crate::features::{global_importance, GlobalFeatureImportance};
use crate::models::signals::{self, SignalReport};
use crate::performance::PerformanceReport;
use crate::types::risk::{RiskLevel, TriageDecision};
use crate::types::transaction::TransactionRecord;
use crate::view::{
    self, Attribution, DateRange, ProjectedSummary, ScoreBucket, SortDirection, Summary, TrendPoint,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Threshold used when none (or an unusable one) is supplied
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Default analyst capacity per trend bucket
pub const DEFAULT_ANALYST_CAPACITY: u32 = 18;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Overview,
    Explorer,
    Signals,
    Shap,
    Performance,
    Settings,
}

/// Explicit session state passed into view computation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub active_tab: Tab,
    threshold: f64,
    pub search_query: String,
    pub selected_id: Option<String>,
    pub date_range: DateRange,
    pub sort_direction: SortDirection,
    pub analyst_capacity: u32,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Overview,
            threshold: DEFAULT_THRESHOLD,
            search_query: String::new(),
            selected_id: None,
            date_range: DateRange::Last24h,
            sort_direction: SortDirection::Descending,
            analyst_capacity: DEFAULT_ANALYST_CAPACITY,
        }
    }
}

impl DashboardState {
    /// Initial state from configuration
    pub fn from_config(config: &DashboardConfig) -> Self {
        let mut state = Self {
            search_query: config.search_query.clone(),
            date_range: DateRange::from_label(&config.date_range),
            analyst_capacity: config.analyst_capacity,
            ..Self::default()
        };
        state.set_threshold(config.threshold);
        state
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Set the alert threshold, clamped into [0, 1].
    ///
    /// NaN resets to the default. Returns the value actually stored.
    pub fn set_threshold(&mut self, threshold: f64) -> f64 {
        let stored = if threshold.is_nan() {
            DEFAULT_THRESHOLD
        } else {
            threshold.clamp(0.0, 1.0)
        };
        if stored != threshold {
            warn!(requested = threshold, stored = stored, "Alert threshold out of range, clamped");
        }
        self.threshold = stored;
        stored
    }

    /// Select a date range by its selector label
    pub fn set_date_range_label(&mut self, label: &str) {
        self.date_range = DateRange::from_label(label);
        if self.date_range.label() != label {
            debug!(label = label, "Unknown date range label, using default window");
        }
    }

    pub fn toggle_sort(&mut self) {
        self.sort_direction = self.sort_direction.reversed();
    }

    /// Compute every view for the current state
    pub fn views<'a, R: Rng + ?Sized>(
        &self,
        records: &'a [TransactionRecord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> DashboardViews<'a> {
        let in_range = view::filter_by_range(records, self.date_range, now);
        let searched = view::filter_by_search(in_range.iter().copied(), &self.search_query);
        let ranked = view::rank_by_score(searched.iter().copied(), self.sort_direction);

        let summary = view::compute_summary(in_range.iter().copied(), self.threshold, rng);
        let trend = view::alert_trend(
            in_range.iter().copied(),
            self.date_range,
            self.threshold,
            self.analyst_capacity,
            now,
        );
        let distribution = view::score_distribution(in_range.iter().copied(), self.threshold);

        let rows = ranked
            .iter()
            .map(|&record| ExplorerRow {
                record,
                risk_level: RiskLevel::from_score(record.final_score, self.threshold),
                decision: TriageDecision::from_score(record.final_score, self.threshold),
            })
            .collect();

        let selected = view::select_record(&in_range, self.selected_id.as_deref());
        let detail = selected.map(|record| RecordDetail {
            record,
            signals: signals::analyze(&record.model_scores),
            attributions: view::local_attributions(record),
            decision: TriageDecision::from_score(record.final_score, self.threshold),
        });

        let performance = PerformanceReport::evaluate(&in_range, self.threshold);

        debug!(
            range = self.date_range.label(),
            threshold = self.threshold,
            in_range = in_range.len(),
            search_hits = searched.len(),
            flagged = summary.flagged_count,
            "Dashboard views recomputed"
        );

        DashboardViews {
            date_range: self.date_range,
            threshold: self.threshold,
            projected: summary.projected(self.date_range),
            summary,
            trend,
            distribution,
            global_importance: global_importance(),
            rows,
            detail,
            performance,
        }
    }
}

/// One row of the risk-ranked explorer table
#[derive(Debug, Clone, Serialize)]
pub struct ExplorerRow<'a> {
    pub record: &'a TransactionRecord,
    pub risk_level: RiskLevel,
    pub decision: TriageDecision,
}

/// Signals and explanation for the selected record
#[derive(Debug, Clone, Serialize)]
pub struct RecordDetail<'a> {
    pub record: &'a TransactionRecord,
    pub signals: SignalReport,
    pub attributions: Vec<Attribution>,
    pub decision: TriageDecision,
}

/// Everything the presentation layer renders for one state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews<'a> {
    pub date_range: DateRange,
    pub threshold: f64,
    pub summary: Summary,
    pub projected: ProjectedSummary,
    pub trend: Vec<TrendPoint>,
    pub distribution: Vec<ScoreBucket>,
    pub global_importance: Vec<GlobalFeatureImportance>,
    pub rows: Vec<ExplorerRow<'a>>,
    pub detail: Option<RecordDetail<'a>>,
    pub performance: PerformanceReport,
}
