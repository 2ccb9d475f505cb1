//! Derived views over the generated transaction collection.
//!
//! Every function here is a pure transformation of borrowed records plus
//! explicit selector parameters. Filters return subsequences of references
//! in input order so that they compose without cloning.

use crate::features::EngineeredFeature;
use crate::types::transaction::TransactionRecord;
use chrono::{DateTime, Duration, DurationRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Time window selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[default]
    #[serde(rename = "Last 24h")]
    Last24h,
    #[serde(rename = "Last 7d")]
    Last7d,
    #[serde(rename = "Last 30d")]
    Last30d,
}

impl DateRange {
    /// Parse a selector label; anything unrecognised is the 24h window.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Last 7d" => DateRange::Last7d,
            "Last 30d" => DateRange::Last30d,
            _ => DateRange::Last24h,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Last24h => "Last 24h",
            DateRange::Last7d => "Last 7d",
            DateRange::Last30d => "Last 30d",
        }
    }

    /// Length of the window ending at now
    pub fn window(self) -> Duration {
        match self {
            DateRange::Last24h => Duration::hours(24),
            DateRange::Last7d => Duration::days(7),
            DateRange::Last30d => Duration::days(30),
        }
    }

    /// Scale factor applied to KPI volumes when projecting to the range
    pub fn volume_multiplier(self) -> u64 {
        match self {
            DateRange::Last24h => 1,
            DateRange::Last7d => 15,
            DateRange::Last30d => 60,
        }
    }

    /// Trend resolution: hourly for a day, daily otherwise
    fn trend_buckets(self) -> (usize, Duration) {
        match self {
            DateRange::Last24h => (24, Duration::hours(1)),
            DateRange::Last7d => (7, Duration::days(1)),
            DateRange::Last30d => (30, Duration::days(1)),
        }
    }
}

/// Sort order for the risk-ranked table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Keep records whose timestamp lies within the range window ending at `now`.
pub fn filter_by_range<'a, I>(records: I, range: DateRange, now: DateTime<Utc>) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let window = range.window();
    records
        .into_iter()
        .filter(|r| now.signed_duration_since(r.timestamp) <= window)
        .collect()
}

/// Case-insensitive match on the id, or literal match on the card id.
///
/// An empty query matches everything.
pub fn filter_by_search<'a, I>(records: I, query: &str) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.id.to_lowercase().contains(&needle) || r.card_id.contains(query))
        .collect()
}

/// Stable sort by stacked score. Equal scores keep their input order.
pub fn rank_by_score<'a, I>(records: I, direction: SortDirection) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut ranked: Vec<&TransactionRecord> = records.into_iter().collect();
    match direction {
        SortDirection::Ascending => ranked.sort_by(|a, b| a.final_score.total_cmp(&b.final_score)),
        SortDirection::Descending => ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score)),
    }
    ranked
}

/// Headline KPIs for a set of records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub flagged_count: usize,
    pub fraud_rate_percent: f64,
    /// Illustrative analyst queue gauge, not backed by any queue
    pub queue_load_percent: f64,
}

/// KPI volumes scaled to the selected range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedSummary {
    pub total: u64,
    pub flagged_count: u64,
    pub fraud_rate_percent: f64,
    pub queue_load_percent: f64,
}

impl Summary {
    pub fn projected(&self, range: DateRange) -> ProjectedSummary {
        let multiplier = range.volume_multiplier();
        ProjectedSummary {
            total: self.total as u64 * multiplier,
            flagged_count: self.flagged_count as u64 * multiplier,
            fraud_rate_percent: self.fraud_rate_percent,
            queue_load_percent: self.queue_load_percent,
        }
    }
}

/// Count flagged records and derive the rate.
///
/// Thresholds outside [0, 1] are accepted and flag all or nothing.
pub fn compute_summary<'a, I, R>(records: I, threshold: f64, rng: &mut R) -> Summary
where
    I: IntoIterator<Item = &'a TransactionRecord>,
    R: Rng + ?Sized,
{
    let (total, flagged_count) = records.into_iter().fold((0usize, 0usize), |(total, flagged), r| {
        (total + 1, flagged + usize::from(r.is_flagged(threshold)))
    });

    let fraud_rate_percent = if total > 0 {
        flagged_count as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let queue_load_percent = (60.0 + rng.gen::<f64>() * 30.0).min(95.0).round();

    Summary {
        total,
        flagged_count,
        fraud_rate_percent,
        queue_load_percent,
    }
}

/// The record the detail panes should show: the selected one if it is in
/// the set, otherwise the first record.
pub fn select_record<'a>(
    records: &[&'a TransactionRecord],
    selected_id: Option<&str>,
) -> Option<&'a TransactionRecord> {
    selected_id
        .and_then(|id| records.iter().find(|r| r.id == id))
        .or_else(|| records.first())
        .copied()
}

/// One point of the alert trend line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub time: String,
    pub bucket_start: DateTime<Utc>,
    pub alerts: usize,
    pub capacity: u32,
}

/// Flagged records per hour (24h) or per day (7d/30d), oldest bucket first.
///
/// The last bucket ends at `now`. Records are bucketed over the same
/// window [`filter_by_range`] keeps, so the bucket total equals the
/// flagged count in range.
pub fn alert_trend<'a, I>(
    records: I,
    range: DateRange,
    threshold: f64,
    analyst_capacity: u32,
    now: DateTime<Utc>,
) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let (points, unit) = range.trend_buckets();
    let window = range.window();
    let unit_ms = unit.num_milliseconds();
    let mut counts = vec![0usize; points];

    for record in records.into_iter().filter(|r| r.is_flagged(threshold)) {
        let age = now.signed_duration_since(record.timestamp);
        if age > window {
            continue;
        }
        // A record exactly one window old belongs to the oldest bucket
        let units_ago = ((age.num_milliseconds().max(0) / unit_ms) as usize).min(points - 1);
        counts[points - 1 - units_ago] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, alerts)| {
            let bucket_start = now - unit * (points - i) as i32;
            let time = if unit == Duration::hours(1) {
                bucket_start
                    .duration_trunc(Duration::hours(1))
                    .unwrap_or(bucket_start)
                    .format("%-H:00")
                    .to_string()
            } else {
                bucket_start.format("%b %-d").to_string()
            };
            TrendPoint {
                time,
                bucket_start,
                alerts,
                capacity: analyst_capacity,
            }
        })
        .collect()
}

/// Static level shown for a score bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketLevel {
    Low,
    Medium,
    High,
}

/// One bar of the score histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    pub range: String,
    pub count: usize,
    pub level: BucketLevel,
    pub above_threshold: bool,
}

const SCORE_BUCKETS: usize = 10;

/// Histogram of stacked scores over ten equal-width buckets
pub fn score_distribution<'a, I>(records: I, threshold: f64) -> Vec<ScoreBucket>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut counts = [0usize; SCORE_BUCKETS];
    for record in records {
        let bucket = ((record.final_score * 10.0).max(0.0) as usize).min(SCORE_BUCKETS - 1);
        counts[bucket] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| ScoreBucket {
            range: format!("{:.1}-{:.1}", i as f64 / 10.0, (i + 1) as f64 / 10.0),
            count,
            level: match i {
                0..=4 => BucketLevel::Low,
                5 | 6 => BucketLevel::Medium,
                _ => BucketLevel::High,
            },
            above_threshold: i as f64 >= threshold * 10.0,
        })
        .collect()
}

/// One feature's local contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub feature: EngineeredFeature,
    pub value: f64,
}

/// Local attributions, largest magnitude first
pub fn local_attributions(record: &TransactionRecord) -> Vec<Attribution> {
    let mut attributions: Vec<Attribution> = record
        .attributions
        .iter()
        .map(|(&feature, &value)| Attribution { feature, value })
        .collect();
    attributions.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
    attributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::RecordGenerator;
    use crate::types::transaction::fixtures::record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_date_range_labels() {
        assert_eq!(DateRange::from_label("Last 7d"), DateRange::Last7d);
        assert_eq!(DateRange::from_label("Last 30d"), DateRange::Last30d);
        assert_eq!(DateRange::from_label("Last 24h"), DateRange::Last24h);
        assert_eq!(DateRange::from_label("Last year"), DateRange::Last24h);
        assert_eq!(DateRange::from_label(""), DateRange::Last24h);
        assert_eq!(serde_json::to_string(&DateRange::Last7d).unwrap(), "\"Last 7d\"");
    }

    #[test]
    fn test_filter_by_range_seven_days() {
        let records = vec![
            record(0, 0.4, Duration::days(10), now()),
            record(1, 0.4, Duration::days(1), now()),
        ];

        let kept = filter_by_range(&records, DateRange::Last7d, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "TXN-100001");
    }

    #[test]
    fn test_filter_by_range_idempotent() {
        let records = RecordGenerator::seeded(4).generate(200, now());
        for range in [DateRange::Last24h, DateRange::Last7d, DateRange::Last30d] {
            let once = filter_by_range(&records, range, now());
            let twice = filter_by_range(once.iter().copied(), range, now());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_filter_by_search() {
        let records = RecordGenerator::seeded(2).generate(200, now());

        let hits = filter_by_search(&records, "100042");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "TXN-100042");

        let lower = filter_by_search(&records, "txn-100042");
        assert_eq!(lower, hits);

        assert_eq!(filter_by_search(&records, "").len(), records.len());
    }

    #[test]
    fn test_filter_by_search_card_id() {
        let mut records = vec![record(0, 0.1, Duration::hours(1), now())];
        records[0].card_id = "4821".to_string();

        assert_eq!(filter_by_search(&records, "482").len(), 1);
        assert!(filter_by_search(&records, "999").is_empty());
    }

    #[test]
    fn test_compute_summary_scenario() {
        let records = vec![
            record(0, 0.2, Duration::hours(1), now()),
            record(1, 0.85, Duration::hours(2), now()),
            record(2, 0.6, Duration::hours(3), now()),
        ];
        let mut rng = StdRng::seed_from_u64(1);

        let summary = compute_summary(&records, 0.5, &mut rng);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.flagged_count, 2);
        assert!((summary.fraud_rate_percent - 66.67).abs() < 0.01);
        assert!((60.0..=95.0).contains(&summary.queue_load_percent));
    }

    #[test]
    fn test_compute_summary_empty() {
        let records: Vec<TransactionRecord> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);

        let summary = compute_summary(&records, 0.5, &mut rng);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.flagged_count, 0);
        assert_eq!(summary.fraud_rate_percent, 0.0);
    }

    #[test]
    fn test_compute_summary_degenerate_thresholds() {
        let records = RecordGenerator::seeded(9).generate(50, now());
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(compute_summary(&records, -1.0, &mut rng).fraud_rate_percent, 100.0);
        assert_eq!(compute_summary(&records, 2.0, &mut rng).flagged_count, 0);
    }

    #[test]
    fn test_projected_summary() {
        let summary = Summary {
            total: 10,
            flagged_count: 3,
            fraud_rate_percent: 30.0,
            queue_load_percent: 70.0,
        };
        assert_eq!(summary.projected(DateRange::Last24h).total, 10);
        assert_eq!(summary.projected(DateRange::Last7d).flagged_count, 45);
        assert_eq!(summary.projected(DateRange::Last30d).total, 600);
    }

    #[test]
    fn test_rank_by_score_stable() {
        let records = vec![
            record(0, 0.5, Duration::hours(1), now()),
            record(1, 0.9, Duration::hours(1), now()),
            record(2, 0.5, Duration::hours(1), now()),
            record(3, 0.1, Duration::hours(1), now()),
            record(4, 0.5, Duration::hours(1), now()),
        ];

        let desc = rank_by_score(&records, SortDirection::Descending);
        let ids: Vec<&str> = desc.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["TXN-100001", "TXN-100000", "TXN-100002", "TXN-100004", "TXN-100003"]);

        let asc = rank_by_score(&records, SortDirection::Ascending);
        let ids: Vec<&str> = asc.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["TXN-100003", "TXN-100000", "TXN-100002", "TXN-100004", "TXN-100001"]);
    }

    #[test]
    fn test_rank_reversed_twice_keeps_tie_order() {
        let records = vec![
            record(0, 0.3, Duration::hours(1), now()),
            record(1, 0.3, Duration::hours(1), now()),
            record(2, 0.7, Duration::hours(1), now()),
        ];
        let direction = SortDirection::Descending;

        let first = rank_by_score(&records, direction);
        let flipped = rank_by_score(first.iter().copied(), direction.reversed());
        let back = rank_by_score(flipped.iter().copied(), direction.reversed().reversed());
        assert_eq!(first, back);
    }

    #[test]
    fn test_select_record() {
        let records = vec![
            record(0, 0.3, Duration::hours(1), now()),
            record(1, 0.6, Duration::hours(1), now()),
        ];
        let refs: Vec<&TransactionRecord> = records.iter().collect();

        assert_eq!(select_record(&refs, Some("TXN-100001")).unwrap().id, "TXN-100001");
        assert_eq!(select_record(&refs, Some("TXN-999999")).unwrap().id, "TXN-100000");
        assert_eq!(select_record(&refs, None).unwrap().id, "TXN-100000");
        assert!(select_record(&[], Some("TXN-100001")).is_none());
    }

    #[test]
    fn test_alert_trend_hourly() {
        let records = vec![
            record(0, 0.9, Duration::minutes(30), now()),
            record(1, 0.9, Duration::minutes(45), now()),
            record(2, 0.9, Duration::minutes(150), now()),
            record(3, 0.1, Duration::minutes(10), now()),
            record(4, 0.9, Duration::hours(30), now()),
        ];

        let trend = alert_trend(&records, DateRange::Last24h, 0.5, 18, now());
        assert_eq!(trend.len(), 24);
        assert_eq!(trend[23].alerts, 2);
        assert_eq!(trend[21].alerts, 1);
        assert_eq!(trend.iter().map(|p| p.alerts).sum::<usize>(), 3);
        assert!(trend.iter().all(|p| p.capacity == 18));
        assert_eq!(trend[23].time, "11:00");
        assert!(trend.windows(2).all(|w| w[0].bucket_start < w[1].bucket_start));
    }

    #[test]
    fn test_alert_trend_counts_record_at_window_edge() {
        let records = vec![
            record(0, 0.9, Duration::hours(24), now()),
            record(1, 0.9, Duration::hours(24) + Duration::milliseconds(1), now()),
        ];

        let in_range = filter_by_range(&records, DateRange::Last24h, now());
        let trend = alert_trend(&records, DateRange::Last24h, 0.5, 18, now());
        let alerts: usize = trend.iter().map(|p| p.alerts).sum();

        assert_eq!(in_range.len(), 1);
        assert_eq!(alerts, in_range.len());
        assert_eq!(trend[0].alerts, 1);

        let weekly = vec![record(0, 0.9, Duration::days(7), now())];
        let trend = alert_trend(&weekly, DateRange::Last7d, 0.5, 18, now());
        assert_eq!(trend[0].alerts, 1);
    }

    #[test]
    fn test_alert_trend_hour_label_not_padded() {
        let morning = DateTime::parse_from_rfc3339("2026-03-01T10:15:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let records: Vec<TransactionRecord> = Vec::new();
        let trend = alert_trend(&records, DateRange::Last24h, 0.5, 18, morning);
        assert_eq!(trend[23].time, "9:00");
        assert_eq!(trend[13].time, "23:00");
    }

    #[test]
    fn test_alert_trend_daily() {
        let records = RecordGenerator::seeded(6).generate(200, now());
        let trend = alert_trend(&records, DateRange::Last7d, 0.5, 18, now());
        assert_eq!(trend.len(), 7);

        let in_range = filter_by_range(&records, DateRange::Last7d, now());
        let flagged = in_range.iter().filter(|r| r.is_flagged(0.5)).count();
        assert_eq!(trend.iter().map(|p| p.alerts).sum::<usize>(), flagged);
        assert_eq!(trend[6].time, "Feb 28");

        assert_eq!(alert_trend(&records, DateRange::Last30d, 0.5, 18, now()).len(), 30);
    }

    #[test]
    fn test_score_distribution() {
        let records = RecordGenerator::seeded(13).generate(200, now());
        let buckets = score_distribution(&records, 0.5);

        assert_eq!(buckets.len(), 10);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 200);
        assert_eq!(buckets[0].range, "0.0-0.1");
        assert_eq!(buckets[9].range, "0.9-1.0");
        assert_eq!(buckets[4].level, BucketLevel::Low);
        assert_eq!(buckets[6].level, BucketLevel::Medium);
        assert_eq!(buckets[7].level, BucketLevel::High);
        assert!(!buckets[4].above_threshold);
        assert!(buckets[5].above_threshold);
    }

    #[test]
    fn test_score_distribution_top_bucket_includes_one() {
        let records = vec![record(0, 1.0, Duration::hours(1), now())];
        let buckets = score_distribution(&records, 0.5);
        assert_eq!(buckets[9].count, 1);
    }

    #[test]
    fn test_local_attributions_by_magnitude() {
        let mut r = record(0, 0.3, Duration::hours(1), now());
        r.attributions.insert(EngineeredFeature::GeoChangeFlag, -0.19);
        r.attributions.insert(EngineeredFeature::IsNightTxn, 0.05);
        r.attributions.insert(EngineeredFeature::TransLast1hCard, 0.3);

        let ranked = local_attributions(&r);
        assert_eq!(ranked.len(), 8);
        assert_eq!(ranked[0].feature, EngineeredFeature::TransLast1hCard);
        assert_eq!(ranked[1].feature, EngineeredFeature::GeoChangeFlag);
        assert_eq!(ranked[2].feature, EngineeredFeature::IsNightTxn);
    }
}
