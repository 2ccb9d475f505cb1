//! Hybrid Fraud Dashboard - Main Entry Point
//!
//! Generates the session's synthetic transactions, computes the dashboard
//! views for the configured selectors and writes them to stdout as JSON.

use anyhow::{Context, Result};
use chrono::Utc;
use hybrid_fraud_dashboard::{
    config::{AppConfig, LoggingConfig},
    generator::RecordGenerator,
    state::DashboardState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tracing::info;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("hybrid_fraud_dashboard={}", logging.level)
            .parse()
            .context("Invalid log level")?,
    );

    // Logs go to stderr so stdout carries only the views
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Format is validated at load: "json" or "pretty"
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_path(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => AppConfig::load()?,
    };

    init_logging(&config.logging)?;
    info!("Starting Hybrid Fraud Dashboard");
    info!(
        count = config.generator.count,
        seed = ?config.generator.seed,
        threshold = config.dashboard.threshold,
        range = %config.dashboard.date_range,
        "Configuration loaded successfully"
    );

    let now = Utc::now();
    let mut generator = RecordGenerator::from_config(&config.generator);
    let records = generator.generate(config.generator.count, now);

    let state = DashboardState::from_config(&config.dashboard);
    let mut gauge_rng = match config.generator.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };
    let views = state.views(&records, now, &mut gauge_rng);

    info!(
        total = views.summary.total,
        flagged = views.summary.flagged_count,
        fraud_rate = format!("{:.2}%", views.summary.fraud_rate_percent),
        queue_load = format!("{:.0}%", views.summary.queue_load_percent),
        range = views.date_range.label(),
        "Overview computed"
    );
    if let Some(detail) = &views.detail {
        info!(
            id = %detail.record.id,
            final_score = detail.record.final_score,
            agreement = detail.signals.agreement.label(),
            "Selected transaction"
        );
    }
    views.performance.print_summary();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &views).context("Failed to serialize views")?;
    writeln!(out)?;

    Ok(())
}
