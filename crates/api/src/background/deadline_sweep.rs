//! Periodic expiry of pending matches whose response deadline has passed.
//!
//! Each tick calls [`MatchingEngine::expire_overdue`], which marks overdue
//! matches `expired` and proposes the mentee's next candidate.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::engine::MatchingEngine;

/// Run the sweep loop until `cancel` is triggered.
///
/// The first tick fires immediately, so matches that expired while the
/// server was down are handled at startup.
pub async fn run(engine: MatchingEngine, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Match deadline sweeper started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Match deadline sweeper stopping");
                break;
            }
            _ = ticker.tick() => {
                match engine.expire_overdue(Utc::now()).await {
                    Ok(report) if report.expired > 0 => {
                        tracing::info!(
                            expired = report.expired,
                            reproposed = report.reproposed,
                            "Deadline sweep: expired overdue matches"
                        );
                    }
                    Ok(_) => tracing::debug!("Deadline sweep: nothing overdue"),
                    Err(e) => tracing::error!(error = %e, "Deadline sweep failed"),
                }
            }
        }
    }
}
