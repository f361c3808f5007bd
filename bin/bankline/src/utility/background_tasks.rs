use bankline_core::AppState;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

const PENDING_SCAN_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub fn spawn_background_tasks(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("Starting hourly pending-queue monitor");
        monitor_pending_queue(state).await;
    });

    info!("Background monitors spawned");
}

/// Counts gated transfers and loan applications that have waited longer
/// than `PENDING_ALERT_HOURS` and warns about them. Never mutates state.
async fn monitor_pending_queue(state: Arc<AppState>) {
    let mut interval = interval(PENDING_SCAN_INTERVAL);
    interval.tick().await;

    loop {
        interval.tick().await;
        scan_pending_queue(&state);
    }
}

pub fn scan_pending_queue(state: &AppState) -> usize {
    let hours = state.config.pending_alert_hours;
    let Some(cutoff) =
        ChronoDuration::try_hours(hours).and_then(|window| Utc::now().checked_sub_signed(window))
    else {
        error!(hours, "Pending alert window is out of range, skipping scan");
        return 0;
    };

    let scanned = state
        .store
        .run(|tx| Ok((tx.pending_entries()?, tx.pending_loans()?)));

    let (entries, loans) = match scanned {
        Ok(found) => found,
        Err(e) => {
            error!("Pending-queue scan failed: {}", e);
            return 0;
        }
    };

    let stale_entries = entries.iter().filter(|e| e.created_at < cutoff).count();
    let stale_loans = loans.iter().filter(|l| l.created_at < cutoff).count();

    match stale_entries + stale_loans {
        0 => debug!(
            pending_transfers = entries.len(),
            pending_loans = loans.len(),
            "Pending queue within alert window"
        ),
        n => warn!(
            stale_transfers = stale_entries,
            stale_loans,
            hours = state.config.pending_alert_hours,
            "{} pending items are waiting longer than the alert window",
            n
        ),
    }

    stale_entries + stale_loans
}
