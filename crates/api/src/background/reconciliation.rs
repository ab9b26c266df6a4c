//! Periodic repair of item counters that drifted from the purchase ledger.
//!
//! Guest claims commit together with their purchase rows, so drift comes
//! from writes made outside the purchase protocol, such as manual SQL fixes
//! or purchase rows whose status was changed by hand. Owner overrides are
//! not drift and are skipped by [`ItemRepo::find_drifted`].

use std::time::Duration;

use cradle_core::reconciliation::Reconciler;
use cradle_db::repositories::ItemRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Items touched more recently than this are left alone.
const GRACE_SECS: u64 = 60;

/// Upper bound on items repaired per tick.
const BATCH_LIMIT: i64 = 100;

/// Run the drift repair loop every `interval` until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    reconciler: Reconciler,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        grace_secs = GRACE_SECS,
        "Counter reconciliation job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Counter reconciliation job stopping");
                break;
            }
            _ = ticker.tick() => {
                match repair_drift(&pool, &reconciler, GRACE_SECS).await {
                    Ok(0) => tracing::debug!("Counter reconciliation: no drift"),
                    Ok(repaired) => {
                        tracing::info!(repaired, "Counter reconciliation: repaired items");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Counter reconciliation: scan failed");
                    }
                }
            }
        }
    }
}

/// One pass: find drifted items and reconcile each. Returns how many changed.
pub async fn repair_drift(
    pool: &PgPool,
    reconciler: &Reconciler,
    grace_secs: u64,
) -> Result<usize, sqlx::Error> {
    let ids = ItemRepo::find_drifted(pool, grace_secs, BATCH_LIMIT).await?;
    let mut repaired = 0;
    for item_id in ids {
        match reconciler.reconcile_item(item_id).await {
            Ok(outcome) if outcome.changed() => repaired += 1,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, item_id, "Counter reconciliation: item failed");
            }
        }
    }
    Ok(repaired)
}
