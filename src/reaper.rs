use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::engine::Engine;
use crate::observability::OWNER_LOCKS_ACTIVE;

/// Background task that periodically drops idle entries from the
/// per-owner lock table. Held or contended locks are never touched.
pub async fn run_reaper(engine: Arc<Engine>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let before = engine.lock_table_len();
        engine.prune_locks();
        let after = engine.lock_table_len();
        if after < before {
            debug!("pruned {} idle owner locks", before - after);
        }
        metrics::gauge!(OWNER_LOCKS_ACTIVE).set(after as f64);
    }
}
