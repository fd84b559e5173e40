use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings created.
pub const BOOKINGS_CREATED_TOTAL: &str = "bookable_bookings_created_total";

/// Counter: creations that lost to an existing confirmed booking.
pub const BOOKING_CONFLICTS_TOTAL: &str = "bookable_booking_conflicts_total";

/// Counter: creations rejected by validation or policy.
pub const BOOKINGS_REJECTED_TOTAL: &str = "bookable_bookings_rejected_total";

/// Counter: status transitions applied (cancel, complete, no-show).
pub const BOOKING_TRANSITIONS_TOTAL: &str = "bookable_booking_transitions_total";

/// Histogram: slot query latency in seconds.
pub const SLOT_QUERY_DURATION_SECONDS: &str = "bookable_slot_query_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: entries in the per-owner lock table.
pub const OWNER_LOCKS_ACTIVE: &str = "bookable_owner_locks_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
