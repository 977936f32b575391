use std::net::SocketAddr;

// ── Selection activity ──────────────────────────────────────────

/// Counter: settled selection changes pushed to observers.
pub const SELECTION_CHANGES_TOTAL: &str = "weekstay_selection_changes_total";

/// Counter: validation failures. Labels: kind, path (immediate, debounced, drag).
pub const VALIDATION_FAILURES_TOTAL: &str = "weekstay_validation_failures_total";

/// Counter: drags whose result was rejected and cleared.
pub const DRAG_RESETS_TOTAL: &str = "weekstay_drag_resets_total";

// ── Pricing ─────────────────────────────────────────────────────

/// Counter: nightly prices resolved. Labels: source (tier, weekly, base).
pub const PRICE_RESOLUTIONS_TOTAL: &str = "weekstay_price_resolutions_total";

// ── Sessions ────────────────────────────────────────────────────

/// Gauge: live selection sessions.
pub const SESSIONS_ACTIVE: &str = "weekstay_sessions_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}

/// Register help text for every metric this crate emits.
pub fn describe() {
    metrics::describe_counter!(SELECTION_CHANGES_TOTAL, "Settled selection changes");
    metrics::describe_counter!(VALIDATION_FAILURES_TOTAL, "Rejected selections by kind and path");
    metrics::describe_counter!(DRAG_RESETS_TOTAL, "Drag selections cleared after failing validation");
    metrics::describe_counter!(PRICE_RESOLUTIONS_TOTAL, "Nightly prices resolved by rate source");
    metrics::describe_gauge!(SESSIONS_ACTIVE, "Live selection sessions");
}
