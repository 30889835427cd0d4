// src/metrics.rs
use anyhow::{anyhow, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once per process) and expose the
    /// configured fetch timeout.
    pub fn init(timeout_ms: u64) -> Result<Self> {
        static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();
        let handle = HANDLE
            .get_or_try_init(|| {
                PrometheusBuilder::new()
                    .install_recorder()
                    .map_err(|e| anyhow!("prometheus: install recorder: {e}"))
            })?
            .clone();

        ensure_metrics_described();
        gauge!("dashboard_fetch_timeout_ms").set(timeout_ms as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "dashboard_source_fetch_total",
            "Source client fetches by source and outcome."
        );
        describe_histogram!(
            "dashboard_source_fetch_ms",
            "Source client fetch + parse time in milliseconds."
        );
        describe_counter!(
            "dashboard_reconcile_fallback_total",
            "Loads that fell back to the static view model."
        );
        describe_counter!("dashboard_loads_total", "Completed reconciler loads.");
        describe_gauge!(
            "dashboard_last_load_ts",
            "Unix ts when the reconciler last completed."
        );
        describe_gauge!(
            "dashboard_fetch_timeout_ms",
            "Configured per-request source timeout."
        );
    });
}
