// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod reconcile;
pub mod sources;
pub mod store;
pub mod summary;
pub mod view_model;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::DashboardError;
pub use crate::reconcile::{LoadOutcome, Reconciler};
pub use crate::store::{DashboardSnapshot, LoadState, ViewModelStore};
pub use crate::view_model::{Tab, ViewModel};

use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::DashboardConfig;
use crate::sources::Sources;

/// Install a tracing subscriber unless the host already did.
///
/// `RUST_LOG` wins; otherwise `career_dashboard=info,warn`.
/// `DASHBOARD_LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("career_dashboard=info,warn"));

    let json = std::env::var("DASHBOARD_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

fn debug_routes_enabled() -> bool {
    std::env::var("DEBUG_ROUTES").ok().as_deref() == Some("1")
}

/// Build the full application: config, live sources, store activation, router.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = DashboardConfig::load_default()?;
    match cfg.api_key_fingerprint() {
        Some(fp) => info!(key_fp = %fp, timeout_ms = cfg.timeout_ms, "dashboard config loaded"),
        None => warn!(
            timeout_ms = cfg.timeout_ms,
            "no data.gov.in API key configured; sources will likely fall back to defaults"
        ),
    }

    // Recorder goes in before the first fetch so no series are lost.
    let exporter = if debug_routes_enabled() {
        Some(crate::metrics::Metrics::init(cfg.timeout_ms)?)
    } else {
        None
    };

    let sources = Sources::from_config(&cfg)?;
    let state = AppState::new(Reconciler::new(sources));
    state.activate();

    let mut router = api::router(state);
    if let Some(m) = exporter {
        router = router.merge(m.router());
    }
    Ok(router)
}
