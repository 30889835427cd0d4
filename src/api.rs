// src/api.rs
//! HTTP presentation boundary.
//!
//! - `GET /health`
//! - `GET /api/dashboard?tab=...` -> `{ viewModel, isLoading, warningMessage, activeTab, headline, roadmap }`
//!   (`roadmap` only on the roadmap tab)
//! - `GET /api/tabs`

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::reconcile::Reconciler;
use crate::store::{DashboardSnapshot, ViewModelStore};
use crate::summary::{Headline, Roadmap};
use crate::view_model::Tab;

#[derive(Clone)]
pub struct AppState {
    pub store: ViewModelStore,
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(reconciler: Reconciler) -> Self {
        Self {
            store: ViewModelStore::new(),
            reconciler: Arc::new(reconciler),
        }
    }

    /// Kick off the one-shot load; repeated calls are no-ops.
    pub fn activate(&self) {
        let _ = self.store.activate(self.reconciler.clone());
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(dashboard))
        .route("/api/tabs", get(tabs))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    #[serde(default)]
    tab: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardResp {
    #[serde(flatten)]
    snapshot: DashboardSnapshot,
    active_tab: Tab,
    headline: Option<Headline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roadmap: Option<Roadmap>,
}

async fn dashboard(
    State(state): State<AppState>,
    Query(q): Query<DashboardQuery>,
) -> Json<DashboardResp> {
    // First visit activates the store if startup did not.
    state.activate();

    let snapshot = state.store.snapshot();
    let active_tab = Tab::from_query(q.tab.as_deref());
    let headline = snapshot.view_model.as_ref().map(Headline::from_view_model);
    let roadmap = match active_tab {
        Tab::Roadmap => snapshot.view_model.as_ref().map(Roadmap::from_view_model),
        _ => None,
    };
    Json(DashboardResp {
        snapshot,
        active_tab,
        headline,
        roadmap,
    })
}

async fn tabs() -> Json<Vec<&'static str>> {
    Json(Tab::ALL.iter().map(|t| t.as_str()).collect())
}
