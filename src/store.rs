// src/store.rs
//! View-model store: NotLoaded -> Loading -> Loaded, written once.
//!
//! Backed by a `tokio::sync::watch` channel so presentation can either read
//! the current value or subscribe and re-render on change.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::error;

use crate::reconcile::{LoadOutcome, Reconciler};
use crate::view_model::ViewModel;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded {
        view_model: Arc<ViewModel>,
        warning: Option<String>,
    },
}

/// What the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub view_model: Option<ViewModel>,
    /// True until the model is loaded (including before activation).
    pub is_loading: bool,
    pub warning_message: Option<String>,
}

#[derive(Clone)]
pub struct ViewModelStore {
    tx: Arc<watch::Sender<LoadState>>,
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewModelStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LoadState::NotLoaded);
        Self { tx: Arc::new(tx) }
    }

    pub fn state(&self) -> LoadState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.tx.subscribe()
    }

    /// NotLoaded -> Loading. Returns false if activation already happened.
    pub fn begin_loading(&self) -> bool {
        self.tx.send_if_modified(|s| {
            if matches!(s, LoadState::NotLoaded) {
                *s = LoadState::Loading;
                true
            } else {
                false
            }
        })
    }

    /// Loading -> Loaded. Ignored in any other state; Loaded is terminal.
    pub fn finish(&self, outcome: LoadOutcome) -> bool {
        self.tx.send_if_modified(move |s| {
            if !matches!(s, LoadState::Loading) {
                return false;
            }
            *s = LoadState::Loaded {
                view_model: Arc::new(outcome.view_model),
                warning: outcome.warning,
            };
            true
        })
    }

    /// Start the one-shot load in the background. `None` if already activated.
    pub fn activate(&self, reconciler: Arc<Reconciler>) -> Option<JoinHandle<()>> {
        if !self.begin_loading() {
            return None;
        }
        let store = self.clone();
        Some(tokio::spawn(async move {
            let outcome = match tokio::spawn(async move { reconciler.load().await }).await {
                Ok(o) => o,
                Err(e) => {
                    error!(target: "store", error = %e, "reconciler task failed");
                    LoadOutcome::fallback()
                }
            };
            store.finish(outcome);
        }))
    }

    /// Resolves once the store reaches Loaded.
    pub async fn wait_loaded(&self) -> DashboardSnapshot {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx
            .wait_for(|s| matches!(s, LoadState::Loaded { .. }))
            .await;
        self.snapshot()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        match &*self.tx.borrow() {
            LoadState::NotLoaded | LoadState::Loading => DashboardSnapshot {
                view_model: None,
                is_loading: true,
                warning_message: None,
            },
            LoadState::Loaded {
                view_model,
                warning,
            } => DashboardSnapshot {
                view_model: Some(ViewModel::clone(view_model)),
                is_loading: false,
                warning_message: warning.clone(),
            },
        }
    }
}
