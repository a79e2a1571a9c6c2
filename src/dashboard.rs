//! Dashboard controller
//!
//! Fetches transactions for the current session, rebuilds the view-model and
//! publishes the resulting [`DashboardState`] to watchers.
//!
//! Fetches may overlap (a refresh event can arrive while a previous fetch is
//! still in flight). Each refresh takes a request id when it starts, and a
//! result is applied only if no later-started request has already been
//! applied. A slow, older response can therefore never overwrite fresher data.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, watch};

use crate::client::TransactionSource;
use crate::refresh::{next_refresh, RefreshEvent};
use crate::session::{SessionContext, FALLBACK_USER_NAME};
use crate::view_model::{DashboardViewModel, ViewModelBuilder};

/// What the presentation layer renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardState {
    pub view_model: DashboardViewModel,
    pub user_name: String,
    /// True while at least one fetch is in flight
    pub loading: bool,
    /// Set when the applied fetch failed; the view-model is then zero-valued
    pub error: Option<String>,
    /// Id of the request whose result is shown, 0 before the first one
    pub request_id: u64,
}

/// Result of a single [`Dashboard::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response was applied
    Applied { request_id: u64 },
    /// A later request had already been applied; the response was discarded
    Stale { request_id: u64 },
}

pub struct Dashboard {
    source: Arc<dyn TransactionSource>,
    session: Arc<SessionContext>,
    builder: ViewModelBuilder,
    next_request: AtomicU64,
    in_flight: AtomicUsize,
    state: watch::Sender<DashboardState>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        session: Arc<SessionContext>,
        builder: ViewModelBuilder,
    ) -> Self {
        let initial = DashboardState {
            view_model: builder.empty(Utc::now()),
            user_name: session.snapshot().display_name(),
            loading: false,
            error: None,
            request_id: 0,
        };
        let (state, _rx) = watch::channel(initial);

        Self {
            source,
            session,
            builder,
            next_request: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified whenever the state changes
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Fetch, rebuild and publish.
    ///
    /// Fetch failures never escape: they produce the zero view-model with the
    /// error message attached.
    pub async fn refresh(&self) -> RefreshOutcome {
        let request_id = self.next_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| state.loading = true);

        let session = self.session.snapshot();
        tracing::debug!(request_id, "Fetching transactions");

        let (view_model, error) = match self.source.fetch_transactions(&session).await {
            Ok(transactions) => {
                tracing::debug!(request_id, transactions = transactions.len(), "Fetch completed");
                (self.builder.build(&transactions, Utc::now()), None)
            }
            Err(e) => {
                tracing::warn!(request_id, error = %e, "No data available");
                (self.builder.empty(Utc::now()), Some(e.to_string()))
            }
        };

        let still_loading = self.in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        let mut applied = false;

        self.state.send_if_modified(|state| {
            if request_id <= state.request_id {
                let changed = state.loading != still_loading;
                state.loading = still_loading;
                return changed;
            }

            *state = DashboardState {
                view_model,
                user_name: session.display_name(),
                loading: still_loading,
                error,
                request_id,
            };
            applied = true;
            true
        });

        if applied {
            RefreshOutcome::Applied { request_id }
        } else {
            tracing::debug!(request_id, "Discarding stale response");
            RefreshOutcome::Stale { request_id }
        }
    }

    /// Refresh once, then again on every refresh event and session change.
    ///
    /// Each refresh runs as its own task, so overlapping fetches are possible
    /// and resolved by the stale-response guard. Returns when the refresh
    /// hub is dropped.
    pub async fn run(self: Arc<Self>, mut events: broadcast::Receiver<RefreshEvent>) {
        let mut session_rx = self.session.subscribe();
        self.spawn_refresh();

        loop {
            tokio::select! {
                received = next_refresh(&mut events) => {
                    if !received {
                        break;
                    }
                    self.spawn_refresh();
                }
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    tracing::info!("Session changed, refreshing dashboard");
                    self.spawn_refresh();
                }
            }
        }

        tracing::info!("Refresh hub closed, dashboard stopped listening");
    }

    fn spawn_refresh(self: &Arc<Self>) {
        let dashboard = Arc::clone(self);
        tokio::spawn(async move {
            dashboard.refresh().await;
        });
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("builder", &self.builder)
            .field("requests", &self.next_request.load(Ordering::SeqCst))
            .finish()
    }
}

impl DashboardState {
    /// True before any fetch has been applied
    pub fn is_initial(&self) -> bool {
        self.request_id == 0
    }

    /// Greeting shown above the cards
    pub fn greeting(&self) -> String {
        let name = if self.user_name.is_empty() {
            FALLBACK_USER_NAME
        } else {
            self.user_name.as_str()
        };
        format!("Olá, {}!", name)
    }
}
