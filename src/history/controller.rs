//! Access History Controller
//!
//! Owns the access history screen state. Screens observe it through a
//! `watch` channel; refreshes are tagged with a generation so a slow,
//! superseded fetch can never overwrite a newer result.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::history::entry::AccessLogEntry;
use crate::history::filter::{classify, AccessFilter};
use crate::history::format::DisplayRow;
use crate::history::source::HistorySource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    pub entries: Vec<AccessLogEntry>,
    pub filter: AccessFilter,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Outcome of a single `refresh` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    Failed,
    /// A newer refresh started before this one completed.
    Superseded,
}

pub struct AccessHistoryController {
    source: Arc<dyn HistorySource>,
    generation: AtomicU64,
    state: watch::Sender<HistoryState>,
}

impl AccessHistoryController {
    pub fn new(source: Arc<dyn HistorySource>) -> Self {
        let (state, _) = watch::channel(HistoryState::default());
        Self {
            source,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<HistoryState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> HistoryState {
        self.state.borrow().clone()
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
        });
        debug!("Access history refresh #{} started", generation);

        let result = self.source.fetch().await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Access history refresh #{} superseded, dropping result", generation);
            return RefreshOutcome::Superseded;
        }

        match result {
            Ok(entries) => {
                let count = entries.len();
                self.state.send_modify(|state| {
                    state.entries = entries;
                    state.is_loading = false;
                    state.error_message = None;
                });
                info!("Loaded {} access history entries", count);
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                error!("Failed to refresh access history: {}", e);
                let message = e.user_message();
                self.state.send_modify(|state| {
                    state.entries.clear();
                    state.is_loading = false;
                    state.error_message = Some(message);
                });
                RefreshOutcome::Failed
            }
        }
    }

    /// Refresh, then return the state once no refresh is in flight.
    ///
    /// A superseded call waits for the newer refresh to settle instead of
    /// handing back a half-loaded state.
    pub async fn refresh_and_wait(&self) -> HistoryState {
        let mut rx = self.subscribe();
        if self.refresh().await != RefreshOutcome::Superseded {
            return self.snapshot();
        }

        let state = match rx.wait_for(|state| !state.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        state
    }

    pub fn set_filter(&self, filter: AccessFilter) {
        self.state.send_if_modified(|state| {
            if state.filter == filter {
                return false;
            }
            state.filter = filter;
            true
        });
    }

    pub fn visible_entries(&self) -> Vec<AccessLogEntry> {
        let state = self.state.borrow();
        classify(&state.entries, state.filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn visible_rows(&self, now: DateTime<Utc>) -> Vec<DisplayRow> {
        let state = self.state.borrow();
        classify(&state.entries, state.filter)
            .into_iter()
            .map(|entry| DisplayRow::from_entry(entry, now))
            .collect()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().error_message.clone()
    }
}

impl std::fmt::Debug for AccessHistoryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessHistoryController")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
