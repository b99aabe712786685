//! Reconciles the initial fetch, write-through submissions and the live feed
//! into one [`ScoreStore`].
//!
//! Every mutation goes through [`SyncController::apply`] or the single
//! `replace_all` in [`SyncController::start`], and each one republishes the
//! ranked view on a watch channel.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::leaderboard::{NewScore, ScoreEntry, ScoreStore, ranking};

use super::backend::{ScoreBackend, ScoreFeed};
use super::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Uninitialized,
    Fetching,
    Synced,
    FetchFailed,
    Closed,
}

pub struct SyncController<B> {
    backend: B,
    store: Mutex<ScoreStore>,
    state: Mutex<SyncState>,
    view: watch::Sender<Vec<ScoreEntry>>,
    feed_task: Mutex<Option<JoinHandle<()>>>,
    feed_error: Mutex<Option<String>>,
    closed: CancellationToken,
}

impl<B: ScoreBackend> SyncController<B> {
    pub fn new(backend: B) -> Arc<Self> {
        let (view, _) = watch::channel(Vec::new());
        Arc::new(Self {
            backend,
            store: Mutex::new(ScoreStore::new()),
            state: Mutex::new(SyncState::Uninitialized),
            view,
            feed_task: Mutex::new(None),
            feed_error: Mutex::new(None),
            closed: CancellationToken::new(),
        })
    }

    pub fn backend(&self) -> &B { &self.backend }

    pub fn state(&self) -> SyncState { *self.state.lock() }

    /// Message of the error that ended the live feed, if it ended.
    pub fn feed_error(&self) -> Option<String> { self.feed_error.lock().clone() }

    /// Current ranked leaderboard.
    pub fn view(&self) -> Vec<ScoreEntry> {
        ranking::rank(&self.store.lock().all())
    }

    /// Unranked snapshot of the store.
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.store.lock().all()
    }

    /// Receiver that sees the ranked view after every change.
    pub fn watch(&self) -> watch::Receiver<Vec<ScoreEntry>> {
        self.view.subscribe()
    }

    /// Load the leaderboard and open the live feed.
    ///
    /// Runs from `Uninitialized`, or from `FetchFailed` when the caller retries.
    /// In any other state it does nothing.
    pub async fn start(self: &Arc<Self>) -> Result<(), SyncError> {
        {
            let mut state = self.state.lock();
            match *state {
                SyncState::Uninitialized | SyncState::FetchFailed => *state = SyncState::Fetching,
                other => {
                    tracing::debug!(state = ?other, "start ignored");
                    return Ok(());
                }
            }
        }

        let fetched = match self.backend.fetch_all().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, "leaderboard fetch failed");
                self.transition(SyncState::Fetching, SyncState::FetchFailed);
                return Err(SyncError::Fetch(err));
            }
        };
        if self.closed.is_cancelled() {
            tracing::debug!("closed during fetch, result discarded");
            return Ok(());
        }

        {
            let mut store = self.store.lock();
            store.replace_all(fetched);
            self.view.send_replace(ranking::rank(&store.all()));
            tracing::info!(entries = store.len(), "leaderboard synced");
        }
        self.transition(SyncState::Fetching, SyncState::Synced);

        let feed = match self.backend.subscribe_on_create().await {
            Ok(feed) => feed,
            Err(err) => {
                tracing::warn!(error = %err, "could not open live feed");
                *self.feed_error.lock() = Some(err.to_string());
                return Err(SyncError::Subscription(err));
            }
        };

        let mut task = self.feed_task.lock();
        if self.closed.is_cancelled() {
            // dropping the feed releases it
            return Ok(());
        }
        *task = Some(tokio::spawn(self.clone().pump(feed)));
        Ok(())
    }

    /// Write `value` through to the backend for `user_name` and merge the
    /// confirmed entry.
    pub async fn submit(&self, user_name: impl Into<String>, value: i64) -> Result<ScoreEntry, SyncError> {
        let state = self.state();
        if state != SyncState::Synced {
            return Err(SyncError::NotSynced(state));
        }
        let score = NewScore { user_name: user_name.into(), value };
        let entry = match self.backend.create(score).await {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "score submission failed");
                return Err(SyncError::Submission(err));
            }
        };
        if self.closed.is_cancelled() {
            tracing::debug!(id = %entry.id, "closed during submission, result discarded");
        } else {
            self.apply(entry.clone());
        }
        Ok(entry)
    }

    /// Release the live feed. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.closed.cancel();
        *self.state.lock() = SyncState::Closed;
        let task = self.feed_task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "feed task ended abnormally");
            }
            tracing::info!("live feed released");
        }
    }

    fn apply(&self, entry: ScoreEntry) {
        let mut store = self.store.lock();
        if store.get(&entry.id).is_some() {
            tracing::trace!(id = %entry.id, "overwriting known entry");
        }
        store.upsert(entry);
        self.view.send_replace(ranking::rank(&store.all()));
    }

    fn transition(&self, from: SyncState, to: SyncState) {
        let mut state = self.state.lock();
        if *state == from {
            *state = to;
        }
    }

    async fn pump(self: Arc<Self>, mut feed: ScoreFeed) {
        loop {
            tokio::select! {
                biased;
                _ = self.closed.cancelled() => break,
                next = feed.next() => match next {
                    Some(Ok(entry)) => {
                        tracing::debug!(id = %entry.id, value = entry.value, "live score");
                        self.apply(entry);
                    }
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "live feed failed");
                        *self.feed_error.lock() = Some(err.to_string());
                        break;
                    }
                    None => {
                        tracing::warn!("live feed ended");
                        *self.feed_error.lock() = Some("feed ended".into());
                        break;
                    }
                },
            }
        }
        feed.cancel();
    }
}
