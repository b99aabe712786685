//! In-process score backend.
//!
//! Speaks the same envelopes as the managed API: responses and feed events
//! are encoded with [`wire`] and decoded again on the way out, so the
//! boundary checks run exactly as they would against the real service.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::leaderboard::{NewScore, ScoreEntry, wire};
use crate::util::id::new_score_id;

use super::backend::{ScoreBackend, ScoreFeed};
use super::error::BackendError;

const EVENT_BUFFER: usize = 1024;
const FEED_BUFFER: usize = 64;

#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

struct Inner {
    records: DashMap<String, ScoreEntry>,
    events: broadcast::Sender<String>,
    live: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self { Self::new() }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { inner: Arc::new(Inner { records: DashMap::new(), events, live: AtomicUsize::new(0) }) }
    }

    /// Backend preloaded with `entries`, kept under their own ids.
    pub fn with_entries(entries: impl IntoIterator<Item = ScoreEntry>) -> Self {
        let backend = Self::new();
        for entry in entries {
            backend.inner.records.insert(entry.id.clone(), entry);
        }
        backend
    }

    /// Number of feeds that have not been released yet.
    pub fn live_subscriptions(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Push a raw `onCreateUser` payload to every open feed.
    #[cfg(test)]
    pub fn publish_raw(&self, payload: String) {
        let _ = self.inner.events.send(payload);
    }
}

impl ScoreBackend for MemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<ScoreEntry>, BackendError> {
        let mut entries: Vec<ScoreEntry> = self.inner.records.iter().map(|r| r.value().clone()).collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(wire::decode_list(&wire::list_payload(&entries))?)
    }

    async fn create(&self, score: NewScore) -> Result<ScoreEntry, BackendError> {
        if score.user_name.is_empty() {
            return Err(BackendError::Auth("userName is required".into()));
        }
        let entry = ScoreEntry::new(new_score_id(), score.user_name, score.value);
        self.inner.records.insert(entry.id.clone(), entry.clone());
        // no receivers is fine
        let _ = self.inner.events.send(wire::on_create_payload(&entry));
        tracing::debug!(id = %entry.id, user = %entry.user_name, value = entry.value, "score created");
        Ok(wire::decode_created(&wire::created_payload(&entry))?)
    }

    async fn subscribe_on_create(&self) -> Result<ScoreFeed, BackendError> {
        let mut source = self.inner.events.subscribe();
        let (tx, rx) = mpsc::channel(FEED_BUFFER);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let inner = self.inner.clone();
        inner.live.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    msg = source.recv() => match msg {
                        Ok(payload) => {
                            let event = wire::decode_on_create(&payload).map_err(BackendError::from);
                            tokio::select! {
                                biased;
                                _ = token.cancelled() => break,
                                sent = tx.send(event) => if sent.is_err() { break },
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            // delivery is no longer at-least-once; fail the feed
                            tracing::warn!(skipped, "feed lagged behind");
                            let _ = tx.send(Err(BackendError::Network(format!("{skipped} events dropped")))).await;
                            break;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            inner.live.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("feed released");
        });

        Ok(ScoreFeed::new(rx, cancel))
    }
}
