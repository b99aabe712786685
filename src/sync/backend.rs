//! Collaborator interfaces: the score backend and the identity provider.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::leaderboard::{NewScore, ScoreEntry};

use super::error::{BackendError, IdentityError};

/// The managed score API.
pub trait ScoreBackend: Send + Sync + 'static {
    /// Every known score.
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<ScoreEntry>, BackendError>> + Send;

    /// Write a score; resolves to the entry as stored, with its assigned id.
    fn create(&self, score: NewScore) -> impl Future<Output = Result<ScoreEntry, BackendError>> + Send;

    /// Open a live feed of newly created scores.
    fn subscribe_on_create(&self) -> impl Future<Output = Result<ScoreFeed, BackendError>> + Send;
}

/// The identity provider.
pub trait Identity: Send + Sync + 'static {
    fn current_user(&self) -> impl Future<Output = Result<String, IdentityError>> + Send;
}

/// A live feed of created scores.
///
/// The feed stays open until cancelled. Dropping it cancels it, so the
/// backend side is released exactly once however the owner lets go.
#[derive(Debug)]
pub struct ScoreFeed {
    events: mpsc::Receiver<Result<ScoreEntry, BackendError>>,
    cancel: CancellationToken,
}

impl ScoreFeed {
    pub fn new(events: mpsc::Receiver<Result<ScoreEntry, BackendError>>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Next event, or `None` once the backend side has gone away.
    pub async fn next(&mut self) -> Option<Result<ScoreEntry, BackendError>> {
        self.events.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ScoreFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Identity backed by the configured user name.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredIdentity {
    user: Option<String>,
}

impl ConfiguredIdentity {
    pub fn new(user: Option<String>) -> Self {
        Self { user: user.filter(|u| !u.is_empty()) }
    }
}

impl Identity for ConfiguredIdentity {
    async fn current_user(&self) -> Result<String, IdentityError> {
        self.user.clone().ok_or(IdentityError::Unauthenticated)
    }
}
