//! Error kinds for the backend, identity and sync layers.

use crate::leaderboard::wire::DecodeError;

use super::controller::SyncState;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized: {0}")]
    Auth(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(thiserror::Error, Debug)]
pub enum IdentityError {
    #[error("no signed-in user")]
    Unauthenticated,
}

#[derive(thiserror::Error, Debug)]
pub enum SyncError {
    #[error("leaderboard fetch failed: {0}")]
    Fetch(#[source] BackendError),
    #[error("score submission failed: {0}")]
    Submission(#[source] BackendError),
    #[error("live feed failed: {0}")]
    Subscription(#[source] BackendError),
    #[error("leaderboard is not synced (state: {0:?})")]
    NotSynced(SyncState),
}
