//! Scores, their store, ranking and wire contracts.

pub mod entry;
pub mod ranking;
pub mod store;
pub mod wire;

pub use entry::{NewScore, ScoreEntry};
pub use store::ScoreStore;
