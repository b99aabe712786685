//! Backend collaborators and the sync controller.

pub mod backend;
pub mod controller;
pub mod error;
pub mod memory;

pub use backend::{ConfiguredIdentity, Identity};
pub use controller::{SyncController, SyncState};
pub use error::SyncError;
pub use memory::MemoryBackend;
