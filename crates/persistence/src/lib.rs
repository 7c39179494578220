//! Durable persistence for the BubblePop player and settings stores.
//!
//! Layers, from the medium up:
//! - [`storage`]: the [`KeyValueStore`] capability with in-memory and
//!   file-backed implementations
//! - [`gateway`]: typed JSON encoding of each aggregate under a fixed key
//! - [`coordinator`]: debounced auto-save, startup load, clear, export and
//!   import
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod snapshot;
pub mod storage;

pub use config::{DEFAULT_DEBOUNCE, PersistConfig};
pub use coordinator::{
    AutoPersistence, LoadedSections, PersistenceCoordinator, StoreKey, is_persistable,
};
pub use error::{
    BackendError, ImportError, PersistenceError, ReadFailure, Result, StorageError, WriteFailure,
};
pub use gateway::StorageGateway;
pub use snapshot::{ExportDocument, ImportDocument, PersistentData};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, keys};
