//! Durable key-value medium.
//!
//! The gateway only ever talks to storage through [`KeyValueStore`]; the
//! medium is injected so tests can use memory and the shell can use files.

mod file;
mod memory;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;

use crate::error::BackendError;

/// Namespaced keys and the data-format version written alongside them.
pub mod keys {
    /// Prefix shared by every key this crate writes.
    pub const NAMESPACE: &str = "bubblepop:";

    pub const PLAYER: &str = "bubblepop:player";
    pub const SETTINGS: &str = "bubblepop:settings";
    pub const VERSION: &str = "bubblepop:version";

    /// Throwaway key used to probe availability.
    pub const PROBE: &str = "__bubblepop_test__";

    /// Every key written by the gateway, in removal order.
    pub const ALL: [&str; 3] = [PLAYER, SETTINGS, VERSION];

    /// Version stamped on every save.
    pub const CURRENT_VERSION: &str = "1.0.0";
}

/// Synchronous string-keyed storage.
///
/// Calls are expected to be fast; any of them may fail, for example when a
/// quota is exceeded or the backing file system is read-only.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if unset.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), BackendError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), BackendError>;

    /// Every key currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, BackendError>;
}
