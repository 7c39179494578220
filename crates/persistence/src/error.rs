//! Error types for the storage gateway and persistence coordinator.
//!
//! The taxonomy separates what callers must handle differently:
//! - [`BackendError`]: the key-value medium itself failed
//! - [`StorageError`]: a gateway operation failed, tagged by direction
//!   (write, read, clear) and carrying the key involved
//! - [`PersistenceError`]: coordinator-level failures (export, import, or a
//!   propagated storage error)
//!
//! Auto-save and clear swallow their errors after logging them; startup load,
//! export and import return them to the caller.

use thiserror::Error;

/// Failures reported by a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("key-value store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage quota exceeded: {requested} bytes requested, limit is {limit}")]
    QuotaExceeded { requested: usize, limit: usize },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a write failed.
#[derive(Debug, Error)]
pub enum WriteFailure {
    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Why a read failed. A missing key is not a failure.
#[derive(Debug, Error)]
pub enum ReadFailure {
    #[error("stored data is malformed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors surfaced by the [`StorageGateway`](crate::StorageGateway).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write `{key}`: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: WriteFailure,
    },

    #[error("failed to read `{key}`: {source}")]
    Read {
        key: &'static str,
        #[source]
        source: ReadFailure,
    },

    #[error("failed to clear `{key}`: {source}")]
    Clear {
        key: &'static str,
        #[source]
        source: BackendError,
    },
}

impl StorageError {
    /// Key the failed operation was working on.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Write { key, .. } | Self::Read { key, .. } | Self::Clear { key, .. } => key,
        }
    }

    /// True when stored data exists but could not be decoded.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            Self::Read {
                source: ReadFailure::Malformed(_),
                ..
            }
        )
    }
}

/// Reasons an import document was rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("expected a JSON object at the top level")]
    NotAnObject,

    #[error("`{section}` section is unusable: {source}")]
    InvalidSection {
        section: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by the [`PersistenceCoordinator`](crate::PersistenceCoordinator).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to export persisted data: {0}")]
    Export(#[source] serde_json::Error),

    #[error("failed to import persisted data: {0}")]
    Import(#[from] ImportError),

    #[error("auto-persistence requires a running tokio runtime")]
    RuntimeUnavailable,
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn corrupt_data_is_distinguished_from_backend_failures() {
        let corrupt = StorageError::Read {
            key: "bubblepop:player",
            source: ReadFailure::Malformed(malformed()),
        };
        let unavailable = StorageError::Read {
            key: "bubblepop:player",
            source: ReadFailure::Backend(BackendError::Unavailable("offline".into())),
        };

        assert!(corrupt.is_corrupt_data());
        assert!(!unavailable.is_corrupt_data());
        assert_eq!(corrupt.key(), "bubblepop:player");
    }

    #[test]
    fn messages_carry_key_and_cause() {
        let err = StorageError::Write {
            key: "bubblepop:settings",
            source: WriteFailure::Backend(BackendError::QuotaExceeded {
                requested: 10,
                limit: 5,
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to write `bubblepop:settings`: storage quota exceeded: 10 bytes requested, limit is 5"
        );
    }
}
