//! Auto-persistence configuration.
use std::env;
use std::time::Duration;

/// Default quiet period between the last mutation and the write.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Configuration for [`PersistenceCoordinator::setup_auto_persistence`].
///
/// [`PersistenceCoordinator::setup_auto_persistence`]: crate::PersistenceCoordinator::setup_auto_persistence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersistConfig {
    /// When false, setup subscribes to nothing and returns an inert handle.
    pub enabled: bool,
    /// Quiet period after the last mutation of a store before it is written.
    pub debounce: Duration,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl PersistConfig {
    pub const fn new(enabled: bool, debounce: Duration) -> Self {
        Self { enabled, debounce }
    }

    /// Configuration that never writes automatically.
    pub const fn disabled() -> Self {
        Self::new(false, DEFAULT_DEBOUNCE)
    }

    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BUBBLEPOP_AUTOSAVE` - Enable auto-persistence (default: true)
    /// - `BUBBLEPOP_DEBOUNCE_MS` - Debounce window in milliseconds (default: 500)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(enabled) = read_env::<bool>("BUBBLEPOP_AUTOSAVE") {
            config.enabled = enabled;
        }

        if let Some(millis) = read_env::<u64>("BUBBLEPOP_DEBOUNCE_MS") {
            config.debounce = Duration::from_millis(millis);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
