//! Shell composition root.
//!
//! # Architecture
//!
//! ```text
//! Shell
//!   ├─→ Stores (player, settings, ui)
//!   └─→ PersistenceCoordinator
//!         └─→ StorageGateway ─→ FileKeyValueStore (data dir)
//! ```
//!
//! # Lifecycle
//!
//! 1. [`Shell::open`] builds the stores and the file-backed gateway
//! 2. [`Shell::run`] loads persisted data, starts auto-persistence and reads
//!    session commands until `quit`, end of input or Ctrl-C
//! 3. On exit auto-persistence is torn down and both aggregates are saved
//!    once more so the last debounce window is not lost

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bubblepop_persistence::{
    FileKeyValueStore, KeyValueStore, LoadedSections, PersistenceCoordinator, StorageGateway,
};
use bubblepop_store::{LoadingTarget, Stores};
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::session::{Reply, SessionCommand};

/// Storage facts reported by `bubblepop info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub data_dir: PathBuf,
    pub available: bool,
    pub version: Option<String>,
    pub size_bytes: usize,
}

pub struct Shell {
    config: ClientConfig,
    stores: Stores,
    coordinator: PersistenceCoordinator,
}

impl Shell {
    /// Build the shell over a file-backed store in `config.data_dir`.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let backend = FileKeyValueStore::new(&config.data_dir).with_context(|| {
            format!(
                "Failed to open data directory: {}",
                config.data_dir.display()
            )
        })?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Build the shell over any key-value medium.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn KeyValueStore>) -> Self {
        let stores = Stores::new();
        let coordinator = PersistenceCoordinator::from_stores(&stores, StorageGateway::new(backend));

        Self {
            config,
            stores,
            coordinator,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn coordinator(&self) -> &PersistenceCoordinator {
        &self.coordinator
    }

    /// Restore persisted data into the stores. Unreadable data is fatal.
    pub fn load(&self) -> Result<LoadedSections> {
        self.stores.ui.set_loading(LoadingTarget::Data, true);
        let loaded = self.coordinator.load_persisted_data();
        self.stores.ui.set_loading(LoadingTarget::Data, false);

        loaded.context("Persisted data is unreadable; run `bubblepop clear` to start over")
    }

    /// Interactive session over `input`, writing replies to `out`.
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let loaded = self.load()?;
        let auto = self.coordinator.setup_auto_persistence(self.config.persist)?;

        let profile = self.stores.player.snapshot();
        if loaded.player && !profile.username.is_empty() {
            writeln!(out, "Welcome back, {}!", style(&profile.username).cyan().bold())?;
        } else {
            writeln!(out, "{}", style("Welcome to BubblePop!").cyan().bold())?;
        }
        writeln!(out, "Type `help` for commands.")?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line.context("Failed to read input")?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    None
                }
            };
            let Some(line) = line else {
                writeln!(out)?;
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match line
                .parse::<SessionCommand>()
                .and_then(|command| command.apply(&self.stores))
            {
                Ok(Reply::Message(message)) => writeln!(out, "{message}")?,
                Ok(Reply::Quit) => break,
                Err(e) => writeln!(out, "{} {e}", style("✗").red())?,
            }
        }

        auto.teardown();

        if self.config.persist.enabled {
            self.save_now()?;
        }
        writeln!(out, "Bye!")?;
        Ok(())
    }

    /// Write both aggregates immediately.
    pub fn save_now(&self) -> Result<()> {
        self.stores.ui.set_loading(LoadingTarget::Saving, true);
        let saved = self
            .coordinator
            .gateway()
            .save_all(&self.stores.player.snapshot(), &self.stores.settings.snapshot());
        self.stores.ui.set_loading(LoadingTarget::Saving, false);

        saved
            .inspect_err(|e| error!("Failed to save player data: {}", e))
            .context("Failed to save player data")
    }

    /// Export document of the persisted state.
    pub fn export(&self) -> Result<String> {
        self.load()?;
        Ok(self.coordinator.export_persisted_data()?)
    }

    /// Import the document at `path` and write the result immediately.
    pub fn import(&self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        self.load()?;
        self.coordinator
            .import_persisted_data(&text)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        self.save_now()
    }

    /// Remove persisted data. Returns whether every key was removed.
    pub fn clear(&self) -> bool {
        self.coordinator.clear_all_persisted_data()
    }

    pub fn info(&self) -> Result<StorageInfo> {
        let gateway = self.coordinator.gateway();
        Ok(StorageInfo {
            data_dir: self.config.data_dir.clone(),
            available: gateway.is_available(),
            version: gateway.version(),
            size_bytes: gateway
                .size_estimate()
                .context("Failed to measure stored data")?,
        })
    }
}
