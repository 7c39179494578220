//! BubblePop game shell.
//!
//! The binary is a thin composition root: it reads [`ClientConfig`], sets up
//! file logging, builds a [`Shell`] over the stores and the file-backed
//! persistence layer, and dispatches one subcommand.
pub mod config;
pub mod logging;
pub mod session;
pub mod shell;

pub use config::ClientConfig;
pub use session::{Reply, SessionCommand, SessionError};
pub use shell::{Shell, StorageInfo};
