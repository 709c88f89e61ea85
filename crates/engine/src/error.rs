use std::path::PathBuf;

use coffer_ledger::StoreError;
use coffer_registry::{MenuError, RegistryError};

/// Errors loading the engine configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Parse(String),
}

/// Failures surfaced by [`crate::Engine`] operations that have a structured caller.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
	#[error("menu {name:?} not found")]
	MenuNotFound { name: String },
	#[error(transparent)]
	Menu(#[from] MenuError),
	#[error(transparent)]
	Registry(#[from] RegistryError),
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Store(#[from] StoreError),
}
