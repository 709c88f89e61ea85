use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use coffer_primitives::{ItemIdentity, UserId};
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

/// Persistable copy of one user's holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
	#[serde(default)]
	pub entries: BTreeMap<ItemIdentity, u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("ledger store I/O at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("malformed ledger snapshot at {path}: {source}")]
	Malformed {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
}

/// Durable home of ledger snapshots. Where and how they are kept is up to the host.
pub trait LedgerStore: Send + Sync {
	/// Loads a user's snapshot, or `None` when nothing was saved yet.
	fn load(&self, user: UserId) -> Result<Option<LedgerSnapshot>, StoreError>;

	fn save(&self, user: UserId, snapshot: &LedgerSnapshot) -> Result<(), StoreError>;
}

/// One JSON document per user under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
	root: PathBuf,
}

impl JsonFileStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn path_for(&self, user: UserId) -> PathBuf {
		self.root.join(format!("{user}.json"))
	}

	/// Reads a snapshot file directly, independent of any user naming.
	pub fn read_file(path: &Path) -> Result<LedgerSnapshot, StoreError> {
		let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
			path: path.to_path_buf(),
			source,
		})
	}
}

impl LedgerStore for JsonFileStore {
	fn load(&self, user: UserId) -> Result<Option<LedgerSnapshot>, StoreError> {
		let path = self.path_for(user);
		if !path.exists() {
			return Ok(None);
		}
		Self::read_file(&path).map(Some)
	}

	fn save(&self, user: UserId, snapshot: &LedgerSnapshot) -> Result<(), StoreError> {
		let io_err = |path: &Path| {
			let path = path.to_path_buf();
			move |source| StoreError::Io { path, source }
		};

		std::fs::create_dir_all(&self.root).map_err(io_err(&self.root))?;
		let path = self.path_for(user);
		let json = serde_json::to_vec_pretty(snapshot).map_err(|source| StoreError::Malformed {
			path: path.clone(),
			source,
		})?;

		// Staged write, then rename over the target.
		let staging = path.with_extension("json.tmp");
		std::fs::write(&staging, json).map_err(io_err(&staging))?;
		std::fs::rename(&staging, &path).map_err(io_err(&path))?;
		tracing::debug!(%user, path = %path.display(), entries = snapshot.entries.len(), "ledger.saved");
		Ok(())
	}
}

impl Ledger {
	/// Replaces the user's book with whatever `store` holds for them.
	pub fn load_from(&self, store: &dyn LedgerStore, user: UserId) -> Result<(), StoreError> {
		let snapshot = store.load(user)?.unwrap_or_default();
		self.restore(user, snapshot);
		Ok(())
	}

	pub fn save_to(&self, store: &dyn LedgerStore, user: UserId) -> Result<(), StoreError> {
		store.save(user, &self.snapshot(user))
	}
}
