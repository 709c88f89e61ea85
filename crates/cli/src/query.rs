use std::path::Path;

use anyhow::Context;
use coffer_engine::EngineConfig;
use coffer_ledger::{JsonFileStore, Ledger, NoCustomCatalog, Placeholder, QueryResolver};
use coffer_primitives::UserId;

/// Answers `token` for `user` from the snapshot stored at `path`.
pub fn query_snapshot(config: &EngineConfig, path: &Path, user: &str, token: &str) -> anyhow::Result<String> {
	let user: UserId = user.parse().with_context(|| format!("invalid user id {user:?}"))?;
	let snapshot = JsonFileStore::read_file(path)?;

	let ledger = Ledger::new();
	ledger.restore(user, snapshot);
	let vanilla = config.vanilla_catalog();

	match QueryResolver::new(&ledger, &vanilla, &NoCustomCatalog).query(Some(user), token) {
		Placeholder::Value(value) => Ok(value),
		Placeholder::Unhandled => anyhow::bail!("{token:?} is not an amt_ placeholder"),
	}
}
