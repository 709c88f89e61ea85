//! Engine configuration.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! tick_rate = 20
//! extra_materials = ["copper_ingot"]
//!
//! [permissions]
//! menu = "coffer.menu"
//! storage = "coffer.storage"
//!
//! [messages]
//! menu_not_found = "Menu '{name}' not found."
//! ```

use std::path::Path;

use coffer_primitives::{TickRate, VanillaCatalog};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Host ticks per second; animation intervals are counted in these ticks.
	pub tick_rate: TickRate,
	pub permissions: Permissions,
	pub messages: Messages,
	/// Vanilla material codes the host knows about beyond the builtin catalog.
	pub extra_materials: Vec<String>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			tick_rate: TickRate::DEFAULT,
			permissions: Permissions::default(),
			messages: Messages::default(),
			extra_materials: Vec::new(),
		}
	}
}

impl EngineConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&text)?;
		tracing::debug!(path = %path.display(), tick_rate = config.tick_rate.ticks_per_second(), "config.load");
		Ok(config)
	}

	/// Builtin vanilla catalog extended with [`Self::extra_materials`].
	pub fn vanilla_catalog(&self) -> VanillaCatalog {
		VanillaCatalog::builtin().with_extra(self.extra_materials.iter().map(String::as_str))
	}
}

/// Permission nodes guarding the two commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Permissions {
	pub menu: String,
	pub storage: String,
}

impl Default for Permissions {
	fn default() -> Self {
		Self {
			menu: "coffer.menu".to_string(),
			storage: "coffer.storage".to_string(),
		}
	}
}

/// User-facing texts. `{name}` in `menu_not_found` is replaced with the queried name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
	pub menu_not_found: String,
	pub users_only: String,
	pub no_permission: String,
	pub menu_usage: String,
	/// Sent when a click fails its requirements and the item has no deny actions.
	/// Empty disables the message.
	pub denied: String,
	/// Sent when an action fails partway through a click.
	pub action_failed: String,
}

impl Default for Messages {
	fn default() -> Self {
		Self {
			menu_not_found: "Menu '{name}' not found.".to_string(),
			users_only: "This command can only be used by players.".to_string(),
			no_permission: "You do not have permission to do that.".to_string(),
			menu_usage: "Usage: /menu <name>".to_string(),
			denied: "You cannot use this.".to_string(),
			action_failed: "Something went wrong, nothing further was done.".to_string(),
		}
	}
}

impl Messages {
	pub fn menu_not_found(&self, name: &str) -> String {
		self.menu_not_found.replace("{name}", name)
	}
}
