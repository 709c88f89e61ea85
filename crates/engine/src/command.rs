//! The `menu <name>` and `storage` commands.
//!
//! Both need an interactive user holding the configured permission. Every outcome is
//! reported to the sender through the host's message channel; nothing here fails the
//! caller.

use coffer_primitives::{UserId, ViewId};

use crate::Engine;
use crate::error::EngineError;
use crate::host::CommandSender;

/// What a command invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
	Opened { menu: String, view: ViewId },
	MenuNotFound { name: String },
	StorageOpened,
	/// The host refused to open the storage view.
	StorageUnavailable,
	/// Sent from the console or another non-interactive sender.
	UsersOnly,
	NoPermission,
	/// `menu` without a name.
	Usage,
	/// Not one of this engine's commands.
	Unknown,
}

impl Engine {
	/// Runs a command line such as `menu shop` or `/storage`.
	pub fn execute_command(&self, sender: CommandSender, line: &str) -> CommandOutcome {
		let mut words = line.trim().trim_start_matches('/').split_whitespace();
		let Some(name) = words.next() else {
			return CommandOutcome::Unknown;
		};

		let (permission, is_menu) = if name.eq_ignore_ascii_case("menu") {
			(&self.config.permissions.menu, true)
		} else if name.eq_ignore_ascii_case("storage") {
			(&self.config.permissions.storage, false)
		} else {
			return CommandOutcome::Unknown;
		};

		let CommandSender::User(user) = sender else {
			tracing::info!(command = name, "{}", self.config.messages.users_only);
			return CommandOutcome::UsersOnly;
		};
		if !self.host.has_permission(user, permission) {
			self.host.send_message(user, &self.config.messages.no_permission);
			return CommandOutcome::NoPermission;
		}

		if is_menu {
			match words.next() {
				Some(target) => self.menu_command(user, target),
				None => {
					self.host.send_message(user, &self.config.messages.menu_usage);
					CommandOutcome::Usage
				}
			}
		} else {
			self.storage_command(user)
		}
	}

	fn menu_command(&self, user: UserId, name: &str) -> CommandOutcome {
		match self.open_menu(user, name) {
			Ok(view) => CommandOutcome::Opened {
				menu: self.views.current(user).map_or_else(|| name.to_string(), |open| open.menu.id().to_string()),
				view,
			},
			Err(EngineError::MenuNotFound { name }) => {
				self.host.send_message(user, &self.config.messages.menu_not_found(&name));
				CommandOutcome::MenuNotFound { name }
			}
			Err(err) => {
				tracing::warn!(%user, error = %err, "command.menu_failed");
				self.host.send_message(user, &self.config.messages.menu_not_found(name));
				CommandOutcome::MenuNotFound { name: name.to_string() }
			}
		}
	}

	fn storage_command(&self, user: UserId) -> CommandOutcome {
		match self.open_storage(user) {
			Ok(()) => CommandOutcome::StorageOpened,
			Err(reason) => {
				tracing::warn!(%user, %reason, "command.storage_failed");
				self.host.send_message(user, &self.config.messages.action_failed);
				CommandOutcome::StorageUnavailable
			}
		}
	}
}
