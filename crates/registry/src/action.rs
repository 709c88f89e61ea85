use coffer_primitives::{ItemIdentity, UserId};
use serde::{Deserialize, Serialize};

/// Why an action could not complete. Stops the remaining actions of the click.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionFailed {
	#[error("not enough {item}: needed {needed}, held {held}")]
	Insufficient { item: ItemIdentity, needed: u64, held: u64 },
	#[error("menu {name:?} not found")]
	MenuNotFound { name: String },
	#[error("ledger rejected {item}: {reason}")]
	Ledger { item: ItemIdentity, reason: String },
	#[error("host rejected action: {0}")]
	Host(String),
}

/// Side effects actions are allowed to perform.
pub trait Effects {
	/// Removes `amount` of `item` from the user's ledger atomically.
	fn consume(&mut self, user: UserId, item: &ItemIdentity, amount: u64) -> Result<(), ActionFailed>;

	fn give(&mut self, user: UserId, item: &ItemIdentity, amount: u64) -> Result<(), ActionFailed>;

	/// Opens another menu, resolved by id then alias.
	fn open_menu(&mut self, user: UserId, name: &str) -> Result<(), ActionFailed>;

	fn message(&mut self, user: UserId, text: &str);

	fn close_view(&mut self, user: UserId);

	/// Hands a command line to the host as if the user had typed it.
	fn run_command(&mut self, user: UserId, line: &str) -> Result<(), ActionFailed>;

	fn open_storage(&mut self, user: UserId) -> Result<(), ActionFailed>;
}

/// Effect triggered by a menu click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
	Consume { item: ItemIdentity, amount: u64 },
	Give { item: ItemIdentity, amount: u64 },
	OpenMenu { menu: String },
	Message { text: String },
	Close,
	Command { line: String },
	OpenStorage,
}

impl Action {
	pub fn execute(&self, user: UserId, effects: &mut dyn Effects) -> Result<(), ActionFailed> {
		match self {
			Self::Consume { item, amount } => effects.consume(user, item, *amount),
			Self::Give { item, amount } => effects.give(user, item, *amount),
			Self::OpenMenu { menu } => effects.open_menu(user, menu),
			Self::Message { text } => {
				effects.message(user, text);
				Ok(())
			}
			Self::Close => {
				effects.close_view(user);
				Ok(())
			}
			Self::Command { line } => effects.run_command(user, line),
			Self::OpenStorage => effects.open_storage(user),
		}
	}

	/// Short variant name for logs.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Consume { .. } => "consume",
			Self::Give { .. } => "give",
			Self::OpenMenu { .. } => "open_menu",
			Self::Message { .. } => "message",
			Self::Close => "close",
			Self::Command { .. } => "command",
			Self::OpenStorage => "open_storage",
		}
	}
}
