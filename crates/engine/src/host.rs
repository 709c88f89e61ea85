//! Boundary to the hosting session.
//!
//! The engine never renders, authenticates or persists anything itself; every such
//! request goes through [`Host`]. Implementations must be cheap and non-blocking since
//! they are called from click handlers and animation ticks.

use std::collections::BTreeMap;

use coffer_primitives::{ItemIdentity, UserId, ViewId};
use coffer_registry::Menu;

pub trait Host: Send + Sync + 'static {
	/// Whether the user is still connected. Checked before every animation frame.
	fn is_online(&self, user: UserId) -> bool;

	fn has_permission(&self, user: UserId, node: &str) -> bool;

	/// Host-defined boolean state read by flag requirements.
	fn has_flag(&self, _user: UserId, _flag: &str) -> bool {
		false
	}

	/// Shows `menu` to the user as a new container view.
	fn open_view(&self, user: UserId, view: ViewId, menu: &Menu);

	/// Replaces the caption of an open view.
	fn set_title(&self, user: UserId, view: ViewId, title: &str);

	/// Closes whatever container the user has open.
	fn close_view(&self, user: UserId);

	fn send_message(&self, user: UserId, text: &str);

	/// Runs a command line on the user's behalf.
	fn run_command(&self, _user: UserId, line: &str) -> Result<(), String> {
		Err(format!("commands are not supported by this host: {line}"))
	}

	/// Opens the virtual storage view listing the user's holdings.
	fn open_storage(&self, user: UserId, held: &BTreeMap<ItemIdentity, u64>) -> Result<(), String>;
}

/// Who issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSender {
	User(UserId),
	/// Server console or automation; cannot open views.
	Console,
}

/// How the slot was clicked, forwarded from the host's click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickKind {
	#[default]
	Left,
	Right,
	ShiftLeft,
	ShiftRight,
	Middle,
	Other,
}
