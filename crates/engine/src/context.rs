use coffer_ledger::{Ledger, LedgerError};
use coffer_primitives::{ItemIdentity, UserId};
use coffer_registry::{ActionFailed, Effects, Facts};

use crate::Engine;
use crate::host::Host;

/// Requirement facts backed by the ledger and the host.
pub(crate) struct EngineFacts<'a> {
	ledger: &'a Ledger,
	host: &'a dyn Host,
}

impl<'a> EngineFacts<'a> {
	pub fn new(ledger: &'a Ledger, host: &'a dyn Host) -> Self {
		Self { ledger, host }
	}
}

impl Facts for EngineFacts<'_> {
	fn has_permission(&self, user: UserId, node: &str) -> bool {
		self.host.has_permission(user, node)
	}

	fn has_flag(&self, user: UserId, flag: &str) -> bool {
		self.host.has_flag(user, flag)
	}

	fn quantity(&self, user: UserId, item: &ItemIdentity) -> u64 {
		self.ledger.get_quantity(user, item)
	}
}

/// Action side effects routed through the engine.
pub(crate) struct EngineEffects<'a> {
	engine: &'a Engine,
}

impl<'a> EngineEffects<'a> {
	pub fn new(engine: &'a Engine) -> Self {
		Self { engine }
	}

	fn adjust(&self, user: UserId, item: &ItemIdentity, amount: u64, take: bool) -> Result<(), ActionFailed> {
		let magnitude = i64::try_from(amount).map_err(|_| ActionFailed::Ledger {
			item: item.clone(),
			reason: format!("amount {amount} is out of range"),
		})?;
		let delta = if take { -magnitude } else { magnitude };

		match self.engine.ledger.adjust_quantity(user, item, delta) {
			Ok(_) => Ok(()),
			Err(LedgerError::InsufficientQuantity { item, held, requested }) => Err(ActionFailed::Insufficient {
				item,
				needed: requested,
				held,
			}),
			Err(err) => Err(ActionFailed::Ledger {
				item: item.clone(),
				reason: err.to_string(),
			}),
		}
	}
}

impl Effects for EngineEffects<'_> {
	fn consume(&mut self, user: UserId, item: &ItemIdentity, amount: u64) -> Result<(), ActionFailed> {
		self.adjust(user, item, amount, true)
	}

	fn give(&mut self, user: UserId, item: &ItemIdentity, amount: u64) -> Result<(), ActionFailed> {
		self.adjust(user, item, amount, false)
	}

	fn open_menu(&mut self, user: UserId, name: &str) -> Result<(), ActionFailed> {
		self.engine
			.open_menu(user, name)
			.map(|_view| ())
			.map_err(|_| ActionFailed::MenuNotFound { name: name.to_string() })
	}

	fn message(&mut self, user: UserId, text: &str) {
		self.engine.host.send_message(user, text);
	}

	fn close_view(&mut self, user: UserId) {
		self.engine.close_view(user);
	}

	fn run_command(&mut self, user: UserId, line: &str) -> Result<(), ActionFailed> {
		self.engine.host.run_command(user, line).map_err(ActionFailed::Host)
	}

	fn open_storage(&mut self, user: UserId) -> Result<(), ActionFailed> {
		self.engine.open_storage(user).map_err(ActionFailed::Host)
	}
}
