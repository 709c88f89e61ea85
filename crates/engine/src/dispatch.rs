//! Click evaluation.
//!
//! # Role
//!
//! Turns one slot click into requirement checks and actions. The dispatcher keeps no
//! state between clicks; everything it reads comes from the menu snapshot, [`Facts`]
//! and [`Effects`] passed in.
//!
//! # Rules
//!
//! - Requirements run in declared order and stop at the first failure.
//! - Actions run in declared order, one at a time. The first failing action ends the
//!   click; earlier actions are not rolled back.
//! - A failed requirement runs the item's deny actions, or the default denial message
//!   when it has none, and no regular action.

use coffer_primitives::UserId;
use coffer_registry::{Action, ActionFailed, Effects, Facts, Menu, SlotIndex};

use crate::host::ClickKind;

/// Result of one click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
	/// No item occupies the slot, or the click targeted a view that is no longer open.
	Ignored,
	/// Requirement number `index` failed; no action ran.
	Denied { index: usize, requirement: &'static str },
	/// Every action ran.
	Completed { actions: usize },
	/// Action number `index` failed after `index` actions had completed.
	Failed {
		index: usize,
		action: &'static str,
		error: ActionFailed,
	},
}

#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
	denied_message: Option<String>,
}

impl Dispatcher {
	/// `denied_message` is sent on requirement failure for items without deny actions.
	pub fn new(denied_message: impl Into<String>) -> Self {
		let message = denied_message.into();
		Self {
			denied_message: (!message.is_empty()).then_some(message),
		}
	}

	pub fn dispatch(
		&self,
		user: UserId,
		menu: &Menu,
		slot: SlotIndex,
		click: ClickKind,
		facts: &dyn Facts,
		effects: &mut dyn Effects,
	) -> DispatchOutcome {
		let Some(item) = menu.item_at(slot) else {
			tracing::trace!(%user, menu = menu.id(), %slot, "dispatch.empty_slot");
			return DispatchOutcome::Ignored;
		};

		let failed = item
			.requirements()
			.iter()
			.enumerate()
			.find(|(_, requirement)| !requirement.evaluate(user, facts));
		if let Some((index, requirement)) = failed {
			tracing::debug!(
				%user,
				menu = menu.id(),
				item = item.id(),
				index,
				requirement = requirement.kind(),
				"dispatch.denied"
			);
			self.deny(user, item.deny_actions(), effects);
			return DispatchOutcome::Denied {
				index,
				requirement: requirement.kind(),
			};
		}

		for (index, action) in item.actions().iter().enumerate() {
			if let Err(error) = action.execute(user, effects) {
				tracing::warn!(
					%user,
					menu = menu.id(),
					item = item.id(),
					index,
					action = action.kind(),
					%error,
					"dispatch.action_failed"
				);
				return DispatchOutcome::Failed {
					index,
					action: action.kind(),
					error,
				};
			}
		}

		tracing::debug!(%user, menu = menu.id(), item = item.id(), ?click, actions = item.actions().len(), "dispatch.completed");
		DispatchOutcome::Completed {
			actions: item.actions().len(),
		}
	}

	fn deny(&self, user: UserId, deny_actions: &[Action], effects: &mut dyn Effects) {
		if deny_actions.is_empty() {
			if let Some(message) = &self.denied_message {
				effects.message(user, message);
			}
			return;
		}
		for action in deny_actions {
			if let Err(error) = action.execute(user, effects) {
				tracing::warn!(%user, action = action.kind(), %error, "dispatch.deny_action_failed");
				break;
			}
		}
	}
}
