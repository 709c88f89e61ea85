use coffer_primitives::{ItemIdentity, UserId};
use serde::{Deserialize, Serialize};

/// Read-only view of the facts requirements are checked against.
pub trait Facts {
	fn has_permission(&self, user: UserId, node: &str) -> bool;

	/// Host-defined boolean state such as "in combat" or "has claimed reward".
	fn has_flag(&self, user: UserId, flag: &str) -> bool;

	/// Ledger quantity held by the user.
	fn quantity(&self, user: UserId, item: &ItemIdentity) -> u64;
}

/// Condition gating a menu item. Evaluation never has side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Requirement {
	/// User holds the permission node.
	Permission { node: String },
	/// User's ledger holds at least `amount` of `item`.
	Item { item: ItemIdentity, amount: u64 },
	/// Host reports the flag as set for the user.
	Flag { name: String },
	/// Inverts the nested requirement.
	Not { requirement: Box<Requirement> },
}

impl Requirement {
	pub fn evaluate(&self, user: UserId, facts: &dyn Facts) -> bool {
		match self {
			Self::Permission { node } => facts.has_permission(user, node),
			Self::Item { item, amount } => facts.quantity(user, item) >= *amount,
			Self::Flag { name } => facts.has_flag(user, name),
			Self::Not { requirement } => !requirement.evaluate(user, facts),
		}
	}

	/// Short variant name for logs.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Permission { .. } => "permission",
			Self::Item { .. } => "item",
			Self::Flag { .. } => "flag",
			Self::Not { .. } => "not",
		}
	}
}
