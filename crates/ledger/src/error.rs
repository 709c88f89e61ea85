use coffer_primitives::ItemIdentity;

/// Structured ledger failures. Callers decide how to present them; the ledger never
/// swallows them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
	/// Target quantity is negative or beyond the storable range.
	#[error("invalid quantity {quantity} for {item}")]
	InvalidQuantity { item: ItemIdentity, quantity: i128 },
	/// A relative adjustment would take the quantity below zero.
	#[error("insufficient {item}: held {held}, requested {requested}")]
	InsufficientQuantity {
		item: ItemIdentity,
		held: u64,
		requested: u64,
	},
	/// A placeholder token does not name any known identity.
	#[error("unresolved item identity {token:?}")]
	UnresolvedIdentity { token: String },
}
