/// Menu construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
	#[error("menu id must not be empty")]
	EmptyId,
	#[error("menu {menu:?}: slot {slot} is outside the {size}-slot grid")]
	SlotOutOfRange { menu: String, slot: u16, size: u8 },
	#[error("menu {menu:?}: slot {slot} is claimed by both {first:?} and {second:?}")]
	SlotConflict {
		menu: String,
		slot: u16,
		first: String,
		second: String,
	},
	#[error("menu {menu:?}: item {item:?} does not name any slot")]
	NoSlots { menu: String, item: String },
	#[error("invalid menu file: {0}")]
	Parse(String),
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// Another menu is already registered under this id.
	#[error("duplicate menu id {id:?}")]
	DuplicateMenuId { id: String },
	/// Another menu already claims this invocation alias.
	#[error("alias {alias:?} of menu {id:?} is already claimed by {owner:?}")]
	DuplicateAlias { alias: String, id: String, owner: String },
}
