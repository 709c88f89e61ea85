//! Configuration-facing menu definitions.
//!
//! A menu file is a TOML document with one `[menus.<id>]` table per menu:
//!
//! ```toml
//! [menus.shop]
//! title = "Shop"
//! size = 27
//! alias = "store"
//! animation = { frames = ["Shop", "Shop."], interval_ticks = 10 }
//!
//! [menus.shop.items.buy_sword]
//! slots = [13]
//! icon = "nexo:custom:sword"
//! requirements = [{ type = "item", item = "minecraft:emerald", amount = 5 }]
//! actions = [
//!     { type = "consume", item = "minecraft:emerald", amount = 5 },
//!     { type = "give", item = "nexo:custom:sword", amount = 1 },
//! ]
//! deny_actions = [{ type = "message", text = "You need 5 emeralds." }]
//! ```

use std::collections::BTreeMap;

use coffer_primitives::ItemIdentity;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::MenuError;
use crate::menu::{AnimationSpec, Menu, MenuItem, RenderSpec};
use crate::requirement::Requirement;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuFile {
	#[serde(default)]
	pub menus: BTreeMap<String, MenuDef>,
}

impl MenuFile {
	pub fn from_toml_str(text: &str) -> Result<Self, MenuError> {
		toml::from_str(text).map_err(|err| MenuError::Parse(err.to_string()))
	}

	/// Builds every menu, in id order.
	pub fn into_menus(self) -> Result<Vec<Menu>, MenuError> {
		self.menus.into_iter().map(|(id, def)| def.build(id)).collect()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuDef {
	#[serde(default)]
	pub title: String,
	/// Raw slot count; coerced by [`crate::MenuSize::coerce`].
	#[serde(default = "default_size")]
	pub size: i64,
	#[serde(default)]
	pub alias: Option<String>,
	#[serde(default)]
	pub animation: Option<AnimationDef>,
	#[serde(default)]
	pub items: BTreeMap<String, ItemDef>,
}

fn default_size() -> i64 {
	54
}

impl MenuDef {
	pub fn build(self, id: impl Into<String>) -> Result<Menu, MenuError> {
		let mut builder = Menu::builder(id).title(self.title).size(self.size);
		if let Some(alias) = self.alias {
			builder = builder.alias(alias);
		}
		if let Some(animation) = self.animation {
			builder = builder.animation(AnimationSpec::new(animation.frames, animation.interval_ticks));
		}
		for (item_id, def) in self.items {
			let slots = def.slot_list();
			builder = builder.item(slots, def.build(item_id));
		}
		builder.build()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationDef {
	#[serde(default)]
	pub frames: Vec<String>,
	#[serde(default = "default_interval")]
	pub interval_ticks: u32,
}

fn default_interval() -> u32 {
	20
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemDef {
	#[serde(default)]
	pub slot: Option<u16>,
	#[serde(default)]
	pub slots: Vec<u16>,
	#[serde(default)]
	pub icon: Option<ItemIdentity>,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub lore: Vec<String>,
	#[serde(default = "default_amount")]
	pub amount: u8,
	#[serde(default)]
	pub requirements: Vec<Requirement>,
	#[serde(default)]
	pub actions: Vec<Action>,
	#[serde(default)]
	pub deny_actions: Vec<Action>,
}

fn default_amount() -> u8 {
	1
}

impl ItemDef {
	/// `slot` and `slots` combined, deduplicated, in ascending order.
	pub fn slot_list(&self) -> Vec<u16> {
		let mut slots: Vec<u16> = self.slot.into_iter().chain(self.slots.iter().copied()).collect();
		slots.sort_unstable();
		slots.dedup();
		slots
	}

	fn build(self, id: String) -> MenuItem {
		let render = RenderSpec {
			icon: self.icon,
			display_name: self.display_name,
			lore: self.lore,
			amount: self.amount,
		};
		let item = MenuItem::new(id).render(render);
		let item = self.requirements.into_iter().fold(item, MenuItem::requirement);
		let item = self.actions.into_iter().fold(item, MenuItem::action);
		self.deny_actions.into_iter().fold(item, MenuItem::deny_action)
	}
}
