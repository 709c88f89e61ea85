use rustc_hash::FxHashSet;

use crate::identity::{ItemIdentity, Namespace};

/// Material codes shipped with the engine. Hosts extend the set through configuration
/// when their catalog carries more.
const BUILTIN_MATERIALS: &[&str] = &[
	"acacia_log",
	"air",
	"amethyst_shard",
	"anvil",
	"apple",
	"arrow",
	"baked_potato",
	"barrier",
	"beacon",
	"bedrock",
	"beef",
	"birch_log",
	"black_stained_glass_pane",
	"blaze_rod",
	"bone",
	"book",
	"bow",
	"bread",
	"brick",
	"bucket",
	"cactus",
	"cake",
	"carrot",
	"chest",
	"chicken",
	"clay_ball",
	"coal",
	"coal_block",
	"cobblestone",
	"compass",
	"cooked_beef",
	"cooked_chicken",
	"copper_ingot",
	"crafting_table",
	"crossbow",
	"dark_oak_log",
	"deepslate",
	"diamond",
	"diamond_axe",
	"diamond_block",
	"diamond_boots",
	"diamond_chestplate",
	"diamond_helmet",
	"diamond_leggings",
	"diamond_pickaxe",
	"diamond_shovel",
	"diamond_sword",
	"dirt",
	"egg",
	"elytra",
	"emerald",
	"emerald_block",
	"ender_chest",
	"ender_pearl",
	"experience_bottle",
	"feather",
	"flint",
	"furnace",
	"glass",
	"glass_pane",
	"glowstone_dust",
	"gold_block",
	"gold_ingot",
	"gold_nugget",
	"golden_apple",
	"granite",
	"gravel",
	"gray_stained_glass_pane",
	"gunpowder",
	"hopper",
	"iron_axe",
	"iron_block",
	"iron_ingot",
	"iron_nugget",
	"iron_pickaxe",
	"iron_sword",
	"jungle_log",
	"lapis_lazuli",
	"lava_bucket",
	"leather",
	"map",
	"melon_slice",
	"milk_bucket",
	"name_tag",
	"netherite_block",
	"netherite_ingot",
	"netherite_scrap",
	"netherite_sword",
	"netherrack",
	"oak_log",
	"oak_planks",
	"obsidian",
	"paper",
	"player_head",
	"potato",
	"pumpkin",
	"quartz",
	"raw_copper",
	"raw_gold",
	"raw_iron",
	"redstone",
	"redstone_block",
	"rotten_flesh",
	"saddle",
	"sand",
	"shield",
	"slime_ball",
	"snowball",
	"spruce_log",
	"stick",
	"stone",
	"string",
	"sugar",
	"sugar_cane",
	"tnt",
	"torch",
	"totem_of_undying",
	"trident",
	"water_bucket",
	"wheat",
	"wheat_seeds",
	"white_wool",
];

/// Fixed catalog of known vanilla material codes.
///
/// Lookups take any spelling accepted by [`ItemIdentity::vanilla`]; unknown codes
/// resolve to `None` so callers can treat them as an empty holding.
#[derive(Debug, Clone)]
pub struct VanillaCatalog {
	codes: FxHashSet<Box<str>>,
}

impl Default for VanillaCatalog {
	fn default() -> Self {
		Self::builtin()
	}
}

impl VanillaCatalog {
	/// Catalog containing only the built-in materials.
	pub fn builtin() -> Self {
		Self {
			codes: BUILTIN_MATERIALS.iter().map(|&code| Box::from(code)).collect(),
		}
	}

	/// Adds extra material codes. Codes that fail normalization are skipped.
	#[must_use]
	pub fn with_extra<I, S>(mut self, extra: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for code in extra {
			if let Ok(id) = ItemIdentity::vanilla(code.as_ref()) {
				self.codes.insert(id.code().into());
			}
		}
		self
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.codes.is_empty()
	}

	/// Returns true when `id` is a vanilla identity listed in this catalog.
	pub fn contains(&self, id: &ItemIdentity) -> bool {
		id.namespace() == Namespace::Vanilla && self.codes.contains(id.code())
	}

	/// Resolves a raw code to a known vanilla identity.
	pub fn resolve(&self, raw: &str) -> Option<ItemIdentity> {
		let id = ItemIdentity::vanilla(raw).ok()?;
		self.contains(&id).then_some(id)
	}
}
