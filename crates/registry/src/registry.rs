//! Runtime menu registry with atomic publication.
//!
//! # Role
//!
//! Holds every loaded [`Menu`] behind two indices (id and alias) inside one immutable
//! snapshot. Writers build a new snapshot and publish it with a compare-and-swap loop;
//! readers never block and always observe both indices from the same generation.
//!
//! # Invariants
//!
//! - Ids are unique and aliases are unique, each validated independently.
//! - Lookups are case-insensitive; the stored menu keeps its configured spelling.
//! - A replaced menu stays alive for as long as an open view holds its `Arc`.

use std::convert::Infallible;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap;

use crate::error::RegistryError;
use crate::menu::Menu;

#[derive(Debug, Default, Clone)]
struct Snapshot {
	by_id: FxHashMap<Box<str>, Arc<Menu>>,
	/// Alias key to owning menu id key.
	by_alias: FxHashMap<Box<str>, Box<str>>,
}

fn key(name: &str) -> Box<str> {
	name.trim().to_lowercase().into_boxed_str()
}

impl Snapshot {
	fn alias_owner(&self, alias: &str) -> Option<&str> {
		self.by_alias.get(&key(alias)).map(AsRef::as_ref)
	}

	fn insert_new(&mut self, menu: Arc<Menu>) -> Result<(), RegistryError> {
		let id_key = key(menu.id());
		if self.by_id.contains_key(&id_key) {
			return Err(RegistryError::DuplicateMenuId { id: menu.id().to_string() });
		}
		if let Some(alias) = menu.alias() {
			if let Some(owner) = self.alias_owner(alias) {
				return Err(RegistryError::DuplicateAlias {
					alias: alias.to_string(),
					id: menu.id().to_string(),
					owner: owner.to_string(),
				});
			}
			self.by_alias.insert(key(alias), id_key.clone());
		}
		self.by_id.insert(id_key, menu);
		Ok(())
	}

	/// Installs `menu` over whatever holds its id. An alias already owned by a
	/// different menu stays with that menu.
	fn upsert(&mut self, menu: Arc<Menu>) -> Option<Arc<Menu>> {
		let id_key = key(menu.id());
		self.by_alias.retain(|_, owner| *owner != id_key);

		if let Some(alias) = menu.alias() {
			match self.alias_owner(alias).map(str::to_string) {
				Some(owner) => {
					tracing::warn!(
						menu = menu.id(),
						alias,
						%owner,
						"registry.alias_conflict: alias kept by its current owner"
					);
				}
				None => {
					self.by_alias.insert(key(alias), id_key.clone());
				}
			}
		}
		self.by_id.insert(id_key, menu)
	}
}

/// A menu set whose ids and aliases are known to be unique, ready for
/// [`MenuRegistry::install`].
#[derive(Debug, Default, Clone)]
pub struct MenuSet {
	snap: Snapshot,
}

impl MenuSet {
	pub fn validate<I>(menus: I) -> Result<Self, RegistryError>
	where
		I: IntoIterator<Item = Menu>,
	{
		let mut snap = Snapshot::default();
		for menu in menus {
			snap.insert_new(Arc::new(menu))?;
		}
		Ok(Self { snap })
	}

	pub fn len(&self) -> usize {
		self.snap.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.by_id.is_empty()
	}
}

/// Concurrent menu registry.
#[derive(Debug, Default)]
pub struct MenuRegistry {
	snap: ArcSwap<Snapshot>,
}

impl MenuRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a menu whose id and alias are both unused.
	pub fn register(&self, menu: Menu) -> Result<Arc<Menu>, RegistryError> {
		let menu = Arc::new(menu);
		self.publish(|snap| snap.insert_new(Arc::clone(&menu)))?;
		tracing::debug!(menu = menu.id(), alias = menu.alias(), "registry.register");
		Ok(menu)
	}

	/// Swaps in `menu` for its id, registering it if new. Returns the previous
	/// instance; views that hold it keep using it until reopened.
	pub fn replace(&self, menu: Menu) -> Option<Arc<Menu>> {
		let menu = Arc::new(menu);
		let mut previous = None;
		let Ok(()) = self.publish::<_, Infallible>(|snap| {
			previous = snap.upsert(Arc::clone(&menu));
			Ok(())
		});
		tracing::debug!(menu = menu.id(), replaced = previous.is_some(), "registry.replace");
		previous
	}

	/// Removes a menu and its alias.
	pub fn remove(&self, id: &str) -> Option<Arc<Menu>> {
		let mut removed = None;
		let id_key = key(id);
		let Ok(()) = self.publish::<_, Infallible>(|snap| {
			removed = snap.by_id.remove(&id_key);
			snap.by_alias.retain(|_, owner| *owner != id_key);
			Ok(())
		});
		if removed.is_some() {
			tracing::debug!(menu = id, "registry.remove");
		}
		removed
	}

	/// Validates a complete menu set and publishes it as the whole registry.
	///
	/// Nothing is published when any id or alias repeats.
	pub fn reload<I>(&self, menus: I) -> Result<usize, RegistryError>
	where
		I: IntoIterator<Item = Menu>,
	{
		let set = MenuSet::validate(menus)?;
		Ok(self.install(set))
	}

	/// Publishes an already validated set as the whole registry. Cannot fail.
	pub fn install(&self, set: MenuSet) -> usize {
		let count = set.len();
		self.snap.store(Arc::new(set.snap));
		tracing::info!(menus = count, "registry.reload");
		count
	}

	pub fn lookup_by_id(&self, id: &str) -> Option<Arc<Menu>> {
		self.snap.load().by_id.get(&key(id)).cloned()
	}

	pub fn lookup_by_alias(&self, alias: &str) -> Option<Arc<Menu>> {
		let snap = self.snap.load();
		let owner = snap.by_alias.get(&key(alias))?;
		snap.by_id.get(owner).cloned()
	}

	/// Resolves an invocation name: id first, alias only when no id matches.
	pub fn resolve(&self, name: &str) -> Option<Arc<Menu>> {
		let snap = self.snap.load();
		let name = key(name);
		if let Some(menu) = snap.by_id.get(&name) {
			return Some(Arc::clone(menu));
		}
		let owner = snap.by_alias.get(&name)?;
		snap.by_id.get(owner).cloned()
	}

	/// Registered ids, sorted.
	pub fn ids(&self) -> Vec<String> {
		let snap = self.snap.load();
		let mut ids: Vec<String> = snap.by_id.values().map(|menu| menu.id().to_string()).collect();
		ids.sort_unstable();
		ids
	}

	pub fn len(&self) -> usize {
		self.snap.load().by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copy-modify-publish loop. `edit` may run more than once when writers race.
	fn publish<F, E>(&self, mut edit: F) -> Result<(), E>
	where
		F: FnMut(&mut Snapshot) -> Result<(), E>,
	{
		loop {
			let old = self.snap.load_full();
			let mut next = Snapshot::clone(&old);
			edit(&mut next)?;

			let prev = self.snap.compare_and_swap(&old, Arc::new(next));
			if Arc::ptr_eq(&prev, &old) {
				return Ok(());
			}
			// Lost the race; rebuild from the snapshot that won.
		}
	}
}
