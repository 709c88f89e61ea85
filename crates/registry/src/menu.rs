use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use coffer_primitives::ItemIdentity;

use crate::action::Action;
use crate::error::MenuError;
use crate::requirement::Requirement;

/// Index of one cell in a menu grid, counted row-major from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u16);

impl fmt::Display for SlotIndex {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Number of slots in a menu grid: a whole number of 9-slot rows, one to six rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuSize(u8);

impl MenuSize {
	pub const MIN: Self = Self(9);
	pub const MAX: Self = Self(54);

	/// Validates a configured size. Anything that is not a multiple of 9 in `[9, 54]`
	/// falls back to [`Self::MAX`].
	pub fn coerce(raw: i64) -> Self {
		match u8::try_from(raw) {
			Ok(slots) if slots % 9 == 0 && (Self::MIN.0..=Self::MAX.0).contains(&slots) => Self(slots),
			_ => Self::MAX,
		}
	}

	pub const fn slots(self) -> u8 {
		self.0
	}

	pub const fn rows(self) -> u8 {
		self.0 / 9
	}

	pub fn contains(self, slot: SlotIndex) -> bool {
		slot.0 < u16::from(self.0)
	}
}

impl Default for MenuSize {
	fn default() -> Self {
		Self::MAX
	}
}

/// Caption animation: the frames cycled through and the tick interval between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSpec {
	frames: Arc<[String]>,
	interval_ticks: u32,
}

impl AnimationSpec {
	/// Creates a spec. Intervals below one tick are raised to one.
	pub fn new<I, S>(frames: I, interval_ticks: u32) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			frames: frames.into_iter().map(Into::into).collect(),
			interval_ticks: interval_ticks.max(1),
		}
	}

	pub fn frames(&self) -> &[String] {
		&self.frames
	}

	/// Shared handle to the frame list, cheap to move into a timer task.
	pub fn shared_frames(&self) -> Arc<[String]> {
		Arc::clone(&self.frames)
	}

	pub const fn interval_ticks(&self) -> u32 {
		self.interval_ticks
	}

	/// Fewer than two frames means there is nothing to animate.
	pub fn is_animated(&self) -> bool {
		self.frames.len() >= 2
	}
}

/// What the renderer draws in a slot. The engine passes it through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSpec {
	pub icon: Option<ItemIdentity>,
	pub display_name: Option<String>,
	pub lore: Vec<String>,
	pub amount: u8,
}

/// One conditional, clickable item.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
	id: String,
	requirements: Vec<Requirement>,
	actions: Vec<Action>,
	deny_actions: Vec<Action>,
	render: RenderSpec,
}

impl MenuItem {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			requirements: Vec::new(),
			actions: Vec::new(),
			deny_actions: Vec::new(),
			render: RenderSpec::default(),
		}
	}

	#[must_use]
	pub fn requirement(mut self, requirement: Requirement) -> Self {
		self.requirements.push(requirement);
		self
	}

	#[must_use]
	pub fn action(mut self, action: Action) -> Self {
		self.actions.push(action);
		self
	}

	/// Adds an action run instead of [`Self::actions`] when a requirement fails.
	#[must_use]
	pub fn deny_action(mut self, action: Action) -> Self {
		self.deny_actions.push(action);
		self
	}

	#[must_use]
	pub fn render(mut self, render: RenderSpec) -> Self {
		self.render = render;
		self
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn requirements(&self) -> &[Requirement] {
		&self.requirements
	}

	pub fn actions(&self) -> &[Action] {
		&self.actions
	}

	pub fn deny_actions(&self) -> &[Action] {
		&self.deny_actions
	}

	pub fn render_spec(&self) -> &RenderSpec {
		&self.render
	}
}

/// Immutable menu definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
	id: Arc<str>,
	title: String,
	size: MenuSize,
	alias: Option<Arc<str>>,
	animation: Option<AnimationSpec>,
	slots: BTreeMap<SlotIndex, Arc<MenuItem>>,
}

impl Menu {
	pub fn builder(id: impl Into<String>) -> MenuBuilder {
		MenuBuilder {
			id: id.into(),
			title: String::new(),
			size: MenuSize::MAX,
			alias: None,
			animation: None,
			items: Vec::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn size(&self) -> MenuSize {
		self.size
	}

	/// Alternate invocation name, if any.
	pub fn alias(&self) -> Option<&str> {
		self.alias.as_deref()
	}

	pub fn animation(&self) -> Option<&AnimationSpec> {
		self.animation.as_ref()
	}

	/// Animation spec only when it actually animates.
	pub fn active_animation(&self) -> Option<&AnimationSpec> {
		self.animation.as_ref().filter(|spec| spec.is_animated())
	}

	pub fn item_at(&self, slot: SlotIndex) -> Option<&Arc<MenuItem>> {
		self.slots.get(&slot)
	}

	/// Occupied slots in ascending order.
	pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &Arc<MenuItem>)> {
		self.slots.iter().map(|(slot, item)| (*slot, item))
	}
}

/// Collects menu parts and validates them once in [`MenuBuilder::build`].
#[derive(Debug, Clone)]
pub struct MenuBuilder {
	id: String,
	title: String,
	size: MenuSize,
	alias: Option<String>,
	animation: Option<AnimationSpec>,
	items: Vec<(Vec<u16>, MenuItem)>,
}

impl MenuBuilder {
	#[must_use]
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	/// Sets the raw configured size; see [`MenuSize::coerce`].
	#[must_use]
	pub fn size(mut self, raw: i64) -> Self {
		self.size = MenuSize::coerce(raw);
		self
	}

	#[must_use]
	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		let alias = alias.into();
		self.alias = (!alias.trim().is_empty()).then(|| alias.trim().to_string());
		self
	}

	#[must_use]
	pub fn animation(mut self, animation: AnimationSpec) -> Self {
		self.animation = Some(animation);
		self
	}

	/// Places `item` in every listed slot.
	#[must_use]
	pub fn item<I>(mut self, slots: I, item: MenuItem) -> Self
	where
		I: IntoIterator<Item = u16>,
	{
		self.items.push((slots.into_iter().collect(), item));
		self
	}

	pub fn build(self) -> Result<Menu, MenuError> {
		let id = self.id.trim();
		if id.is_empty() {
			return Err(MenuError::EmptyId);
		}

		let mut slots: BTreeMap<SlotIndex, Arc<MenuItem>> = BTreeMap::new();
		for (indices, item) in self.items {
			if indices.is_empty() {
				return Err(MenuError::NoSlots {
					menu: id.to_string(),
					item: item.id,
				});
			}

			let item = Arc::new(item);
			for raw in indices {
				let slot = SlotIndex(raw);
				if !self.size.contains(slot) {
					return Err(MenuError::SlotOutOfRange {
						menu: id.to_string(),
						slot: raw,
						size: self.size.slots(),
					});
				}
				if let Some(existing) = slots.get(&slot) {
					return Err(MenuError::SlotConflict {
						menu: id.to_string(),
						slot: raw,
						first: existing.id.clone(),
						second: item.id.clone(),
					});
				}
				slots.insert(slot, Arc::clone(&item));
			}
		}

		Ok(Menu {
			id: Arc::from(id),
			title: self.title,
			size: self.size,
			alias: self.alias.map(Arc::from),
			animation: self.animation,
			slots,
		})
	}
}
