//! Shared fixtures: a recording host and a small menu set.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use coffer_engine::{Engine, Host};
use coffer_primitives::{ItemIdentity, UserId, ViewId};
use coffer_registry::{Menu, MenuFile};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	Opened { user: UserId, view: ViewId, menu: String },
	Title { user: UserId, view: ViewId, title: String },
	Closed(UserId),
	Message(UserId, String),
	Command(UserId, String),
	Storage(UserId, usize),
}

/// Host double that records every call and answers from configurable sets.
#[derive(Debug, Default)]
pub struct RecordingHost {
	events: Mutex<Vec<Event>>,
	permissions: Mutex<FxHashSet<(UserId, String)>>,
	offline: Mutex<FxHashSet<UserId>>,
	hold: Mutex<Option<OpenHold>>,
}

/// Parks the next `open_view` call until released.
#[derive(Debug)]
struct OpenHold {
	entered: Sender<()>,
	release: Receiver<()>,
}

impl RecordingHost {
	pub fn grant(&self, user: UserId, node: &str) {
		self.permissions.lock().insert((user, node.to_string()));
	}

	pub fn set_offline(&self, user: UserId) {
		self.offline.lock().insert(user);
	}

	/// The next `open_view` signals the returned receiver, then blocks until the
	/// returned sender fires.
	pub fn hold_next_open(&self) -> (Receiver<()>, Sender<()>) {
		let (entered_tx, entered_rx) = channel();
		let (release_tx, release_rx) = channel();
		*self.hold.lock() = Some(OpenHold {
			entered: entered_tx,
			release: release_rx,
		});
		(entered_rx, release_tx)
	}

	pub fn events(&self) -> Vec<Event> {
		self.events.lock().clone()
	}

	pub fn clear(&self) {
		self.events.lock().clear();
	}

	pub fn titles(&self, user: UserId) -> Vec<String> {
		self.events
			.lock()
			.iter()
			.filter_map(|event| match event {
				Event::Title { user: who, title, .. } if *who == user => Some(title.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn messages(&self, user: UserId) -> Vec<String> {
		self.events
			.lock()
			.iter()
			.filter_map(|event| match event {
				Event::Message(who, text) if *who == user => Some(text.clone()),
				_ => None,
			})
			.collect()
	}

	fn record(&self, event: Event) {
		self.events.lock().push(event);
	}
}

impl Host for RecordingHost {
	fn is_online(&self, user: UserId) -> bool {
		!self.offline.lock().contains(&user)
	}

	fn has_permission(&self, user: UserId, node: &str) -> bool {
		self.permissions.lock().contains(&(user, node.to_string()))
	}

	fn open_view(&self, user: UserId, view: ViewId, menu: &Menu) {
		self.record(Event::Opened {
			user,
			view,
			menu: menu.id().to_string(),
		});
		let hold = self.hold.lock().take();
		if let Some(hold) = hold {
			let _ = hold.entered.send(());
			let _ = hold.release.recv();
		}
	}

	fn set_title(&self, user: UserId, view: ViewId, title: &str) {
		self.record(Event::Title {
			user,
			view,
			title: title.to_string(),
		});
	}

	fn close_view(&self, user: UserId) {
		self.record(Event::Closed(user));
	}

	fn send_message(&self, user: UserId, text: &str) {
		self.record(Event::Message(user, text.to_string()));
	}

	fn run_command(&self, user: UserId, line: &str) -> Result<(), String> {
		self.record(Event::Command(user, line.to_string()));
		Ok(())
	}

	fn open_storage(&self, user: UserId, held: &BTreeMap<ItemIdentity, u64>) -> Result<(), String> {
		self.record(Event::Storage(user, held.len()));
		Ok(())
	}
}

pub const MENUS: &str = r#"
[menus.shop]
title = "Shop"
size = 27
alias = "store"
animation = { frames = ["Shop", "Shop.", "Shop.."], interval_ticks = 2 }

[menus.shop.items.buy_sword]
slot = 13
requirements = [{ type = "item", item = "minecraft:emerald", amount = 5 }]
actions = [
	{ type = "consume", item = "minecraft:emerald", amount = 5 },
	{ type = "give", item = "nexo:custom:sword", amount = 1 },
]
deny_actions = [{ type = "message", text = "Need 5 emeralds" }]

[menus.shop.items.broken]
slot = 14
actions = [
	{ type = "consume", item = "minecraft:emerald", amount = 1 },
	{ type = "open_menu", menu = "ghost" },
	{ type = "give", item = "minecraft:diamond", amount = 1 },
]

[menus.shop.items.vip]
slot = 15
requirements = [{ type = "permission", node = "shop.vip" }]
actions = [{ type = "open_menu", menu = "vault" }]

[menus.shop.items.warp]
slot = 16
actions = [{ type = "command", line = "spawn" }]

[menus.shop.items.leave]
slot = 26
actions = [{ type = "close" }]

[menus.vault]
title = "Vault"
size = 9

[menus.vault.items.storage]
slot = 0
actions = [{ type = "open_storage" }]
"#;

pub fn emerald() -> ItemIdentity {
	ItemIdentity::vanilla("emerald").unwrap()
}

pub fn sword() -> ItemIdentity {
	ItemIdentity::custom("custom:sword").unwrap()
}

/// Engine over a fresh recording host with [`MENUS`] loaded.
pub fn engine() -> (Engine, Arc<RecordingHost>) {
	let _ = tracing_subscriber::fmt::try_init();
	let host = Arc::new(RecordingHost::default());
	let engine = Engine::builder(Arc::clone(&host) as Arc<dyn Host>).build();
	engine.load_menus(MenuFile::from_toml_str(MENUS).unwrap()).unwrap();
	(engine, host)
}
