//! The engine context.
//!
//! # Role
//!
//! [`Engine`] owns every runtime component and is the only entry point the host talks
//! to: it opens menus, receives view-close, disconnect and click events, answers
//! placeholder queries and runs the two commands.
//!
//! # Lifecycle
//!
//! [`EngineBuilder::build`] constructs components in dependency order: ledger, menu
//! registry, open-view table and animation scheduler, then the dispatcher.
//! [`Engine::shutdown`] stops every animation session before anything else is
//! released. [`Engine::reload`] validates the new menus first and stops sessions only
//! once publication can no longer fail.

use std::sync::Arc;

use coffer_ledger::{CustomCatalog, Ledger, LedgerStore, NoCustomCatalog, Placeholder, QueryResolver};
use coffer_primitives::{UserId, VanillaCatalog, ViewId};
use coffer_registry::{Menu, MenuFile, MenuRegistry, MenuSet, SlotIndex};
use coffer_worker::{AnimationScheduler, FrameSink, ViewProbe};

use crate::config::EngineConfig;
use crate::context::{EngineEffects, EngineFacts};
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::EngineError;
use crate::host::{ClickKind, Host};
use crate::views::{OpenView, OpenViews};

/// Assembles an [`Engine`].
pub struct EngineBuilder {
	host: Arc<dyn Host>,
	config: EngineConfig,
	ledger: Option<Arc<Ledger>>,
	custom: Arc<dyn CustomCatalog>,
}

impl EngineBuilder {
	#[must_use]
	pub fn config(mut self, config: EngineConfig) -> Self {
		self.config = config;
		self
	}

	/// Shares an existing ledger instead of starting empty.
	#[must_use]
	pub fn ledger(mut self, ledger: Arc<Ledger>) -> Self {
		self.ledger = Some(ledger);
		self
	}

	/// Addon catalog consulted by placeholder queries for custom ids.
	#[must_use]
	pub fn custom_catalog(mut self, catalog: Arc<dyn CustomCatalog>) -> Self {
		self.custom = catalog;
		self
	}

	pub fn build(self) -> Engine {
		let ledger = self.ledger.unwrap_or_default();
		let registry = MenuRegistry::new();

		let views = Arc::new(OpenViews::default());
		let probe = Arc::new(ViewPresence {
			views: Arc::clone(&views),
			host: Arc::clone(&self.host),
		});
		let scheduler = AnimationScheduler::new(self.config.tick_rate, probe);

		let dispatcher = Dispatcher::new(self.config.messages.denied.clone());

		tracing::info!(tick_rate = self.config.tick_rate.ticks_per_second(), "engine.start");
		Engine {
			vanilla: self.config.vanilla_catalog(),
			config: self.config,
			host: self.host,
			ledger,
			custom: self.custom,
			registry,
			views,
			scheduler,
			dispatcher,
		}
	}
}

/// A view counts as open while it is the user's current view and the user is online.
struct ViewPresence {
	views: Arc<OpenViews>,
	host: Arc<dyn Host>,
}

impl ViewProbe for ViewPresence {
	fn is_view_open(&self, user: UserId, view: ViewId) -> bool {
		self.views.is_current(user, view) && self.host.is_online(user)
	}
}

/// Runtime context shared by every host event handler.
pub struct Engine {
	pub(crate) config: EngineConfig,
	pub(crate) host: Arc<dyn Host>,
	pub(crate) ledger: Arc<Ledger>,
	pub(crate) vanilla: VanillaCatalog,
	pub(crate) custom: Arc<dyn CustomCatalog>,
	pub(crate) registry: MenuRegistry,
	pub(crate) views: Arc<OpenViews>,
	pub(crate) scheduler: AnimationScheduler,
	pub(crate) dispatcher: Dispatcher,
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("menus", &self.registry.len())
			.field("open_views", &self.views.len())
			.field("scheduler", &self.scheduler)
			.finish_non_exhaustive()
	}
}

impl Engine {
	pub fn builder(host: Arc<dyn Host>) -> EngineBuilder {
		EngineBuilder {
			host,
			config: EngineConfig::default(),
			ledger: None,
			custom: Arc::new(NoCustomCatalog),
		}
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn ledger(&self) -> &Arc<Ledger> {
		&self.ledger
	}

	pub fn registry(&self) -> &MenuRegistry {
		&self.registry
	}

	pub fn scheduler(&self) -> &AnimationScheduler {
		&self.scheduler
	}

	/// Builds every menu in `file` and publishes them as the whole registry.
	pub fn load_menus(&self, file: MenuFile) -> Result<usize, EngineError> {
		let menus = file.into_menus()?;
		self.reload(menus)
	}

	/// Validates `menus`, stops all animation sessions, then publishes `menus` as the
	/// whole registry. A rejected set changes nothing.
	///
	/// Views already open keep their menu snapshot until reopened.
	pub fn reload(&self, menus: Vec<Menu>) -> Result<usize, EngineError> {
		let set = MenuSet::validate(menus)?;
		let stopped = self.scheduler.stop_all();
		let count = self.registry.install(set);
		tracing::info!(menus = count, stopped_sessions = stopped, "engine.reload");
		Ok(count)
	}

	/// Opens the menu named `name` (id first, then alias) for `user`.
	pub fn open_menu(&self, user: UserId, name: &str) -> Result<ViewId, EngineError> {
		let menu = self.registry.resolve(name).ok_or_else(|| EngineError::MenuNotFound { name: name.to_string() })?;
		Ok(self.open(user, menu))
	}

	/// Shows `menu` to `user` and starts its caption animation, replacing whatever the
	/// user had open.
	///
	/// When two opens race for one user, the scheduler drops the animation change of
	/// whichever view is no longer current, so the current view keeps its own state.
	pub fn open(&self, user: UserId, menu: Arc<Menu>) -> ViewId {
		let view = self.views.open(user, Arc::clone(&menu)).id;
		self.host.open_view(user, view, &menu);

		match menu.active_animation() {
			Some(spec) => {
				let host = Arc::clone(&self.host);
				let sink: Arc<dyn FrameSink> = Arc::new(move |user: UserId, frame: &str| host.set_title(user, view, frame));
				self.scheduler.start(user, view, spec, sink);
			}
			None => {
				self.scheduler.settle(user, view);
			}
		}

		tracing::debug!(%user, %view, menu = menu.id(), "engine.open");
		view
	}

	pub fn current_view(&self, user: UserId) -> Option<OpenView> {
		self.views.current(user)
	}

	/// Host notification that `view` was closed. Stale notifications for a view the
	/// user already replaced are ignored.
	pub fn on_view_close(&self, user: UserId, view: ViewId) {
		let closed = self.views.close(user, view);
		let stopped = self.scheduler.stop_view(user, view);
		tracing::debug!(%user, %view, closed, stopped, "engine.view_closed");
	}

	/// Closes the user's current view from the engine side.
	pub fn close_view(&self, user: UserId) {
		if let Some(open) = self.views.forget(user) {
			self.scheduler.stop_view(user, open.id);
		}
		self.host.close_view(user);
	}

	/// Host notification that `user` left the session.
	pub fn on_disconnect(&self, user: UserId) {
		let stopped = self.scheduler.stop(user);
		let had_view = self.views.forget(user).is_some();
		tracing::debug!(%user, stopped, had_view, "engine.disconnect");
	}

	/// Dispatches a click on `slot` of `view`. Clicks on a view that is no longer the
	/// user's current one are ignored.
	pub fn on_click(&self, user: UserId, view: ViewId, slot: SlotIndex, click: ClickKind) -> DispatchOutcome {
		let Some(open) = self.views.current(user).filter(|open| open.id == view) else {
			tracing::trace!(%user, %view, "engine.click_stale_view");
			return DispatchOutcome::Ignored;
		};

		let facts = EngineFacts::new(&self.ledger, self.host.as_ref());
		let mut effects = EngineEffects::new(self);
		let outcome = self.dispatcher.dispatch(user, &open.menu, slot, click, &facts, &mut effects);

		if matches!(outcome, DispatchOutcome::Failed { .. }) && !self.config.messages.action_failed.is_empty() {
			self.host.send_message(user, &self.config.messages.action_failed);
		}
		outcome
	}

	/// Answers one placeholder token for the acting user, if any.
	pub fn placeholder(&self, user: Option<UserId>, token: &str) -> Placeholder {
		QueryResolver::new(&self.ledger, &self.vanilla, self.custom.as_ref()).query(user, token)
	}

	/// Opens the virtual storage view for `user`.
	pub fn open_storage(&self, user: UserId) -> Result<(), String> {
		let held = self.ledger.list_held(user);
		tracing::debug!(%user, entries = held.len(), "engine.open_storage");
		self.host.open_storage(user, &held)
	}

	/// Loads the user's ledger book from `store`, replacing what is in memory.
	pub fn load_user(&self, store: &dyn LedgerStore, user: UserId) -> Result<(), EngineError> {
		Ok(self.ledger.load_from(store, user)?)
	}

	pub fn save_user(&self, store: &dyn LedgerStore, user: UserId) -> Result<(), EngineError> {
		Ok(self.ledger.save_to(store, user)?)
	}

	/// Stops every animation session, then releases views, registry and ledger.
	pub fn shutdown(self) {
		let stopped = self.scheduler.stop_all();
		let views = self.views.clear();
		tracing::info!(stopped_sessions = stopped, open_views = views, "engine.shutdown");
	}
}
