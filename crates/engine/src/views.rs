use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use coffer_primitives::{UserId, ViewId};
use coffer_registry::Menu;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// A menu view a user currently has open.
#[derive(Debug, Clone)]
pub struct OpenView {
	pub id: ViewId,
	/// Menu instance captured at open time. Registry replacements do not affect it.
	pub menu: Arc<Menu>,
}

/// Tracks the one open view per user.
#[derive(Debug, Default)]
pub(crate) struct OpenViews {
	/// Last issued view id; ids start at 1.
	last_id: AtomicU64,
	views: Mutex<FxHashMap<UserId, OpenView>>,
}

impl OpenViews {
	/// Records `menu` as the user's open view, replacing any previous one.
	pub fn open(&self, user: UserId, menu: Arc<Menu>) -> OpenView {
		let view = OpenView {
			id: ViewId(self.last_id.fetch_add(1, Ordering::Relaxed) + 1),
			menu,
		};
		self.views.lock().insert(user, view.clone());
		view
	}

	pub fn current(&self, user: UserId) -> Option<OpenView> {
		self.views.lock().get(&user).cloned()
	}

	pub fn is_current(&self, user: UserId, view: ViewId) -> bool {
		self.views.lock().get(&user).is_some_and(|open| open.id == view)
	}

	/// Forgets the view only when it is still the user's current one.
	pub fn close(&self, user: UserId, view: ViewId) -> bool {
		let mut views = self.views.lock();
		if views.get(&user).is_some_and(|open| open.id == view) {
			views.remove(&user);
			true
		} else {
			false
		}
	}

	pub fn forget(&self, user: UserId) -> Option<OpenView> {
		self.views.lock().remove(&user)
	}

	pub fn clear(&self) -> usize {
		let mut views = self.views.lock();
		let count = views.len();
		views.clear();
		count
	}

	pub fn len(&self) -> usize {
		self.views.lock().len()
	}
}
