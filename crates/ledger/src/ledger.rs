use std::collections::BTreeMap;

use coffer_primitives::{ItemIdentity, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxHashMap;

use crate::error::LedgerError;
use crate::store::LedgerSnapshot;

type Book = FxHashMap<ItemIdentity, u64>;

/// Concurrent per-user quantity store.
///
/// Each user's book sits behind one shard lock of the outer map, so every mutation of
/// a `(user, identity)` pair is a single read-modify-write under that lock. Guards are
/// never held across calls out of this type.
///
/// Zero quantities are pruned, and so are books left empty; an absent entry reads as
/// zero.
#[derive(Debug, Default)]
pub struct Ledger {
	books: DashMap<UserId, Book>,
}

impl Ledger {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stored quantity, or zero when the user holds none.
	pub fn get_quantity(&self, user: UserId, item: &ItemIdentity) -> u64 {
		self.books
			.get(&user)
			.and_then(|book| book.get(item).copied())
			.unwrap_or(0)
	}

	/// Replaces the stored quantity. Zero removes the entry.
	pub fn set_quantity(&self, user: UserId, item: &ItemIdentity, quantity: i64) -> Result<(), LedgerError> {
		let Ok(quantity) = u64::try_from(quantity) else {
			return Err(LedgerError::InvalidQuantity {
				item: item.clone(),
				quantity: i128::from(quantity),
			});
		};

		self.edit_book(user, |book| {
			store(book, item, quantity);
			Ok(())
		})?;
		tracing::trace!(%user, %item, quantity, "ledger.set");
		Ok(())
	}

	/// Applies `delta` atomically and returns the new quantity.
	///
	/// Fails with [`LedgerError::InsufficientQuantity`] when the result would be
	/// negative; the stored value is left untouched on any failure.
	pub fn adjust_quantity(&self, user: UserId, item: &ItemIdentity, delta: i64) -> Result<u64, LedgerError> {
		let next = self.edit_book(user, |book| {
			let held = book.get(item).copied().unwrap_or(0);
			let next = apply_delta(item, held, delta)?;
			store(book, item, next);
			Ok(next)
		})?;

		tracing::trace!(%user, %item, delta, quantity = next, "ledger.adjust");
		Ok(next)
	}

	/// Every identity the user holds a positive quantity of.
	pub fn list_held(&self, user: UserId) -> BTreeMap<ItemIdentity, u64> {
		self.books
			.get(&user)
			.map(|book| {
				book.iter()
					.filter(|(_, qty)| **qty > 0)
					.map(|(id, qty)| (id.clone(), *qty))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Users with at least one stored entry.
	pub fn users(&self) -> Vec<UserId> {
		let mut users: Vec<_> = self
			.books
			.iter()
			.filter(|book| !book.value().is_empty())
			.map(|book| *book.key())
			.collect();
		users.sort_unstable();
		users
	}

	/// Copies the user's holdings out for persistence.
	pub fn snapshot(&self, user: UserId) -> LedgerSnapshot {
		LedgerSnapshot {
			entries: self.list_held(user),
		}
	}

	/// Replaces the user's whole book with `snapshot`.
	pub fn restore(&self, user: UserId, snapshot: LedgerSnapshot) {
		let book: Book = snapshot.entries.into_iter().filter(|(_, qty)| *qty > 0).collect();
		tracing::debug!(%user, entries = book.len(), "ledger.restore");
		if book.is_empty() {
			self.books.remove(&user);
		} else {
			self.books.insert(user, book);
		}
	}

	/// Unloads the user's book, returning what it held.
	pub fn forget(&self, user: UserId) -> Option<LedgerSnapshot> {
		let (_, book) = self.books.remove(&user)?;
		Some(LedgerSnapshot {
			entries: book.into_iter().filter(|(_, qty)| *qty > 0).collect(),
		})
	}
}

impl Ledger {
	/// Runs `edit` on the user's book under its shard lock. A book that ends up empty
	/// is dropped before the lock is released, and none is created for a failed edit.
	fn edit_book<T>(&self, user: UserId, edit: impl FnOnce(&mut Book) -> Result<T, LedgerError>) -> Result<T, LedgerError> {
		match self.books.entry(user) {
			Entry::Occupied(mut entry) => {
				let result = edit(entry.get_mut());
				if entry.get().is_empty() {
					entry.remove();
				}
				result
			}
			Entry::Vacant(entry) => {
				let mut book = Book::default();
				let result = edit(&mut book)?;
				if !book.is_empty() {
					entry.insert(book);
				}
				Ok(result)
			}
		}
	}
}

fn store(book: &mut Book, item: &ItemIdentity, quantity: u64) {
	if quantity == 0 {
		book.remove(item);
	} else {
		book.insert(item.clone(), quantity);
	}
}

fn apply_delta(item: &ItemIdentity, held: u64, delta: i64) -> Result<u64, LedgerError> {
	if delta >= 0 {
		return held.checked_add(delta.unsigned_abs()).ok_or_else(|| LedgerError::InvalidQuantity {
			item: item.clone(),
			quantity: i128::from(held) + i128::from(delta),
		});
	}

	let requested = delta.unsigned_abs();
	held.checked_sub(requested).ok_or_else(|| LedgerError::InsufficientQuantity {
		item: item.clone(),
		held,
		requested,
	})
}
