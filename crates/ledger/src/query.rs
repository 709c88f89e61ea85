//! `amt_` placeholder resolution.
//!
//! Token grammar (matched case-insensitively):
//!
//! ```text
//! amt_nexo-<custom id, dashes for colons>
//! amt_minecraft-<vanilla code, dashes for underscores>
//! amt_<bare id>            custom namespace first, then vanilla
//! ```
//!
//! Any identity that cannot be resolved reads as `"0"`. Without an acting user the
//! result is the empty string, and tokens outside the family are reported as
//! [`Placeholder::Unhandled`] so the caller can try the next placeholder provider.

use coffer_primitives::identity::flatten;
use coffer_primitives::{ItemIdentity, Namespace, UserId, VanillaCatalog};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Prefix of every token this resolver answers.
pub const PLACEHOLDER_PREFIX: &str = "amt_";

/// Outcome of one placeholder query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
	/// The token belongs to this family; substitute the text.
	Value(String),
	/// The token belongs to another placeholder family.
	Unhandled,
}

impl Placeholder {
	pub fn as_value(&self) -> Option<&str> {
		match self {
			Self::Value(text) => Some(text),
			Self::Unhandled => None,
		}
	}
}

/// External catalog of custom (addon) item ids.
pub trait CustomCatalog: Send + Sync {
	/// Returns true when `code` (normalized, `:`-separated) names a known custom item.
	fn contains(&self, code: &str) -> bool;
}

/// Custom catalog that knows no items; only held identities resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCustomCatalog;

impl CustomCatalog for NoCustomCatalog {
	fn contains(&self, _code: &str) -> bool {
		false
	}
}

/// Resolves placeholder tokens against a ledger and both item catalogs.
pub struct QueryResolver<'a> {
	ledger: &'a Ledger,
	vanilla: &'a VanillaCatalog,
	custom: &'a dyn CustomCatalog,
}

impl<'a> QueryResolver<'a> {
	pub fn new(ledger: &'a Ledger, vanilla: &'a VanillaCatalog, custom: &'a dyn CustomCatalog) -> Self {
		Self { ledger, vanilla, custom }
	}

	/// Answers one placeholder token.
	pub fn query(&self, user: Option<UserId>, token: &str) -> Placeholder {
		let Some(spec) = strip_prefix_ignore_case(token.trim(), PLACEHOLDER_PREFIX) else {
			return Placeholder::Unhandled;
		};
		let Some(user) = user else {
			return Placeholder::Value(String::new());
		};

		match self.resolve(user, spec) {
			Ok(item) => Placeholder::Value(self.ledger.get_quantity(user, &item).to_string()),
			Err(err) => {
				tracing::trace!(%user, token, error = %err, "placeholder.unresolved");
				Placeholder::Value("0".to_string())
			}
		}
	}

	/// Resolves the part of a token after `amt_` to an identity.
	pub fn resolve(&self, user: UserId, spec: &str) -> Result<ItemIdentity, LedgerError> {
		let unresolved = || LedgerError::UnresolvedIdentity { token: spec.to_string() };

		if let Some((prefix, rest)) = spec.split_once('-')
			&& let Some(namespace) = Namespace::from_prefix(prefix)
		{
			return match namespace {
				Namespace::Custom => self.custom_identity(user, rest, true),
				Namespace::Vanilla => self.vanilla.resolve(&rest.replace('-', "_")),
			}
			.ok_or_else(unresolved);
		}

		self.custom_identity(user, spec, false)
			.or_else(|| self.vanilla.resolve(&spec.replace('-', "_")))
			.ok_or_else(unresolved)
	}

	/// Custom lookup: exact id from the addon catalog or the user's holdings, then a
	/// separator-insensitive match over what the user holds.
	///
	/// With `explicit` set the literal identity is returned even when nothing matches,
	/// so an explicitly namespaced token reads the (possibly zero) stored value.
	fn custom_identity(&self, user: UserId, raw: &str, explicit: bool) -> Option<ItemIdentity> {
		let candidate = ItemIdentity::custom(&raw.replace('-', ":")).ok()?;
		if self.custom.contains(candidate.code()) || self.ledger.get_quantity(user, &candidate) > 0 {
			return Some(candidate);
		}

		let wanted = flatten(raw);
		let held = self
			.ledger
			.list_held(user)
			.into_keys()
			.find(|id| id.namespace() == Namespace::Custom && id.flattened() == wanted);

		held.or_else(|| explicit.then_some(candidate))
	}
}

fn strip_prefix_ignore_case<'t>(token: &'t str, prefix: &str) -> Option<&'t str> {
	let head = token.get(..prefix.len())?;
	head.eq_ignore_ascii_case(prefix).then(|| &token[prefix.len()..])
}
