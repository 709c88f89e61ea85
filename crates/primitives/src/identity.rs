//! Item identities.
//!
//! An identity is a namespace plus a normalized code. Normalization runs once at
//! construction so two spellings of the same item always compare equal:
//!
//! - vanilla codes are lowercase and use `_` as the only word separator
//!   (`Diamond-Sword`, `diamond sword` and `DIAMOND_SWORD` are all `diamond_sword`);
//! - custom codes are lowercase, keep `:` as their namespace separator and use `_`
//!   inside names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Textual prefix of the vanilla namespace (`minecraft:diamond`).
pub const VANILLA_PREFIX: &str = "minecraft";
/// Textual prefix of the custom item namespace (`nexo:custom:sword`).
pub const CUSTOM_PREFIX: &str = "nexo";

/// Catalog an item code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
	/// Fixed catalog of built-in materials.
	Vanilla,
	/// Open-ended catalog provided by an item addon.
	Custom,
}

impl Namespace {
	pub const fn prefix(self) -> &'static str {
		match self {
			Self::Vanilla => VANILLA_PREFIX,
			Self::Custom => CUSTOM_PREFIX,
		}
	}

	/// Maps a textual prefix to its namespace, ignoring ASCII case.
	pub fn from_prefix(prefix: &str) -> Option<Self> {
		if prefix.eq_ignore_ascii_case(VANILLA_PREFIX) {
			Some(Self::Vanilla)
		} else if prefix.eq_ignore_ascii_case(CUSTOM_PREFIX) {
			Some(Self::Custom)
		} else {
			None
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
	#[error("empty item code")]
	Empty,
	#[error("invalid character {ch:?} in item code {code:?}")]
	InvalidChar { code: String, ch: char },
}

/// Namespaced item identity with a normalized code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemIdentity {
	namespace: Namespace,
	code: Box<str>,
}

impl ItemIdentity {
	/// Builds a vanilla identity, normalizing the code.
	pub fn vanilla(code: &str) -> Result<Self, IdentityError> {
		Ok(Self {
			namespace: Namespace::Vanilla,
			code: normalize(code, Namespace::Vanilla)?.into(),
		})
	}

	/// Builds a custom identity, normalizing the code.
	pub fn custom(code: &str) -> Result<Self, IdentityError> {
		Ok(Self {
			namespace: Namespace::Custom,
			code: normalize(code, Namespace::Custom)?.into(),
		})
	}

	pub fn new(namespace: Namespace, code: &str) -> Result<Self, IdentityError> {
		match namespace {
			Namespace::Vanilla => Self::vanilla(code),
			Namespace::Custom => Self::custom(code),
		}
	}

	pub const fn namespace(&self) -> Namespace {
		self.namespace
	}

	pub fn code(&self) -> &str {
		&self.code
	}

	/// Code with every separator (`:`, `_`, `-`) folded to `-`.
	///
	/// Used to match placeholder tokens, which cannot carry `:` or `_`, against
	/// held identities.
	pub fn flattened(&self) -> String {
		flatten(&self.code)
	}
}

/// Folds every separator in `raw` to `-` and lowercases it.
pub fn flatten(raw: &str) -> String {
	raw.trim()
		.chars()
		.map(|ch| match ch {
			':' | '_' | '-' | ' ' => '-',
			other => other.to_ascii_lowercase(),
		})
		.collect()
}

fn normalize(raw: &str, namespace: Namespace) -> Result<String, IdentityError> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Err(IdentityError::Empty);
	}

	let mut out = String::with_capacity(trimmed.len());
	for ch in trimmed.chars() {
		let mapped = match ch {
			'A'..='Z' => ch.to_ascii_lowercase(),
			'a'..='z' | '0'..='9' | '_' | '.' | '/' => ch,
			'-' | ' ' => '_',
			':' if namespace == Namespace::Custom => ':',
			_ => {
				return Err(IdentityError::InvalidChar {
					code: raw.to_string(),
					ch,
				});
			}
		};
		out.push(mapped);
	}
	Ok(out)
}

impl fmt::Display for ItemIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace.prefix(), self.code)
	}
}

/// Parses the configuration spelling of an identity.
///
/// `minecraft:<code>` and `nexo:<code>` select the namespace explicitly. A bare code
/// containing `:` is taken as custom, any other bare code as vanilla.
impl FromStr for ItemIdentity {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if let Some((prefix, rest)) = s.split_once(':')
			&& let Some(namespace) = Namespace::from_prefix(prefix)
		{
			return Self::new(namespace, rest);
		}
		if s.contains(':') { Self::custom(s) } else { Self::vanilla(s) }
	}
}

impl TryFrom<String> for ItemIdentity {
	type Error = IdentityError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<ItemIdentity> for String {
	fn from(value: ItemIdentity) -> Self {
		value.to_string()
	}
}
