use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one connected user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
	pub const fn from_uuid(uuid: Uuid) -> Self {
		Self(uuid)
	}

	/// Generates a fresh random id.
	pub fn random() -> Self {
		Self(Uuid::new_v4())
	}

	pub const fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl From<Uuid> for UserId {
	fn from(uuid: Uuid) -> Self {
		Self(uuid)
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for UserId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s.trim()).map(Self)
	}
}
