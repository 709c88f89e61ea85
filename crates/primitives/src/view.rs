use std::fmt;

/// Identifies one opened container view. A fresh id is issued every time a menu is
/// opened, so a reopened menu never shares an id with the view it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "view#{}", self.0)
	}
}
