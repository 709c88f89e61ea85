/// Execution classes used to label spawned work in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Periodic per-user caption animation driven by the tick clock.
	Animation,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Animation => "animation",
		}
	}
}
