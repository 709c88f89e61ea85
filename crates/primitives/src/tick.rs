use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Rate of the host's fixed tick clock.
///
/// Animation intervals are expressed in ticks; this converts them to wall-clock
/// durations for the timer runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TickRate {
	ticks_per_second: u32,
}

impl TickRate {
	/// The reference host runs at 20 ticks per second.
	pub const DEFAULT: Self = Self { ticks_per_second: 20 };

	/// Creates a tick rate, clamping zero to one tick per second.
	pub const fn new(ticks_per_second: u32) -> Self {
		Self {
			ticks_per_second: if ticks_per_second == 0 { 1 } else { ticks_per_second },
		}
	}

	pub const fn ticks_per_second(self) -> u32 {
		self.ticks_per_second
	}

	/// Duration of a single tick.
	pub fn tick(self) -> Duration {
		Duration::from_secs(1) / self.ticks_per_second.max(1)
	}

	/// Duration of `ticks` ticks. Zero ticks is treated as one.
	pub fn ticks(self, ticks: u32) -> Duration {
		self.tick() * ticks.max(1)
	}
}

impl Default for TickRate {
	fn default() -> Self {
		Self::DEFAULT
	}
}
