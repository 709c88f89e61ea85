//! Runtime plumbing for coffer: classified task spawning and the per-user caption
//! [`AnimationScheduler`] with generation-scoped sessions.

mod animation;
mod class;
mod spawn;

pub use animation::{AnimationScheduler, FrameSink, ViewProbe};
pub use class::TaskClass;
pub use spawn::{SpawnError, spawn};
