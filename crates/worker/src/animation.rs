//! Per-user caption animation.
//!
//! # Role
//!
//! Runs at most one periodic caption task per user. Each task advances a frame index
//! every `interval_ticks` host ticks and hands the new frame to a [`FrameSink`].
//!
//! # Invariants
//!
//! - The session table holds at most one record per user. `start` cancels the previous
//!   record's token inside the same critical section that installs the new one.
//! - `start` installs nothing for a view the [`ViewProbe`] reports closed, checked under
//!   the table lock. A late start for a replaced view leaves the newer session running.
//! - A task removes only the record carrying its own generation, so a task winding
//!   down can never evict the session that replaced it.
//! - Before every push the task re-checks its token and asks the [`ViewProbe`] whether
//!   the view is still open; a closed view ends the session without a push.
//! - A panicking sink is logged and the session keeps running; other users' tasks are
//!   independent.
//! - The table lock is never held across an await or while calling a sink. The probe
//!   runs under it during `start`, so a probe must not call back into the scheduler.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use coffer_primitives::{TickRate, UserId, ViewId};
use coffer_registry::AnimationSpec;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{TaskClass, spawn};

/// Receives caption frames. Implemented by the renderer collaborator.
pub trait FrameSink: Send + Sync + 'static {
	fn push_frame(&self, user: UserId, frame: &str);
}

impl<F> FrameSink for F
where
	F: Fn(UserId, &str) + Send + Sync + 'static,
{
	fn push_frame(&self, user: UserId, frame: &str) {
		self(user, frame);
	}
}

/// Answers whether a user still has a given view open. Implemented by presence.
pub trait ViewProbe: Send + Sync + 'static {
	fn is_view_open(&self, user: UserId, view: ViewId) -> bool;
}

impl<F> ViewProbe for F
where
	F: Fn(UserId, ViewId) -> bool + Send + Sync + 'static,
{
	fn is_view_open(&self, user: UserId, view: ViewId) -> bool {
		self(user, view)
	}
}

#[derive(Debug)]
struct Session {
	generation: u64,
	cancel: CancellationToken,
	view: ViewId,
	frame_index: Arc<AtomicUsize>,
}

type SessionTable = Arc<Mutex<FxHashMap<UserId, Session>>>;

/// Owns every live animation session, keyed by user.
pub struct AnimationScheduler {
	tick_rate: TickRate,
	probe: Arc<dyn ViewProbe>,
	/// Last generation handed out; a session's generation is unique per scheduler.
	generation: AtomicU64,
	sessions: SessionTable,
}

impl std::fmt::Debug for AnimationScheduler {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnimationScheduler")
			.field("tick_rate", &self.tick_rate)
			.field("active_sessions", &self.active_sessions())
			.finish_non_exhaustive()
	}
}

impl AnimationScheduler {
	pub fn new(tick_rate: TickRate, probe: Arc<dyn ViewProbe>) -> Self {
		Self {
			tick_rate,
			probe,
			generation: AtomicU64::new(0),
			sessions: Arc::default(),
		}
	}

	pub fn tick_rate(&self) -> TickRate {
		self.tick_rate
	}

	/// Starts animating `view` for `user`, replacing any session the user already has.
	///
	/// A spec with fewer than two frames starts nothing; see [`Self::settle`]. Nothing
	/// changes when the probe already reports `view` closed, which is how a start that
	/// lost a race against a newer view's open is dropped. Returns whether a session is
	/// now running for `view`.
	pub fn start(&self, user: UserId, view: ViewId, spec: &AnimationSpec, sink: Arc<dyn FrameSink>) -> bool {
		if !spec.is_animated() {
			self.settle(user, view);
			return false;
		}

		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		let cancel = CancellationToken::new();
		let frame_index = Arc::new(AtomicUsize::new(0));
		let task = SessionTask {
			user,
			view,
			generation,
			frames: spec.shared_frames(),
			period: self.tick_rate.ticks(spec.interval_ticks()),
			cancel: cancel.clone(),
			frame_index: Arc::clone(&frame_index),
			sink,
			probe: Arc::clone(&self.probe),
			sessions: Arc::clone(&self.sessions),
		};

		{
			let mut sessions = self.sessions.lock();
			if !self.probe.is_view_open(user, view) {
				tracing::debug!(%user, %view, "animation.start_superseded");
				return false;
			}
			if let Some(previous) = sessions.remove(&user) {
				previous.cancel.cancel();
				tracing::debug!(%user, generation = previous.generation, "animation.replace");
			}
			sessions.insert(
				user,
				Session {
					generation,
					cancel: cancel.clone(),
					view,
					frame_index,
				},
			);
		}

		if let Err(err) = spawn(TaskClass::Animation, task.run()) {
			tracing::warn!(%user, error = %err, "animation.spawn_failed");
			remove_generation(&self.sessions, user, generation);
			cancel.cancel();
			return false;
		}

		tracing::debug!(
			%user,
			%view,
			generation,
			frames = spec.frames().len(),
			interval_ticks = spec.interval_ticks(),
			"animation.start"
		);
		true
	}

	/// Leaves `user` idle because `view` opened without an animation. Ignored once the
	/// probe reports `view` closed, so a late open cannot stop a newer view's session.
	/// Returns whether a session was stopped.
	pub fn settle(&self, user: UserId, view: ViewId) -> bool {
		let removed = {
			let mut sessions = self.sessions.lock();
			if !self.probe.is_view_open(user, view) {
				return false;
			}
			sessions.remove(&user)
		};
		match removed {
			Some(session) => {
				session.cancel.cancel();
				tracing::debug!(%user, %view, generation = session.generation, "animation.settle");
				true
			}
			None => false,
		}
	}

	/// Stops the user's session. Returns whether one was running; calling it on an
	/// idle user is a no-op.
	pub fn stop(&self, user: UserId) -> bool {
		let removed = self.sessions.lock().remove(&user);
		match removed {
			Some(session) => {
				session.cancel.cancel();
				tracing::debug!(%user, generation = session.generation, "animation.stop");
				true
			}
			None => false,
		}
	}

	/// Stops the session only when it animates `view`. Used for view-close events,
	/// which may arrive after a newer view has already replaced the closed one.
	pub fn stop_view(&self, user: UserId, view: ViewId) -> bool {
		let removed = {
			let mut sessions = self.sessions.lock();
			match sessions.get(&user) {
				Some(session) if session.view == view => sessions.remove(&user),
				_ => None,
			}
		};
		match removed {
			Some(session) => {
				session.cancel.cancel();
				tracing::debug!(%user, %view, "animation.stop_view");
				true
			}
			None => false,
		}
	}

	/// Cancels every session. Returns how many were running.
	pub fn stop_all(&self) -> usize {
		let drained: Vec<Session> = self.sessions.lock().drain().map(|(_, session)| session).collect();
		for session in &drained {
			session.cancel.cancel();
		}
		if !drained.is_empty() {
			tracing::debug!(sessions = drained.len(), "animation.stop_all");
		}
		drained.len()
	}

	pub fn is_animating(&self, user: UserId) -> bool {
		self.sessions.lock().contains_key(&user)
	}

	pub fn active_sessions(&self) -> usize {
		self.sessions.lock().len()
	}

	/// Index of the frame most recently pushed to the user, `0` before the first tick.
	pub fn frame_index(&self, user: UserId) -> Option<usize> {
		self.sessions
			.lock()
			.get(&user)
			.map(|session| session.frame_index.load(Ordering::Acquire))
	}

	/// View currently animated for the user.
	pub fn animated_view(&self, user: UserId) -> Option<ViewId> {
		self.sessions.lock().get(&user).map(|session| session.view)
	}
}

impl Drop for AnimationScheduler {
	fn drop(&mut self) {
		self.stop_all();
	}
}

fn remove_generation(sessions: &Mutex<FxHashMap<UserId, Session>>, user: UserId, generation: u64) -> bool {
	let mut sessions = sessions.lock();
	match sessions.get(&user) {
		Some(session) if session.generation == generation => {
			sessions.remove(&user);
			true
		}
		_ => false,
	}
}

struct SessionTask {
	user: UserId,
	view: ViewId,
	generation: u64,
	frames: Arc<[String]>,
	period: Duration,
	cancel: CancellationToken,
	frame_index: Arc<AtomicUsize>,
	sink: Arc<dyn FrameSink>,
	probe: Arc<dyn ViewProbe>,
	sessions: SessionTable,
}

impl SessionTask {
	async fn run(self) {
		let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				biased;
				() = self.cancel.cancelled() => break,
				_ = ticker.tick() => {}
			}
			if !self.step() {
				break;
			}
		}

		tracing::trace!(user = %self.user, generation = self.generation, "animation.session_end");
	}

	/// Advances one frame. Returns `false` once the session is over.
	fn step(&self) -> bool {
		if self.cancel.is_cancelled() {
			return false;
		}
		if !self.probe.is_view_open(self.user, self.view) {
			self.cancel.cancel();
			if remove_generation(&self.sessions, self.user, self.generation) {
				tracing::debug!(user = %self.user, view = %self.view, "animation.view_gone");
			}
			return false;
		}

		let next = (self.frame_index.load(Ordering::Acquire) + 1) % self.frames.len();
		self.frame_index.store(next, Ordering::Release);
		let Some(frame) = self.frames.get(next) else {
			return false;
		};

		tracing::trace!(user = %self.user, frame = next, "animation.push");
		let pushed = catch_unwind(AssertUnwindSafe(|| self.sink.push_frame(self.user, frame)));
		if let Err(payload) = pushed {
			tracing::warn!(user = %self.user, panic = panic_message(payload.as_ref()), "animation.push_panicked");
		}
		true
	}
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		msg
	} else if let Some(msg) = payload.downcast_ref::<String>() {
		msg
	} else {
		"<non-string panic payload>"
	}
}
