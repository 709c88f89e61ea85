use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
	#[error("no tokio runtime available: {0}")]
	NoRuntime(String),
}

fn runtime_handle() -> Result<Handle, SpawnError> {
	if let Ok(handle) = Handle::try_current() {
		return Ok(handle);
	}

	static GLOBAL_RT: OnceLock<Result<Runtime, String>> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("coffer-worker-global")
			.build()
			.map_err(|err| err.to_string())
	});
	match runtime {
		Ok(rt) => Ok(rt.handle().clone()),
		Err(reason) => Err(SpawnError::NoRuntime(reason.clone())),
	}
}

/// Spawns `fut` on the ambient runtime, falling back to a lazily built shared
/// runtime when called from outside one.
pub fn spawn<F>(class: TaskClass, fut: F) -> Result<JoinHandle<F::Output>, SpawnError>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	Ok(runtime_handle()?.spawn(fut))
}
