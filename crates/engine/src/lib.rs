//! Coffer engine: the explicit runtime context tying the ledger, menu registry,
//! animation scheduler and click dispatcher to a hosting session.

mod command;
/// Engine configuration file.
pub mod config;
mod context;
mod dispatch;
mod engine;
mod error;
/// Collaborator traits implemented by the host.
pub mod host;
mod views;

pub use command::CommandOutcome;
pub use config::{EngineConfig, Messages, Permissions};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use engine::{Engine, EngineBuilder};
pub use error::{ConfigError, EngineError};
pub use host::{ClickKind, CommandSender, Host};
pub use views::OpenView;
