//! Core types shared by the ledger, menu model and engine: user ids, item identities,
//! the vanilla material catalog and the host tick clock.

/// Fixed catalog of known vanilla material codes.
pub mod catalog;
/// Namespaced item identities and their normalization rules.
pub mod identity;
/// Host tick clock conversion.
pub mod tick;
/// Session user identifiers.
pub mod user;
/// Opened view identifiers.
pub mod view;

pub use catalog::VanillaCatalog;
pub use identity::{CUSTOM_PREFIX, IdentityError, ItemIdentity, Namespace, VANILLA_PREFIX};
pub use tick::TickRate;
pub use user::UserId;
pub use view::ViewId;
