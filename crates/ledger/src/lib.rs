//! Per-user virtual storage ledger.
//!
//! The [`Ledger`] maps every user's item identities to a held quantity. Reads of an
//! absent entry return zero, quantities never go negative and relative adjustments
//! are atomic per `(user, identity)`. [`QueryResolver`] answers the `amt_` placeholder
//! family on top of it, and [`store`] defines the persistence boundary.

mod error;
mod ledger;
/// `amt_` placeholder resolution.
pub mod query;
/// Snapshot persistence boundary.
pub mod store;

pub use error::LedgerError;
pub use ledger::Ledger;
pub use query::{CustomCatalog, NoCustomCatalog, PLACEHOLDER_PREFIX, Placeholder, QueryResolver};
pub use store::{JsonFileStore, LedgerSnapshot, LedgerStore, StoreError};
