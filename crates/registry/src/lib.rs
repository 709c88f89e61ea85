//! Menu definition model and registry.
//!
//! # Role
//!
//! A [`Menu`] is built once from configuration and never mutated; reloads publish new
//! instances through [`MenuRegistry`], so views that already hold an `Arc<Menu>` keep
//! the snapshot they opened.
//!
//! Slot behavior is expressed with the closed [`Requirement`] and [`Action`] sets.
//! They evaluate against the [`Facts`] and [`Effects`] seams, which the engine
//! implements on top of the ledger and the host.

/// Click-triggered action variants and the effect seam they run against.
pub mod action;
/// Serde-facing menu definitions as they appear in configuration.
pub mod def;
mod error;
/// Validated, immutable menu model.
pub mod menu;
mod registry;
/// Requirement variants and the fact seam they evaluate against.
pub mod requirement;

pub use action::{Action, ActionFailed, Effects};
pub use def::{ItemDef, MenuDef, MenuFile};
pub use error::{MenuError, RegistryError};
pub use menu::{AnimationSpec, Menu, MenuBuilder, MenuItem, MenuSize, RenderSpec, SlotIndex};
pub use registry::{MenuRegistry, MenuSet};
pub use requirement::{Facts, Requirement};
