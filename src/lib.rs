//! Workspace placeholder crate.
//!
//! Re-exports the catalog service facade so hosts can depend on
//! `shelf-workspace` alone instead of wiring each `core-*` crate.

pub use core_catalog::{CatalogKind, Item, ItemId, ItemPatch};
pub use core_service::{CatalogService, CoreError, Result};
