//! # Catalog Module
//!
//! Owns the catalog database and provides the repository and stock
//! operations built on top of it.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite connection pooling and the embedded table schema
//! - The generic [`Item`] model, parameterized by a [`CatalogKind`] label set
//! - The [`ItemRepository`] trait and its SQLite implementation
//! - Borrow/return stock adjustment through [`StockManager`]

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod stock;

pub use error::{CatalogError, Result};
pub use models::{CatalogKind, CatalogLabels, Item, ItemId, ItemPatch, DEFAULT_AVAILABLE_COUNT};
pub use repositories::{ItemRepository, SqliteItemRepository};
pub use stock::StockManager;
