//! # Repository Pattern Implementation
//!
//! Data access for catalog items.
//!
//! ## Architecture
//!
//! - [`ItemRepository`] defines the storage interface
//! - [`SqliteItemRepository`] implements it with sqlx against one table per
//!   [`CatalogKind`](crate::models::CatalogKind)
//! - All operations return `Result<T>`; missing ids on update/delete are
//!   reported through the returned `bool`, never as an error

pub mod item;

pub use item::{ItemRepository, SqliteItemRepository};
