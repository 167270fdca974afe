//! Borrow/return stock adjustment
//!
//! Borrowing takes one unit out of an item's `available_count`; returning puts
//! one back. Both run as a single guarded `UPDATE` through
//! [`ItemRepository::adjust_available`], so the read-check-write sequence
//! cannot race another writer into a negative count.
//!
//! Returns have no ceiling: an item can be returned more times than it was
//! ever borrowed and its count keeps growing, up to `i64::MAX`.

use crate::error::{CatalogError, Result};
use crate::models::{CatalogKind, Item, ItemId};
use crate::repositories::ItemRepository;
use std::sync::Arc;
use tracing::{info, warn};

/// Applies borrow/return operations to items in one catalog.
#[derive(Clone)]
pub struct StockManager {
    repository: Arc<dyn ItemRepository>,
    kind: CatalogKind,
}

impl StockManager {
    pub fn new(repository: Arc<dyn ItemRepository>, kind: CatalogKind) -> Self {
        Self { repository, kind }
    }

    /// Take one unit of `id` out of stock.
    ///
    /// # Errors
    /// - `NotFound` if no item has this id
    /// - `Unavailable` if its `available_count` is zero or less; the count is
    ///   left untouched
    pub async fn borrow(&self, id: ItemId) -> Result<Item> {
        let item = self.load(id).await?;

        if !item.is_available() {
            return Err(unavailable(&item));
        }

        if !self.repository.adjust_available(id, -1).await? {
            // Another writer got there first; report what the row looks like now.
            let current = self.load(id).await?;
            warn!(item_id = %id, available_count = current.available_count, "Borrow lost a race");
            return Err(unavailable(&current));
        }

        let updated = self.load(id).await?;
        info!(item_id = %id, available_count = updated.available_count, "Item borrowed");
        Ok(updated)
    }

    /// Put one unit of `id` back into stock.
    ///
    /// # Errors
    /// - `NotFound` if no item has this id
    /// - `InvalidInput` if the count is already `i64::MAX`
    pub async fn return_item(&self, id: ItemId) -> Result<Item> {
        self.load(id).await?;

        if !self.repository.adjust_available(id, 1).await? {
            // Either deleted since the read or at the ceiling.
            let current = self.load(id).await?;
            warn!(item_id = %id, available_count = current.available_count, "Return refused");
            return Err(CatalogError::InvalidInput {
                field: "available_count".to_string(),
                message: format!("count for '{}' cannot grow any further", current.title),
            });
        }

        let updated = self.load(id).await?;
        info!(item_id = %id, available_count = updated.available_count, "Item returned");
        Ok(updated)
    }

    async fn load(&self, id: ItemId) -> Result<Item> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound {
                entity_type: self.kind.labels().entity.to_string(),
                id: id.to_string(),
            })
    }
}

fn unavailable(item: &Item) -> CatalogError {
    CatalogError::Unavailable {
        id: item.id.to_string(),
        title: item.title.clone(),
    }
}
