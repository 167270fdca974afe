//! Catalog service façade.
//!
//! Maps the user-facing intents of a catalog (register, list, search, edit,
//! remove, borrow, return) onto the repository and stock operations from
//! `core-catalog`. Front-ends open a [`CatalogService`] from an explicit
//! [`CoreConfig`] and a [`CatalogKind`] and never touch SQL themselves.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_catalog::db::{create_pool, DatabaseConfig};
use core_catalog::{
    CatalogError, CatalogKind, Item, ItemId, ItemPatch, ItemRepository, SqliteItemRepository,
    StockManager,
};
use core_runtime::logging::strip_path;
use core_runtime::{CoreConfig, DatabaseLocation};
use tracing::{debug, info};

/// Primary façade exposed to front-ends.
#[derive(Clone)]
pub struct CatalogService {
    kind: CatalogKind,
    repository: Arc<dyn ItemRepository>,
    stock: StockManager,
}

impl CatalogService {
    /// Open the catalog of `kind` in the database named by `config`.
    ///
    /// Creates the database file and tables when they do not exist yet.
    /// An invalid `config` is rejected before anything is opened.
    pub async fn open(config: &CoreConfig, kind: CatalogKind) -> Result<Self> {
        config.validate()?;

        let db_config = match &config.database {
            DatabaseLocation::File(path) => DatabaseConfig::new(path.clone()),
            DatabaseLocation::InMemory => DatabaseConfig::in_memory(),
        }
        .max_connections(config.max_connections);

        let database = config.database.to_string();
        info!(database = %strip_path(&database), kind = %kind, "Opening catalog");

        let pool = create_pool(db_config)
            .await
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

        Ok(Self::with_repository(
            Arc::new(SqliteItemRepository::new(pool, kind)),
            kind,
        ))
    }

    /// Build a service over an existing repository.
    pub fn with_repository(repository: Arc<dyn ItemRepository>, kind: CatalogKind) -> Self {
        let stock = StockManager::new(Arc::clone(&repository), kind);
        Self {
            kind,
            repository,
            stock,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Store a new item and return it with its assigned id.
    pub async fn register(&self, item: Item) -> Result<Item> {
        item.validate().map_err(|message| CatalogError::InvalidInput {
            field: "available_count".to_string(),
            message,
        })?;

        Ok(self.repository.create(&item).await?)
    }

    /// All items, ordered by title.
    pub async fn list(&self) -> Result<Vec<Item>> {
        Ok(self.repository.list_all().await?)
    }

    /// Items whose title or creator contains `term`.
    ///
    /// Surrounding whitespace is ignored; a blank term is rejected.
    pub async fn search(&self, term: &str) -> Result<Vec<Item>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CatalogError::InvalidInput {
                field: "term".to_string(),
                message: "search term is empty".to_string(),
            }
            .into());
        }

        debug!(term, kind = %self.kind, "Searching catalog");
        Ok(self.repository.search(term).await?)
    }

    pub async fn get(&self, id: ItemId) -> Result<Item> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Apply `patch` to an existing item and persist the full record.
    pub async fn edit(&self, id: ItemId, patch: ItemPatch) -> Result<Item> {
        let mut item = self.get(id).await?;
        patch.apply(&mut item);

        item.validate().map_err(|message| CatalogError::InvalidInput {
            field: "available_count".to_string(),
            message,
        })?;

        if !self.repository.update(&item).await? {
            // Deleted between the read and the write
            return Err(self.not_found(id));
        }

        info!(item_id = %id, kind = %self.kind, "Item edited");
        Ok(item)
    }

    /// Hard-delete an item. Returns whether anything was removed.
    pub async fn remove(&self, id: ItemId) -> Result<bool> {
        Ok(self.repository.delete(id).await?)
    }

    pub async fn borrow(&self, id: ItemId) -> Result<Item> {
        Ok(self.stock.borrow(id).await?)
    }

    pub async fn return_item(&self, id: ItemId) -> Result<Item> {
        Ok(self.stock.return_item(id).await?)
    }

    pub async fn count(&self) -> Result<i64> {
        Ok(self.repository.count().await?)
    }

    fn not_found(&self, id: ItemId) -> CoreError {
        CatalogError::NotFound {
            entity_type: self.kind.labels().entity.to_string(),
            id: id.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        pub Repo {}

        #[async_trait]
        impl ItemRepository for Repo {
            async fn create(&self, item: &Item) -> core_catalog::Result<Item>;
            async fn update(&self, item: &Item) -> core_catalog::Result<bool>;
            async fn delete(&self, id: ItemId) -> core_catalog::Result<bool>;
            async fn list_all(&self) -> core_catalog::Result<Vec<Item>>;
            async fn search(&self, term: &str) -> core_catalog::Result<Vec<Item>>;
            async fn find_by_id(&self, id: ItemId) -> core_catalog::Result<Option<Item>>;
            async fn count(&self) -> core_catalog::Result<i64>;
            async fn adjust_available(&self, id: ItemId, delta: i64) -> core_catalog::Result<bool>;
        }
    }

    fn stored(id: i64, title: &str, count: i64) -> Item {
        let mut item = Item::new(title, "Someone").with_available_count(count);
        item.id = ItemId(id);
        item
    }

    fn service(repo: MockRepo) -> CatalogService {
        CatalogService::with_repository(Arc::new(repo), CatalogKind::Library)
    }

    #[tokio::test]
    async fn test_register_rejects_negative_stock_without_touching_store() {
        let mut repo = MockRepo::new();
        repo.expect_create().never();

        let result = service(repo)
            .register(Item::new("Dune", "Herbert").with_available_count(-2))
            .await;

        assert!(result.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_register_returns_stored_item() {
        let mut repo = MockRepo::new();
        repo.expect_create()
            .withf(|item| item.title == "Dune")
            .times(1)
            .returning(|item| {
                let mut item = item.clone();
                item.id = ItemId(1);
                Ok(item)
            });

        let item = service(repo)
            .register(Item::new("Dune", "Herbert"))
            .await
            .unwrap();
        assert_eq!(item.id, ItemId(1));
    }

    #[tokio::test]
    async fn test_search_trims_and_rejects_blank_terms() {
        let mut repo = MockRepo::new();
        repo.expect_search()
            .withf(|term| term == "dune")
            .times(1)
            .returning(|_| Ok(vec![stored(1, "Dune", 1)]));

        let service = service(repo);
        assert_eq!(service.search("  dune ").await.unwrap().len(), 1);
        assert!(service.search("   ").await.unwrap_err().is_invalid_input());
    }

    #[tokio::test]
    async fn test_edit_missing_item_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .with(eq(ItemId(5)))
            .returning(|_| Ok(None));
        repo.expect_update().never();

        let err = service(repo)
            .edit(ItemId(5), ItemPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("book"));
    }

    #[tokio::test]
    async fn test_edit_applies_patch_and_writes_full_record() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .with(eq(ItemId(3)))
            .returning(|_| Ok(Some(stored(3, "Emma", 2))));
        repo.expect_update()
            .withf(|item| item.id == ItemId(3) && item.title == "Emma" && item.year == Some(1815))
            .times(1)
            .returning(|_| Ok(true));

        let patch = ItemPatch {
            year: Some(1815),
            ..Default::default()
        };
        let edited = service(repo).edit(ItemId(3), patch).await.unwrap();
        assert_eq!(edited.year, Some(1815));
        assert_eq!(edited.available_count, 2);
    }

    #[tokio::test]
    async fn test_edit_row_vanished_before_write() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(stored(3, "Emma", 2))));
        repo.expect_update().returning(|_| Ok(false));

        let err = service(repo)
            .edit(ItemId(3), ItemPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_borrow_unavailable_never_adjusts() {
        let mut repo = MockRepo::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(stored(9, "Dune", 0))));
        repo.expect_adjust_available().never();

        let err = service(repo).borrow(ItemId(9)).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_borrow_losing_race_reports_unavailable() {
        let mut repo = MockRepo::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(stored(9, "Dune", 1))));
        repo.expect_adjust_available()
            .with(eq(ItemId(9)), eq(-1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(false));
        repo.expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(stored(9, "Dune", 0))));

        let err = service(repo).borrow(ItemId(9)).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_remove_passes_through_result() {
        let mut repo = MockRepo::new();
        repo.expect_delete()
            .with(eq(ItemId(1)))
            .returning(|_| Ok(true));
        repo.expect_delete()
            .with(eq(ItemId(2)))
            .returning(|_| Ok(false));

        let service = service(repo);
        assert!(service.remove(ItemId(1)).await.unwrap());
        assert!(!service.remove(ItemId(2)).await.unwrap());
    }
}
