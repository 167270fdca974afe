//! Item repository trait and implementation

use crate::error::Result;
use crate::models::{CatalogKind, Item, ItemId};
use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};
use tracing::{debug, info};

/// Item repository interface for data access operations
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item
    ///
    /// Any id already present on `item` is ignored. No duplicate detection
    /// is performed.
    ///
    /// # Returns
    /// The stored item carrying its freshly assigned id
    async fn create(&self, item: &Item) -> Result<Item>;

    /// Overwrite every mutable field of the row matching `item.id`
    ///
    /// # Returns
    /// - `Ok(true)` if a row was updated
    /// - `Ok(false)` if no row has that id (nothing is written)
    async fn update(&self, item: &Item) -> Result<bool>;

    /// Delete an item by ID
    ///
    /// # Returns
    /// - `Ok(true)` if the item was deleted
    /// - `Ok(false)` if the item was not found
    async fn delete(&self, id: ItemId) -> Result<bool>;

    /// All items ordered case-insensitively by title
    async fn list_all(&self) -> Result<Vec<Item>>;

    /// Items whose title or creator contains `term`
    ///
    /// Matching is case-insensitive and literal: `%` and `_` in `term` are not
    /// wildcards. An empty term matches every item. Ordering matches
    /// [`list_all`](Self::list_all).
    async fn search(&self, term: &str) -> Result<Vec<Item>>;

    /// Find an item by its ID
    ///
    /// # Returns
    /// - `Ok(Some(item))` if found
    /// - `Ok(None)` if not found
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>>;

    /// Count stored items
    async fn count(&self) -> Result<i64>;

    /// Add `delta` to the available count in a single statement
    ///
    /// A negative `delta` is only applied when the result stays non-negative,
    /// so concurrent borrowers can never drive the count below zero. A
    /// positive `delta` is applied whatever the current count, unless the sum
    /// would overflow `i64`.
    ///
    /// # Returns
    /// - `Ok(true)` if the count changed
    /// - `Ok(false)` if the item does not exist, a decrement would go
    ///   negative, or an increment would overflow
    async fn adjust_available(&self, id: ItemId, delta: i64) -> Result<bool>;
}

/// SQL text for one catalog table.
///
/// Table names come from [`CatalogKind`] labels, never from callers, so they
/// are safe to splice into the statements.
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    update: String,
    delete: String,
    list_all: String,
    search: String,
    find_by_id: String,
    count: String,
    adjust_available: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        const COLUMNS: &str = "id, title, creator, year, available_count";
        const ORDERING: &str = "ORDER BY title COLLATE NOCASE ASC, id ASC";

        Self {
            insert: format!(
                "INSERT INTO {table} (title, creator, year, available_count) VALUES (?, ?, ?, ?)"
            ),
            update: format!(
                "UPDATE {table} SET title = ?, creator = ?, year = ?, available_count = ? WHERE id = ?"
            ),
            delete: format!("DELETE FROM {table} WHERE id = ?"),
            list_all: format!("SELECT {COLUMNS} FROM {table} {ORDERING}"),
            search: format!(
                r"SELECT {COLUMNS} FROM {table}
                  WHERE title LIKE ? ESCAPE '\' OR creator LIKE ? ESCAPE '\'
                  {ORDERING}"
            ),
            find_by_id: format!("SELECT {COLUMNS} FROM {table} WHERE id = ?"),
            count: format!("SELECT COUNT(*) FROM {table}"),
            // SQLite turns an overflowing integer sum into a REAL, so the
            // increment bound is checked by subtraction.
            adjust_available: format!(
                "UPDATE {table} SET available_count = available_count + ?1
                 WHERE id = ?2
                   AND CASE WHEN ?1 < 0 THEN available_count >= -?1
                            ELSE available_count <= {max} - ?1 END",
                max = i64::MAX
            ),
        }
    }
}

/// Build a `LIKE` pattern that matches `term` literally anywhere in a value.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// SQLite implementation of ItemRepository
pub struct SqliteItemRepository {
    pool: SqlitePool,
    kind: CatalogKind,
    sql: Statements,
}

impl SqliteItemRepository {
    /// Create a repository over the table belonging to `kind`
    pub fn new(pool: SqlitePool, kind: CatalogKind) -> Self {
        Self {
            pool,
            kind,
            sql: Statements::for_table(kind.labels().table),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    fn table(&self) -> &'static str {
        self.kind.labels().table
    }
}

#[async_trait]
impl ItemRepository for SqliteItemRepository {
    async fn create(&self, item: &Item) -> Result<Item> {
        let result = query(&self.sql.insert)
            .bind(&item.title)
            .bind(&item.creator)
            .bind(item.year)
            .bind(item.available_count)
            .execute(&self.pool)
            .await?;

        let mut stored = item.clone();
        stored.id = ItemId(result.last_insert_rowid());

        info!(table = self.table(), item_id = %stored.id, "Item created");
        Ok(stored)
    }

    async fn update(&self, item: &Item) -> Result<bool> {
        let result = query(&self.sql.update)
            .bind(&item.title)
            .bind(&item.creator)
            .bind(item.year)
            .bind(item.available_count)
            .bind(item.id)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected() > 0;
        debug!(table = self.table(), item_id = %item.id, updated, "Item update");
        Ok(updated)
    }

    async fn delete(&self, id: ItemId) -> Result<bool> {
        let result = query(&self.sql.delete)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        info!(table = self.table(), item_id = %id, deleted, "Item delete");
        Ok(deleted)
    }

    async fn list_all(&self) -> Result<Vec<Item>> {
        let items = query_as::<_, Item>(&self.sql.list_all)
            .fetch_all(&self.pool)
            .await?;

        debug!(table = self.table(), rows = items.len(), "Listed items");
        Ok(items)
    }

    async fn search(&self, term: &str) -> Result<Vec<Item>> {
        let pattern = contains_pattern(term);
        let items = query_as::<_, Item>(&self.sql.search)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        debug!(table = self.table(), term, rows = items.len(), "Searched items");
        Ok(items)
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>> {
        let item = query_as::<_, Item>(&self.sql.find_by_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = query_as(&self.sql.count)
            .fetch_one(&self.pool)
            .await
            .map(|row: (i64,)| row.0)?;

        Ok(count)
    }

    async fn adjust_available(&self, id: ItemId, delta: i64) -> Result<bool> {
        let result = query(&self.sql.adjust_available)
            .bind(delta)
            .bind(id)
            .execute(&self.pool)
            .await?;

        let changed = result.rows_affected() > 0;
        debug!(table = self.table(), item_id = %id, delta, changed, "Adjusted availability");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    async fn setup_repo(kind: CatalogKind) -> SqliteItemRepository {
        let pool = create_test_pool().await.unwrap();
        SqliteItemRepository::new(pool, kind)
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("dune"), "%dune%");
        assert_eq!(contains_pattern(""), "%%");
        assert_eq!(contains_pattern("100%"), r"%100\%%");
        assert_eq!(contains_pattern(r"a_b\c"), r"%a\_b\\c%");
    }

    #[tokio::test]
    async fn test_create_and_find_item() {
        let repo = setup_repo(CatalogKind::Library).await;

        let draft = Item::new("Dune", "Herbert")
            .with_year(Some(1965))
            .with_available_count(3);
        let stored = repo.create(&draft).await.unwrap();
        assert!(stored.id.is_assigned());

        let found = repo.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert_eq!(found.title, "Dune");
        assert_eq!(found.creator, "Herbert");
        assert_eq!(found.year, Some(1965));
        assert_eq!(found.available_count, 3);
    }

    #[tokio::test]
    async fn test_create_ignores_existing_id() {
        let repo = setup_repo(CatalogKind::Library).await;

        let first = repo.create(&Item::new("Emma", "Austen")).await.unwrap();
        let mut draft = Item::new("Persuasion", "Austen");
        draft.id = first.id;

        let second = repo.create(&draft).await.unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_allows_duplicates() {
        let repo = setup_repo(CatalogKind::Library).await;

        let a = repo.create(&Item::new("Emma", "Austen")).await.unwrap();
        let b = repo.create(&Item::new("Emma", "Austen")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_item() {
        let repo = setup_repo(CatalogKind::Library).await;

        let mut item = repo
            .create(&Item::new("Original", "Someone").with_year(Some(2000)))
            .await
            .unwrap();

        item.title = "Updated".to_string();
        item.creator = "Someone Else".to_string();
        item.year = None;
        item.available_count = 7;
        assert!(repo.update(&item).await.unwrap());

        let found = repo.find_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(found, item);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_noop() {
        let repo = setup_repo(CatalogKind::Library).await;
        repo.create(&Item::new("Emma", "Austen")).await.unwrap();

        let mut ghost = Item::new("Ghost", "Nobody");
        ghost.id = ItemId(9999);

        assert!(!repo.update(&ghost).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.find_by_id(ItemId(9999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_item() {
        let repo = setup_repo(CatalogKind::Library).await;
        let item = repo.create(&Item::new("Emma", "Austen")).await.unwrap();

        assert!(repo.delete(item.id).await.unwrap());
        assert!(repo.find_by_id(item.id).await.unwrap().is_none());
        assert!(!repo.delete(item.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_orders_by_title_case_insensitively() {
        let repo = setup_repo(CatalogKind::Library).await;
        for title in ["banana", "Cherry", "apple", "Apple pie"] {
            repo.create(&Item::new(title, "Various")).await.unwrap();
        }

        let items = repo.list_all().await.unwrap();
        assert_eq!(titles(&items), vec!["apple", "Apple pie", "banana", "Cherry"]);
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let repo = setup_repo(CatalogKind::Users).await;
        assert!(repo.list_all().await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_matches_title_or_creator() {
        let repo = setup_repo(CatalogKind::Library).await;
        repo.create(&Item::new("Dune", "Frank Herbert")).await.unwrap();
        repo.create(&Item::new("Emma", "Jane Austen")).await.unwrap();
        repo.create(&Item::new("The Herbalist", "Someone")).await.unwrap();

        let found = repo.search("herb").await.unwrap();
        assert_eq!(titles(&found), vec!["Dune", "The Herbalist"]);

        let found = repo.search("AUSTEN").await.unwrap();
        assert_eq!(titles(&found), vec!["Emma"]);

        assert!(repo.search("tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_empty_term_returns_everything_in_order() {
        let repo = setup_repo(CatalogKind::Library).await;
        for title in ["zeta", "Alpha", "mu"] {
            repo.create(&Item::new(title, "x")).await.unwrap();
        }

        let all = repo.list_all().await.unwrap();
        let searched = repo.search("").await.unwrap();
        assert_eq!(all, searched);
        assert_eq!(titles(&searched), vec!["Alpha", "mu", "zeta"]);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = setup_repo(CatalogKind::Library).await;
        repo.create(&Item::new("100% Pure", "x")).await.unwrap();
        repo.create(&Item::new("1000 Pure", "x")).await.unwrap();
        repo.create(&Item::new("snake_case", "x")).await.unwrap();
        repo.create(&Item::new("snakeXcase", "x")).await.unwrap();

        assert_eq!(titles(&repo.search("0%").await.unwrap()), vec!["100% Pure"]);
        assert_eq!(titles(&repo.search("e_c").await.unwrap()), vec!["snake_case"]);
    }

    #[tokio::test]
    async fn test_kinds_use_separate_tables() {
        let pool = create_test_pool().await.unwrap();
        let books = SqliteItemRepository::new(pool.clone(), CatalogKind::Library);
        let users = SqliteItemRepository::new(pool, CatalogKind::Users);

        books.create(&Item::new("Dune", "Herbert")).await.unwrap();

        assert_eq!(books.count().await.unwrap(), 1);
        assert_eq!(users.count().await.unwrap(), 0);
        assert_eq!(users.kind(), CatalogKind::Users);
    }

    #[tokio::test]
    async fn test_adjust_available_never_goes_negative() {
        let repo = setup_repo(CatalogKind::Library).await;
        let item = repo
            .create(&Item::new("Dune", "Herbert").with_available_count(1))
            .await
            .unwrap();

        assert!(repo.adjust_available(item.id, -1).await.unwrap());
        assert!(!repo.adjust_available(item.id, -1).await.unwrap());
        assert_eq!(
            repo.find_by_id(item.id).await.unwrap().unwrap().available_count,
            0
        );

        assert!(repo.adjust_available(item.id, 1).await.unwrap());
        assert!(repo.adjust_available(item.id, 1).await.unwrap());
        assert_eq!(
            repo.find_by_id(item.id).await.unwrap().unwrap().available_count,
            2
        );

        assert!(!repo.adjust_available(ItemId(424242), 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_adjust_available_increments_negative_counts() {
        let repo = setup_repo(CatalogKind::Library).await;
        let item = repo
            .create(&Item::new("Dune", "Herbert").with_available_count(-3))
            .await
            .unwrap();

        assert!(repo.adjust_available(item.id, 1).await.unwrap());
        assert!(!repo.adjust_available(item.id, -1).await.unwrap());
        assert_eq!(
            repo.find_by_id(item.id).await.unwrap().unwrap().available_count,
            -2
        );
    }

    #[tokio::test]
    async fn test_adjust_available_refuses_overflow() {
        let repo = setup_repo(CatalogKind::Library).await;
        let item = repo
            .create(&Item::new("Dune", "Herbert").with_available_count(i64::MAX - 1))
            .await
            .unwrap();

        assert!(repo.adjust_available(item.id, 1).await.unwrap());
        assert!(!repo.adjust_available(item.id, 1).await.unwrap());

        let items = repo.list_all().await.unwrap();
        assert_eq!(items[0].available_count, i64::MAX);
        assert!(repo.adjust_available(item.id, -1).await.unwrap());
    }
}
