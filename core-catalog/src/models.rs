//! Domain models for the catalog
//!
//! A single [`Item`] type serves every catalog kind. The kinds differ only in
//! the table they live in and the labels shown to people, captured by
//! [`CatalogLabels`].

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Stock assigned to a freshly registered item when none is given.
pub const DEFAULT_AVAILABLE_COUNT: i64 = 1;

// =============================================================================
// Catalog kinds
// =============================================================================

/// Human-facing labels and backing table for one catalog kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLabels {
    /// Table holding this kind's rows. Never derived from user input.
    pub table: &'static str,
    /// Singular entity name ("book")
    pub entity: &'static str,
    /// Plural entity name ("books")
    pub entity_plural: &'static str,
    pub title: &'static str,
    pub creator: &'static str,
    pub year: &'static str,
    pub count: &'static str,
}

const LIBRARY_LABELS: CatalogLabels = CatalogLabels {
    table: "books",
    entity: "book",
    entity_plural: "books",
    title: "Title",
    creator: "Author",
    year: "Year",
    count: "Copies",
};

const USER_LABELS: CatalogLabels = CatalogLabels {
    table: "users",
    entity: "user",
    entity_plural: "users",
    title: "Name",
    creator: "Contact",
    year: "Year",
    count: "Quota",
};

/// Which catalog an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    #[default]
    Library,
    Users,
}

impl CatalogKind {
    pub fn labels(&self) -> &'static CatalogLabels {
        match self {
            CatalogKind::Library => &LIBRARY_LABELS,
            CatalogKind::Users => &USER_LABELS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Library => "library",
            CatalogKind::Users => "users",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "library" => Ok(CatalogKind::Library),
            "users" => Ok(CatalogKind::Users),
            other => Err(CatalogError::InvalidInput {
                field: "kind".to_string(),
                message: format!("unknown catalog kind '{}' (expected library or users)", other),
            }),
        }
    }
}

// =============================================================================
// Item
// =============================================================================

/// Store-assigned identifier of a catalog item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
    /// Placeholder carried by items that have not been stored yet.
    pub const UNASSIGNED: ItemId = ItemId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(ItemId)
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub creator: String,
    pub year: Option<i32>,
    pub available_count: i64,
}

impl Item {
    /// Create an unsaved item with the default stock.
    pub fn new(title: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            id: ItemId::UNASSIGNED,
            title: title.into(),
            creator: creator.into(),
            year: None,
            available_count: DEFAULT_AVAILABLE_COUNT,
        }
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn with_available_count(mut self, count: i64) -> Self {
        self.available_count = count;
        self
    }

    pub fn is_available(&self) -> bool {
        self.available_count > 0
    }

    /// Validate the item before it is handed to the store.
    ///
    /// Titles and creators are not required to be non-empty; only the stock
    /// counter is checked.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.available_count < 0 {
            return Err(format!(
                "available_count must not be negative (got {})",
                self.available_count
            ));
        }
        Ok(())
    }
}

/// Partial edit of an item; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub year: Option<i32>,
    pub available_count: Option<i64>,
}

impl ItemPatch {
    /// Overwrite the fields of `item` that this patch sets.
    pub fn apply(&self, item: &mut Item) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(creator) = &self.creator {
            item.creator = creator.clone();
        }
        if let Some(year) = self.year {
            item.year = Some(year);
        }
        if let Some(count) = self.available_count {
            item.available_count = count;
        }
    }
}
