//! Text rendering of catalog rows.

use core_catalog::{CatalogLabels, Item};

/// Shown in place of a missing year.
pub const NO_YEAR: &str = "n.d.";

pub fn year_or_placeholder(year: Option<i32>) -> String {
    year.map(|y| y.to_string())
        .unwrap_or_else(|| NO_YEAR.to_string())
}

/// `[id] title — creator (year) | Available: n`
pub fn item_line(item: &Item) -> String {
    format!(
        "[{}] {} — {} ({}) | Available: {}",
        item.id,
        item.title,
        item.creator,
        year_or_placeholder(item.year),
        item.available_count
    )
}

/// Upper-case the first letter of a label ("book" -> "Book").
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn heading(labels: &CatalogLabels, action: &str) -> String {
    format!("--- {} {} ---", action, capitalize(labels.entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_catalog::{CatalogKind, ItemId};

    #[test]
    fn test_item_line() {
        let mut item = Item::new("Dune", "Herbert")
            .with_year(Some(1965))
            .with_available_count(2);
        item.id = ItemId(4);
        assert_eq!(item_line(&item), "[4] Dune — Herbert (1965) | Available: 2");

        item.year = None;
        assert_eq!(item_line(&item), "[4] Dune — Herbert (n.d.) | Available: 2");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("book"), "Book");
        assert_eq!(capitalize(""), "");
        assert_eq!(
            heading(CatalogKind::Users.labels(), "Register"),
            "--- Register User ---"
        );
    }
}
