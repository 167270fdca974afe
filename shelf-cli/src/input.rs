//! Parsing of raw console input.
//!
//! Malformed numbers never reach the catalog: each helper either yields a
//! value or tells the caller to fall back (default, keep current, or reject).

use core_catalog::{ItemId, DEFAULT_AVAILABLE_COUNT};

fn all_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// An item id; surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Option<ItemId> {
    raw.parse::<ItemId>().ok()
}

/// A year, accepted only when the input is made of digits.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if all_digits(raw) {
        raw.parse().ok()
    } else {
        None
    }
}

/// Stock for a new item: a positive number, otherwise the default.
pub fn parse_initial_count(raw: &str) -> i64 {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(count) if all_digits(raw) && count > 0 => count,
        _ => DEFAULT_AVAILABLE_COUNT,
    }
}

/// Replacement stock when editing; `None` keeps the current value.
pub fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if all_digits(raw) {
        raw.parse().ok()
    } else {
        None
    }
}

/// Replacement text when editing; blank keeps the current value.
pub fn replacement_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}
