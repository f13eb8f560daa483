use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::order::ItemSpec;

/// A purchasable item in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub price: f64,
}

/// Read-only item lookup table.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn from_items(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Load a menu from a JSON file.
    ///
    /// A missing or unreadable file yields an empty menu with a warning;
    /// entries that do not parse as items are skipped.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), "menu file unavailable: {}", e);
                return Self::default();
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), "menu file is not valid JSON: {}", e);
                return Self::default();
            }
        };
        Self::from_items(collect_items(value))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Look an item up by name, case-insensitively.
    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|item| item.name.eq_ignore_ascii_case(name))
    }

    /// Build an order line spec from a catalog item.
    pub fn item_spec(&self, name: &str, quantity: u32) -> Option<ItemSpec> {
        self.find(name).map(|item| {
            ItemSpec::new(item.name.clone(), quantity)
                .with_prep_time(item.prep_time_minutes)
                .with_unit_price(item.price)
        })
    }
}

/// Accept both catalog shapes: a flat array, or category -> array groupings.
fn collect_items(value: Value) -> Vec<MenuItem> {
    let entries: Vec<Value> = match value {
        Value::Array(entries) => entries,
        Value::Object(groups) => groups
            .into_iter()
            .filter_map(|(_, group)| match group {
                Value::Array(entries) => Some(entries),
                _ => None,
            })
            .flatten()
            .collect(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect()
}
