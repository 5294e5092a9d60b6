//! Merchandise catalogue and inventory types.

use serde::{Deserialize, Serialize};

/// The seed catalogue shipped with the initial migration: `(name, price)`.
///
/// The service never mutates the catalogue.
pub const DEFAULT_CATALOGUE: &[(&str, u64)] = &[
    ("t-shirt", 80),
    ("cup", 20),
    ("book", 50),
    ("pen", 10),
    ("powerbank", 200),
    ("hoody", 300),
    ("umbrella", 200),
    ("socks", 10),
    ("wallet", 50),
    ("pink-hoody", 500),
];

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchItem {
    /// Catalogue identifier.
    pub id: u64,
    /// Unique item name.
    pub name: String,
    /// Price in coins.
    pub price: u64,
}

/// One line of an account's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Item name.
    #[serde(rename = "type")]
    pub item_type: String,
    /// Number of units owned; always at least one.
    pub quantity: u32,
}
