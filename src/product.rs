//! Product model and the per-variant stock table.
//!
//! Stock is a two-level map: color → size → quantity. Keys keep whatever
//! casing they were stored with; callers resolve case-insensitively via
//! [`Product::resolve_color`] / [`Product::resolve_size`]. Normalization
//! is an explicit step at the boundary, never delegated to the map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A flattened color → size → quantity copy of a product's stock table,
/// taken at a point in time. Structurally identical to the stored table,
/// plain maps only, so observers need no special decoding.
pub type StockSnapshot = HashMap<String, HashMap<String, u32>>;

/// A catalog product with per-variant stock counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque unique identifier (e.g. `P0000001`).
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price in whole currency units.
    pub price: u32,
    #[serde(default)]
    pub image: String,
    /// color → size → quantity. A color whose sizes are all zero is
    /// exhausted but keeps its key.
    #[serde(default)]
    pub stock: HashMap<String, HashMap<String, u32>>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u32) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
            stock: HashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the stock count for one variant, creating the color/size keys
    /// with the given casing if they don't exist yet.
    pub fn with_variant(mut self, color: impl Into<String>, size: impl Into<String>, quantity: u32) -> Self {
        self.stock
            .entry(color.into())
            .or_default()
            .insert(size.into(), quantity);
        self
    }

    /// Resolve a requested color against the stored keys, ignoring case.
    /// Returns the stored exact-cased key.
    pub fn resolve_color(&self, requested: &str) -> Option<&str> {
        self.stock
            .keys()
            .find(|k| k.eq_ignore_ascii_case(requested))
            .map(String::as_str)
    }

    /// Resolve a requested size under a stored color key, ignoring case.
    /// `color` must be an exact stored key (resolve it first).
    pub fn resolve_size(&self, color: &str, requested: &str) -> Option<&str> {
        self.stock
            .get(color)?
            .keys()
            .find(|k| k.eq_ignore_ascii_case(requested))
            .map(String::as_str)
    }

    /// Quantity for an exact stored (color, size) key pair.
    pub fn variant_quantity(&self, color: &str, size: &str) -> Option<u32> {
        self.stock.get(color)?.get(size).copied()
    }

    /// Stored color keys, sorted for stable error payloads.
    pub fn colors(&self) -> Vec<String> {
        let mut colors: Vec<String> = self.stock.keys().cloned().collect();
        colors.sort();
        colors
    }

    /// Stored size keys under a color, sorted.
    pub fn sizes(&self, color: &str) -> Vec<String> {
        let mut sizes: Vec<String> = self
            .stock
            .get(color)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        sizes.sort();
        sizes
    }

    /// Total available quantity across every variant.
    pub fn total_quantity(&self) -> u32 {
        self.stock
            .values()
            .flat_map(|sizes| sizes.values())
            .sum()
    }

    /// A fresh flattened copy of the stock table for broadcast.
    pub fn snapshot(&self) -> StockSnapshot {
        self.stock.clone()
    }
}
