//! Authoritative inventory store.
//!
//! [`InventoryStore::decrement_variant`] is the sole mutator on the
//! checkout path. It re-resolves the variant and bounds-checks the live
//! quantity while holding the write lock, so concurrent checkouts against
//! the same variant serialize here instead of trusting a quantity read
//! earlier in the request.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    ProductNotFound(String),
    ColorNotFound {
        requested: String,
        available: Vec<String>,
    },
    SizeNotFound {
        color: String,
        requested: String,
        available: Vec<String>,
    },
    InsufficientStock {
        requested: u32,
        available: u32,
    },
    LockPoisoned(&'static str),
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::ProductNotFound(id) => write!(f, "product not found: {}", id),
            InventoryError::ColorNotFound {
                requested,
                available,
            } => write!(
                f,
                "color {:?} not found in stock (available: {})",
                requested,
                available.join(", ")
            ),
            InventoryError::SizeNotFound {
                color,
                requested,
                available,
            } => write!(
                f,
                "size {:?} not found for color {:?} (available: {})",
                requested,
                color,
                available.join(", ")
            ),
            InventoryError::InsufficientStock {
                requested,
                available,
            } => write!(
                f,
                "not enough stock available (requested {}, available {})",
                requested, available
            ),
            InventoryError::LockPoisoned(operation) => {
                write!(f, "inventory lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for InventoryError {}

/// Source of truth for products and their per-variant stock counts.
///
/// The persistence engine behind an implementation is its own business;
/// these are the operations the checkout path needs.
pub trait InventoryStore: Send + Sync {
    fn get(&self, product_id: &str) -> Result<Option<Product>, InventoryError>;

    /// All products, for catalog display.
    fn list(&self) -> Result<Vec<Product>, InventoryError>;

    fn insert(&self, product: Product) -> Result<(), InventoryError>;

    /// Conditionally decrement one variant's quantity by `amount`.
    ///
    /// Color and size resolve case-insensitively against the stored keys.
    /// The bounds check runs against the live quantity inside the same
    /// critical section as the mutation; on success the post-mutation
    /// product is returned so callers can snapshot it without a re-read.
    fn decrement_variant(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
        amount: u32,
    ) -> Result<Product, InventoryError>;

    /// Add `amount` to one variant, creating missing color/size keys with
    /// the caller's casing. Used for receiving stock and for compensating
    /// a decrement whose order could not be recorded.
    fn restock_variant(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
        amount: u32,
    ) -> Result<Product, InventoryError>;
}

/// In-memory product table behind an `RwLock`. `Clone` shares the table,
/// so one store can be handed to the pipeline, the catalog read path, and
/// tests at once.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        InMemoryInventory {
            products: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InventoryStore for InMemoryInventory {
    fn get(&self, product_id: &str) -> Result<Option<Product>, InventoryError> {
        let products = self
            .products
            .read()
            .map_err(|_| InventoryError::LockPoisoned("read"))?;
        Ok(products.get(product_id).cloned())
    }

    fn list(&self) -> Result<Vec<Product>, InventoryError> {
        let products = self
            .products
            .read()
            .map_err(|_| InventoryError::LockPoisoned("list"))?;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    fn insert(&self, product: Product) -> Result<(), InventoryError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| InventoryError::LockPoisoned("insert"))?;
        products.insert(product.id.clone(), product);
        Ok(())
    }

    fn decrement_variant(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
        amount: u32,
    ) -> Result<Product, InventoryError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| InventoryError::LockPoisoned("decrement"))?;
        let product = products
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;

        let stored_color = match product.resolve_color(color) {
            Some(key) => key.to_string(),
            None => {
                return Err(InventoryError::ColorNotFound {
                    requested: color.to_string(),
                    available: product.colors(),
                })
            }
        };
        let stored_size = match product.resolve_size(&stored_color, size) {
            Some(key) => key.to_string(),
            None => {
                return Err(InventoryError::SizeNotFound {
                    requested: size.to_string(),
                    available: product.sizes(&stored_color),
                    color: stored_color,
                })
            }
        };

        // The check and the mutation sit under the same write lock, which
        // is what makes concurrent over-purchase impossible.
        let available = product
            .variant_quantity(&stored_color, &stored_size)
            .unwrap_or(0);
        if amount > available {
            return Err(InventoryError::InsufficientStock {
                requested: amount,
                available,
            });
        }
        if let Some(quantity) = product
            .stock
            .get_mut(&stored_color)
            .and_then(|sizes| sizes.get_mut(&stored_size))
        {
            *quantity -= amount;
        }

        Ok(product.clone())
    }

    fn restock_variant(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
        amount: u32,
    ) -> Result<Product, InventoryError> {
        let mut products = self
            .products
            .write()
            .map_err(|_| InventoryError::LockPoisoned("restock"))?;
        let product = products
            .get_mut(product_id)
            .ok_or_else(|| InventoryError::ProductNotFound(product_id.to_string()))?;

        let stored_color = product
            .resolve_color(color)
            .map(str::to_string)
            .unwrap_or_else(|| color.to_string());
        let sizes = product.stock.entry(stored_color.clone()).or_default();
        let stored_size = sizes
            .keys()
            .find(|k| k.eq_ignore_ascii_case(size))
            .cloned()
            .unwrap_or_else(|| size.to_string());
        let quantity = sizes.entry(stored_size).or_insert(0);
        *quantity = quantity.saturating_add(amount);

        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_shoe() -> InMemoryInventory {
        let store = InMemoryInventory::new();
        store
            .insert(
                Product::new("P0000001", "Nike Air Max1", 120)
                    .with_variant("Red", "S", 12)
                    .with_variant("Red", "M", 3)
                    .with_variant("Blue", "M", 6),
            )
            .unwrap();
        store
    }

    #[test]
    fn decrements_only_the_resolved_variant() {
        let store = store_with_shoe();
        let updated = store.decrement_variant("P0000001", "red", "m", 2).unwrap();
        assert_eq!(updated.variant_quantity("Red", "M"), Some(1));
        assert_eq!(updated.variant_quantity("Red", "S"), Some(12));
        assert_eq!(updated.variant_quantity("Blue", "M"), Some(6));
    }

    #[test]
    fn decrement_checks_the_live_quantity() {
        let store = store_with_shoe();
        let err = store
            .decrement_variant("P0000001", "Red", "M", 4)
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                requested: 4,
                available: 3
            }
        );
        // nothing moved
        let product = store.get("P0000001").unwrap().unwrap();
        assert_eq!(product.variant_quantity("Red", "M"), Some(3));
    }

    #[test]
    fn unknown_color_reports_alternatives() {
        let store = store_with_shoe();
        let err = store
            .decrement_variant("P0000001", "Green", "M", 1)
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::ColorNotFound {
                requested: "Green".to_string(),
                available: vec!["Blue".to_string(), "Red".to_string()],
            }
        );
    }

    #[test]
    fn unknown_size_reports_alternatives_for_that_color() {
        let store = store_with_shoe();
        let err = store
            .decrement_variant("P0000001", "blue", "XL", 1)
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::SizeNotFound {
                color: "Blue".to_string(),
                requested: "XL".to_string(),
                available: vec!["M".to_string()],
            }
        );
    }

    #[test]
    fn missing_product_is_its_own_error() {
        let store = store_with_shoe();
        let err = store.decrement_variant("P9999999", "Red", "M", 1).unwrap_err();
        assert_eq!(err, InventoryError::ProductNotFound("P9999999".to_string()));
    }

    #[test]
    fn restock_reuses_stored_casing_and_creates_missing_keys() {
        let store = store_with_shoe();
        let updated = store.restock_variant("P0000001", "RED", "m", 5).unwrap();
        assert_eq!(updated.variant_quantity("Red", "M"), Some(8));

        let updated = store.restock_variant("P0000001", "Green", "XL", 2).unwrap();
        assert_eq!(updated.variant_quantity("Green", "XL"), Some(2));
    }

    #[test]
    fn clones_share_the_table() {
        let store = store_with_shoe();
        let other = store.clone();
        other.decrement_variant("P0000001", "Red", "M", 3).unwrap();
        let product = store.get("P0000001").unwrap().unwrap();
        assert_eq!(product.variant_quantity("Red", "M"), Some(0));
    }
}
