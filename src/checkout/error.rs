//! The checkout error taxonomy.
//!
//! Every rejection carries a distinct, stable classification so a calling
//! client can present a specific remedy ("choose a different size" vs.
//! "payment declined, retry"). Validation and availability errors are
//! client mistakes; [`CheckoutError::Inventory`] and
//! [`CheckoutError::Ledger`] are the server class a caller may safely
//! retry.

use std::fmt;

use crate::inventory::InventoryError;
use crate::ledger::{LedgerError, TransactionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// A required field was absent: product id, product name, quantity,
    /// total price, or the customer's email.
    MissingFields,
    ProductNotFound(String),
    /// Submitted name or total price disagrees with the stored product.
    /// Guards against a tampered or stale client.
    ProductMismatch,
    InvalidQuantity(u32),
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
    /// The simulated payment authorization came back non-approved. A
    /// failure notice was sent; nothing was mutated.
    TransactionFailed(TransactionStatus),
    /// Inventory store failure unrelated to the request's content.
    Inventory(InventoryError),
    /// Ledger failure after the decrement; the decrement was compensated.
    Ledger(LedgerError),
}

impl CheckoutError {
    /// Whether the caller can retry the same request safely. True only
    /// for the server class; every validation or availability rejection
    /// would just fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::Inventory(_) | CheckoutError::Ledger(_))
    }

    /// HTTP-style status code for transport layers.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::ProductNotFound(_) => 404,
            CheckoutError::Inventory(_) | CheckoutError::Ledger(_) => 500,
            _ => 400,
        }
    }
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::MissingFields => write!(f, "Missing required fields"),
            CheckoutError::ProductNotFound(_) => write!(f, "Product not found"),
            CheckoutError::ProductMismatch => write!(f, "Product details mismatch"),
            CheckoutError::InvalidQuantity(_) => write!(f, "Quantity must be at least 1"),
            CheckoutError::ColorNotFound { requested, available } => write!(
                f,
                "Color not found in stock (tried {:?}, available: {})",
                requested,
                available.join(", ")
            ),
            CheckoutError::SizeNotFound { requested, available, .. } => write!(
                f,
                "Size not found in stock for this color (tried {:?}, available: {})",
                requested,
                available.join(", ")
            ),
            CheckoutError::InsufficientStock { available, .. } => {
                write!(f, "Not enough stock available ({} left)", available)
            }
            CheckoutError::TransactionFailed(status) => {
                write!(f, "{}. Order not placed.", status)
            }
            CheckoutError::Inventory(e) => write!(f, "inventory error: {}", e),
            CheckoutError::Ledger(e) => write!(f, "ledger error: {}", e),
        }
    }
}

impl std::error::Error for CheckoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckoutError::Inventory(e) => Some(e),
            CheckoutError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

/// Availability errors keep their checkout classification; anything else
/// from the store is the retryable server class.
impl From<InventoryError> for CheckoutError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(id) => CheckoutError::ProductNotFound(id),
            InventoryError::ColorNotFound {
                requested,
                available,
            } => CheckoutError::ColorNotFound {
                requested,
                available,
            },
            InventoryError::SizeNotFound {
                color,
                requested,
                available,
            } => CheckoutError::SizeNotFound {
                color,
                requested,
                available,
            },
            InventoryError::InsufficientStock {
                requested,
                available,
            } => CheckoutError::InsufficientStock {
                requested,
                available,
            },
            other => CheckoutError::Inventory(other),
        }
    }
}

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        CheckoutError::Ledger(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_errors_keep_their_classification() {
        let err: CheckoutError = InventoryError::InsufficientStock {
            requested: 5,
            available: 3,
        }
        .into();
        assert_eq!(
            err,
            CheckoutError::InsufficientStock {
                requested: 5,
                available: 3
            }
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn lock_poisoning_is_the_retryable_server_class() {
        let err: CheckoutError = InventoryError::LockPoisoned("decrement").into();
        assert!(err.is_retryable());
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn status_codes_match_the_routes() {
        assert_eq!(CheckoutError::MissingFields.status_code(), 400);
        assert_eq!(
            CheckoutError::ProductNotFound("P1".to_string()).status_code(),
            404
        );
        assert_eq!(
            CheckoutError::TransactionFailed(TransactionStatus::Declined).status_code(),
            400
        );
    }

    #[test]
    fn failure_message_names_the_status() {
        let err = CheckoutError::TransactionFailed(TransactionStatus::GatewayFailure);
        assert_eq!(err.to_string(), "Gateway Failure. Order not placed.");
    }
}
