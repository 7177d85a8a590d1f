//! Order records and the append-only order ledger.
//!
//! A record is written once per approved checkout and never updated or
//! deleted. Lookup by order id must return the same record on every call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Customer contact block, passed through opaquely. Only the presence of
/// `email` is ever validated server-side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city_state_zip: String,
}

impl Customer {
    pub fn with_email(email: impl Into<String>) -> Self {
        Customer {
            email: email.into(),
            ..Customer::default()
        }
    }
}

/// Outcome of the simulated payment authorization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Approved,
    Declined,
    #[serde(rename = "Gateway Failure")]
    GatewayFailure,
    Unknown,
}

impl TransactionStatus {
    /// Map the caller-supplied classification code. This stands in for an
    /// external payment gateway's decision; the pipeline never decides
    /// approval itself.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => TransactionStatus::Approved,
            Some(2) => TransactionStatus::Declined,
            Some(3) => TransactionStatus::GatewayFailure,
            _ => TransactionStatus::Unknown,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, TransactionStatus::Approved)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Approved => "Approved",
            TransactionStatus::Declined => "Declined",
            TransactionStatus::GatewayFailure => "Gateway Failure",
            TransactionStatus::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

/// One placed order. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[serde(rename = "productID")]
    pub product_id: String,
    pub product_name: String,
    /// Stored with the exact casing of the stock key the order decremented.
    pub color: String,
    pub size: String,
    pub unit_price: u32,
    pub quantity: u32,
    pub total_price: u64,
    pub customer: Customer,
    pub transaction_status: TransactionStatus,
    pub created_at: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The generated order id already exists. Appends never overwrite.
    DuplicateOrderId(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::DuplicateOrderId(id) => {
                write!(f, "order id already recorded: {}", id)
            }
            LedgerError::LockPoisoned(operation) => {
                write!(f, "ledger lock poisoned during {}", operation)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Append-only store of placed orders.
pub trait OrderLedger: Send + Sync {
    fn append(&self, record: OrderRecord) -> Result<(), LedgerError>;

    fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderRecord>, LedgerError>;
}

/// In-memory ledger keyed by order id. `Clone` shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    orders: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        InMemoryLedger {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of recorded orders.
    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderLedger for InMemoryLedger {
    fn append(&self, record: OrderRecord) -> Result<(), LedgerError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| LedgerError::LockPoisoned("append"))?;
        if orders.contains_key(&record.order_id) {
            return Err(LedgerError::DuplicateOrderId(record.order_id));
        }
        orders.insert(record.order_id.clone(), record);
        Ok(())
    }

    fn find_by_order_id(&self, order_id: &str) -> Result<Option<OrderRecord>, LedgerError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| LedgerError::LockPoisoned("find"))?;
        Ok(orders.get(order_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order_id: &str) -> OrderRecord {
        OrderRecord {
            order_id: order_id.to_string(),
            product_id: "P0000001".to_string(),
            product_name: "Nike Air Max1".to_string(),
            color: "Red".to_string(),
            size: "M".to_string(),
            unit_price: 120,
            quantity: 2,
            total_price: 240,
            customer: Customer::with_email("jo@example.com"),
            transaction_status: TransactionStatus::Approved,
            created_at: SystemTime::now(),
        }
    }

    #[test]
    fn append_then_find() {
        let ledger = InMemoryLedger::new();
        ledger.append(record("ORD-1")).unwrap();

        let found = ledger.find_by_order_id("ORD-1").unwrap().unwrap();
        assert_eq!(found.product_id, "P0000001");
        assert_eq!(found.total_price, 240);
        assert!(ledger.find_by_order_id("ORD-2").unwrap().is_none());
    }

    #[test]
    fn lookup_is_idempotent() {
        let ledger = InMemoryLedger::new();
        ledger.append(record("ORD-1")).unwrap();

        let first = ledger.find_by_order_id("ORD-1").unwrap().unwrap();
        let second = ledger.find_by_order_id("ORD-1").unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn appends_never_overwrite() {
        let ledger = InMemoryLedger::new();
        ledger.append(record("ORD-1")).unwrap();

        let mut altered = record("ORD-1");
        altered.quantity = 99;
        let err = ledger.append(altered).unwrap_err();
        assert_eq!(err, LedgerError::DuplicateOrderId("ORD-1".to_string()));
        assert_eq!(ledger.find_by_order_id("ORD-1").unwrap().unwrap().quantity, 2);
    }

    #[test]
    fn classification_codes_map_deterministically() {
        assert_eq!(TransactionStatus::from_code(Some(1)), TransactionStatus::Approved);
        assert_eq!(TransactionStatus::from_code(Some(2)), TransactionStatus::Declined);
        assert_eq!(TransactionStatus::from_code(Some(3)), TransactionStatus::GatewayFailure);
        assert_eq!(TransactionStatus::from_code(Some(7)), TransactionStatus::Unknown);
        assert_eq!(TransactionStatus::from_code(Some(0)), TransactionStatus::Unknown);
        assert_eq!(TransactionStatus::from_code(None), TransactionStatus::Unknown);
    }

    #[test]
    fn status_renders_wire_strings() {
        assert_eq!(TransactionStatus::GatewayFailure.to_string(), "Gateway Failure");
        assert_eq!(TransactionStatus::Approved.to_string(), "Approved");
    }
}
