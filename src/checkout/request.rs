//! The inbound checkout request, as it arrives off the wire.

use serde::{Deserialize, Serialize};

use crate::ledger::Customer;

/// A client-submitted intent to purchase a quantity of one product
/// variant.
///
/// Every field is optional at this level so any JSON object decodes; the
/// pipeline, not the decoder, classifies what's missing. That keeps the
/// caller-facing error a stable `MissingFields` instead of a decode
/// failure that varies with which field was dropped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<u32>,
    pub total_price: Option<u64>,
    pub customer: Option<Customer>,
    /// Payment classification code: 1 approved, 2 declined, 3 gateway
    /// failure, anything else unknown.
    pub transaction_type: Option<i64>,
}

impl CheckoutRequest {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        total_price: u64,
        customer: Customer,
    ) -> Self {
        CheckoutRequest {
            product_id: Some(product_id.into()),
            product_name: Some(product_name.into()),
            quantity: Some(quantity),
            total_price: Some(total_price),
            customer: Some(customer),
            ..CheckoutRequest::default()
        }
    }

    pub fn with_variant(mut self, color: impl Into<String>, size: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self.size = Some(size.into());
        self
    }

    pub fn with_transaction_type(mut self, code: i64) -> Self {
        self.transaction_type = Some(code);
        self
    }
}
