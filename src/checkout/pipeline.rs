//! The order placement pipeline.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::error::CheckoutError;
use super::order_id::OrderIds;
use super::request::CheckoutRequest;
use crate::feed::{StockPublisher, StockUpdate};
use crate::inventory::InventoryStore;
use crate::ledger::{OrderLedger, OrderRecord, TransactionStatus};
use crate::mailer::CustomerMailer;

/// Successful checkout result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    #[serde(rename = "orderID")]
    pub order_id: String,
}

/// Runs every checkout attempt to completion.
///
/// Construct one at startup and share it; the store, ledger, mailer and
/// feed are the four collaborators of the write path. The availability
/// check in [`place_order`](Self::place_order) is an advisory fast-fail;
/// correctness rests on the store's own re-validated, atomic decrement.
pub struct OrderPipeline<S, L, M, P> {
    store: S,
    ledger: L,
    mailer: M,
    feed: P,
    ids: OrderIds,
}

impl<S, L, M, P> OrderPipeline<S, L, M, P>
where
    S: InventoryStore,
    L: OrderLedger,
    M: CustomerMailer,
    P: StockPublisher,
{
    pub fn new(store: S, ledger: L, mailer: M, feed: P) -> Self {
        OrderPipeline {
            store,
            ledger,
            mailer,
            feed,
            ids: OrderIds::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn feed(&self) -> &P {
        &self.feed
    }

    /// Place one order.
    ///
    /// Rejections are side-effect-free: no inventory mutation, no ledger
    /// append, no broadcast. Once the decrement and append have committed,
    /// broadcast and mail failures are logged and the order stands.
    pub fn place_order(&self, request: &CheckoutRequest) -> Result<PlacedOrder, CheckoutError> {
        // 1. Field presence.
        let (product_id, product_name, quantity, total_price, customer) = match (
            request.product_id.as_deref().filter(|v| !v.is_empty()),
            request.product_name.as_deref().filter(|v| !v.is_empty()),
            request.quantity,
            request.total_price,
            request.customer.as_ref().filter(|c| !c.email.is_empty()),
        ) {
            (Some(id), Some(name), Some(quantity), Some(total), Some(customer)) => {
                (id, name, quantity, total, customer)
            }
            _ => return Err(CheckoutError::MissingFields),
        };

        // 2. Product lookup.
        let product = self
            .store
            .get(product_id)?
            .ok_or_else(|| CheckoutError::ProductNotFound(product_id.to_string()))?;

        // 3. Name and price integrity against the stored product. Exact
        //    equality, in integer units widened to u64.
        if product.name != product_name
            || u64::from(product.price) * u64::from(quantity) != total_price
        {
            return Err(CheckoutError::ProductMismatch);
        }

        // 4. Quantity sanity.
        if quantity < 1 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }

        // 5. Variant resolution and advisory availability, against the
        //    same read as step 2.
        let color = request.color.as_deref().unwrap_or("");
        let size = request.size.as_deref().unwrap_or("");
        let stored_color = product
            .resolve_color(color)
            .ok_or_else(|| CheckoutError::ColorNotFound {
                requested: color.to_string(),
                available: product.colors(),
            })?
            .to_string();
        let stored_size = product
            .resolve_size(&stored_color, size)
            .ok_or_else(|| CheckoutError::SizeNotFound {
                color: stored_color.clone(),
                requested: size.to_string(),
                available: product.sizes(&stored_color),
            })?
            .to_string();
        let available = product
            .variant_quantity(&stored_color, &stored_size)
            .unwrap_or(0);
        if quantity > available {
            return Err(CheckoutError::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        // 6. Transaction outcome classification.
        let status = TransactionStatus::from_code(request.transaction_type);

        // 7. Non-approved: notify and stop. Nothing has been mutated.
        if !status.is_approved() {
            if let Err(e) = self.mailer.send_failure_notice(customer, status) {
                eprintln!("failure notice to {} not delivered: {}", customer.email, e);
            }
            return Err(CheckoutError::TransactionFailed(status));
        }

        // 8. Commit point: the store re-validates against the live
        //    quantity, so losing a race surfaces here as InsufficientStock
        //    with nothing else touched.
        let updated =
            self.store
                .decrement_variant(product_id, &stored_color, &stored_size, quantity)?;

        let order_id = self.ids.next();
        let record = OrderRecord {
            order_id: order_id.clone(),
            product_id: product_id.to_string(),
            product_name: product.name.clone(),
            color: stored_color.clone(),
            size: stored_size.clone(),
            unit_price: product.price,
            quantity,
            total_price,
            customer: customer.clone(),
            transaction_status: status,
            created_at: SystemTime::now(),
        };

        if let Err(e) = self.ledger.append(record.clone()) {
            // Undo the decrement so a failed request leaves no net mutation.
            if let Err(undo) =
                self.store
                    .restock_variant(product_id, &stored_color, &stored_size, quantity)
            {
                eprintln!(
                    "rollback of {} x{} {}/{} failed after ledger error: {}",
                    product_id, quantity, stored_color, stored_size, undo
                );
            }
            return Err(CheckoutError::Ledger(e));
        }

        // Post-commit side effects are best-effort: log, don't retry,
        // never roll back.
        if let Err(e) = self
            .feed
            .publish(StockUpdate::new(product_id, updated.snapshot()))
        {
            eprintln!("stock update for {} not broadcast: {}", product_id, e);
        }
        if let Err(e) = self.mailer.send_success_notice(&record.customer, &record) {
            eprintln!("confirmation for order {} not delivered: {}", order_id, e);
        }

        Ok(PlacedOrder { order_id })
    }
}
