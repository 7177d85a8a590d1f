//! Storefront wiring.
//!
//! One [`Storefront`] is constructed at process start and shared (wrap it
//! in an `Arc` for transports); it owns the pipeline and fronts both the
//! read path (catalog, order lookup) and the write path (checkout).

use crate::checkout::{CheckoutError, CheckoutRequest, OrderPipeline, PlacedOrder};
use crate::feed::{StockFeed, StockPublisher, StockSubscription, StockUpdate};
use crate::inventory::{InMemoryInventory, InventoryError, InventoryStore};
use crate::ledger::{InMemoryLedger, LedgerError, OrderLedger, OrderRecord};
use crate::mailer::CustomerMailer;
use crate::product::Product;

pub struct Storefront<S, L, M, P> {
    pipeline: OrderPipeline<S, L, M, P>,
}

impl<S, L, M, P> Storefront<S, L, M, P>
where
    S: InventoryStore,
    L: OrderLedger,
    M: CustomerMailer,
    P: StockPublisher,
{
    pub fn new(store: S, ledger: L, mailer: M, feed: P) -> Self {
        Storefront {
            pipeline: OrderPipeline::new(store, ledger, mailer, feed),
        }
    }

    /// Full catalog, for display.
    pub fn products(&self) -> Result<Vec<Product>, InventoryError> {
        self.pipeline.store().list()
    }

    pub fn product(&self, product_id: &str) -> Result<Option<Product>, InventoryError> {
        self.pipeline.store().get(product_id)
    }

    /// Add or replace a catalog product (startup seeding, admin tooling).
    pub fn add_product(&self, product: Product) -> Result<(), InventoryError> {
        self.pipeline.store().insert(product)
    }

    /// Receive stock for one variant and broadcast the fresh snapshot.
    pub fn restock(
        &self,
        product_id: &str,
        color: &str,
        size: &str,
        amount: u32,
    ) -> Result<Product, InventoryError> {
        let updated = self
            .pipeline
            .store()
            .restock_variant(product_id, color, size, amount)?;
        if let Err(e) = self
            .pipeline
            .feed()
            .publish(StockUpdate::new(product_id, updated.snapshot()))
        {
            eprintln!("stock update for {} not broadcast: {}", product_id, e);
        }
        Ok(updated)
    }

    pub fn order(&self, order_id: &str) -> Result<Option<OrderRecord>, LedgerError> {
        self.pipeline.ledger().find_by_order_id(order_id)
    }

    pub fn place_order(&self, request: &CheckoutRequest) -> Result<PlacedOrder, CheckoutError> {
        self.pipeline.place_order(request)
    }

    pub fn pipeline(&self) -> &OrderPipeline<S, L, M, P> {
        &self.pipeline
    }
}

impl<S, L, M> Storefront<S, L, M, StockFeed>
where
    S: InventoryStore,
    L: OrderLedger,
    M: CustomerMailer,
{
    /// Register a viewer for stock change events.
    pub fn subscribe(&self) -> StockSubscription {
        self.pipeline.feed().subscribe()
    }
}

impl<M: CustomerMailer> Storefront<InMemoryInventory, InMemoryLedger, M, StockFeed> {
    /// All-in-memory wiring: the default single-process deployment.
    pub fn in_memory(mailer: M) -> Self {
        Storefront::new(
            InMemoryInventory::new(),
            InMemoryLedger::new(),
            mailer,
            StockFeed::new(),
        )
    }
}
