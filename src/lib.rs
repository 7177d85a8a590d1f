//! dcomm: storefront order backend.
//!
//! Browse products, check out, get a confirmation. The load-bearing part
//! is the order placement pipeline: validate a checkout against
//! authoritative state, classify the transaction outcome, atomically
//! decrement the per-color/per-size stock counter, append the order to
//! the ledger, and broadcast the fresh stock snapshot to every connected
//! viewer, all while concurrent checkouts race for the same variant.
//!
//! ```
//! use dcomm::{CheckoutRequest, Customer, LogMailer, Product, Storefront};
//!
//! let shop = Storefront::in_memory(LogMailer::new());
//! shop.add_product(
//!     Product::new("P0000001", "Nike Air Max1", 120).with_variant("Red", "M", 3),
//! )
//! .unwrap();
//!
//! let viewer = shop.subscribe();
//!
//! let request = CheckoutRequest::new(
//!     "P0000001",
//!     "Nike Air Max1",
//!     2,
//!     240,
//!     Customer::with_email("jo@example.com"),
//! )
//! .with_variant("red", "m")
//! .with_transaction_type(1);
//!
//! let placed = shop.place_order(&request).unwrap();
//! assert!(placed.order_id.starts_with("ORD-"));
//!
//! let update = viewer.poll(100).unwrap();
//! assert_eq!(update.new_stock["Red"]["M"], 1);
//! ```

mod checkout;
mod feed;
mod inventory;
mod ledger;
mod mailer;
mod product;
mod storefront;

pub use checkout::{CheckoutError, CheckoutRequest, OrderIds, OrderPipeline, PlacedOrder};
pub use feed::{BroadcastError, StockFeed, StockPublisher, StockSubscription, StockUpdate};
pub use inventory::{InMemoryInventory, InventoryError, InventoryStore};
pub use ledger::{
    Customer, InMemoryLedger, LedgerError, OrderLedger, OrderRecord, TransactionStatus,
};
pub use mailer::{CustomerMailer, LogMailer, MailError};
pub use product::{Product, StockSnapshot};
pub use storefront::Storefront;

#[cfg(feature = "emitter")]
pub use feed::EmitterPublisher;

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
pub mod http;
