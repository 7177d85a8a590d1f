//! Order placement.
//!
//! One entry point, [`OrderPipeline::place_order`], run to completion per
//! checkout attempt: field presence → product lookup → price/name
//! integrity → quantity sanity → advisory availability → transaction
//! classification → atomic decrement (the commit point) → ledger append →
//! stock broadcast → customer notice. Everything before the decrement is
//! side-effect-free; everything after the append is best-effort.

mod error;
mod order_id;
mod pipeline;
mod request;

pub use error::CheckoutError;
pub use order_id::OrderIds;
pub use pipeline::{OrderPipeline, PlacedOrder};
pub use request::CheckoutRequest;
