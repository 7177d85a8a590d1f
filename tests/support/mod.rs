#![allow(dead_code)]
//! Shared fixtures for integration tests.

pub mod catalog;

use std::sync::{Arc, Mutex};

use dcomm::{InMemoryInventory, InMemoryLedger, LogMailer, StockFeed, Storefront};

pub type TestShop = Storefront<InMemoryInventory, InMemoryLedger, LogMailer, StockFeed>;

/// A storefront with a buffered mailer and an empty catalog.
pub fn bare_shop() -> (TestShop, Arc<Mutex<Vec<String>>>) {
    let mailbox = Arc::new(Mutex::new(Vec::new()));
    let shop = Storefront::new(
        InMemoryInventory::new(),
        InMemoryLedger::new(),
        LogMailer::with_buffer(mailbox.clone()),
        StockFeed::new(),
    );
    (shop, mailbox)
}

/// A storefront seeded with the demo catalog.
pub fn shop_with_catalog() -> (TestShop, Arc<Mutex<Vec<String>>>) {
    let (shop, mailbox) = bare_shop();
    for product in catalog::seed_products() {
        shop.add_product(product).unwrap();
    }
    (shop, mailbox)
}
