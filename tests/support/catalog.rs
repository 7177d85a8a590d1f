//! Demo catalog used across the integration tests.

use dcomm::Product;

pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new("P0000001", "Nike Air Max1", 120)
            .with_description("Lightweight running shoes with supreme comfort.")
            .with_image("/Images/product1.jpg")
            .with_variant("Red", "S", 12)
            .with_variant("Red", "M", 3)
            .with_variant("Red", "L", 4)
            .with_variant("Red", "XL", 7)
            .with_variant("Blue", "S", 4)
            .with_variant("Blue", "M", 6)
            .with_variant("Blue", "L", 9)
            .with_variant("Blue", "XL", 12)
            .with_variant("Black", "S", 6)
            .with_variant("Black", "M", 7)
            .with_variant("Black", "L", 5)
            .with_variant("Black", "XL", 9),
        Product::new("P0000002", "Nike Jordan I", 440)
            .with_description("Classic basketball sneakers with premium leather.")
            .with_image("/Images/product2.webp")
            .with_variant("Red", "S", 6)
            .with_variant("Red", "M", 5)
            .with_variant("Blue", "M", 6)
            .with_variant("Black", "M", 5),
        Product::new("P0000003", "Nike Jordan II", 290)
            .with_description("Classic basketball sneakers with premium leather.")
            .with_image("/Images/product3.jpg")
            .with_variant("Red", "M", 6)
            .with_variant("Blue", "M", 7)
            .with_variant("Black", "M", 6),
    ]
}
