//! Checkout
//!
//! Prices a basket of scanned SKUs against per-SKU unit prices and
//! "every Nth unit" bulk discounts.

pub mod basket;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod receipt;
