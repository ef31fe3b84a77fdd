//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketLine},
    fixtures::{Fixture, FixtureError},
    pricing::{Discount, PricingRule, PricingRuleError},
    receipt::{Receipt, ReceiptError, ReceiptLine},
};
