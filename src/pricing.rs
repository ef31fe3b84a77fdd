//! Pricing

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised when a pricing rule is malformed.
#[derive(Debug, Error, PartialEq)]
pub enum PricingRuleError {
    /// The unit price is below zero.
    #[error("unit price must not be negative")]
    NegativeUnitPrice,

    /// The discount amount is below zero.
    #[error("discount amount must not be negative")]
    NegativeDiscount,

    /// The discount would make the discounted unit negative.
    #[error("discount amount exceeds the unit price")]
    DiscountExceedsUnitPrice,

    /// The discount and unit price use different currencies (discount currency, unit currency).
    #[error("Discount has currency {0}, but unit price has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Bulk discount attached to a pricing rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discount<'a> {
    /// Every unit is charged at the unit price.
    None,

    /// The unit completing each group of `threshold` units is charged `amount` less.
    EveryNthUnit {
        /// Group size
        threshold: NonZeroU32,

        /// Amount taken off the unit that completes a group
        amount: Money<'a, Currency>,
    },
}

/// Unit price and optional bulk discount for a single SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRule<'a> {
    sku: String,
    unit_price: Money<'a, Currency>,
    discount: Discount<'a>,
}

impl<'a> PricingRule<'a> {
    /// Create a rule that always charges the unit price.
    pub fn new(sku: impl Into<String>, unit_price: Money<'a, Currency>) -> Self {
        Self {
            sku: sku.into(),
            unit_price,
            discount: Discount::None,
        }
    }

    /// Create a rule that takes `amount` off every `threshold`-th unit.
    ///
    /// A `threshold` of zero means the rule never discounts.
    pub fn with_discount(
        sku: impl Into<String>,
        unit_price: Money<'a, Currency>,
        threshold: u32,
        amount: Money<'a, Currency>,
    ) -> Self {
        let discount = match NonZeroU32::new(threshold) {
            Some(threshold) => Discount::EveryNthUnit { threshold, amount },
            None => Discount::None,
        };

        Self {
            sku: sku.into(),
            unit_price,
            discount,
        }
    }

    /// The SKU this rule prices.
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Undiscounted price of one unit.
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// The bulk discount, if any.
    pub fn discount(&self) -> &Discount<'a> {
        &self.discount
    }

    /// Returns true if this rule prices `sku`. Matching is exact and case-sensitive.
    pub fn applies_to(&self, sku: &str) -> bool {
        self.sku == sku
    }

    /// Price contribution of the single unit that brought the SKU's count to `quantity`.
    ///
    /// Only the unit that completes a group absorbs the discount, so the price
    /// of a group is not spread evenly across its units.
    pub fn price_for_unit(&self, quantity: u32) -> Money<'a, Currency> {
        match self.discount {
            Discount::EveryNthUnit { threshold, amount }
                if quantity % threshold.get() == 0 =>
            {
                Money::from_decimal(
                    self.unit_price.amount() - amount.amount(),
                    self.unit_price.currency(),
                )
            }
            _ => self.unit_price,
        }
    }

    /// Check that the rule can never produce a negative or mixed-currency price.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingRuleError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PricingRuleError> {
        if *self.unit_price.amount() < Decimal::ZERO {
            return Err(PricingRuleError::NegativeUnitPrice);
        }

        let Discount::EveryNthUnit { amount, .. } = self.discount else {
            return Ok(());
        };

        let (discount_currency, unit_currency) = (amount.currency(), self.unit_price.currency());

        if discount_currency != unit_currency {
            return Err(PricingRuleError::CurrencyMismatch(
                discount_currency.iso_alpha_code,
                unit_currency.iso_alpha_code,
            ));
        }

        if *amount.amount() < Decimal::ZERO {
            return Err(PricingRuleError::NegativeDiscount);
        }

        if amount.amount() > self.unit_price.amount() {
            return Err(PricingRuleError::DiscountExceedsUnitPrice);
        }

        Ok(())
    }
}
