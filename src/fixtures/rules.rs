//! Pricing Rule Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::PricingRule};

/// Wrapper for pricing rules in YAML
#[derive(Debug, Deserialize)]
pub struct RulesFixture {
    /// Rules in configuration order
    pub rules: Vec<RuleFixture>,
}

/// Pricing Rule Fixture
#[derive(Debug, Deserialize)]
pub struct RuleFixture {
    /// SKU the rule prices
    pub sku: String,

    /// Unit price (e.g., "15.00 GBP")
    pub price: String,

    /// Optional bulk discount
    pub discount: Option<DiscountFixture>,
}

/// Every-Nth-unit discount
#[derive(Debug, Deserialize)]
pub struct DiscountFixture {
    /// Group size
    pub every: u32,

    /// Amount taken off the unit completing a group (e.g., "5.00 GBP")
    pub amount: String,
}

impl TryFrom<RuleFixture> for PricingRule<'_> {
    type Error = FixtureError;

    fn try_from(fixture: RuleFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let unit_price = Money::from_minor(minor_units, currency);

        let Some(discount) = fixture.discount else {
            return Ok(PricingRule::new(fixture.sku, unit_price));
        };

        let (discount_minor, discount_currency) = parse_price(&discount.amount)?;

        if discount_currency != currency {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                discount_currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(PricingRule::with_discount(
            fixture.sku,
            unit_price,
            discount.every,
            Money::from_minor(discount_minor, currency),
        ))
    }
}

/// Parse price string (e.g., "27.50 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal or has more decimal places
/// than the currency's minor unit, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    // Amounts finer than the currency's minor unit are rejected rather than rounded.
    if amount.normalize().scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(format!(
            "{s} has more decimal places than {} allows",
            currency.iso_alpha_code
        )));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(Decimal::from(factor)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
