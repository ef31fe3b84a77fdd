//! Basket

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    pricing::{PricingRule, PricingRuleError},
    receipt::Receipt,
};

/// Errors related to basket construction.
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// A rule failed validation.
    #[error("Invalid pricing rule for {sku}: {source}")]
    InvalidRule {
        /// SKU of the offending rule
        sku: String,

        /// Why the rule was rejected
        source: PricingRuleError,
    },

    /// More than one rule was configured for the same SKU.
    #[error("Duplicate pricing rule for {0}")]
    DuplicateSku(String),

    /// A rule's currency differs from the basket currency (index, rule currency, basket currency).
    #[error("Rule {0} has currency {1}, but basket has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// Running tally for one distinct scanned SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketLine<'a> {
    sku: String,
    quantity: u32,
    unit_price: Option<Money<'a, Currency>>,
    charged: Decimal,
}

impl<'a> BasketLine<'a> {
    fn new(sku: &str, unit_price: Option<Money<'a, Currency>>) -> Self {
        Self {
            sku: sku.to_owned(),
            quantity: 0,
            unit_price,
            charged: Decimal::ZERO,
        }
    }

    /// Scanned SKU
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Number of units scanned so far.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Undiscounted unit price, or `None` if no rule prices this SKU.
    pub fn unit_price(&self) -> Option<Money<'a, Currency>> {
        self.unit_price
    }

    /// Amount charged for this SKU so far.
    pub fn charged(&self) -> Decimal {
        self.charged
    }
}

/// Basket
///
/// Accumulates scanned SKUs against a fixed set of pricing rules. Unknown SKUs
/// are counted but never charged.
#[derive(Debug)]
pub struct Basket<'a> {
    rules: Vec<PricingRule<'a>>,
    rule_index: FxHashMap<String, usize>,
    lines: Vec<BasketLine<'a>>,
    line_index: FxHashMap<String, usize>,
    total: Decimal,
    currency: &'static Currency,
}

impl<'a> Basket<'a> {
    /// Create an empty basket priced by `rules`.
    ///
    /// # Errors
    ///
    /// Returns a `BasketError` if a rule is malformed, uses another currency,
    /// or shares its SKU with an earlier rule.
    pub fn new(
        rules: impl Into<Vec<PricingRule<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, BasketError> {
        let rules = rules.into();
        let mut rule_index = FxHashMap::default();

        for (i, rule) in rules.iter().enumerate() {
            let rule_currency = rule.unit_price().currency();

            if rule_currency != currency {
                return Err(BasketError::CurrencyMismatch(
                    i,
                    rule_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            rule.validate().map_err(|source| BasketError::InvalidRule {
                sku: rule.sku().to_owned(),
                source,
            })?;

            if rule_index.insert(rule.sku().to_owned(), i).is_some() {
                return Err(BasketError::DuplicateSku(rule.sku().to_owned()));
            }
        }

        debug!(
            rules = rules.len(),
            currency = currency.iso_alpha_code,
            "created basket"
        );

        Ok(Basket {
            rules,
            rule_index,
            lines: Vec::new(),
            line_index: FxHashMap::default(),
            total: Decimal::ZERO,
            currency,
        })
    }

    /// Scan one unit of `sku`.
    ///
    /// Any SKU is accepted. SKUs without a rule are counted and priced at zero.
    pub fn add(&mut self, sku: &str) {
        let rule = self.rule_index.get(sku).and_then(|&idx| self.rules.get(idx));

        let line_idx = match self.line_index.get(sku) {
            Some(&idx) => idx,
            None => {
                let idx = self.lines.len();

                self.lines
                    .push(BasketLine::new(sku, rule.map(PricingRule::unit_price)));
                self.line_index.insert(sku.to_owned(), idx);

                idx
            }
        };

        let Some(line) = self.lines.get_mut(line_idx) else {
            return;
        };

        line.quantity = line.quantity.saturating_add(1);

        let Some(rule) = rule else {
            debug!(sku, quantity = line.quantity, "unrecognised sku priced at zero");
            return;
        };

        let price = rule.price_for_unit(line.quantity);

        line.charged += *price.amount();
        self.total += *price.amount();

        trace!(sku, quantity = line.quantity, price = %price, "priced unit");
    }

    /// Total charged for everything scanned so far.
    pub fn total_price(&self) -> Money<'a, Currency> {
        Money::from_decimal(self.total, self.currency)
    }

    /// Number of units of `sku` scanned so far, whether or not it is priced.
    pub fn quantity(&self, sku: &str) -> u32 {
        self.line_index
            .get(sku)
            .and_then(|&idx| self.lines.get(idx))
            .map_or(0, BasketLine::quantity)
    }

    /// Pricing rules in configuration order.
    pub fn rules(&self) -> &[PricingRule<'a>] {
        &self.rules
    }

    /// One line per distinct scanned SKU, in first-scan order.
    pub fn lines(&self) -> &[BasketLine<'a>] {
        &self.lines
    }

    /// Build a receipt for the current contents.
    pub fn receipt(&self) -> Receipt<'a> {
        Receipt::from_basket(self)
    }

    /// Get the number of units scanned.
    pub fn len(&self) -> usize {
        self.lines
            .iter()
            .map(|line| usize::try_from(line.quantity).unwrap_or(usize::MAX))
            .sum()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the basket.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
