//! Fixtures
//!
//! Pricing rule sets and scan lists loaded from YAML files laid out as
//! `<base>/rules/<name>.yml` and `<base>/scans/<name>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    basket::{Basket, BasketError},
    fixtures::{rules::RulesFixture, scans::ScansFixture},
    pricing::PricingRule,
};

pub mod rules;
pub mod scans;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between rules
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No rules loaded yet
    #[error("No pricing rules loaded yet; currency unknown")]
    NoCurrency,

    /// Basket creation error
    #[error("Failed to create basket: {0}")]
    Basket(#[from] BasketError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Pricing rules in file order
    rules: Vec<PricingRule<'a>>,

    /// SKUs to scan, in order
    scans: Vec<String>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            rules: Vec::new(),
            scans: Vec::new(),
            currency: None,
        }
    }

    /// Load pricing rules from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_rules(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rules").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RulesFixture = serde_norway::from_str(&contents)?;

        let mut currency = self.currency;
        let mut loaded = Vec::with_capacity(fixture.rules.len());

        for rule_fixture in fixture.rules {
            let (_minor_units, rule_currency) = rules::parse_price(&rule_fixture.price)?;

            match currency {
                Some(existing_currency) if existing_currency != rule_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        rule_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(rule_currency),
            }

            loaded.push(PricingRule::try_from(rule_fixture)?);
        }

        // Nothing is kept from a file that fails part way through.
        self.currency = currency;
        self.rules.extend(loaded);

        debug!(fixture = name, rules = self.rules.len(), "loaded pricing rules");

        Ok(self)
    }

    /// Load scanned SKUs from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_scans(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("scans").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ScansFixture = serde_norway::from_str(&contents)?;

        self.scans.extend(fixture.scans);

        Ok(self)
    }

    /// Load a complete fixture set (rules and scans with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_rules(name)?.load_scans(name)?;

        Ok(fixture)
    }

    /// Get all pricing rules
    pub fn rules(&self) -> &[PricingRule<'a>] {
        &self.rules
    }

    /// Get all scanned SKUs
    pub fn scans(&self) -> &[String] {
        &self.scans
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no rules have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Create an empty basket priced by the loaded rules
    ///
    /// # Errors
    ///
    /// Returns an error if no rules are loaded or the rule set is invalid.
    pub fn basket(&self) -> Result<Basket<'a>, FixtureError> {
        let currency = self.currency()?;

        Ok(Basket::new(self.rules.clone(), currency)?)
    }

    /// Create a basket and scan every loaded SKU into it
    ///
    /// # Errors
    ///
    /// Returns an error if the basket cannot be created.
    pub fn scanned_basket(&self) -> Result<Basket<'a>, FixtureError> {
        let mut basket = self.basket()?;

        for sku in &self.scans {
            basket.add(sku);
        }

        Ok(basket)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
