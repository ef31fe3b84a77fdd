//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::basket::Basket;

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One receipt line per distinct scanned SKU.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Scanned SKU
    pub sku: String,

    /// Units scanned
    pub quantity: u32,

    /// Quantity times unit price, before discounts. Zero for unrecognised SKUs.
    pub base_price: Money<'a, Currency>,

    /// Amount actually charged
    pub charged: Money<'a, Currency>,

    /// Whether a pricing rule matched this SKU
    pub recognised: bool,
}

/// Receipt for a basket at the time it was taken.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,

    /// Total cost before any discounts
    subtotal: Money<'a, Currency>,

    /// Total amount charged
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the current contents of a basket.
    pub fn from_basket(basket: &Basket<'a>) -> Self {
        let currency = basket.currency();

        let lines: SmallVec<[ReceiptLine<'a>; 10]> = basket
            .lines()
            .iter()
            .map(|line| {
                let base = line.unit_price().map_or(Decimal::ZERO, |unit_price| {
                    unit_price.amount() * Decimal::from(line.quantity())
                });

                ReceiptLine {
                    sku: line.sku().to_owned(),
                    quantity: line.quantity(),
                    base_price: Money::from_decimal(base, currency),
                    charged: Money::from_decimal(line.charged(), currency),
                    recognised: line.unit_price().is_some(),
                }
            })
            .collect();

        let subtotal = lines
            .iter()
            .map(|line| *line.base_price.amount())
            .sum::<Decimal>();

        Receipt {
            lines,
            subtotal: Money::from_decimal(subtotal, currency),
            total: basket.total_price(),
            currency,
        }
    }

    /// Receipt lines in first-scan order.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Total cost before any discounts
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount charged
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by bulk discounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;
        let subtotal = *self.subtotal.amount();

        if subtotal.is_zero() {
            return Ok(Percentage::from(0.0));
        }

        Ok(Percentage::from(*savings.amount() / subtotal))
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["SKU", "Qty", "Base Price", "Charged", "Savings"]);

        for line in &self.lines {
            builder.push_record(line_cells(line)?);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(1..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        write_receipt_summary(&mut out, self)
    }
}

fn line_cells(line: &ReceiptLine<'_>) -> Result<[String; 5], ReceiptError> {
    if !line.recognised {
        return Ok([
            line.sku.clone(),
            line.quantity.to_string(),
            "-".to_string(),
            "-".to_string(),
            "not priced".to_string(),
        ]);
    }

    let savings = line.base_price.sub(line.charged)?;

    let savings = if savings.amount().is_zero() {
        String::new()
    } else {
        format!("-{savings}")
    };

    Ok([
        line.sku.clone(),
        line.quantity.to_string(),
        line.base_price.to_string(),
        line.charged.to_string(),
        savings,
    ])
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;
    let savings_percent_points =
        percent_points_from_fractional_percentage(receipt.savings_percent()?);

    let rows = [
        (" Subtotal:", format!("{}", receipt.subtotal())),
        (" Total:", format!("{}", receipt.total())),
        (" Savings:", format!("({savings_percent_points:.2}%) {savings}")),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
