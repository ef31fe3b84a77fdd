//! Integration tests for the checkout kata rule set loaded from `fixtures/`.
//!
//! Rules: A £10, B £15 (every 3rd £5 off), C £40, D £55 (every 2nd £27.50 off).

use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use checkout::{basket::Basket, fixtures::Fixture};

fn kata_basket() -> Result<Basket<'static>, checkout::fixtures::FixtureError> {
    Fixture::from_set("kata")?.basket()
}

#[test]
fn each_sku_alone_costs_its_unit_price() -> TestResult {
    for (sku, expected) in [("A", 10_00), ("B", 15_00), ("C", 40_00), ("D", 55_00)] {
        let mut basket = kata_basket()?;

        basket.add(sku);

        assert_eq!(
            basket.total_price(),
            Money::from_minor(expected, GBP),
            "single {sku}"
        );
    }

    Ok(())
}

#[test]
fn three_b_total_40() -> TestResult {
    let mut basket = kata_basket()?;

    basket.add("B");
    basket.add("B");
    basket.add("B");

    assert_eq!(basket.total_price(), Money::from_minor(40_00, GBP));

    Ok(())
}

#[test]
fn two_d_total_82_50() -> TestResult {
    let mut basket = kata_basket()?;

    basket.add("D");
    basket.add("D");

    assert_eq!(basket.total_price(), Money::from_minor(82_50, GBP));

    Ok(())
}

#[test]
fn unknown_sku_total_0() -> TestResult {
    let mut basket = kata_basket()?;

    basket.add("Z");

    assert_eq!(basket.total_price(), Money::from_minor(0, GBP));

    Ok(())
}

#[test]
fn scanned_fixture_basket_total() -> TestResult {
    let fixture = Fixture::from_set("kata")?;
    let basket = fixture.scanned_basket()?;

    // A 10 + B 15 + 15 + 10 + C 40 + D 55 + 27.50, Z is free.
    // Undiscounted: A 10 + B 45 + C 40 + D 110.
    assert_eq!(basket.total_price(), Money::from_minor(172_50, GBP));
    assert_eq!(basket.quantity("B"), 3);
    assert_eq!(basket.quantity("Z"), 1);

    let receipt = basket.receipt();

    assert_eq!(receipt.total(), basket.total_price());
    assert_eq!(receipt.subtotal(), Money::from_minor(205_00, GBP));
    assert_eq!(receipt.savings()?, Money::from_minor(32_50, GBP));

    Ok(())
}
