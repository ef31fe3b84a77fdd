//! Property tests for basket totals.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::GBP};

use checkout::{basket::Basket, pricing::PricingRule};

fn kata_basket() -> Result<Basket<'static>, TestCaseError> {
    Basket::new(
        [
            PricingRule::new("A", Money::from_minor(10_00, GBP)),
            PricingRule::with_discount(
                "B",
                Money::from_minor(15_00, GBP),
                3,
                Money::from_minor(5_00, GBP),
            ),
            PricingRule::new("C", Money::from_minor(40_00, GBP)),
            PricingRule::with_discount(
                "D",
                Money::from_minor(55_00, GBP),
                2,
                Money::from_minor(27_50, GBP),
            ),
        ],
        GBP,
    )
    .map_err(|err| TestCaseError::fail(err.to_string()))
}

proptest! {
    #[test]
    fn undiscounted_total_is_sum_of_unit_prices(
        skus in prop::collection::vec(prop::sample::select(vec!["A", "C"]), 0..64)
    ) {
        let mut basket = kata_basket()?;
        let mut expected = 0i64;

        for sku in &skus {
            basket.add(sku);
            expected += if *sku == "A" { 10_00 } else { 40_00 };
        }

        prop_assert_eq!(basket.total_price(), Money::from_minor(expected, GBP));
    }

    #[test]
    fn unknown_skus_never_change_the_total(
        known in prop::collection::vec(prop::sample::select(vec!["A", "B", "C", "D"]), 0..16),
        unknown in prop::collection::vec("[E-Za-z][A-Za-z0-9]{0,8}", 1..16)
    ) {
        let mut basket = kata_basket()?;

        for sku in &known {
            basket.add(sku);
        }

        let before = basket.total_price();

        for sku in &unknown {
            basket.add(sku);
            prop_assert_eq!(basket.total_price(), before);
        }
    }

    #[test]
    fn total_never_decreases(
        skus in prop::collection::vec("[A-DZ]", 0..64)
    ) {
        let mut basket = kata_basket()?;
        let mut previous = *basket.total_price().amount();

        for sku in &skus {
            basket.add(sku);

            let current = *basket.total_price().amount();
            prop_assert!(current >= previous);
            prop_assert_eq!(basket.total_price(), basket.total_price());

            previous = current;
        }
    }

    #[test]
    fn every_completed_group_takes_one_discount(
        unit_minor in 0i64..10_000,
        discount_ratio in 0i64..=100,
        threshold in 1u32..10,
        quantity in 0u32..60
    ) {
        let discount_minor = unit_minor * discount_ratio / 100;

        let rule = PricingRule::with_discount(
            "X",
            Money::from_minor(unit_minor, GBP),
            threshold,
            Money::from_minor(discount_minor, GBP),
        );

        let mut basket = Basket::new([rule], GBP)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        for _ in 0..quantity {
            basket.add("X");
        }

        let groups = i64::from(quantity / threshold);
        let expected_minor = unit_minor * i64::from(quantity) - discount_minor * groups;

        prop_assert_eq!(
            *basket.total_price().amount(),
            Decimal::new(expected_minor, 2)
        );
        prop_assert_eq!(basket.quantity("X"), quantity);
    }
}
