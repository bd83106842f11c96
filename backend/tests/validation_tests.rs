//! Input validation and volume conversion tests

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{
    bottles_to_liters, quantity_ml, validate_email, validate_ml_per_bottle, validate_password,
    validate_quantity, validate_username, TransactionType, MAX_ML_PER_BOTTLE,
    MAX_QUANTITY_BOTTLES,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_quantity_rules_by_type() {
        assert!(validate_quantity(TransactionType::OpeningStock, 0).is_ok());
        assert!(validate_quantity(TransactionType::ClosingStock, 0).is_ok());
        assert!(validate_quantity(TransactionType::Purchase, 0).is_err());
        assert!(validate_quantity(TransactionType::Sales, -1).is_err());
        assert!(validate_quantity(TransactionType::OpeningStock, -5).is_err());
        assert!(validate_quantity(TransactionType::Sales, 3).is_ok());
        assert!(validate_quantity(TransactionType::Purchase, i64::MAX).is_err());
        assert!(validate_quantity(TransactionType::ClosingStock, MAX_QUANTITY_BOTTLES + 1).is_err());
    }

    #[test]
    fn test_bottle_size_bounds() {
        assert!(validate_ml_per_bottle(0).is_err());
        assert!(validate_ml_per_bottle(750).is_ok());
        assert!(validate_ml_per_bottle(MAX_ML_PER_BOTTLE).is_ok());
        assert!(validate_ml_per_bottle(MAX_ML_PER_BOTTLE + 1).is_err());
    }

    #[test]
    fn test_account_fields() {
        assert!(validate_email("bar@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
        assert!(validate_username("night_shift").is_ok());
        assert!(validate_username("no spaces").is_err());
    }

    #[test]
    fn test_liters_are_exact() {
        assert_eq!(bottles_to_liters(3, 750), dec("2.25"));
        assert_eq!(bottles_to_liters(1, 330), dec("0.33"));
        assert_eq!(quantity_ml(12, 700), 8400);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Liters times 1000 equals the milliliter figure
        #[test]
        fn prop_liters_match_ml(bottles in 0i64..100_000, ml in 1i32..=MAX_ML_PER_BOTTLE) {
            let liters = bottles_to_liters(bottles, ml);
            prop_assert_eq!(liters * Decimal::from(1000), Decimal::from(quantity_ml(bottles, ml)));
        }

        /// Movements of at least one bottle are always accepted
        #[test]
        fn prop_positive_movement_accepted(q in 1i64..=MAX_QUANTITY_BOTTLES) {
            for ty in TransactionType::ALL {
                prop_assert!(validate_quantity(ty, q).is_ok());
            }
        }
    }
}
