//! Bottle to volume conversion
//!
//! Quantities are tracked in whole bottles; volume is derived from the
//! product's fixed milliliters-per-bottle.

use rust_decimal::Decimal;

/// Milliliters for a bottle count, saturating at the i64 range
pub fn quantity_ml(bottles: i64, ml_per_bottle: i32) -> i64 {
    bottles.saturating_mul(i64::from(ml_per_bottle))
}

/// Exact liters for a bottle count
pub fn bottles_to_liters(bottles: i64, ml_per_bottle: i32) -> Decimal {
    Decimal::from(bottles) * Decimal::from(ml_per_bottle) / Decimal::from(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_quantity_ml() {
        assert_eq!(quantity_ml(12, 750), 9000);
        assert_eq!(quantity_ml(0, 700), 0);
        assert_eq!(quantity_ml(-2, 1000), -2000);
    }

    #[test]
    fn test_quantity_ml_saturates() {
        assert_eq!(quantity_ml(i64::MAX, 750), i64::MAX);
    }

    #[test]
    fn test_bottles_to_liters() {
        assert_eq!(bottles_to_liters(3, 750), Decimal::from_str("2.25").unwrap());
        assert_eq!(bottles_to_liters(2, 1000), Decimal::from(2));
        assert_eq!(bottles_to_liters(1, 330), Decimal::from_str("0.33").unwrap());
    }
}
