//! Available-quantity rule.
//!
//! The platform only accepts whole units, so ERP quantities (floats) are cast
//! to integers *before* subtracting: `int(actual) - int(reserved)`.

/// Integer cast with truncation toward zero. Non-finite values count as 0.
pub fn int_cast(value: f64) -> i64 {
    if value.is_finite() {
        // `as` saturates at the i64 bounds.
        value.trunc() as i64
    } else {
        0
    }
}

/// Quantity pushed to the platform: actual stock minus reserved stock.
///
/// May be negative when more stock is reserved than on hand; the platform
/// accepts negative availability.
pub fn available_quantity(actual_qty: f64, reserved_qty: f64) -> i64 {
    int_cast(actual_qty).saturating_sub(int_cast(reserved_qty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fractional_actual_is_truncated() {
        assert_eq!(available_quantity(10.7, 3.0), 7);
    }

    #[test]
    fn each_side_is_truncated_independently() {
        // int(5.9) - int(2.9) = 5 - 2, not int(3.0)
        assert_eq!(available_quantity(5.9, 2.9), 3);
    }

    #[test]
    fn negative_values_truncate_toward_zero() {
        assert_eq!(int_cast(-2.5), -2);
        assert_eq!(available_quantity(1.0, 4.0), -3);
    }

    #[test]
    fn non_finite_counts_as_zero() {
        assert_eq!(int_cast(f64::NAN), 0);
        assert_eq!(int_cast(f64::INFINITY), 0);
        assert_eq!(available_quantity(f64::NAN, 2.0), -2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whole-number quantities pass through unchanged.
        #[test]
        fn whole_quantities_subtract_exactly(
            actual in -1_000_000i64..1_000_000i64,
            reserved in 0i64..1_000_000i64,
        ) {
            prop_assert_eq!(available_quantity(actual as f64, reserved as f64), actual - reserved);
        }

        /// Property: truncation never moves a quantity by a whole unit or more,
        /// and never rounds a positive quantity up.
        #[test]
        fn truncation_stays_within_one_unit(qty in 0.0f64..1e9) {
            let cast = int_cast(qty) as f64;
            prop_assert!(cast <= qty);
            prop_assert!(qty - cast < 1.0);
        }
    }
}
