//! Input validation tests
//!
//! Unit and property-based tests for the shared field validators used by
//! the address book, product catalog, goods receipt and invoice endpoints.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::validation::{
    validate_address_name, validate_amount, validate_location, validate_password,
    validate_pincode, validate_product_name, validate_quantity, validate_user_name,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests: Address Fields
// ============================================================================

#[test]
fn address_name_minimum_length() {
    assert!(validate_address_name("ABC").is_ok());
    assert!(validate_address_name("Acme Traders").is_ok());
    assert!(validate_address_name("AB").is_err());
    assert!(validate_address_name("").is_err());
}

#[test]
fn address_name_ignores_surrounding_whitespace() {
    assert!(validate_address_name("  AB  ").is_err());
    assert!(validate_address_name("  ABC  ").is_ok());
}

#[test]
fn location_minimum_length() {
    assert!(validate_location("12 Main Street").is_ok());
    assert!(validate_location("Plots").is_ok());
    assert!(validate_location("Plot").is_err());
    assert!(validate_location("    ").is_err());
}

#[test]
fn pincode_must_be_six_to_eight_digits() {
    assert!(validate_pincode("560001").is_ok());
    assert!(validate_pincode("5600011").is_ok());
    assert!(validate_pincode("56000112").is_ok());

    assert!(validate_pincode("56001").is_err()); // five digits
    assert!(validate_pincode("560011223").is_err()); // nine digits
    assert!(validate_pincode("56O001").is_err()); // letter
    assert!(validate_pincode("560-01").is_err());
    assert!(validate_pincode("").is_err());
}

// ============================================================================
// Unit Tests: Product and User Fields
// ============================================================================

#[test]
fn product_name_minimum_length() {
    assert!(validate_product_name("Tea").is_ok());
    assert!(validate_product_name("Basmati Rice 5kg").is_ok());
    assert!(validate_product_name("Ab").is_err());
}

#[test]
fn user_name_bounds() {
    assert!(validate_user_name("alice").is_ok());
    assert!(validate_user_name("").is_err());
    assert!(validate_user_name(&"a".repeat(64)).is_ok());
    assert!(validate_user_name(&"a".repeat(65)).is_err());
}

#[test]
fn password_minimum_length() {
    assert!(validate_password("secret").is_ok());
    assert!(validate_password("short").is_err());
}

// ============================================================================
// Unit Tests: Monetary Amounts and Quantities
// ============================================================================

#[test]
fn amounts_allow_up_to_two_decimal_places() {
    assert!(validate_amount(dec("0")).is_ok());
    assert!(validate_amount(dec("1500")).is_ok());
    assert!(validate_amount(dec("1500.5")).is_ok());
    assert!(validate_amount(dec("1500.55")).is_ok());
    // Trailing zeros do not count against the scale
    assert!(validate_amount(dec("1500.5000")).is_ok());

    assert!(validate_amount(dec("1500.555")).is_err());
    assert!(validate_amount(dec("-0.01")).is_err());
}

#[test]
fn quantities_must_be_non_negative() {
    assert!(validate_quantity(0).is_ok());
    assert!(validate_quantity(100).is_ok());
    assert!(validate_quantity(-1).is_err());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Any amount expressed in whole cents is accepted
    #[test]
    fn prop_cent_amounts_always_valid(cents in 0i64..=10_000_000_000) {
        prop_assert!(validate_amount(Decimal::new(cents, 2)).is_ok());
    }

    /// Amounts with a third significant decimal place are rejected
    #[test]
    fn prop_sub_cent_amounts_rejected(mills in 0i64..=1_000_000) {
        // Only mill values that do not collapse to a coarser scale
        prop_assume!(mills % 10 != 0);
        prop_assert!(validate_amount(Decimal::new(mills, 3)).is_err());
    }

    /// Negative amounts are always rejected
    #[test]
    fn prop_negative_amounts_rejected(cents in 1i64..=10_000_000_000) {
        prop_assert!(validate_amount(Decimal::new(-cents, 2)).is_err());
    }

    /// Generated pincodes of valid length always pass
    #[test]
    fn prop_valid_pincodes_accepted(pincode in "[0-9]{6,8}") {
        prop_assert!(validate_pincode(&pincode).is_ok());
    }

    /// Pincodes containing any non-digit character always fail
    #[test]
    fn prop_non_digit_pincodes_rejected(
        prefix in "[0-9]{0,4}",
        bad in "[a-zA-Z -]",
        suffix in "[0-9]{0,4}"
    ) {
        let pincode = format!("{}{}{}", prefix, bad, suffix);
        prop_assert!(validate_pincode(&pincode).is_err());
    }

    /// Name validators agree with a direct length check on trimmed input
    #[test]
    fn prop_address_name_length_rule(name in "[ ]{0,3}[A-Za-z0-9 ]{0,10}[ ]{0,3}") {
        let expected_ok = name.trim().chars().count() >= 3;
        prop_assert_eq!(validate_address_name(&name).is_ok(), expected_ok);
    }
}
