//! Validation rules for Stockbook inputs
//!
//! Mirrors the request schemas enforced at the HTTP boundary: names have
//! minimum lengths, pincodes are 6-8 digits, monetary amounts are non-negative
//! decimals with at most two fractional digits, quantities are whole numbers.

use rust_decimal::Decimal;

/// Validate an address name (at least 3 characters)
pub fn validate_address_name(name: &str) -> Result<(), &'static str> {
    if name.trim().len() < 3 {
        return Err("Address name must be at least 3 characters long");
    }
    Ok(())
}

/// Validate a location description (at least 5 characters)
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    if location.trim().len() < 5 {
        return Err("Location must be at least 5 characters long");
    }
    Ok(())
}

/// Validate a pincode (6-8 digits)
pub fn validate_pincode(pincode: &str) -> Result<(), &'static str> {
    if pincode.len() < 6 || pincode.len() > 8 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err("Pincode must be 6-8 digits");
    }
    Ok(())
}

/// Validate a product name (at least 3 characters)
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    if name.trim().len() < 3 {
        return Err("Product name must be at least 3 characters long");
    }
    Ok(())
}

/// Validate a user name (non-empty, at most 64 characters)
pub fn validate_user_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("User name must not be empty");
    }
    if trimmed.len() > 64 {
        return Err("User name must be at most 64 characters long");
    }
    Ok(())
}

/// Validate a password (at least 6 characters)
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

/// Validate a monetary row total: non-negative, at most two decimal places
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount must not be negative");
    }
    if amount.normalize().scale() > 2 {
        return Err("Amount must have at most two decimal places");
    }
    Ok(())
}

/// Validate a unit quantity: whole and non-negative
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity must not be negative");
    }
    Ok(())
}
