//! Validation utilities for the bar inventory platform
//!
//! The ledger itself never validates; malformed quantities are stopped here,
//! before a transaction is written.

use crate::models::TransactionType;

/// Largest bottle size accepted, in milliliters
pub const MAX_ML_PER_BOTTLE: i32 = 10_000;

/// Largest bottle count a single transaction may carry
pub const MAX_QUANTITY_BOTTLES: i64 = 1_000_000;

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate bottle size is a positive, plausible milliliter count
pub fn validate_ml_per_bottle(ml: i32) -> Result<(), &'static str> {
    if ml <= 0 {
        return Err("Milliliters per bottle must be positive");
    }
    if ml > MAX_ML_PER_BOTTLE {
        return Err("Milliliters per bottle must be at most 10000");
    }
    Ok(())
}

/// Validate a bottle quantity for the given transaction type.
///
/// Opening and closing counts may be zero; purchases and sales must move at
/// least one bottle. Negative quantities are never accepted, the sign comes
/// from the transaction type. No transaction may exceed `MAX_QUANTITY_BOTTLES`.
pub fn validate_quantity(
    transaction_type: TransactionType,
    bottles: i64,
) -> Result<(), &'static str> {
    match transaction_type {
        TransactionType::OpeningStock | TransactionType::ClosingStock if bottles < 0 => {
            Err("Stock count cannot be negative")
        }
        TransactionType::Purchase | TransactionType::Sales if bottles <= 0 => {
            Err("Quantity must be at least one bottle")
        }
        _ if bottles > MAX_QUANTITY_BOTTLES => Err("Quantity must be at most 1000000 bottles"),
        _ => Ok(()),
    }
}

/// Validate a product category, sub-category or name
pub fn validate_product_label(label: &str) -> Result<(), &'static str> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be empty");
    }
    if trimmed.chars().count() > 100 {
        return Err("Value must be at most 100 characters");
    }
    Ok(())
}

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty() || !domain.contains('.') || email.len() < 5 || email.contains(' ') {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate username (3-32 characters: letters, digits, `_`, `.`, `-`)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 32 {
        return Err("Username must be at most 32 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err("Username may only contain letters, digits, '_', '.' and '-'");
    }
    Ok(())
}
