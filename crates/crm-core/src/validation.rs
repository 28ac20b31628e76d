//! # Validation Module
//!
//! Input validation rules for each entity kind.
//!
//! ## Validation Strategy
//! ```text
//!   Layer 1: THIS MODULE - pure field and rule checks
//!   Layer 2: crm-engine  - uniqueness lookup against the repository
//!   Layer 3: Database    - UNIQUE index, CHECK and FK constraints
//!
//!   Defense in depth: multiple layers catch different errors.
//! ```
//!
//! Everything here is side-effect-free. The email uniqueness check requires a
//! repository read and therefore lives in crm-engine, not here.
//!
//! ## Usage
//! ```rust
//! use crm_core::types::CustomerInput;
//! use crm_core::validation::validate_customer;
//!
//! let input = CustomerInput {
//!     name: "Alice".to_string(),
//!     email: "alice@example.com".to_string(),
//!     phone: Some("+1 555-123-4567".to_string()),
//! };
//! assert!(validate_customer(&input).is_empty());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{CustomerInput, ProductInput};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer name: must not be empty after trimming.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required("name"));
    }
    Ok(())
}

/// Validates an email address shape.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one `@` with text on both sides
///
/// Uniqueness is a separate, repository-backed check in the engine layer.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next();

    match domain {
        Some(domain) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ValidationError::invalid_format(
            "email",
            "must be a valid email address",
        )),
    }
}

/// Validates a phone number.
///
/// ## Rules
/// Every character must be one of: `+`, digit, `-`, whitespace. Anything else
/// in a non-empty string is an `InvalidFormat("phone")`.
///
/// ```rust
/// use crm_core::validation::validate_phone;
///
/// assert!(validate_phone("+1 555-123-4567").is_ok());
/// assert!(validate_phone("555 1234").is_ok());
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c.is_whitespace())
    {
        return Err(ValidationError::invalid_format(
            "phone",
            "must contain only digits, '+', '-', and whitespace",
        ));
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product price in cents.
///
/// ## Rules
/// - Must be strictly positive; zero is not a valid price
///
/// ```rust
/// use crm_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1).is_ok());   // $0.01
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-500).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::invalid_range("price", 1, i64::MAX));
    }
    Ok(())
}

/// Validates a stock level: must be non-negative; zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::invalid_range("stock", 0, i64::MAX));
    }
    Ok(())
}

// =============================================================================
// Per-Entity Rule Sets
// =============================================================================

/// Runs all pure validation rules for a customer input.
///
/// Returns every violation found, in field order. The engine layer appends a
/// `DuplicateKey("email")` if the repository already holds the email.
pub fn validate_customer(input: &CustomerInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = validate_customer_name(&input.name) {
        errors.push(e);
    }
    if let Err(e) = validate_email(&input.email) {
        errors.push(e);
    }
    if let Some(phone) = input.phone.as_deref() {
        // An absent phone is fine; a present one must match the pattern.
        if let Err(e) = validate_phone(phone) {
            errors.push(e);
        }
    }

    errors
}

/// Runs all validation rules for a product input.
pub fn validate_product(input: &ProductInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(ValidationError::required("name"));
    }
    if let Err(e) = validate_price_cents(input.price_cents) {
        errors.push(e);
    }
    if let Err(e) = validate_stock(input.stock.unwrap_or(0)) {
        errors.push(e);
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================
