//! # Validation Module
//!
//! Caller-side validation for the back office console.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend / CLI                                               │
//! │  └── Parse raw input (numbers, codes)                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any network call)                        │
//! │  ├── Register id > 0                                                   │
//! │  ├── Top-up amount > 0                                                 │
//! │  └── Comment / query length                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Back-office API                                              │
//! │  └── Business rules the console cannot know (session state, limits)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::{CurrencyCode, Money};
use crate::types::CashRegisterId;
use crate::{MAX_COMMENT_LENGTH, MAX_TOP_UP_MINOR};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a raw register id into an operational context.
pub fn validate_register_id(raw: i64) -> ValidationResult<CashRegisterId> {
    CashRegisterId::new(raw)
}

/// Validates a top-up amount.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_TOP_UP_MINOR`
///
/// ## Example
/// ```rust
/// use backoffice_core::money::Money;
/// use backoffice_core::validation::validate_top_up_amount;
///
/// assert!(validate_top_up_amount(Money::from_minor(1500)).is_ok());
/// assert!(validate_top_up_amount(Money::zero()).is_err());
/// ```
pub fn validate_top_up_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if amount.minor_units() > MAX_TOP_UP_MINOR {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_TOP_UP_MINOR,
        });
    }

    Ok(())
}

/// Validates an ISO 4217 style currency code (`"amd"` is accepted as `AMD`).
pub fn validate_currency_code(code: &str) -> ValidationResult<CurrencyCode> {
    CurrencyCode::parse(code)
}

/// Normalizes an optional free-text comment.
///
/// Blank comments become `None`; anything longer than
/// `MAX_COMMENT_LENGTH` characters is rejected.
pub fn validate_comment(comment: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max: MAX_COMMENT_LENGTH,
        });
    }

    Ok(Some(comment.to_string()))
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates a buyer margin in basis points (0% to 100%).
pub fn validate_margin_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "margin".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_register_id() {
        assert_eq!(validate_register_id(7).unwrap().get(), 7);
        assert!(validate_register_id(0).is_err());
    }

    #[test]
    fn test_validate_top_up_amount() {
        assert!(validate_top_up_amount(Money::from_minor(1)).is_ok());
        assert!(validate_top_up_amount(Money::from_minor(MAX_TOP_UP_MINOR)).is_ok());

        assert!(validate_top_up_amount(Money::zero()).is_err());
        assert!(validate_top_up_amount(Money::from_minor(-10)).is_err());
        assert!(validate_top_up_amount(Money::from_minor(MAX_TOP_UP_MINOR + 1)).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert_eq!(validate_currency_code("AMD").unwrap().as_str(), "AMD");
        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("DRAM").is_err());
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment(None).unwrap(), None);
        assert_eq!(validate_comment(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_comment(Some(" restock ")).unwrap(),
            Some("restock".to_string())
        );
        assert!(validate_comment(Some(&"x".repeat(MAX_COMMENT_LENGTH + 1))).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ring ").unwrap(), "ring");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_margin_bps() {
        assert!(validate_margin_bps(0).is_ok());
        assert!(validate_margin_bps(10000).is_ok());
        assert!(validate_margin_bps(10001).is_err());
    }
}
