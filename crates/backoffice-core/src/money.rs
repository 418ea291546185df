//! # Money Module
//!
//! Provides the `Money` and `CurrencyCode` types used by cash top-ups,
//! balances, metal rates and reports.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Every amount is an i64 count of the currency's minor unit.          │
//! │    The API exchanges the same integers, so nothing is ever rounded     │
//! │    between the console and the back office.                            │
//! │                                                                         │
//! │  AMD is tracked with 0 decimal places: 1500 AMD == Money(1500).        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use backoffice_core::money::{CurrencyCode, Money};
//!
//! let amd = CurrencyCode::parse("AMD").unwrap();
//! let top_up = Money::from_minor(1500);
//! assert_eq!(top_up.format(&amd), "1500 AMD");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

/// Currency used when the caller does not pick one.
pub const DEFAULT_CURRENCY: &str = "AMD";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest unit the back office tracks for its
/// currency.
///
/// `Money` carries no currency of its own; it always travels next to a
/// [`CurrencyCode`] (see `PendingTransaction`, `CashBalance`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::Money;
    ///
    /// let quote = Money::from_minor(10000);
    /// let offered = quote.apply_percentage_discount(1500); // 15% buyer margin
    /// assert_eq!(offered.minor_units(), 8500);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount_amount = (self.0 as i128 * discount_bps as i128 + 5000) / 10000;
        Money::from_minor(self.0 - discount_amount as i64)
    }

    /// Renders the amount with its currency, e.g. `"1500 AMD"` or
    /// `"-10.99 USD"`.
    ///
    /// Used for log lines and confirmation prompts; the frontend formats
    /// amounts for display itself.
    pub fn format(&self, currency: &CurrencyCode) -> String {
        let exponent = currency.minor_unit_exponent();
        if exponent == 0 {
            return format!("{} {}", self.0, currency);
        }

        let divisor = 10_i64.pow(exponent);
        let sign = if self.0 < 0 { "-" } else { "" };
        let major = (self.0 / divisor).abs();
        let minor = (self.0 % divisor).abs();
        format!(
            "{}{}.{:0width$} {}",
            sign,
            major,
            minor,
            currency,
            width = exponent as usize
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Sum of a sequence of amounts, e.g. report rows or balance lines.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Currency Code
// =============================================================================

/// An ISO 4217 shaped currency code: exactly three ASCII letters, stored
/// uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(try_from = "String", into = "String")]
#[ts(export)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::parse("amd").unwrap().as_str(), "AMD");
    /// assert!(CurrencyCode::parse("DRAM").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(ValidationError::Required {
                field: "currency".to_string(),
            });
        }

        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidFormat {
                field: "currency".to_string(),
                reason: "must be a three-letter ISO 4217 code".to_string(),
            });
        }

        Ok(CurrencyCode(code.to_ascii_uppercase()))
    }

    /// The console's default currency (AMD).
    pub fn default_currency() -> Self {
        CurrencyCode(DEFAULT_CURRENCY.to_string())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal places the back office tracks for this currency.
    ///
    /// Dram is handled in whole units by the back office even though
    /// ISO 4217 lists two decimals.
    pub fn minor_unit_exponent(&self) -> u32 {
        match self.0.as_str() {
            "AMD" | "JPY" | "KRW" => 0,
            _ => 2,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::default_currency()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
