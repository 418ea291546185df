//! # Domain Types
//!
//! Entity DTOs exchanged with the back-office API, plus the operational
//! context that scopes register-bound requests.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog              Registers               Pricing / Reports         │
//! │  ─────────            ─────────               ─────────────────         │
//! │  Product              CashRegister            MetalRate                 │
//! │  Warehouse            SessionDetails          CatalystPrice             │
//! │  Shop                 CashBalance             Report / ReportRow        │
//! │  Customer             CashTransaction                                   │
//! │                                                                         │
//! │  CashRegisterId ── the operational context, passed per call, never     │
//! │                    stored inside a slice                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All DTOs use camelCase on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{CurrencyCode, Money};

// =============================================================================
// Operational Context
// =============================================================================

/// Identifier of the active cash register.
///
/// Construction rejects `0` and negative values, so a register-scoped call
/// can never be issued without a real register. The facade relies on this
/// and does not re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(try_from = "i64", into = "i64")]
#[ts(export)]
pub struct CashRegisterId(i64);

impl CashRegisterId {
    /// Validates a raw register id.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::types::CashRegisterId;
    ///
    /// assert_eq!(CashRegisterId::new(7).unwrap().get(), 7);
    /// assert!(CashRegisterId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "cash register id".to_string(),
            });
        }
        Ok(CashRegisterId(raw))
    }

    /// Returns the raw id.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Header value form of the id.
    pub fn header_value(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for CashRegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for CashRegisterId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        CashRegisterId::new(value)
    }
}

impl From<CashRegisterId> for i64 {
    fn from(id: CashRegisterId) -> Self {
        id.0
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product in the back-office catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub barcode: Option<String>,
    /// Price in minor units of `currency_code`.
    pub price: Money,
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub warehouse_id: Option<i64>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A storage location products are received into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub shop_id: Option<i64>,
}

/// A retail point owning one or more cash registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Fields accepted when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub price: Money,
    pub currency_code: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<i64>,
    pub quantity: i64,
}

/// Fields accepted when creating a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WarehouseDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<i64>,
}

/// Fields accepted when creating a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShopDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub passport_number: Option<String>,
}

/// Fields accepted when creating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCustomer {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
}

// =============================================================================
// Cash Registers
// =============================================================================

/// A cash register as listed by the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashRegister {
    pub id: CashRegisterId,
    pub name: String,
    pub shop_id: i64,
    #[serde(default)]
    pub is_active: bool,
}

/// Session details for one register, as returned by the session status
/// endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SessionDetails {
    pub has_open_session: bool,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub opened_by: Option<String>,
}

/// Current cash held by a register, per currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashBalance {
    pub cash_register_id: CashRegisterId,
    pub balances: Vec<CurrencyBalance>,
}

impl CashBalance {
    /// Balance held in `currency`, zero when the register has none.
    pub fn amount_in(&self, currency: &CurrencyCode) -> Money {
        self.balances
            .iter()
            .find(|b| &b.currency_code == currency)
            .map(|b| b.amount)
            .unwrap_or_default()
    }
}

/// One currency line of a [`CashBalance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CurrencyBalance {
    pub currency_code: CurrencyCode,
    pub amount: Money,
}

/// A committed cash movement, returned after a top-up succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashTransaction {
    pub id: i64,
    pub amount: Money,
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub comment: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Pricing
// =============================================================================

/// Precious metals priced by the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Metal {
    Platinum,
    Palladium,
    Rhodium,
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metal::Platinum => write!(f, "platinum"),
            Metal::Palladium => write!(f, "palladium"),
            Metal::Rhodium => write!(f, "rhodium"),
        }
    }
}

/// Price of one gram of a metal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MetalRate {
    pub metal: Metal,
    pub price_per_gram: Money,
    pub currency_code: CurrencyCode,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A catalogued catalytic converter with its metal content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalystPrice {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Metal content in milligrams.
    pub content: MetalContent,
    /// Last price quoted by the back office.
    #[serde(default)]
    pub price: Option<Money>,
}

/// Metal content of a catalyst, in milligrams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MetalContent {
    #[serde(default)]
    pub platinum_mg: i64,
    #[serde(default)]
    pub palladium_mg: i64,
    #[serde(default)]
    pub rhodium_mg: i64,
}

impl MetalContent {
    /// Milligrams of each metal present, skipping zero entries.
    pub fn entries(&self) -> impl Iterator<Item = (Metal, i64)> {
        [
            (Metal::Platinum, self.platinum_mg),
            (Metal::Palladium, self.palladium_mg),
            (Metal::Rhodium, self.rhodium_mg),
        ]
        .into_iter()
        .filter(|(_, mg)| *mg > 0)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Reports the console can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReportKind {
    Sales,
    Stock,
    CashFlow,
}

impl ReportKind {
    /// Path segment used by the reports endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales",
            ReportKind::Stock => "stock",
            ReportKind::CashFlow => "cash-flow",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" => Ok(ReportKind::Sales),
            "stock" => Ok(ReportKind::Stock),
            "cash-flow" | "cash_flow" | "cashflow" => Ok(ReportKind::CashFlow),
            other => Err(ValidationError::InvalidFormat {
                field: "report kind".to_string(),
                reason: format!("unknown report '{}', expected sales, stock or cash-flow", other),
            }),
        }
    }
}

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportPeriod {
    #[ts(as = "String")]
    pub from: NaiveDate,
    #[ts(as = "String")]
    pub to: NaiveDate,
}

impl ReportPeriod {
    /// Builds a period, rejecting ranges that end before they start.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        if to < from {
            return Err(ValidationError::InvalidFormat {
                field: "report period".to_string(),
                reason: format!("{} is before {}", to, from),
            });
        }
        Ok(ReportPeriod { from, to })
    }
}

/// A fetched report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Report {
    pub kind: ReportKind,
    pub period: ReportPeriod,
    pub currency_code: CurrencyCode,
    pub rows: Vec<ReportRow>,
}

impl Report {
    /// Sum of every row amount.
    pub fn total(&self) -> Money {
        self.rows.iter().map(|row| row.amount).sum()
    }
}

/// One line of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportRow {
    pub label: String,
    #[serde(default)]
    pub quantity: i64,
    pub amount: Money,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================
