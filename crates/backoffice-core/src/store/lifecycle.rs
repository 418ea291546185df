//! # Lifecycle Events
//!
//! Every remote operation moves a slice through three phases. Instead of
//! inspecting action-name suffixes, the store matches on an enumerated tag:
//!
//! ```text
//! LifecycleEvent { slice: SliceId, operation, phase }
//!                                               │
//!            ┌──────────────────────────────────┼───────────────────────┐
//!            ▼                                  ▼                       ▼
//!       Requested                  Succeeded { request, payload }   Failed { request, message }
//! ```
//!
//! The `"<slice>/<operation>/<pending|fulfilled|rejected>"` names are still
//! produced (and parsed) by [`ActionType`] for logs and devtools.

use std::fmt;

use crate::error::ValidationError;
use crate::store::resource::RequestId;
use crate::types::{
    CashBalance, CashRegister, CashTransaction, CatalystPrice, Customer, MetalRate, Product,
    Report, SessionDetails, Shop, Warehouse,
};

// =============================================================================
// Slice Identity
// =============================================================================

/// Every slice the store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SliceId {
    Products,
    Warehouses,
    Shops,
    CashRegisters,
    Customers,
    MetalRates,
    CatalystPrices,
    Reports,
    Session,
    CashBalance,
    TopUp,
}

impl SliceId {
    pub const ALL: [SliceId; 11] = [
        SliceId::Products,
        SliceId::Warehouses,
        SliceId::Shops,
        SliceId::CashRegisters,
        SliceId::Customers,
        SliceId::MetalRates,
        SliceId::CatalystPrices,
        SliceId::Reports,
        SliceId::Session,
        SliceId::CashBalance,
        SliceId::TopUp,
    ];

    /// Action-name prefix of the slice.
    pub fn name(&self) -> &'static str {
        match self {
            SliceId::Products => "products",
            SliceId::Warehouses => "warehouses",
            SliceId::Shops => "shops",
            SliceId::CashRegisters => "cashRegisters",
            SliceId::Customers => "customers",
            SliceId::MetalRates => "metalRates",
            SliceId::CatalystPrices => "catalystPrices",
            SliceId::Reports => "reports",
            SliceId::Session => "session",
            SliceId::CashBalance => "cashBalance",
            SliceId::TopUp => "topUp",
        }
    }

    /// Slices whose contents belong to one cash register and must not
    /// survive a register switch.
    pub fn is_register_scoped(&self) -> bool {
        matches!(
            self,
            SliceId::Session | SliceId::CashBalance | SliceId::TopUp | SliceId::Reports
        )
    }
}

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SliceId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SliceId::ALL
            .into_iter()
            .find(|slice| slice.name() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "slice".to_string(),
                reason: format!("unknown slice '{}'", s),
            })
    }
}

// =============================================================================
// Phases & Payloads
// =============================================================================

/// Fieldless lifecycle tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Requested,
    Succeeded,
    Failed,
}

impl Phase {
    /// Suffix used in action names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Phase::Requested => "pending",
            Phase::Succeeded => "fulfilled",
            Phase::Failed => "rejected",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "pending" => Some(Phase::Requested),
            "fulfilled" => Some(Phase::Succeeded),
            "rejected" => Some(Phase::Failed),
            _ => None,
        }
    }
}

/// Successful result of a remote operation, tagged with the slice it
/// belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    Products(Vec<Product>),
    Warehouses(Vec<Warehouse>),
    Shops(Vec<Shop>),
    CashRegisters(Vec<CashRegister>),
    Customers(Vec<Customer>),
    MetalRates(Vec<MetalRate>),
    CatalystPrices(Vec<CatalystPrice>),
    Report(Report),
    Session(SessionDetails),
    CashBalance(CashBalance),
    TopUp(CashTransaction),
}

impl ResourcePayload {
    /// The slice this payload may be applied to.
    pub fn slice(&self) -> SliceId {
        match self {
            ResourcePayload::Products(_) => SliceId::Products,
            ResourcePayload::Warehouses(_) => SliceId::Warehouses,
            ResourcePayload::Shops(_) => SliceId::Shops,
            ResourcePayload::CashRegisters(_) => SliceId::CashRegisters,
            ResourcePayload::Customers(_) => SliceId::Customers,
            ResourcePayload::MetalRates(_) => SliceId::MetalRates,
            ResourcePayload::CatalystPrices(_) => SliceId::CatalystPrices,
            ResourcePayload::Report(_) => SliceId::Reports,
            ResourcePayload::Session(_) => SliceId::Session,
            ResourcePayload::CashBalance(_) => SliceId::CashBalance,
            ResourcePayload::TopUp(_) => SliceId::TopUp,
        }
    }
}

/// Phase plus the data that phase carries.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecyclePhase {
    Requested,
    Succeeded {
        request: RequestId,
        payload: ResourcePayload,
    },
    Failed {
        request: RequestId,
        message: Option<String>,
    },
}

impl LifecyclePhase {
    pub fn kind(&self) -> Phase {
        match self {
            LifecyclePhase::Requested => Phase::Requested,
            LifecyclePhase::Succeeded { .. } => Phase::Succeeded,
            LifecyclePhase::Failed { .. } => Phase::Failed,
        }
    }
}

// =============================================================================
// Lifecycle Event
// =============================================================================

/// One step of a remote operation, dispatched explicitly to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    pub slice: SliceId,
    pub operation: &'static str,
    pub phase: LifecyclePhase,
}

impl LifecycleEvent {
    pub fn requested(slice: SliceId, operation: &'static str) -> Self {
        LifecycleEvent {
            slice,
            operation,
            phase: LifecyclePhase::Requested,
        }
    }

    pub fn succeeded(
        slice: SliceId,
        operation: &'static str,
        request: RequestId,
        payload: ResourcePayload,
    ) -> Self {
        LifecycleEvent {
            slice,
            operation,
            phase: LifecyclePhase::Succeeded { request, payload },
        }
    }

    pub fn failed(
        slice: SliceId,
        operation: &'static str,
        request: RequestId,
        message: Option<String>,
    ) -> Self {
        LifecycleEvent {
            slice,
            operation,
            phase: LifecyclePhase::Failed { request, message },
        }
    }

    /// Conventional action name of this event.
    pub fn action_type(&self) -> ActionType {
        ActionType {
            slice: self.slice,
            operation: self.operation.to_string(),
            phase: self.phase.kind(),
        }
    }
}

// =============================================================================
// Action Type (naming convention)
// =============================================================================

/// `"<slice>/<operation>/<pending|fulfilled|rejected>"`.
///
/// ## Example
/// ```rust
/// use backoffice_core::store::{ActionType, Phase, SliceId};
///
/// let action: ActionType = "session/checkStatus/rejected".parse().unwrap();
/// assert_eq!(action.slice, SliceId::Session);
/// assert_eq!(action.phase, Phase::Failed);
/// assert_eq!(action.to_string(), "session/checkStatus/rejected");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionType {
    pub slice: SliceId,
    pub operation: String,
    pub phase: Phase,
}

impl ActionType {
    /// Prefix filter used by generic pending/rejected matchers.
    pub fn matches_slice(&self, prefix: &str) -> bool {
        self.slice.name() == prefix
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Requested
    }

    pub fn is_rejected(&self) -> bool {
        self.phase == Phase::Failed
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.slice, self.operation, self.phase.suffix())
    }
}

impl std::str::FromStr for ActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "action type".to_string(),
            reason: format!("'{}': {}", s, reason),
        };

        let (head, suffix) = s
            .rsplit_once('/')
            .ok_or_else(|| invalid("missing lifecycle suffix"))?;
        let phase = Phase::from_suffix(suffix)
            .ok_or_else(|| invalid("suffix must be pending, fulfilled or rejected"))?;
        let (slice, operation) = head
            .split_once('/')
            .ok_or_else(|| invalid("expected <slice>/<operation>"))?;

        if operation.is_empty() {
            return Err(invalid("operation is empty"));
        }

        Ok(ActionType {
            slice: slice.parse()?,
            operation: operation.to_string(),
            phase,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
