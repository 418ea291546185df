//! # Pending Transaction Confirmation
//!
//! Holds a cash top-up the user has entered but not yet confirmed.
//!
//! ## Top-up Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐  stage   ┌──────────────────────┐  begin_commit         │
//! │   │ NoPending │─────────►│ AwaitingConfirmation │──────────────┐        │
//! │   └───────────┘          └──────────────────────┘              ▼        │
//! │        ▲   ▲                 │    ▲      ▲ stage       ┌────────────┐   │
//! │        │   │      cancel     │    │      └─(replace)   │ Committing │   │
//! │        │   └─────────────────┘    │ commit_failed      └────────────┘   │
//! │        │                          └──────────────────────────┤          │
//! │        │ acknowledge                          commit_succeeded│         │
//! │        │                 ┌───────────┐                       │          │
//! │        └─────────────────│ Committed │◄──────────────────────┘          │
//! │                          └───────────┘                                  │
//! │                                                                         │
//! │  At most ONE candidate at a time. Staging again replaces it.           │
//! │  No network call happens before begin_commit.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{CurrencyCode, Money};
use crate::store::resource::{RequestId, GENERIC_FAILURE_MESSAGE};
use crate::types::CashTransaction;
use crate::validation::{validate_comment, validate_top_up_amount};

// =============================================================================
// Pending Transaction
// =============================================================================

/// A validated, unconfirmed cash top-up.
///
/// Every way of building one validates the amount, so a zero or negative
/// top-up can never be staged. Deserialization goes through [`new`](Self::new).
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PendingTransaction {
    amount: Money,
    currency_code: CurrencyCode,
    comment: Option<String>,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
}

impl PendingTransaction {
    /// Builds a candidate top-up.
    ///
    /// ## Example
    /// ```rust
    /// use backoffice_core::money::{CurrencyCode, Money};
    /// use backoffice_core::workflow::PendingTransaction;
    /// use chrono::Utc;
    ///
    /// let amd = CurrencyCode::parse("AMD").unwrap();
    /// assert!(PendingTransaction::new(Money::from_minor(1500), amd.clone(), Some("restock"), Utc::now()).is_ok());
    /// assert!(PendingTransaction::new(Money::zero(), amd, None, Utc::now()).is_err());
    /// ```
    pub fn new(
        amount: Money,
        currency_code: CurrencyCode,
        comment: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_top_up_amount(amount)?;
        let comment = validate_comment(comment)?;

        Ok(PendingTransaction {
            amount,
            currency_code,
            comment,
            created_at,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency_code(&self) -> &CurrencyCode {
        &self.currency_code
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Request body sent when the top-up is confirmed.
    pub fn submission(&self) -> TopUpSubmission {
        TopUpSubmission {
            amount: self.amount,
            currency_code: self.currency_code.clone(),
            comment: self.comment.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for PendingTransaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            amount: Money,
            currency_code: CurrencyCode,
            #[serde(default)]
            comment: Option<String>,
            created_at: DateTime<Utc>,
        }

        let raw = Raw::deserialize(deserializer)?;
        PendingTransaction::new(raw.amount, raw.currency_code, raw.comment.as_deref(), raw.created_at)
            .map_err(serde::de::Error::custom)
    }
}

/// Body of the top-up request: `{ amount, currencyCode, comment }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopUpSubmission {
    pub amount: Money,
    pub currency_code: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// =============================================================================
// Workflow State
// =============================================================================

/// Where the top-up confirmation currently stands.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TopUpState {
    #[default]
    NoPending,
    AwaitingConfirmation {
        candidate: PendingTransaction,
        error: Option<String>,
    },
    Committing {
        candidate: PendingTransaction,
        #[serde(skip)]
        request: RequestId,
    },
    Committed {
        transaction: CashTransaction,
    },
}

impl TopUpState {
    pub fn name(&self) -> &'static str {
        match self {
            TopUpState::NoPending => "no_pending",
            TopUpState::AwaitingConfirmation { .. } => "awaiting_confirmation",
            TopUpState::Committing { .. } => "committing",
            TopUpState::Committed { .. } => "committed",
        }
    }
}

/// The confirmation state machine.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TopUpWorkflow {
    state: TopUpState,
    #[serde(skip)]
    next_seq: u64,
}

impl TopUpWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TopUpState {
        &self.state
    }

    /// The staged candidate, while awaiting confirmation or committing.
    pub fn pending(&self) -> Option<&PendingTransaction> {
        match &self.state {
            TopUpState::AwaitingConfirmation { candidate, .. }
            | TopUpState::Committing { candidate, .. } => Some(candidate),
            _ => None,
        }
    }

    /// Error from the last failed commit, shown next to the confirmation.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TopUpState::AwaitingConfirmation { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, TopUpState::Committing { .. })
    }

    /// Body to submit while committing.
    pub fn submission(&self) -> Option<TopUpSubmission> {
        match &self.state {
            TopUpState::Committing { candidate, .. } => Some(candidate.submission()),
            _ => None,
        }
    }

    /// Stages `candidate`, replacing any candidate already awaiting
    /// confirmation. Returns the replaced candidate.
    pub fn stage(&mut self, candidate: PendingTransaction) -> CoreResult<Option<PendingTransaction>> {
        let replaced = match std::mem::take(&mut self.state) {
            TopUpState::AwaitingConfirmation { candidate, .. } => Some(candidate),
            TopUpState::NoPending | TopUpState::Committed { .. } => None,
            committing @ TopUpState::Committing { .. } => {
                self.state = committing;
                return Err(self.invalid("stage"));
            }
        };

        debug!(
            amount = %candidate.amount().format(candidate.currency_code()),
            replaced = replaced.is_some(),
            "top-up staged"
        );
        self.state = TopUpState::AwaitingConfirmation {
            candidate,
            error: None,
        };
        Ok(replaced)
    }

    /// `AwaitingConfirmation → Committing`. Returns the request id the
    /// commit must settle with and the body to submit.
    pub fn begin_commit(&mut self) -> CoreResult<(RequestId, TopUpSubmission)> {
        match std::mem::take(&mut self.state) {
            TopUpState::AwaitingConfirmation { candidate, .. } => {
                self.next_seq += 1;
                let request = RequestId::new(self.next_seq);
                let submission = candidate.submission();
                self.state = TopUpState::Committing { candidate, request };
                Ok((request, submission))
            }
            other => {
                self.state = other;
                Err(self.invalid("confirm"))
            }
        }
    }

    /// `Committing → Committed`; the candidate is dropped.
    pub fn commit_succeeded(
        &mut self,
        request: RequestId,
        transaction: CashTransaction,
    ) -> CoreResult<()> {
        self.expect_committing(request, "complete commit")?;
        self.state = TopUpState::Committed { transaction };
        Ok(())
    }

    /// `Committing → AwaitingConfirmation` with the error surfaced, so the
    /// user can retry or cancel.
    pub fn commit_failed(&mut self, request: RequestId, message: Option<String>) -> CoreResult<()> {
        self.expect_committing(request, "fail commit")?;

        if let TopUpState::Committing { candidate, .. } = std::mem::take(&mut self.state) {
            self.state = TopUpState::AwaitingConfirmation {
                candidate,
                error: Some(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
                ),
            };
        }
        Ok(())
    }

    /// Drops the staged candidate. No-op when nothing is staged; refused
    /// once the commit has started.
    pub fn cancel(&mut self) -> CoreResult<Option<PendingTransaction>> {
        match std::mem::take(&mut self.state) {
            TopUpState::AwaitingConfirmation { candidate, .. } => Ok(Some(candidate)),
            committing @ TopUpState::Committing { .. } => {
                self.state = committing;
                Err(self.invalid("cancel"))
            }
            TopUpState::NoPending | TopUpState::Committed { .. } => Ok(None),
        }
    }

    /// Hides the commit error without dropping the candidate.
    pub fn clear_error(&mut self) {
        if let TopUpState::AwaitingConfirmation { error, .. } = &mut self.state {
            *error = None;
        }
    }

    /// `Committed → NoPending` once the result has been shown.
    pub fn acknowledge(&mut self) {
        if let TopUpState::Committed { .. } = self.state {
            self.state = TopUpState::NoPending;
        }
    }

    /// Back to `NoPending` from any state. A commit still in flight can no
    /// longer settle this workflow.
    pub fn reset(&mut self) {
        self.state = TopUpState::NoPending;
    }

    fn expect_committing(&self, request: RequestId, operation: &'static str) -> CoreResult<()> {
        match &self.state {
            TopUpState::Committing { request: current, .. } if *current == request => Ok(()),
            _ => Err(self.invalid(operation)),
        }
    }

    fn invalid(&self, operation: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
