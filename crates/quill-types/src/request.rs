//! # Request — the escrow record
//!
//! A `Request` binds a requester, a recipient, and a fixed amount held in
//! custody, pending signature-gated release.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  claim   ┌─────────┐
//!   │ PENDING ├─────────▶│ CLAIMED │
//!   └─────────┘          └─────────┘
//! ```
//!
//! The transition is **monotonic**: `Pending → Claimed` exactly once, only
//! via a successful claim. There is no cancellation path and no transition
//! back; a pending request has unbounded lifetime absent a claim. Records
//! are never deleted — the ledger is append-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, QuillError, RequestId, Result};

/// The lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestState {
    /// Escrowed funds are held by the ledger, awaiting the recipient's
    /// signature.
    Pending,
    /// The escrow was released to the recipient. Terminal.
    Claimed,
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Claimed => write!(f, "CLAIMED"),
        }
    }
}

/// An escrow request: who commissioned the message, who may claim it,
/// and how much is held in custody.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique, strictly increasing id assigned at creation.
    pub id: RequestId,
    /// The identity that funded the escrow.
    pub requester: AccountId,
    /// The identity entitled to claim; fixed at creation.
    pub recipient: AccountId,
    /// Escrowed quantity, equal to the recipient's scheduled cost at
    /// creation. Immutable — a later `set_cost` never reprices this.
    pub amount: Decimal,
    /// Current lifecycle state.
    pub state: RequestState,
    /// Creation timestamp. Informational only.
    pub created_at: DateTime<Utc>,
}

impl Request {
    /// Build a fresh `Pending` request.
    #[must_use]
    pub fn new(
        id: RequestId,
        requester: AccountId,
        recipient: AccountId,
        amount: Decimal,
    ) -> Self {
        Self {
            id,
            requester,
            recipient,
            amount,
            state: RequestState::Pending,
            created_at: Utc::now(),
        }
    }

    /// Whether the escrow is still waiting on a claim.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Transition `Pending → Claimed`. The sole state transition,
    /// terminal and irreversible.
    ///
    /// # Errors
    /// Returns [`QuillError::AlreadyClaimed`] if the request is not pending.
    pub fn mark_claimed(&mut self) -> Result<()> {
        if self.state != RequestState::Pending {
            return Err(QuillError::AlreadyClaimed(self.id));
        }
        self.state = RequestState::Claimed;
        Ok(())
    }
}
