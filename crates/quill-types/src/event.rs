//! Ledger events for external observers.
//!
//! Off-chain signers watch for `RequestCreated` to learn which ids to sign
//! against; indexers watch for `Claimed` to mark settlements. An event is
//! recorded only after every fallible step of the enclosing operation has
//! succeeded — an observer never sees an event for an operation that did
//! not durably commit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, MessageHash, RequestId};

/// A committed ledger operation, announced to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A new escrow request was created and funded.
    RequestCreated {
        request_id: RequestId,
        requester: AccountId,
        recipient: AccountId,
        amount: Decimal,
    },
    /// A request was claimed and its escrow released to the signer.
    Claimed {
        request_id: RequestId,
        signer: AccountId,
        message_hash: MessageHash,
    },
}

impl LedgerEvent {
    /// The request this event concerns.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        match self {
            Self::RequestCreated { request_id, .. } | Self::Claimed { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// Append-only log of committed events. No internal state transitions,
/// no failure modes of its own.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed event.
    pub fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The most recently recorded event.
    #[must_use]
    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    /// All events, in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    /// Events concerning a single request, in commit order.
    pub fn for_request(&self, request_id: RequestId) -> impl Iterator<Item = &LedgerEvent> {
        self.events
            .iter()
            .filter(move |e| e.request_id() == request_id)
    }
}
