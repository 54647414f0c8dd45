//! Request ledger — creates, stores, and indexes escrow requests.
//!
//! Creation is one atomic unit. The fund pull runs before any state is
//! allocated: if the token collaborator rejects it, no id is consumed, no
//! record stored, no event recorded. Records are append-only — a claimed
//! request stays in the ledger forever as a settled record.

use std::collections::HashMap;

use quill_types::{
    AccountId, EventLog, LedgerEvent, QuillError, Request, RequestId, Result, constants,
};
use rust_decimal::Decimal;

use crate::fee_schedule::FeeSchedule;
use crate::token::TokenLedger;

/// Owns every [`Request`] record from creation onward. Requester and
/// recipient hold no mutation rights over a stored record — only the
/// right to trigger the defined operations.
#[derive(Debug)]
pub struct RequestLedger {
    /// All requests indexed by id.
    requests: HashMap<RequestId, Request>,
    /// Next id to allocate. Strictly increasing, never reused.
    next_id: u64,
    /// The account holding escrowed funds between creation and claim.
    custody: AccountId,
}

impl RequestLedger {
    /// Create an empty ledger whose escrow sits in `custody`.
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self {
            requests: HashMap::new(),
            next_id: constants::FIRST_REQUEST_ID,
            custody,
        }
    }

    /// Create a new escrow request.
    ///
    /// 1. Look up the recipient's scheduled cost
    /// 2. Require the declared amount to match it exactly
    /// 3. Pull the cost from the requester into custody
    /// 4. Allocate the next id, store the `Pending` record, record the event
    ///
    /// # Errors
    /// - [`QuillError::UnknownRecipient`] if the recipient never set a cost
    /// - [`QuillError::AmountMismatch`] if `declared_amount` differs from it
    /// - [`QuillError::InsufficientAllowance`] or
    ///   [`QuillError::InsufficientBalance`] if the fund pull is rejected,
    ///   in which case the ledger is left exactly as it was
    pub fn create_request<T: TokenLedger>(
        &mut self,
        fees: &FeeSchedule,
        token: &mut T,
        events: &mut EventLog,
        requester: AccountId,
        recipient: AccountId,
        declared_amount: Decimal,
    ) -> Result<RequestId> {
        let cost = fees.cost_of(recipient)?;
        if declared_amount != cost {
            return Err(QuillError::AmountMismatch {
                declared: declared_amount,
                cost,
            });
        }

        // Pull funds first: a rejected transfer aborts before any state
        // is allocated.
        token.transfer_from(self.custody, requester, self.custody, cost)?;

        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.requests
            .insert(id, Request::new(id, requester, recipient, cost));

        events.record(LedgerEvent::RequestCreated {
            request_id: id,
            requester,
            recipient,
            amount: cost,
        });
        tracing::info!(request_id = %id, requester = %requester, recipient = %recipient, amount = %cost, "request created");
        Ok(id)
    }

    /// Look up a request by id.
    ///
    /// # Errors
    /// Returns [`QuillError::UnknownRequest`] if no such request exists.
    pub fn get(&self, id: RequestId) -> Result<&Request> {
        self.requests.get(&id).ok_or(QuillError::UnknownRequest(id))
    }

    /// Transition a request `Pending → Claimed`. Called by the settlement
    /// engine once the signature check and the payout transfer have both
    /// succeeded.
    ///
    /// # Errors
    /// - [`QuillError::UnknownRequest`] if no such request exists
    /// - [`QuillError::AlreadyClaimed`] if it is not pending
    pub fn mark_claimed(&mut self, id: RequestId) -> Result<()> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(QuillError::UnknownRequest(id))?;
        request.mark_claimed()
    }

    /// The custody account holding escrowed funds.
    #[must_use]
    pub fn custody(&self) -> AccountId {
        self.custody
    }

    /// Number of requests ever created.
    #[must_use]
    pub fn count(&self) -> usize {
        self.requests.len()
    }

    /// Number of requests still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.values().filter(|r| r.is_pending()).count()
    }

    /// Sum of all pending amounts. Must equal the custody balance at every
    /// operation boundary.
    #[must_use]
    pub fn total_pending(&self) -> Decimal {
        self.requests
            .values()
            .filter(|r| r.is_pending())
            .map(|r| r.amount)
            .sum()
    }
}
