//! Settlement engine — drives the claim protocol.
//!
//! The sole state-machine transition for a request lives here. Ordering
//! inside `claim` is what makes the operation atomic: every fallible step
//! (lookup, pending check, recovery, signer check, payout transfer) runs
//! before any state is mutated, so an error at any point leaves the
//! request pending and every balance untouched.

use quill_ledger::{RequestLedger, TokenLedger};
use quill_types::{AccountId, EventLog, LedgerEvent, MessageHash, QuillError, RequestId, Result};

use crate::verifier::SignatureVerifier;

/// Settles pending requests against recipient signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Claim a pending request. Anyone may submit the claim; only a
    /// signature recoverable to the request's recipient settles it.
    ///
    /// 1. Load the request
    /// 2. Require it to be pending
    /// 3. Compute the id-bound claim digest
    /// 4. Recover the signer and require it to be the recipient
    /// 5. Release the escrow from custody to the recipient
    /// 6. Mark the request claimed and record the `Claimed` event
    ///
    /// Returns the settled signer identity.
    ///
    /// # Errors
    /// - [`QuillError::UnknownRequest`] if the id was never allocated
    /// - [`QuillError::AlreadyClaimed`] on a second claim
    /// - [`QuillError::InvalidSignature`] if recovery fails, the encoding
    ///   is non-canonical, or the signer is not the recipient
    /// - [`QuillError::InsufficientBalance`] if the payout transfer is
    ///   rejected; the request stays pending, eligible for a later retry
    pub fn claim<T: TokenLedger>(
        &self,
        ledger: &mut RequestLedger,
        token: &mut T,
        events: &mut EventLog,
        request_id: RequestId,
        signature: &[u8],
        message_hash: MessageHash,
    ) -> Result<AccountId> {
        let request = ledger.get(request_id)?;
        if !request.is_pending() {
            return Err(QuillError::AlreadyClaimed(request_id));
        }
        let recipient = request.recipient;
        let amount = request.amount;

        let digest = SignatureVerifier::claim_digest(request_id, recipient, message_hash);
        let signer = SignatureVerifier::recover(&digest, signature)?;
        if signer != recipient {
            tracing::warn!(request_id = %request_id, signer = %signer, recipient = %recipient, "claim rejected: signer is not the recipient");
            return Err(QuillError::InvalidSignature {
                reason: format!("recovered signer {signer} is not recipient {recipient}"),
            });
        }

        // Payout before the state transition: a rejected transfer aborts
        // the whole claim with the request still pending.
        token.transfer(ledger.custody(), recipient, amount)?;
        // The pending check above plus exclusive ownership of the ledger
        // make this transition infallible. If it ever failed the payout
        // would already have moved, so surface that as an invariant
        // violation rather than a retriable claim error.
        ledger
            .mark_claimed(request_id)
            .map_err(|e| QuillError::EscrowInvariantViolation {
                reason: format!("payout moved but {request_id} did not transition: {e}"),
            })?;

        events.record(LedgerEvent::Claimed {
            request_id,
            signer,
            message_hash,
        });
        tracing::info!(request_id = %request_id, signer = %signer, %amount, "request claimed");
        Ok(signer)
    }
}
