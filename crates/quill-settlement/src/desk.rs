//! Commission desk — the single public surface over both planes.
//!
//! The desk owns the fee schedule, the request ledger, the token
//! collaborator, the event log, and the conservation tracker, and exposes
//! the three public operations as single atomic units. `&mut self` is the
//! serialization guarantee: exclusive ownership imposes a total order over
//! mutating calls, so two claims against the same id can never interleave.
//! Embedders that share a desk across threads wrap it in their own lock or
//! actor; nothing here blocks or suspends.

use quill_ledger::{FeeSchedule, RequestLedger, TokenLedger};
use quill_types::{
    AccountId, DeskConfig, EventLog, MessageHash, Request, RequestId, Result,
};
use rust_decimal::Decimal;

use crate::conservation::EscrowConservation;
use crate::engine::SettlementEngine;

/// Escrow desk for commissioned messages, generic over the token
/// collaborator.
#[derive(Debug)]
pub struct CommissionDesk<T: TokenLedger> {
    fees: FeeSchedule,
    ledger: RequestLedger,
    token: T,
    events: EventLog,
    conservation: EscrowConservation,
    engine: SettlementEngine,
}

impl<T: TokenLedger> CommissionDesk<T> {
    /// Open a desk over a (possibly pre-funded) token ledger. Fee schedule
    /// and request state start empty and live for the process lifetime.
    ///
    /// # Errors
    /// Returns [`QuillError::Configuration`](quill_types::QuillError::Configuration)
    /// if the config is invalid.
    pub fn new(config: DeskConfig, token: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fees: FeeSchedule::new(),
            ledger: RequestLedger::new(config.custody),
            token,
            events: EventLog::new(),
            conservation: EscrowConservation::new(),
            engine: SettlementEngine::new(),
        })
    }

    /// Set the caller's own price for a commissioned message.
    ///
    /// # Errors
    /// Propagates [`FeeSchedule::set_cost`] failures.
    pub fn set_cost(&mut self, caller: AccountId, cost: Decimal) -> Result<()> {
        self.fees.set_cost(caller, caller, cost)
    }

    /// The cost currently scheduled for `recipient`.
    ///
    /// # Errors
    /// Propagates [`FeeSchedule::cost_of`] failures.
    pub fn cost_of(&self, recipient: AccountId) -> Result<Decimal> {
        self.fees.cost_of(recipient)
    }

    /// Authorize the desk's custody account to pull up to `amount` from
    /// `owner` for future request creation.
    ///
    /// # Errors
    /// Propagates token failures.
    pub fn approve(&mut self, owner: AccountId, amount: Decimal) -> Result<()> {
        self.token.approve(owner, self.ledger.custody(), amount)
    }

    /// Escrow the recipient's scheduled cost and allocate a new request.
    ///
    /// # Errors
    /// Propagates [`RequestLedger::create_request`] failures; on error no
    /// state changed.
    pub fn create_request(
        &mut self,
        requester: AccountId,
        recipient: AccountId,
        amount: Decimal,
    ) -> Result<RequestId> {
        let id = self.ledger.create_request(
            &self.fees,
            &mut self.token,
            &mut self.events,
            requester,
            recipient,
            amount,
        )?;
        self.conservation.record_escrow(amount);
        self.check_conservation()?;
        Ok(id)
    }

    /// Claim a pending request with the recipient's signature over the
    /// id-bound digest. Returns the settled signer.
    ///
    /// # Errors
    /// Propagates [`SettlementEngine::claim`] failures; on error the
    /// request stays pending and no balance moved.
    pub fn claim(
        &mut self,
        request_id: RequestId,
        signature: &[u8],
        message_hash: MessageHash,
    ) -> Result<AccountId> {
        let amount = self.ledger.get(request_id)?.amount;
        let signer = self.engine.claim(
            &mut self.ledger,
            &mut self.token,
            &mut self.events,
            request_id,
            signature,
            message_hash,
        )?;
        self.conservation.record_release(amount);
        self.check_conservation()?;
        Ok(signer)
    }

    /// Look up a request by id.
    ///
    /// # Errors
    /// Propagates [`RequestLedger::get`] failures.
    pub fn request(&self, id: RequestId) -> Result<&Request> {
        self.ledger.get(id)
    }

    /// Balance of any account on the underlying token ledger.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Decimal {
        self.token.balance_of(account)
    }

    /// The custody account holding escrowed funds.
    #[must_use]
    pub fn custody(&self) -> AccountId {
        self.ledger.custody()
    }

    /// Committed events, in commit order.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The underlying token ledger.
    #[must_use]
    pub fn token(&self) -> &T {
        &self.token
    }

    /// Number of requests still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.ledger.pending_count()
    }

    // Both views of custody must agree with the inflow/outflow ledger
    // after every committed operation.
    fn check_conservation(&self) -> Result<()> {
        self.conservation
            .verify_custody(self.token.balance_of(self.ledger.custody()))?;
        self.conservation.verify_pending(self.ledger.total_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use quill_ledger::InMemoryToken;
    use quill_types::{LedgerEvent, QuillError, RequestState};

    use crate::verifier::SignatureVerifier;

    fn desk_with(requester: AccountId, funding: Decimal) -> CommissionDesk<InMemoryToken> {
        let mut token = InMemoryToken::new();
        token.mint(requester, funding);
        CommissionDesk::new(DeskConfig::default(), token).unwrap()
    }

    fn recipient_keypair() -> (SigningKey, AccountId) {
        let key = SigningKey::from_slice(&[21u8; 32]).unwrap();
        let account = AccountId::from_verifying_key(key.verifying_key());
        (key, account)
    }

    fn sign_claim(
        key: &SigningKey,
        id: RequestId,
        recipient: AccountId,
        msg: MessageHash,
    ) -> Vec<u8> {
        let digest = SignatureVerifier::claim_digest(id, recipient, msg);
        let (sig, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        bytes
    }

    #[test]
    fn invalid_config_rejected() {
        let err = CommissionDesk::new(
            DeskConfig::new(AccountId([0u8; 32])),
            InMemoryToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, QuillError::Configuration(_)));
    }

    #[test]
    fn full_lifecycle_through_the_desk() {
        let requester = AccountId::named("requester");
        let (key, recipient) = recipient_keypair();
        let cost = Decimal::new(100, 0);
        let mut desk = desk_with(requester, Decimal::new(500, 0));

        desk.set_cost(recipient, cost).unwrap();
        assert_eq!(desk.cost_of(recipient).unwrap(), cost);

        desk.approve(requester, cost).unwrap();
        let id = desk.create_request(requester, recipient, cost).unwrap();
        assert_eq!(desk.balance_of(requester), Decimal::new(400, 0));
        assert_eq!(desk.balance_of(desk.custody()), cost);
        assert_eq!(desk.pending_count(), 1);

        let msg = MessageHash::of(b"Hello World");
        let signature = sign_claim(&key, id, recipient, msg);
        let signer = desk.claim(id, &signature, msg).unwrap();

        assert_eq!(signer, recipient);
        assert_eq!(desk.balance_of(recipient), cost);
        assert_eq!(desk.balance_of(desk.custody()), Decimal::ZERO);
        assert_eq!(desk.request(id).unwrap().state, RequestState::Claimed);
        assert_eq!(desk.pending_count(), 0);
        assert_eq!(desk.events().len(), 2);
    }

    #[test]
    fn failed_create_leaves_no_trace() {
        let requester = AccountId::named("requester");
        let (_, recipient) = recipient_keypair();
        let mut desk = desk_with(requester, Decimal::new(100, 0));

        desk.set_cost(recipient, Decimal::new(100, 0)).unwrap();
        // No approval given.
        let err = desk
            .create_request(requester, recipient, Decimal::new(100, 0))
            .unwrap_err();
        assert!(matches!(err, QuillError::InsufficientAllowance { .. }));
        assert!(desk.events().is_empty());
        assert_eq!(desk.balance_of(requester), Decimal::new(100, 0));
    }

    #[test]
    fn events_announce_committed_operations_only() {
        let requester = AccountId::named("requester");
        let (key, recipient) = recipient_keypair();
        let cost = Decimal::new(10, 0);
        let mut desk = desk_with(requester, cost);

        desk.set_cost(recipient, cost).unwrap();
        desk.approve(requester, cost).unwrap();
        let id = desk.create_request(requester, recipient, cost).unwrap();

        // A rejected claim records nothing.
        let bad = sign_claim(&key, RequestId(999), recipient, MessageHash::of(b"x"));
        let _ = desk.claim(id, &bad, MessageHash::of(b"x")).unwrap_err();
        assert_eq!(desk.events().len(), 1);

        let msg = MessageHash::of(b"Hello World");
        let signature = sign_claim(&key, id, recipient, msg);
        desk.claim(id, &signature, msg).unwrap();

        let kinds: Vec<_> = desk.events().iter().collect();
        assert!(matches!(kinds[0], LedgerEvent::RequestCreated { .. }));
        assert!(matches!(kinds[1], LedgerEvent::Claimed { .. }));
    }
}
