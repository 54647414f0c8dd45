//! # quill-settlement
//!
//! **Finality plane**: signature verification, claim settlement, and the
//! escrow conservation invariant.
//!
//! ## Architecture
//!
//! The finality plane receives a claim for a pending request and:
//! 1. Checks the request is still pending (at-most-once settlement)
//! 2. Recovers the signer from the id-bound claim digest
//! 3. Requires the signer to be the request's recipient
//! 4. Releases the escrow from custody to the recipient
//! 5. Marks the request claimed and records the `Claimed` event
//!
//! A claim is terminal and irreversible. If the payout transfer fails the
//! whole claim aborts and the request stays pending, eligible for retry.
//!
//! [`CommissionDesk`] ties the escrow and finality planes together behind
//! a single `&mut self` surface: one call, one atomic, serializable unit.

pub mod conservation;
pub mod desk;
pub mod engine;
pub mod verifier;

pub use conservation::EscrowConservation;
pub use desk::CommissionDesk;
pub use engine::SettlementEngine;
pub use verifier::SignatureVerifier;
