//! # quill-ledger
//!
//! **Escrow plane**: fee schedule, token custody, and the request ledger.
//!
//! ## Architecture
//!
//! 1. **FeeSchedule**: per-recipient pricing, self-service writes only
//! 2. **TokenLedger**: capability interface over the fungible token
//!    collaborator, with [`InMemoryToken`] as the in-process implementation
//! 3. **RequestLedger**: creates, stores, and indexes escrow requests
//!
//! ## Request Flow
//!
//! ```text
//! caller → FeeSchedule.cost_of() → TokenLedger.transfer_from(requester → custody)
//!        → RequestLedger stores Pending record → EventLog.record(RequestCreated)
//! ```
//!
//! Creation is one atomic unit: if the fund pull is rejected, no id is
//! allocated, no record stored, no event recorded.

pub mod fee_schedule;
pub mod request_ledger;
pub mod token;

pub use fee_schedule::FeeSchedule;
pub use request_ledger::RequestLedger;
pub use token::{InMemoryToken, TokenLedger};
