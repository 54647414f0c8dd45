//! Error types for the Quill escrow ledger.
//!
//! All errors use the `QL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Fee schedule errors
//! - 2xx: Token / balance errors
//! - 3xx: Request ledger errors
//! - 4xx: Settlement errors
//! - 8xx: Safety invariant errors
//! - 9xx: General / internal errors
//!
//! Every error aborts its operation in full: no partial mutation survives
//! a returned error, and nothing is retried internally.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, RequestId};

/// Central error enum for all Quill operations.
#[derive(Debug, Error)]
pub enum QuillError {
    // =================================================================
    // Fee Schedule Errors (1xx)
    // =================================================================
    /// No cost has ever been set for this recipient. Requests against an
    /// unset recipient fail rather than defaulting to a zero price.
    #[error("QL_ERR_100: No cost set for recipient {0}")]
    UnknownRecipient(AccountId),

    /// Someone other than the recipient tried to set the recipient's cost.
    #[error("QL_ERR_101: Only {recipient} may set its own cost (caller was {caller})")]
    Unauthorized {
        caller: AccountId,
        recipient: AccountId,
    },

    // =================================================================
    // Token / Balance Errors (2xx)
    // =================================================================
    /// Not enough balance to perform the transfer.
    #[error("QL_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// The spender's allowance does not cover the requested pull.
    #[error("QL_ERR_201: Insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: Decimal, approved: Decimal },

    /// A negative amount where only zero-or-positive quantities are
    /// meaningful. A negative quantity would satisfy the balance and
    /// allowance guards vacuously and move funds in the wrong direction.
    #[error("QL_ERR_202: Negative amount: {0}")]
    NegativeAmount(Decimal),

    // =================================================================
    // Request Ledger Errors (3xx)
    // =================================================================
    /// The requested escrow record was not found.
    #[error("QL_ERR_300: Request not found: {0}")]
    UnknownRequest(RequestId),

    /// The caller's declared amount does not match the scheduled cost.
    #[error("QL_ERR_301: Declared amount {declared} does not match scheduled cost {cost}")]
    AmountMismatch { declared: Decimal, cost: Decimal },

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// The request was already claimed (double-claim protection).
    #[error("QL_ERR_400: Request already claimed: {0}")]
    AlreadyClaimed(RequestId),

    /// Signature recovery failed, the encoding was non-canonical, or the
    /// recovered signer is not the request's recipient.
    #[error("QL_ERR_401: Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    // =================================================================
    // Safety Invariant Errors (8xx)
    // =================================================================
    /// Escrow conservation invariant violated — critical safety alert.
    #[error("QL_ERR_800: Escrow invariant violation: {reason}")]
    EscrowInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("QL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Configuration error (invalid custody account, missing fields, etc.).
    #[error("QL_ERR_901: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("QL_ERR_902: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, QuillError>;

// Conversion from std::io::Error
impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
