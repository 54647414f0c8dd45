//! System-wide constants for the Quill escrow ledger.

/// Domain tag prefixing every claim digest. Versioned so a future digest
/// layout can never collide with signatures produced against this one.
pub const CLAIM_DIGEST_DOMAIN: &[u8] = b"quill:claim:v1:";

/// Domain tag for deriving an [`AccountId`](crate::AccountId) from a label.
pub const ACCOUNT_LABEL_DOMAIN: &[u8] = b"quill:account:v1:";

/// Length of a recoverable ECDSA signature on the wire: `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// The id assigned to the first request ever created.
pub const FIRST_REQUEST_ID: u64 = 1;

/// Label for the default custody account (escrow holder).
pub const CUSTODY_LABEL: &str = "quill:custody";
