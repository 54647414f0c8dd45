//! Signature verification — claim digest composition and ECDSA recovery.
//!
//! The digest binds the request id, the recipient identity, and the hash
//! of the message content under a versioned domain tag. Because ids are
//! unique, a signature authorizing one request can never be replayed
//! against another id or another message.
//!
//! Signatures travel as 65 bytes `r ‖ s ‖ v` over secp256k1. High-`s`
//! encodings are rejected before recovery: every authorization has exactly
//! one valid byte representation.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use quill_types::{AccountId, MessageHash, QuillError, RequestId, Result, constants};
use sha2::{Digest, Sha256};

/// Recovers a signer identity from a claim digest and signature.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Compute the canonical claim digest for `(request_id, recipient,
    /// message_hash)`.
    ///
    /// SHA-256 over:
    /// - the versioned domain tag
    /// - the request id (big-endian)
    /// - the recipient identity
    /// - the message content hash
    #[must_use]
    pub fn claim_digest(
        request_id: RequestId,
        recipient: AccountId,
        message_hash: MessageHash,
    ) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(constants::CLAIM_DIGEST_DOMAIN);
        hasher.update(request_id.0.to_be_bytes());
        hasher.update(recipient.as_bytes());
        hasher.update(message_hash.as_bytes());
        hasher.finalize().into()
    }

    /// Recover the signer identity from a digest and a 65-byte recoverable
    /// signature. `v` accepts both the raw recovery id (0/1) and the
    /// legacy 27/28 offsets.
    ///
    /// # Errors
    /// Returns [`QuillError::InvalidSignature`] if the signature has the
    /// wrong length, a non-canonical (high-`s`) encoding, an unknown
    /// recovery id, or fails point recovery.
    pub fn recover(digest: &[u8; 32], signature: &[u8]) -> Result<AccountId> {
        if signature.len() != constants::SIGNATURE_LEN {
            return Err(QuillError::InvalidSignature {
                reason: format!(
                    "expected {} bytes, got {}",
                    constants::SIGNATURE_LEN,
                    signature.len()
                ),
            });
        }

        let sig =
            Signature::from_slice(&signature[..64]).map_err(|e| QuillError::InvalidSignature {
                reason: format!("malformed r/s: {e}"),
            })?;

        // Reject the malleable twin: only the low-s encoding is accepted.
        if sig.normalize_s().is_some() {
            return Err(QuillError::InvalidSignature {
                reason: "non-canonical s component (high-s encoding)".into(),
            });
        }

        let v = match signature[64] {
            b @ (0 | 1) => b,
            b @ (27 | 28) => b - 27,
            other => {
                return Err(QuillError::InvalidSignature {
                    reason: format!("unknown recovery id {other}"),
                });
            }
        };
        let recovery_id = RecoveryId::from_byte(v).ok_or_else(|| QuillError::InvalidSignature {
            reason: format!("unknown recovery id {v}"),
        })?;

        let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id).map_err(|e| {
            QuillError::InvalidSignature {
                reason: format!("recovery failed: {e}"),
            }
        })?;

        Ok(AccountId::from_verifying_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;

    fn keypair(seed: u8) -> (SigningKey, AccountId) {
        let key = SigningKey::from_slice(&[seed; 32]).expect("valid scalar");
        let account = AccountId::from_verifying_key(key.verifying_key());
        (key, account)
    }

    fn sign(key: &SigningKey, digest: &[u8; 32]) -> Vec<u8> {
        let (sig, recovery_id) = key.sign_prehash_recoverable(digest).expect("signing");
        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        bytes
    }

    #[test]
    fn digest_is_deterministic() {
        let recipient = AccountId::named("recipient");
        let msg = MessageHash::of(b"Hello World");
        let a = SignatureVerifier::claim_digest(RequestId(1), recipient, msg);
        let b = SignatureVerifier::claim_digest(RequestId(1), recipient, msg);
        assert_eq!(a, b);
    }

    #[test]
    fn digest_binds_every_field() {
        let recipient = AccountId::named("recipient");
        let msg = MessageHash::of(b"Hello World");
        let base = SignatureVerifier::claim_digest(RequestId(1), recipient, msg);

        let other_id = SignatureVerifier::claim_digest(RequestId(2), recipient, msg);
        let other_recipient =
            SignatureVerifier::claim_digest(RequestId(1), AccountId::named("other"), msg);
        let other_msg =
            SignatureVerifier::claim_digest(RequestId(1), recipient, MessageHash::of(b"Goodbye"));

        assert_ne!(base, other_id);
        assert_ne!(base, other_recipient);
        assert_ne!(base, other_msg);
    }

    #[test]
    fn recover_roundtrip() {
        let (key, account) = keypair(11);
        let digest =
            SignatureVerifier::claim_digest(RequestId(1), account, MessageHash::of(b"Hello World"));
        let signature = sign(&key, &digest);
        let recovered = SignatureVerifier::recover(&digest, &signature).unwrap();
        assert_eq!(recovered, account);
    }

    #[test]
    fn recover_accepts_legacy_v_offset() {
        let (key, account) = keypair(11);
        let digest =
            SignatureVerifier::claim_digest(RequestId(1), account, MessageHash::of(b"Hello World"));
        let mut signature = sign(&key, &digest);
        signature[64] += 27;
        let recovered = SignatureVerifier::recover(&digest, &signature).unwrap();
        assert_eq!(recovered, account);
    }

    #[test]
    fn wrong_key_recovers_different_account() {
        let (key, _) = keypair(11);
        let (_, other_account) = keypair(12);
        let digest = SignatureVerifier::claim_digest(
            RequestId(1),
            other_account,
            MessageHash::of(b"Hello World"),
        );
        let signature = sign(&key, &digest);
        let recovered = SignatureVerifier::recover(&digest, &signature).unwrap();
        assert_ne!(recovered, other_account);
    }

    #[test]
    fn wrong_length_rejected() {
        let digest = [0x42u8; 32];
        let err = SignatureVerifier::recover(&digest, &[0u8; 64]).unwrap_err();
        assert!(matches!(err, QuillError::InvalidSignature { .. }));
    }

    #[test]
    fn unknown_recovery_id_rejected() {
        let (key, account) = keypair(11);
        let digest =
            SignatureVerifier::claim_digest(RequestId(1), account, MessageHash::of(b"Hello World"));
        let mut signature = sign(&key, &digest);
        signature[64] = 9;
        let err = SignatureVerifier::recover(&digest, &signature).unwrap_err();
        assert!(matches!(err, QuillError::InvalidSignature { .. }));
    }

    #[test]
    fn high_s_encoding_rejected() {
        let (key, account) = keypair(11);
        let digest =
            SignatureVerifier::claim_digest(RequestId(1), account, MessageHash::of(b"Hello World"));
        let (sig, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();

        // Forge the alternate encoding of the same authorization: s' = n - s,
        // with the recovery parity flipped to match.
        let (r, s) = sig.split_scalars();
        let forged = Signature::from_scalars(*r, -*s).expect("valid scalars");
        let mut bytes = forged.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() ^ 1);

        let err = SignatureVerifier::recover(&digest, &bytes).unwrap_err();
        assert!(
            matches!(err, QuillError::InvalidSignature { ref reason } if reason.contains("high-s")),
            "expected high-s rejection, got: {err}"
        );
    }

    #[test]
    fn zero_signature_rejected() {
        let digest = [0x42u8; 32];
        let err = SignatureVerifier::recover(&digest, &[0u8; 65]).unwrap_err();
        assert!(matches!(err, QuillError::InvalidSignature { .. }));
    }
}
