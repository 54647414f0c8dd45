//! Configuration for a Quill escrow desk.

use serde::{Deserialize, Serialize};

use crate::{AccountId, QuillError, Result, constants};

/// Configuration for a desk instance.
///
/// Fee schedule and request ledger state initialize empty at startup and
/// persist for the process lifetime; the only configurable piece is the
/// custody identity that holds escrowed funds between creation and claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeskConfig {
    /// The account that holds escrowed funds. Owned by neither party.
    pub custody: AccountId,
}

impl DeskConfig {
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self { custody }
    }

    /// Reject configurations that would break escrow accounting.
    ///
    /// # Errors
    /// Returns [`QuillError::Configuration`] if the custody account is the
    /// all-zero placeholder.
    pub fn validate(&self) -> Result<()> {
        if self.custody.is_zero() {
            return Err(QuillError::Configuration(
                "custody account must not be the zero identity".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            custody: AccountId::named(constants::CUSTODY_LABEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DeskConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.custody.is_zero());
    }

    #[test]
    fn zero_custody_rejected() {
        let config = DeskConfig::new(AccountId([0u8; 32]));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, QuillError::Configuration(_)));
    }

    #[test]
    fn config_serde_roundtrip() {
        let config = DeskConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DeskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.custody, config.custody);
    }
}
