//! Escrow conservation invariant checker.
//!
//! Invariant enforced after every operation:
//! ```text
//! custody_balance == Σ(escrowed in) - Σ(released out) == Σ(pending amounts)
//! ```
//!
//! If this ever breaks, escrowed funds have leaked or been double-paid —
//! something has gone catastrophically wrong and the desk surfaces it as a
//! hard error rather than continuing.

use quill_types::{QuillError, Result};
use rust_decimal::Decimal;

/// Tracks escrow inflow/outflow and validates the custody balance.
#[derive(Debug, Default)]
pub struct EscrowConservation {
    /// Total escrowed into custody since startup.
    escrowed_in: Decimal,
    /// Total released from custody since startup.
    released_out: Decimal,
}

impl EscrowConservation {
    /// Create a fresh tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record funds entering custody (a created request).
    pub fn record_escrow(&mut self, amount: Decimal) {
        self.escrowed_in += amount;
    }

    /// Record funds leaving custody (a settled claim).
    pub fn record_release(&mut self, amount: Decimal) {
        self.released_out += amount;
    }

    /// The balance custody is expected to hold right now.
    #[must_use]
    pub fn expected_custody(&self) -> Decimal {
        self.escrowed_in - self.released_out
    }

    /// Verify the actual custody balance against the expected figure.
    ///
    /// # Errors
    /// Returns [`QuillError::EscrowInvariantViolation`] on any mismatch.
    pub fn verify_custody(&self, actual: Decimal) -> Result<()> {
        let expected = self.expected_custody();
        if actual != expected {
            return Err(QuillError::EscrowInvariantViolation {
                reason: format!(
                    "custody balance {actual} != expected {expected} \
                     (escrowed={}, released={})",
                    self.escrowed_in, self.released_out,
                ),
            });
        }
        Ok(())
    }

    /// Verify the sum of pending request amounts against the expected
    /// custody figure. The two views must always agree.
    ///
    /// # Errors
    /// Returns [`QuillError::EscrowInvariantViolation`] on any mismatch.
    pub fn verify_pending(&self, total_pending: Decimal) -> Result<()> {
        let expected = self.expected_custody();
        if total_pending != expected {
            return Err(QuillError::EscrowInvariantViolation {
                reason: format!("pending amounts {total_pending} != expected custody {expected}"),
            });
        }
        Ok(())
    }

    /// Total escrowed into custody since startup.
    #[must_use]
    pub fn total_escrowed(&self) -> Decimal {
        self.escrowed_in
    }

    /// Total released from custody since startup.
    #[must_use]
    pub fn total_released(&self) -> Decimal {
        self.released_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_expects_zero() {
        let tracker = EscrowConservation::new();
        assert_eq!(tracker.expected_custody(), Decimal::ZERO);
        assert!(tracker.verify_custody(Decimal::ZERO).is_ok());
        assert!(tracker.verify_pending(Decimal::ZERO).is_ok());
    }

    #[test]
    fn escrow_increases_expected() {
        let mut tracker = EscrowConservation::new();
        tracker.record_escrow(Decimal::new(100, 0));
        tracker.record_escrow(Decimal::new(50, 0));
        assert_eq!(tracker.expected_custody(), Decimal::new(150, 0));
        assert_eq!(tracker.total_escrowed(), Decimal::new(150, 0));
    }

    #[test]
    fn release_decreases_expected() {
        let mut tracker = EscrowConservation::new();
        tracker.record_escrow(Decimal::new(100, 0));
        tracker.record_release(Decimal::new(100, 0));
        assert_eq!(tracker.expected_custody(), Decimal::ZERO);
        assert_eq!(tracker.total_released(), Decimal::new(100, 0));
    }

    #[test]
    fn verify_custody_fails_on_leak() {
        let mut tracker = EscrowConservation::new();
        tracker.record_escrow(Decimal::new(100, 0));
        let err = tracker.verify_custody(Decimal::new(99, 0)).unwrap_err();
        assert!(matches!(err, QuillError::EscrowInvariantViolation { .. }));
    }

    #[test]
    fn verify_pending_fails_on_drift() {
        let mut tracker = EscrowConservation::new();
        tracker.record_escrow(Decimal::new(100, 0));
        tracker.record_release(Decimal::new(40, 0));
        assert!(tracker.verify_pending(Decimal::new(60, 0)).is_ok());
        let err = tracker.verify_pending(Decimal::new(100, 0)).unwrap_err();
        assert!(matches!(err, QuillError::EscrowInvariantViolation { .. }));
    }
}
