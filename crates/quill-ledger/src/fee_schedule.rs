//! Fee schedule — per-recipient price for a commissioned message.
//!
//! Self-service pricing: only the recipient itself may set (or overwrite)
//! its cost. No history is retained; the current value alone is
//! authoritative for subsequent request creation. A recipient that never
//! set a cost cannot be requested at all — there is no implicit zero price.

use std::collections::HashMap;

use quill_types::{AccountId, QuillError, Result};
use rust_decimal::Decimal;

/// Mapping from recipient identity to the cost of commissioning a message.
#[derive(Debug, Default)]
pub struct FeeSchedule {
    costs: HashMap<AccountId, Decimal>,
}

impl FeeSchedule {
    /// Create an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cost for `recipient`. Unconditional overwrite, last write
    /// wins, immediately visible to subsequent request creation.
    ///
    /// # Errors
    /// Returns [`QuillError::Unauthorized`] unless `caller == recipient`,
    /// and [`QuillError::NegativeAmount`] for a negative cost — a negative
    /// price would pull funds out of custody at creation time.
    pub fn set_cost(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
        cost: Decimal,
    ) -> Result<()> {
        if caller != recipient {
            return Err(QuillError::Unauthorized { caller, recipient });
        }
        if cost < Decimal::ZERO {
            return Err(QuillError::NegativeAmount(cost));
        }

        tracing::debug!(recipient = %recipient, %cost, "fee schedule updated");
        self.costs.insert(recipient, cost);
        Ok(())
    }

    /// The cost currently in effect for `recipient`.
    ///
    /// # Errors
    /// Returns [`QuillError::UnknownRecipient`] if no cost was ever set.
    pub fn cost_of(&self, recipient: AccountId) -> Result<Decimal> {
        self.costs
            .get(&recipient)
            .copied()
            .ok_or(QuillError::UnknownRecipient(recipient))
    }

    /// Whether `recipient` has a cost on file.
    #[must_use]
    pub fn has_cost(&self, recipient: AccountId) -> bool {
        self.costs.contains_key(&recipient)
    }

    /// Number of priced recipients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether no recipient has ever set a cost.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}
