//! Token collaborator — capability interface plus in-process ledger.
//!
//! The fungible token is an external collaborator: the core only needs the
//! four operations below and treats any failure as a hard abort of the
//! enclosing operation. There is no ambient caller identity here, so each
//! operation names the acting account explicitly; every fallible call
//! returns `Result`, which means a rejection can never be silently
//! mistaken for success.

use std::collections::HashMap;

use quill_types::{AccountId, QuillError, Result};
use rust_decimal::Decimal;

/// Capability interface over the fungible token ledger.
///
/// Any concrete implementation (in-process ledger, external service call)
/// is substitutable without changing core logic.
pub trait TokenLedger {
    /// Pull `amount` from `owner` to `to`, spending `spender`'s allowance.
    ///
    /// # Errors
    /// `NegativeAmount` if `amount` is negative; `InsufficientAllowance`
    /// if `owner` has not approved `spender` for at least `amount`;
    /// `InsufficientBalance` if `owner` cannot cover it. On error no
    /// balance or allowance changes.
    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()>;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    /// `NegativeAmount` if `amount` is negative; `InsufficientBalance` if
    /// `from` cannot cover `amount`. On error no balance changes.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()>;

    /// Current balance of `account`. Unknown accounts hold zero.
    fn balance_of(&self, account: AccountId) -> Decimal;

    /// Authorize `spender` to pull up to `amount` from `owner`.
    /// Unconditional overwrite of any prior allowance.
    ///
    /// # Errors
    /// `NegativeAmount` if `amount` is negative.
    fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Decimal) -> Result<()>;
}

/// In-process token ledger: balances plus `(owner, spender)` allowances.
#[derive(Debug, Default)]
pub struct InMemoryToken {
    balances: HashMap<AccountId, Decimal>,
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

impl InMemoryToken {
    /// Create an empty token ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `to` with `amount` units. Setup/test helper; the core never
    /// mints.
    pub fn mint(&mut self, to: AccountId, amount: Decimal) {
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
    }

    /// Remaining allowance from `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Decimal {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }
}

impl TokenLedger for InMemoryToken {
    fn transfer_from(
        &mut self,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<()> {
        // A negative pull would satisfy both guards below vacuously and
        // credit the owner out of the destination.
        if amount < Decimal::ZERO {
            return Err(QuillError::NegativeAmount(amount));
        }

        let approved = self.allowance(owner, spender);
        if approved < amount {
            return Err(QuillError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }

        let available = self.balance_of(owner);
        if available < amount {
            return Err(QuillError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        // All checks passed — mutate allowance and both balances together.
        self.allowances.insert((owner, spender), approved - amount);
        *self.balances.entry(owner).or_insert(Decimal::ZERO) -= amount;
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(QuillError::NegativeAmount(amount));
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(QuillError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        *self.balances.entry(from).or_insert(Decimal::ZERO) -= amount;
        *self.balances.entry(to).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances
            .get(&account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(QuillError::NegativeAmount(amount));
        }

        self.allowances.insert((owner, spender), amount);
        Ok(())
    }
}
