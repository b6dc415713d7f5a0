//! User account model and balance operations.
//!
//! Maintains the invariant: `balance >= 0` at all times.

use crate::coins::Coins;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every account starts with this many coins. Fixed by policy, never
/// chosen by the caller.
pub const STARTING_BALANCE: Coins = Coins::new(100);

/// Represents a user's account state.
///
/// # Invariants
///
/// - `id` is assigned at creation and never changes
/// - `balance` can never go below zero: debits are checked against the
///   current balance before they are applied
///
/// The `username` is a display label only and is not required to be
/// unique; accounts are identified solely by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,

    /// Display name chosen by the user.
    pub username: String,

    /// Current coin balance.
    pub balance: Coins,
}

impl Account {
    /// Creates a new account with a fresh id and the policy starting balance.
    pub fn new(username: impl Into<String>) -> Self {
        Account {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            balance: STARTING_BALANCE,
        }
    }

    /// Credits coins to the account.
    ///
    /// Returns `false` if the credit would overflow the balance counter,
    /// in which case the balance is unchanged.
    pub fn credit(&mut self, amount: Coins) -> bool {
        match self.balance.checked_add(amount) {
            Some(updated) => {
                self.balance = updated;
                true
            }
            None => false,
        }
    }

    /// Debits coins from the account.
    ///
    /// Returns `false` if the account cannot cover the amount
    /// (`balance < amount`), in which case the balance is unchanged.
    pub fn debit(&mut self, amount: Coins) -> bool {
        match self.balance.checked_sub(amount) {
            Some(updated) => {
                self.balance = updated;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_gets_starting_balance() {
        let account = Account::new("alice");
        assert_eq!(account.username, "alice");
        assert_eq!(account.balance, STARTING_BALANCE);
        assert!(!account.id.is_empty());
    }

    #[test]
    fn test_new_accounts_get_distinct_ids() {
        let a = Account::new("alice");
        let b = Account::new("alice");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut account = Account::new("alice");
        assert!(account.credit(Coins::new(30)));
        assert_eq!(account.balance, Coins::new(130));
    }

    #[test]
    fn test_debit_decreases_balance() {
        let mut account = Account::new("alice");
        assert!(account.debit(Coins::new(40)));
        assert_eq!(account.balance, Coins::new(60));
    }

    #[test]
    fn test_debit_fails_with_insufficient_balance() {
        let mut account = Account::new("alice");
        assert!(!account.debit(Coins::new(101)));
        assert_eq!(account.balance, STARTING_BALANCE);
    }

    #[test]
    fn test_debit_to_exactly_zero() {
        let mut account = Account::new("alice");
        assert!(account.debit(Coins::new(100)));
        assert_eq!(account.balance, Coins::ZERO);
    }

    #[test]
    fn test_credit_fails_on_overflow() {
        let mut account = Account::new("alice");
        account.balance = Coins::new(u64::MAX);
        assert!(!account.credit(Coins::new(1)));
        assert_eq!(account.balance, Coins::new(u64::MAX));
    }

    #[test]
    fn test_serde_round_trip() {
        let account = Account::new("alice");
        let json = serde_json::to_string(&account).unwrap();
        let parsed: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, account);
    }
}
