//! Integer coin amounts.
//!
//! Balances and transfer amounts are whole coins, represented as an
//! unsigned counter with checked arithmetic so a balance can never be
//! driven below zero or wrapped past its maximum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative number of coins.
///
/// Wraps `u64` and only exposes checked arithmetic: subtracting more than
/// the current value or adding past `u64::MAX` returns `None` instead of
/// wrapping. Serializes as a bare JSON integer.
///
/// # Examples
///
/// ```
/// use coin_exchange::Coins;
///
/// let balance = Coins::new(100);
/// assert_eq!(balance.checked_sub(Coins::new(30)), Some(Coins::new(70)));
/// assert_eq!(balance.checked_sub(Coins::new(101)), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coins(u64);

impl Coins {
    /// Zero coins.
    pub const ZERO: Self = Coins(0);

    /// Creates a coin amount from a raw count.
    pub const fn new(count: u64) -> Self {
        Coins(count)
    }

    /// Validates an externally supplied transfer amount.
    ///
    /// Returns `None` unless the amount is a positive integer; zero and
    /// negative amounts are not valid transfer sizes.
    pub fn from_amount(amount: i64) -> Option<Self> {
        if amount > 0 {
            Some(Coins(amount as u64))
        } else {
            None
        }
    }

    /// Returns the raw coin count.
    pub fn count(&self) -> u64 {
        self.0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Coins)
    }

    /// Checked subtraction; `None` if `rhs` exceeds `self`.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Coins)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
