//! Error types for the coin exchange.

use crate::coins::Coins;
use thiserror::Error;

/// Result type alias for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Errors that can occur while operating on accounts and transfers.
///
/// Every variant except [`ExchangeError::Storage`] is permanent for the
/// given input: retrying the same request unmodified will fail the same
/// way. Storage failures may be transient and are the only kind a caller
/// should consider retrying.
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Referenced account id does not exist
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Sender and receiver are the same account
    #[error("cannot send coins to yourself")]
    SelfTransfer,

    /// Transfer amount is zero or negative
    #[error("transfer amount must be a positive number of coins")]
    InvalidAmount,

    /// Sender cannot cover the requested amount
    #[error("account {sender} holds {available} coins, cannot send {requested}")]
    InsufficientBalance {
        sender: String,
        requested: Coins,
        available: Coins,
    },

    /// Crediting the receiver would overflow its balance counter
    #[error("balance overflow on account {0}")]
    BalanceOverflow(String),

    /// Underlying persistence could not commit
    #[error("storage error: {0}")]
    Storage(String),

    /// Bad command-line invocation
    #[error("{0}")]
    Usage(&'static str),
}

impl ExchangeError {
    /// Returns `true` if retrying the same operation could succeed.
    ///
    /// Only storage failures qualify; every other kind is a property of
    /// the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExchangeError::Storage(_))
    }

    /// Wraps an I/O error from the persistence layer.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        ExchangeError::Storage(err.to_string())
    }
}
