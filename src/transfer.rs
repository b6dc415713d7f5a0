//! Transfer validation and execution.
//!
//! The engine validates a transfer request before any account is
//! touched, then hands the mutation to the store as one atomic unit.

use crate::account::Account;
use crate::coins::Coins;
use crate::error::{ExchangeError, Result};
use crate::store::AccountStore;
use log::warn;
use serde::Serialize;
use std::sync::Arc;

/// The two updated account snapshots from a successful transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    /// Sender after the debit.
    pub sender: Account,

    /// Receiver after the credit.
    pub receiver: Account,
}

/// Validates and applies coin transfers between accounts.
///
/// # Validation Order
///
/// Checks fail fast and run in a fixed order:
///
/// 1. Sender and receiver ids differ (after trimming whitespace)
/// 2. The amount is a positive integer
/// 3. The sender account exists
/// 4. The receiver account exists
/// 5. The sender balance covers the amount
///
/// The first two are pure request validation and run before the store
/// is consulted, so an invalid request never takes an account lock.
/// The rest are checked by the store inside the same atomic scope that
/// applies the mutation.
pub struct TransferEngine {
    store: Arc<AccountStore>,
}

impl TransferEngine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<AccountStore>) -> Self {
        TransferEngine { store }
    }

    /// Moves `amount` coins from `sender_id` to `receiver_id`.
    ///
    /// On success both updated snapshots are returned; on any error no
    /// balance has changed.
    pub fn transfer(
        &self,
        sender_id: &str,
        receiver_id: &str,
        amount: i64,
    ) -> Result<TransferReceipt> {
        let sender_id = sender_id.trim();
        let receiver_id = receiver_id.trim();

        if sender_id == receiver_id {
            warn!("Rejected self-transfer on account {}", sender_id);
            return Err(ExchangeError::SelfTransfer);
        }

        let amount = Coins::from_amount(amount).ok_or(ExchangeError::InvalidAmount)?;

        let (sender, receiver) = self.store.apply_transfer(sender_id, receiver_id, amount)?;
        Ok(TransferReceipt { sender, receiver })
    }
}
