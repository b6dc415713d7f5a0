//! The account store: single source of truth for accounts and balances.
//!
//! All balance mutation funnels through [`AccountStore::apply_transfer`],
//! which locks both touched accounts for the whole check-and-update so
//! concurrent transfers cannot interleave on a shared account. Every
//! successful mutation is durably committed through the injected
//! [`Backend`] before it is published to readers.

use crate::account::Account;
use crate::coins::Coins;
use crate::error::{ExchangeError, Result};
use crate::storage::Backend;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Registered accounts plus the order they were created in.
#[derive(Default)]
struct Registry {
    accounts: HashMap<String, Arc<Mutex<Account>>>,
    order: Vec<String>,
}

impl Registry {
    fn insert(&mut self, account: Account) {
        let id = account.id.clone();
        self.accounts.insert(id.clone(), Arc::new(Mutex::new(account)));
        self.order.push(id);
    }
}

/// Thread-safe store of all user accounts.
///
/// Accounts live in per-account cells behind a registry-wide `RwLock`:
/// lookups and transfers only read-lock the registry, so transfers on
/// disjoint account pairs run concurrently, while account creation
/// briefly write-locks it. Whenever more than one account lock is held
/// (transfers, [`AccountStore::list`]) the locks are taken in ascending
/// id order, so no two operations can deadlock.
///
/// # Persistence
///
/// `create` and `apply_transfer` commit through the [`Backend`] before
/// reporting success; the two sides of a transfer go to the backend as
/// one atomic batch. A failed commit leaves the in-memory state at the
/// previous snapshot.
pub struct AccountStore {
    registry: RwLock<Registry>,
    backend: Box<dyn Backend>,
}

impl AccountStore {
    /// Opens a store over the given backend, loading every previously
    /// committed account in creation order.
    pub fn open(backend: Box<dyn Backend>) -> Result<Self> {
        let mut registry = Registry::default();
        for account in backend.load()? {
            registry.insert(account);
        }
        debug!("Account store opened with {} accounts", registry.order.len());
        Ok(AccountStore {
            registry: RwLock::new(registry),
            backend,
        })
    }

    /// Creates an account with a fresh id and the policy starting
    /// balance, committing it durably before returning.
    ///
    /// Fails only if the backend cannot commit.
    pub fn create(&self, username: &str) -> Result<Account> {
        let account = Account::new(username);
        self.backend.commit(std::slice::from_ref(&account))?;

        let mut registry = self.registry.write().expect("registry lock poisoned");
        registry.insert(account.clone());
        debug!("Created account {} ({})", account.id, account.username);
        Ok(account)
    }

    /// Returns a snapshot of the account with the given id.
    pub fn get(&self, id: &str) -> Result<Account> {
        let registry = self.registry.read().expect("registry lock poisoned");
        let cell = registry
            .accounts
            .get(id)
            .ok_or_else(|| ExchangeError::AccountNotFound(id.to_string()))?;
        let account = cell.lock().expect("account lock poisoned").clone();
        Ok(account)
    }

    /// Returns a consistent snapshot of every account, in creation order.
    pub fn list(&self) -> Vec<Account> {
        let registry = self.registry.read().expect("registry lock poisoned");

        // Lock the full set in ascending id order -- the same global
        // order transfers use -- so no transfer is caught halfway.
        let mut ids: Vec<&str> = registry.accounts.keys().map(String::as_str).collect();
        ids.sort_unstable();

        let mut locked: HashMap<&str, MutexGuard<'_, Account>> =
            HashMap::with_capacity(ids.len());
        for id in ids {
            locked.insert(id, registry.accounts[id].lock().expect("account lock poisoned"));
        }

        registry
            .order
            .iter()
            .map(|id| Account::clone(&locked[id.as_str()]))
            .collect()
    }

    /// Moves `amount` coins from the sender to the receiver as one
    /// atomic unit, returning the two updated snapshots.
    ///
    /// Both accounts stay locked from the balance check through the
    /// backend commit, so a concurrent transfer cannot drain the sender
    /// between check and debit. On any error -- unknown account,
    /// insufficient balance, overflow, failed commit -- neither balance
    /// changes.
    pub fn apply_transfer(
        &self,
        sender_id: &str,
        receiver_id: &str,
        amount: Coins,
    ) -> Result<(Account, Account)> {
        // Equal ids would double-lock the same cell.
        if sender_id == receiver_id {
            return Err(ExchangeError::SelfTransfer);
        }

        let (sender_cell, receiver_cell) = {
            let registry = self.registry.read().expect("registry lock poisoned");
            let sender = registry
                .accounts
                .get(sender_id)
                .cloned()
                .ok_or_else(|| ExchangeError::AccountNotFound(sender_id.to_string()))?;
            let receiver = registry
                .accounts
                .get(receiver_id)
                .cloned()
                .ok_or_else(|| ExchangeError::AccountNotFound(receiver_id.to_string()))?;
            (sender, receiver)
        };

        // Deterministic acquisition order across all transfers: the
        // account with the smaller id is locked first.
        let (mut sender_acc, mut receiver_acc) = if sender_id < receiver_id {
            let s = sender_cell.lock().expect("account lock poisoned");
            let r = receiver_cell.lock().expect("account lock poisoned");
            (s, r)
        } else {
            let r = receiver_cell.lock().expect("account lock poisoned");
            let s = sender_cell.lock().expect("account lock poisoned");
            (s, r)
        };

        // Stage the update on clones; nothing is published until the
        // backend commit succeeds.
        let mut updated_sender = sender_acc.clone();
        let mut updated_receiver = receiver_acc.clone();

        if !updated_sender.debit(amount) {
            warn!(
                "Rejected transfer of {} coins from {}: only {} available",
                amount, sender_id, sender_acc.balance
            );
            return Err(ExchangeError::InsufficientBalance {
                sender: sender_id.to_string(),
                requested: amount,
                available: sender_acc.balance,
            });
        }

        if !updated_receiver.credit(amount) {
            warn!(
                "Rejected transfer of {} coins to {}: balance would overflow",
                amount, receiver_id
            );
            return Err(ExchangeError::BalanceOverflow(receiver_id.to_string()));
        }

        self.backend
            .commit(&[updated_sender.clone(), updated_receiver.clone()])?;

        *sender_acc = updated_sender.clone();
        *receiver_acc = updated_receiver.clone();

        debug!(
            "Transferred {} coins from {} to {}",
            amount, sender_id, receiver_id
        );
        Ok((updated_sender, updated_receiver))
    }
}
