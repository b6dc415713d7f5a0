//! # Coin Exchange
//!
//! A single-process coin ledger: per-user accounts with integer coin
//! balances and an atomic peer-to-peer transfer operation.
//!
//! ## Design Principles
//!
//! - **Conservation**: transfers never create or destroy coins
//! - **Non-negative balances**: debits are checked under the same locks
//!   that apply them, so no interleaving can drive a balance below zero
//! - **Atomic pair updates**: both sides of a transfer are locked in a
//!   deterministic order and committed to storage together or not at all
//! - **Injected persistence**: the store talks to a [`Backend`] trait,
//!   so the concurrency logic is testable against an in-memory fake
//!
//! ## Example
//!
//! ```
//! use coin_exchange::{AccountStore, MemoryBackend, TransferEngine};
//! use std::sync::Arc;
//!
//! let store = Arc::new(AccountStore::open(Box::new(MemoryBackend::new())).unwrap());
//! let alice = store.create("alice").unwrap();
//! let bob = store.create("bob").unwrap();
//!
//! let engine = TransferEngine::new(Arc::clone(&store));
//! let receipt = engine.transfer(&alice.id, &bob.id, 30).unwrap();
//! assert_eq!(receipt.sender.balance.count(), 70);
//! assert_eq!(receipt.receiver.balance.count(), 130);
//! ```

pub mod account;
pub mod coins;
pub mod error;
pub mod storage;
pub mod store;
pub mod transfer;

pub use account::{Account, STARTING_BALANCE};
pub use coins::Coins;
pub use error::{ExchangeError, Result};
pub use storage::{Backend, JsonFileBackend, MemoryBackend};
pub use store::AccountStore;
pub use transfer::{TransferEngine, TransferReceipt};
