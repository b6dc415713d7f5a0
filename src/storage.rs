//! Durable account persistence.
//!
//! The store's concurrency logic is independent of the storage medium:
//! it talks to a [`Backend`] that can load the committed account set and
//! atomically commit a batch of updated records. The file-backed
//! implementation keeps the ledger as a JSON array on disk and replaces
//! it atomically on every commit; the in-memory implementation backs
//! tests and ephemeral ledgers.

use crate::account::Account;
use crate::error::{ExchangeError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// A durable key-value layer for account records.
///
/// # Commit atomicity
///
/// `commit` upserts every record in `updated` as a single unit: after it
/// returns `Ok`, all of them are durable; after an `Err`, none of them
/// are. The two sides of a transfer are passed in one call so they can
/// never be committed separately.
pub trait Backend: Send + Sync {
    /// Returns every committed account, in the order first committed.
    fn load(&self) -> Result<Vec<Account>>;

    /// Durably upserts the given records, all or none.
    fn commit(&self, updated: &[Account]) -> Result<()>;
}

/// File-backed ledger: a JSON array of accounts, atomically replaced on
/// every commit.
///
/// Keeps an in-memory mirror of the committed records. A commit builds
/// the next snapshot on a copy, writes it to a temporary file in the
/// ledger's directory, fsyncs, and renames it over the live file; the
/// mirror is swapped only after the rename succeeds. A failed commit
/// therefore leaves both the file and the mirror at the previous
/// snapshot.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    mirror: Mutex<Vec<Account>>,
}

impl JsonFileBackend {
    /// Opens a ledger file, creating an empty ledger if the file does
    /// not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let data = fs::read_to_string(&path).map_err(ExchangeError::storage)?;
            serde_json::from_str(&data).map_err(ExchangeError::storage)?
        } else {
            Vec::new()
        };
        debug!(
            "Opened ledger {} with {} accounts",
            path.display(),
            records.len()
        );
        Ok(JsonFileBackend {
            path,
            mirror: Mutex::new(records),
        })
    }

    /// Writes a full snapshot to disk via temp-file-and-rename.
    fn write_snapshot(&self, records: &[Account]) -> Result<()> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))
            .map_err(ExchangeError::storage)?;
        serde_json::to_writer_pretty(&mut tmp, records).map_err(ExchangeError::storage)?;
        tmp.as_file().sync_all().map_err(ExchangeError::storage)?;
        tmp.persist(&self.path).map_err(ExchangeError::storage)?;
        Ok(())
    }
}

impl Backend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Account>> {
        // Safety: lock is only poisoned if a commit panicked mid-swap
        let mirror = self.mirror.lock().expect("ledger mirror lock poisoned");
        Ok(mirror.clone())
    }

    fn commit(&self, updated: &[Account]) -> Result<()> {
        let mut mirror = self.mirror.lock().expect("ledger mirror lock poisoned");

        let mut next = mirror.clone();
        for record in updated {
            match next.iter_mut().find(|a| a.id == record.id) {
                Some(slot) => *slot = record.clone(),
                None => next.push(record.clone()),
            }
        }

        self.write_snapshot(&next)?;
        *mirror = next;
        debug!("Committed {} record(s) to {}", updated.len(), self.path.display());
        Ok(())
    }
}

/// In-memory ledger with the same commit contract and no durability.
///
/// Used as the unit-test fake and for ephemeral ledgers.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<Account>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Vec<Account>> {
        let records = self.records.lock().expect("ledger lock poisoned");
        Ok(records.clone())
    }

    fn commit(&self, updated: &[Account]) -> Result<()> {
        let mut records = self.records.lock().expect("ledger lock poisoned");
        for record in updated {
            match records.iter_mut().find(|a| a.id == record.id) {
                Some(slot) => *slot = record.clone(),
                None => records.push(record.clone()),
            }
        }
        Ok(())
    }
}
