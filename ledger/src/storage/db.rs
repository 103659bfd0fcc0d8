//! # EconomyDb: JSON File Store
//!
//! The persistence layer for the economy. The entire database is one
//! pretty-printed JSON object on disk:
//!
//! ```json
//! {
//!   "123456789": {
//!     "wallet": "1500",
//!     "bank": "0",
//!     "walletCapacity": "1000000",
//!     "bankCapacity": "10000000",
//!     "shieldUntil": null,
//!     "lastDaily": 0,
//!     "cooldowns": {}
//!   }
//! }
//! ```
//!
//! ## Failure Policy
//!
//! Reads never fail. A missing file is created as `{}`; a file that can't
//! be read or doesn't parse to a JSON object loads as an empty database.
//! Writes never fail either: errors are logged and dropped. The strict
//! variants [`EconomyDb::try_load`] and [`EconomyDb::try_save`] are there
//! for callers who want to see what went wrong.
//!
//! ## Update Cycle
//!
//! [`EconomyDb::update`] is the only way the ledger touches the file:
//! lock, load, mutate, save if the mutation succeeded, unlock.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::Value;

use super::database::Database;
use crate::config::{AccountDefaults, EconomyConfig};

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors surfaced by the strict load/save variants.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("top-level value is not a JSON object")]
    NotAnObject,
}

pub type StorageResult<T> = Result<T, StorageError>;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ---------------------------------------------------------------------------
// EconomyDb
// ---------------------------------------------------------------------------

/// Handle on one economy file.
///
/// Holds the configuration (path and account defaults) and a mutex that
/// serializes load-modify-save cycles issued through this handle.
///
/// # Thread Safety
///
/// `EconomyDb` is `Send + Sync`; share it with `Arc<EconomyDb>`. Two
/// handles on the same path, or two processes, are not coordinated.
#[derive(Debug)]
pub struct EconomyDb {
    config: EconomyConfig,
    lock: Mutex<()>,
}

impl EconomyDb {
    /// Creates a handle. Touches nothing on disk until the first load.
    pub fn new(config: EconomyConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    /// Handle on `path` with default account capacities.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(EconomyConfig::at(path))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// The configuration this handle was built with.
    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    // -- Loading --------------------------------------------------------------

    /// Loads the whole database. Never fails.
    pub fn load(&self) -> Database {
        let _guard = self.lock.lock();
        self.read_snapshot()
    }

    /// Loads the whole database, reporting what went wrong instead of
    /// recovering.
    ///
    /// A missing file is still not an error: it is created as `{}`.
    pub fn try_load(&self) -> StorageResult<Database> {
        let _guard = self.lock.lock();
        try_read(self.path(), &self.config.defaults)
    }

    // -- Saving ---------------------------------------------------------------

    /// Writes the whole database. Failures are logged and swallowed.
    pub fn save(&self, db: &Database) {
        let _guard = self.lock.lock();
        self.write_snapshot(db);
    }

    /// Writes the whole database, returning any failure.
    pub fn try_save(&self, db: &Database) -> StorageResult<()> {
        let _guard = self.lock.lock();
        try_write(self.path(), db)
    }

    // -- Update cycle ---------------------------------------------------------

    /// Runs `f` on a fresh snapshot and saves the result if `f` returns
    /// `Ok`. On `Err` the file is left untouched.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut Database) -> Result<T, E>) -> Result<T, E> {
        let _guard = self.lock.lock();
        let mut db = self.read_snapshot();
        let out = f(&mut db)?;
        self.write_snapshot(&db);
        Ok(out)
    }

    /// Like [`update`](Self::update) for mutations that cannot fail.
    pub fn modify<T>(&self, f: impl FnOnce(&mut Database) -> T) -> T {
        let _guard = self.lock.lock();
        let mut db = self.read_snapshot();
        let out = f(&mut db);
        self.write_snapshot(&db);
        out
    }

    // -- Internals (caller holds the lock) ------------------------------------

    fn read_snapshot(&self) -> Database {
        read_forgiving(self.path(), &self.config.defaults)
    }

    fn write_snapshot(&self, db: &Database) {
        write_best_effort(self.path(), db);
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Loads the database at `path` without a handle. Never fails.
///
/// For collaborators doing bulk work outside the ledger. No locking.
pub fn load_economy(path: impl AsRef<Path>, defaults: &AccountDefaults) -> Database {
    read_forgiving(path.as_ref(), defaults)
}

/// Saves `db` to `path` without a handle. Failures are logged.
pub fn save_economy(db: &Database, path: impl AsRef<Path>) {
    write_best_effort(path.as_ref(), db);
}

fn read_forgiving(path: &Path, defaults: &AccountDefaults) -> Database {
    match try_read(path, defaults) {
        Ok(db) => db,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load economy, continuing with an empty database"
            );
            Database::new(defaults.clone())
        }
    }
}

fn try_read(path: &Path, defaults: &AccountDefaults) -> StorageResult<Database> {
    if !path.exists() {
        create_parent(path)?;
        fs::write(path, "{}").map_err(io_error(path))?;
        tracing::debug!(path = %path.display(), "created empty economy file");
        return Ok(Database::new(defaults.clone()));
    }

    let raw = fs::read_to_string(path).map_err(io_error(path))?;
    let raw = if raw.is_empty() { "{}" } else { raw.as_str() };

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(Database::from_map(&map, defaults.clone())),
        _ => Err(StorageError::NotAnObject),
    }
}

fn write_best_effort(path: &Path, db: &Database) {
    if let Err(e) = try_write(path, db) {
        tracing::error!(
            path = %path.display(),
            error = %e,
            "failed to save economy"
        );
    }
}

fn try_write(path: &Path, db: &Database) -> StorageResult<()> {
    create_parent(path)?;
    let json = serde_json::to_string_pretty(db)?;
    fs::write(path, json).map_err(io_error(path))?;
    Ok(())
}

fn create_parent(path: &Path) -> StorageResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error(parent))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::error::LedgerError;

    fn temp_db() -> (tempfile::TempDir, EconomyDb) {
        let dir = tempfile::tempdir().expect("tempdir");
        let db = EconomyDb::open(dir.path().join("database").join("economy.json"));
        (dir, db)
    }

    #[test]
    fn missing_file_is_created_empty() {
        let (_dir, store) = temp_db();
        assert!(!store.path().exists());

        let db = store.load();
        assert!(db.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[test]
    fn array_file_loads_empty() {
        let (_dir, store) = temp_db();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[]").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StorageError::NotAnObject)));
    }

    #[test]
    fn malformed_file_loads_empty() {
        let (_dir, store) = temp_db();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn empty_file_loads_empty() {
        let (_dir, store) = temp_db();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "").unwrap();

        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn directory_in_place_of_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = EconomyDb::open(dir.path());

        assert!(store.load().is_empty());
        assert!(matches!(store.try_load(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let (_dir, store) = temp_db();
        let mut db = store.load();
        db.ensure_account("alice").wallet = Amount::from(77u64);
        store.save(&db);

        let reloaded = store.load();
        assert_eq!(reloaded, db);
    }

    #[test]
    fn save_writes_two_space_pretty_json() {
        let (_dir, store) = temp_db();
        let mut db = store.load();
        db.ensure_account("alice");
        store.save(&db);

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("{\n  \"alice\": {\n    \"wallet\": \"0\""));
    }

    #[test]
    fn large_balances_survive_exactly() {
        let (_dir, store) = temp_db();
        let mut db = store.load();
        db.ensure_account("whale").wallet = Amount::parse_lossy("9007199254740993");
        store.save(&db);

        let reloaded = store.load();
        assert_eq!(
            reloaded.get("whale").unwrap().wallet.to_string(),
            "9007199254740993"
        );
    }

    #[test]
    fn save_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = EconomyDb::open(blocker.join("economy.json"));

        // Parent "directory" is a regular file; nothing can be written.
        store.save(&Database::default());
        assert!(store.try_save(&Database::default()).is_err());
    }

    #[test]
    fn update_skips_save_on_error() {
        let (_dir, store) = temp_db();
        store.modify(|db| {
            db.ensure_account("alice").wallet = Amount::from(5u64);
        });

        let result: Result<(), LedgerError> = store.update(|db| {
            db.ensure_account("alice").wallet = Amount::from(999u64);
            db.ensure_account("bob");
            Err(LedgerError::NonPositiveAmount)
        });
        assert!(result.is_err());

        let db = store.load();
        assert_eq!(db.get("alice").unwrap().wallet, Amount::from(5u64));
        assert!(!db.contains("bob"));
    }

    #[test]
    fn update_saves_on_success() {
        let (_dir, store) = temp_db();
        let out: Result<u64, LedgerError> = store.update(|db| {
            db.ensure_account("carol").bank = Amount::from(12u64);
            Ok(12)
        });
        assert_eq!(out.unwrap(), 12);
        assert_eq!(store.load().get("carol").unwrap().bank, Amount::from(12u64));
    }

    #[test]
    fn free_functions_share_the_format() {
        let (_dir, store) = temp_db();
        let mut db = Database::default();
        db.ensure_account("dave").wallet = Amount::from(3u64);
        save_economy(&db, store.path());

        let loaded = load_economy(store.path(), &AccountDefaults::default());
        assert_eq!(loaded.get("dave").unwrap().wallet, Amount::from(3u64));
        assert_eq!(store.load(), loaded);
    }

    #[test]
    fn concurrent_updates_through_one_handle_are_not_lost() {
        use std::sync::Arc;
        use std::thread;

        let (_dir, store) = temp_db();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.modify(|db| {
                            let account = db.ensure_account("shared");
                            account.wallet = &account.wallet + &Amount::from(1u64);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread should not panic");
        }

        assert_eq!(
            store.load().get("shared").unwrap().wallet,
            Amount::from(100u64)
        );
    }
}
