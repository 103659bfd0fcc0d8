//! # Storage Module
//!
//! The whole economy lives in one JSON file. This module reads it, writes
//! it, and runs the read-modify-write cycle every ledger operation is built
//! on.
//!
//! ## Architecture
//!
//! ```text
//! database.rs: In-memory snapshot: user id -> Account, lazy account creation
//! db.rs:       EconomyDb: file handle, forgiving load, best-effort save, update()
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! economy.json ──load──> Database ──ensure_account──> Account
//!      ^                    │
//!      └───────save─────────┘
//! ```
//!
//! ## Design Decisions
//!
//! 1. **Availability over consistency.** A missing, unreadable or corrupt
//!    file loads as an empty database and a failed write is logged, not
//!    returned. The bot keeps answering.
//!
//! 2. **Whole-file rewrites.** No partial updates, no journal. Fine for the
//!    volumes a chat bot produces.
//!
//! 3. **One mutex per handle.** Threads sharing an [`EconomyDb`] never lose
//!    each other's updates. Separate processes writing the same file still
//!    can; last save wins.

pub mod database;
pub mod db;

pub use database::Database;
pub use db::{load_economy, save_economy, EconomyDb, StorageError};
