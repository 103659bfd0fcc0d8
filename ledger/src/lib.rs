// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Economy Ledger: Core Library
//!
//! A virtual-currency ledger for chat bots: every user gets a wallet and a
//! bank, each with a ceiling, plus a daily reward and a couple of ways to
//! move money between users. Everything lives in one JSON file.
//!
//! ## Architecture
//!
//! - **config**: Default capacities, cooldown window, file location.
//! - **amount**: Arbitrary-precision balances and lenient number parsing.
//! - **account**: The per-user record and its balance-moving rules.
//! - **storage**: The JSON file: forgiving load, best-effort save, update cycle.
//! - **clock**: Where "now" comes from, swappable in tests.
//! - **ledger**: The operations users actually trigger.
//! - **error**: Business-rule refusals.
//!
//! ## Quick Start
//!
//! ```no_run
//! use economy_ledger::Ledger;
//!
//! let ledger = Ledger::open("database/economy.json");
//! ledger.give("alice", 500u64).unwrap();
//! ledger.deposit("alice", 200u64).unwrap();
//! let balance = ledger.balance("alice");
//! assert_eq!((balance.wallet, balance.bank), (300, 200));
//! ```
//!
//! ## Design Philosophy
//!
//! 1. The bot stays up. Storage trouble is logged, never propagated.
//! 2. Income is clamped, spending is all-or-nothing.
//! 3. Balances never lose precision on disk, however large they get.

pub mod account;
pub mod amount;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;

pub use account::{Account, AccountView, BalanceView};
pub use amount::{to_non_negative_int, Amount};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AccountDefaults, EconomyConfig};
pub use error::LedgerError;
pub use ledger::{CreditReceipt, DailyOutcome, Ledger, RobReceipt, TransferReceipt};
pub use storage::{load_economy, save_economy, Database, EconomyDb, StorageError};
