//! # Ledger Operations
//!
//! The economic verbs: deposit, withdraw, deduct, give, transfer, capacity
//! grants, the daily reward and robbery. Each one is a single
//! [`EconomyDb::update`] cycle (load the file, touch one or two accounts,
//! save the file) with no state kept between calls.
//!
//! ## Clamp or Reject?
//!
//! Income (`give`, the receiving side of `transfer`, `daily`) is clamped to
//! the wallet ceiling: the excess is dropped and the receipt says how much
//! actually landed. Spending (`deposit`, `withdraw`, `deduct`, the sending
//! side of `transfer`) is all-or-nothing: if it doesn't fit, nothing moves
//! and a [`LedgerError`] explains why.
//!
//! Robbery is the one exception: the thief's wallet is not clamped.

pub mod receipt;

use std::path::Path;

use crate::account::{AccountView, BalanceView};
use crate::amount::Amount;
use crate::clock::{Clock, SystemClock};
use crate::config::{EconomyConfig, DEFAULT_ROB_PERCENT, MAX_ROB_PERCENT};
use crate::error::LedgerError;
use crate::storage::{Database, EconomyDb};

pub use receipt::{CreditReceipt, DailyOutcome, RobReceipt, TransferReceipt};

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Entry point for all economy operations on one file.
///
/// Cheap to construct; holds no cached state. The clock is a type
/// parameter so tests can control the daily cooldown.
#[derive(Debug)]
pub struct Ledger<C: Clock = SystemClock> {
    db: EconomyDb,
    clock: C,
}

impl Ledger {
    /// A ledger on the wall clock.
    pub fn new(config: EconomyConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// A ledger on `path` with default capacities.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(EconomyConfig::at(path))
    }
}

impl<C: Clock> Ledger<C> {
    /// A ledger reading time from `clock`.
    pub fn with_clock(config: EconomyConfig, clock: C) -> Self {
        Self {
            db: EconomyDb::new(config),
            clock,
        }
    }

    /// The underlying store, for bulk access.
    pub fn store(&self) -> &EconomyDb {
        &self.db
    }

    /// The time source.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Full view of a user's account. Creates (and persists) the account on
    /// first access.
    pub fn account(&self, user_id: &str) -> AccountView {
        self.db.modify(|db| db.ensure_account(user_id).view())
    }

    /// Balances and ceilings only. Creates the account on first access.
    pub fn balance(&self, user_id: &str) -> BalanceView {
        self.account(user_id).balance()
    }

    /// The whole normalized database.
    pub fn snapshot(&self) -> Database {
        self.db.load()
    }

    // -----------------------------------------------------------------------
    // Single-account operations
    // -----------------------------------------------------------------------

    /// Wallet -> bank.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`], [`LedgerError::InsufficientWallet`],
    /// [`LedgerError::BankCapacityExceeded`].
    pub fn deposit(
        &self,
        user_id: &str,
        amount: impl Into<Amount>,
    ) -> Result<AccountView, LedgerError> {
        let amount = positive(amount.into())?;
        self.db.update(|db| {
            let account = db.ensure_account(user_id);
            account.move_to_bank(&amount)?;
            tracing::debug!(user = user_id, amount = %amount, "deposit");
            Ok(account.view())
        })
    }

    /// Bank -> wallet.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`], [`LedgerError::InsufficientBank`],
    /// [`LedgerError::WalletCapacityExceeded`].
    pub fn withdraw(
        &self,
        user_id: &str,
        amount: impl Into<Amount>,
    ) -> Result<AccountView, LedgerError> {
        let amount = positive(amount.into())?;
        self.db.update(|db| {
            let account = db.ensure_account(user_id);
            account.move_to_wallet(&amount)?;
            tracing::debug!(user = user_id, amount = %amount, "withdraw");
            Ok(account.view())
        })
    }

    /// Takes straight from the wallet (bets, purchases).
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`], [`LedgerError::InsufficientWallet`].
    pub fn deduct(
        &self,
        user_id: &str,
        amount: impl Into<Amount>,
    ) -> Result<AccountView, LedgerError> {
        let amount = positive(amount.into())?;
        self.db.update(|db| {
            let account = db.ensure_account(user_id);
            account.debit_wallet(&amount)?;
            tracing::debug!(user = user_id, amount = %amount, "deduct");
            Ok(account.view())
        })
    }

    /// Adds straight to the wallet (winnings), clamped to the ceiling.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`] only. Overflow past the ceiling is
    /// reported in the receipt, not as an error.
    pub fn give(
        &self,
        user_id: &str,
        amount: impl Into<Amount>,
    ) -> Result<CreditReceipt, LedgerError> {
        let requested = positive(amount.into())?;
        self.db.update(|db| {
            let account = db.ensure_account(user_id);
            let credited = account.credit_wallet(&requested);
            tracing::debug!(
                user = user_id,
                requested = %requested,
                credited = %credited,
                "give"
            );
            Ok(CreditReceipt {
                requested,
                credited,
                account: account.view(),
            })
        })
    }

    /// Raises the bank ceiling by `extra`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`].
    pub fn give_capacity(
        &self,
        user_id: &str,
        extra: impl Into<Amount>,
    ) -> Result<AccountView, LedgerError> {
        let extra = positive(extra.into())?;
        self.db.update(|db| {
            let account = db.ensure_account(user_id);
            account.grow_bank_capacity(&extra);
            tracing::debug!(user = user_id, extra = %extra, "bank capacity raised");
            Ok(account.view())
        })
    }

    /// Pays `reward` once per cooldown window.
    ///
    /// A refused claim is not an error: it comes back as
    /// [`DailyOutcome::OnCooldown`] and the file is not written.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`] for a zero reward.
    pub fn daily(
        &self,
        user_id: &str,
        reward: impl Into<Amount>,
    ) -> Result<DailyOutcome, LedgerError> {
        let reward = positive(reward.into())?;
        let cooldown_ms = self.db.config().daily_cooldown_ms;
        let now = self.clock.now_ms();

        // Err carries the cooldown outcome so update() skips the save.
        let result = self.db.update(|db| {
            let account = db.ensure_account(user_id);
            let elapsed = now.saturating_sub(account.last_daily);
            if elapsed < cooldown_ms {
                return Err(DailyOutcome::on_cooldown(cooldown_ms - elapsed));
            }

            let credited = account.credit_wallet(&reward);
            account.last_daily = now;
            tracing::info!(user = user_id, credited = %credited, "daily reward claimed");
            Ok(DailyOutcome::Claimed {
                reward: reward.clone(),
                credited,
                account: account.view(),
            })
        });

        Ok(result.unwrap_or_else(|cooldown| cooldown))
    }

    // -----------------------------------------------------------------------
    // Two-account operations
    // -----------------------------------------------------------------------

    /// Wallet -> wallet. The recipient side is clamped to their ceiling;
    /// anything above it is lost.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NonPositiveAmount`], [`LedgerError::SameAccount`],
    /// [`LedgerError::InsufficientFunds`]. On error neither account changes.
    pub fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: impl Into<Amount>,
    ) -> Result<TransferReceipt, LedgerError> {
        let amount = positive(amount.into())?;
        if from_id == to_id {
            return Err(LedgerError::SameAccount(from_id.to_string()));
        }

        self.db.update(|db| {
            db.ensure_account(to_id);

            let from = db.ensure_account(from_id);
            from.wallet =
                from.wallet
                    .checked_sub(&amount)
                    .ok_or_else(|| LedgerError::InsufficientFunds {
                        available: from.wallet.clone(),
                        requested: amount.clone(),
                    })?;
            let from_view = from.view();

            let to = db.ensure_account(to_id);
            let credited = to.credit_wallet(&amount);

            tracing::debug!(
                from = from_id,
                to = to_id,
                amount = %amount,
                credited = %credited,
                "transfer"
            );
            Ok(TransferReceipt {
                amount,
                credited,
                from: from_view,
                to: to.view(),
            })
        })
    }

    /// Moves `floor(victim.wallet * percent)` from the victim's wallet to the
    /// thief's.
    ///
    /// A `percent` that isn't a finite positive number falls back to
    /// [`DEFAULT_ROB_PERCENT`]; anything above [`MAX_ROB_PERCENT`] is capped.
    /// The share is computed in `f64`, so very large wallets get an
    /// approximate cut. The thief's wallet ceiling is not applied.
    ///
    /// # Errors
    ///
    /// [`LedgerError::SameAccount`], [`LedgerError::VictimHasNoFunds`],
    /// [`LedgerError::AmountTooSmall`].
    pub fn rob(
        &self,
        thief_id: &str,
        victim_id: &str,
        percent: f64,
    ) -> Result<RobReceipt, LedgerError> {
        if thief_id == victim_id {
            return Err(LedgerError::SameAccount(thief_id.to_string()));
        }
        let share = rob_share(percent);

        self.db.update(|db| {
            db.ensure_account(thief_id);

            let victim = db.ensure_account(victim_id);
            if victim.wallet.is_zero() {
                return Err(LedgerError::VictimHasNoFunds);
            }

            let cut = (victim.wallet.to_f64_lossy() * share).floor();
            let stolen = Amount::from_f64_truncated(cut).min(victim.wallet.clone());
            if stolen.is_zero() {
                return Err(LedgerError::AmountTooSmall);
            }

            victim.wallet = victim.wallet.checked_sub(&stolen).unwrap_or_default();
            let victim_view = victim.view();

            let thief = db.ensure_account(thief_id);
            thief.credit_wallet_uncapped(&stolen);

            tracing::info!(
                thief = thief_id,
                victim = victim_id,
                amount = %stolen,
                "robbery"
            );
            Ok(RobReceipt {
                amount: stolen,
                thief: thief.view(),
                victim: victim_view,
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn positive(amount: Amount) -> Result<Amount, LedgerError> {
    if amount.is_zero() {
        Err(LedgerError::NonPositiveAmount)
    } else {
        Ok(amount)
    }
}

/// Effective robbery share for a caller-supplied percentage.
pub fn rob_share(percent: f64) -> f64 {
    if percent.is_finite() && percent > 0.0 {
        percent.min(MAX_ROB_PERCENT)
    } else {
        DEFAULT_ROB_PERCENT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
