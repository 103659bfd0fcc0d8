//! # Ledger Configuration & Constants
//!
//! Every magic number in the economy lives here. Capacities, the daily
//! cooldown window, the default robbery percentage and the default file
//! location. If you're hardcoding one of these somewhere else, move it here.
//!
//! The [`EconomyConfig`] struct carries the values that callers may want to
//! override per store (most importantly the file path, so tests can point at
//! a temporary directory).

use std::path::{Path, PathBuf};

use crate::amount::Amount;

// ---------------------------------------------------------------------------
// Capacities
// ---------------------------------------------------------------------------

/// Default wallet ceiling for a freshly created account.
pub const DEFAULT_WALLET_CAPACITY: u64 = 1_000_000;

/// Default bank ceiling for a freshly created account.
pub const DEFAULT_BANK_CAPACITY: u64 = 10_000_000;

/// Bank ceiling used by the simplified defaults profile.
pub const SIMPLIFIED_BANK_CAPACITY: u64 = 1_000;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// One minute in milliseconds.
pub const MINUTE_MS: i64 = 60 * 1000;

/// Minimum spacing between two successful daily claims.
pub const DAILY_COOLDOWN_MS: i64 = 24 * HOUR_MS;

// ---------------------------------------------------------------------------
// Robbery
// ---------------------------------------------------------------------------

/// Share of the victim's wallet taken when the caller passes no usable
/// percentage.
pub const DEFAULT_ROB_PERCENT: f64 = 0.02;

/// Upper bound on the robbery share. Never take more than the whole wallet.
pub const MAX_ROB_PERCENT: f64 = 1.0;

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Default location of the economy database, relative to the working
/// directory.
pub const DEFAULT_DB_PATH: &str = "database/economy.json";

// ---------------------------------------------------------------------------
// AccountDefaults
// ---------------------------------------------------------------------------

/// Capacities applied when an account is created, or when a stored record
/// has no capacity field at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDefaults {
    /// Wallet ceiling for new accounts.
    pub wallet_capacity: Amount,
    /// Bank ceiling for new accounts.
    pub bank_capacity: Amount,
}

impl AccountDefaults {
    /// The simplified profile: same wallet ceiling, a much smaller bank.
    pub fn simplified() -> Self {
        Self {
            wallet_capacity: Amount::from(DEFAULT_WALLET_CAPACITY),
            bank_capacity: Amount::from(SIMPLIFIED_BANK_CAPACITY),
        }
    }
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            wallet_capacity: Amount::from(DEFAULT_WALLET_CAPACITY),
            bank_capacity: Amount::from(DEFAULT_BANK_CAPACITY),
        }
    }
}

// ---------------------------------------------------------------------------
// EconomyConfig
// ---------------------------------------------------------------------------

/// Everything a store handle and a ledger need to know up front.
#[derive(Clone, Debug)]
pub struct EconomyConfig {
    /// Path of the JSON database file.
    pub path: PathBuf,
    /// Capacities for new accounts.
    pub defaults: AccountDefaults,
    /// Spacing between daily claims, in milliseconds.
    pub daily_cooldown_ms: i64,
}

impl EconomyConfig {
    /// Default configuration pointed at a specific file.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Replaces the account defaults.
    pub fn with_defaults(mut self, defaults: AccountDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replaces the daily cooldown window.
    pub fn with_daily_cooldown_ms(mut self, cooldown_ms: i64) -> Self {
        self.daily_cooldown_ms = cooldown_ms;
        self
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            defaults: AccountDefaults::default(),
            daily_cooldown_ms: DAILY_COOLDOWN_MS,
        }
    }
}

/// Renders a remaining cooldown as `"{h}h {m}m"`, rounding minutes down.
pub fn format_remaining(remaining_ms: i64) -> String {
    let remaining_ms = remaining_ms.max(0);
    let hours = remaining_ms / HOUR_MS;
    let minutes = (remaining_ms % HOUR_MS) / MINUTE_MS;
    format!("{hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacities() {
        let defaults = AccountDefaults::default();
        assert_eq!(defaults.wallet_capacity, Amount::from(1_000_000u64));
        assert_eq!(defaults.bank_capacity, Amount::from(10_000_000u64));
    }

    #[test]
    fn test_simplified_profile_shrinks_bank_only() {
        let simplified = AccountDefaults::simplified();
        assert_eq!(simplified.wallet_capacity, Amount::from(DEFAULT_WALLET_CAPACITY));
        assert_eq!(simplified.bank_capacity, Amount::from(1_000u64));
    }

    #[test]
    fn test_cooldown_is_one_day() {
        assert_eq!(DAILY_COOLDOWN_MS, 86_400_000);
    }

    #[test]
    fn test_config_builders() {
        let config = EconomyConfig::at("/tmp/x/economy.json")
            .with_defaults(AccountDefaults::simplified())
            .with_daily_cooldown_ms(1_000);
        assert_eq!(config.path, PathBuf::from("/tmp/x/economy.json"));
        assert_eq!(config.defaults, AccountDefaults::simplified());
        assert_eq!(config.daily_cooldown_ms, 1_000);
    }

    #[test]
    fn test_default_path() {
        assert_eq!(EconomyConfig::default().path, PathBuf::from(DEFAULT_DB_PATH));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(DAILY_COOLDOWN_MS), "24h 0m");
        assert_eq!(format_remaining(HOUR_MS + 30 * MINUTE_MS + 59_999), "1h 30m");
        assert_eq!(format_remaining(59_999), "0h 0m");
        assert_eq!(format_remaining(-5), "0h 0m");
    }
}
