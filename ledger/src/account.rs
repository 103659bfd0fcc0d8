//! # Account Records
//!
//! One [`Account`] per user identifier: a liquid wallet, a protected bank,
//! a ceiling for each, and a couple of timestamps.
//!
//! Records on disk are treated as untrusted. [`Account::from_value`] turns
//! whatever JSON it is handed into a well-formed account: balances and
//! capacities go through [`to_non_negative_int`], timestamps fall back to
//! zero, and any field the ledger doesn't know about is carried along
//! untouched so collaborators can keep their own data on the record.
//!
//! The balance-moving helpers here enforce the per-account invariants
//! (`0 <= wallet <= walletCapacity`, `0 <= bank <= bankCapacity`); the
//! ledger decides which helper each operation uses.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::amount::{to_non_negative_int, Amount};
use crate::config::AccountDefaults;
use crate::error::LedgerError;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

const WALLET: &str = "wallet";
const BANK: &str = "bank";
const WALLET_CAPACITY: &str = "walletCapacity";
const BANK_CAPACITY: &str = "bankCapacity";
const SHIELD_UNTIL: &str = "shieldUntil";
const LAST_DAILY: &str = "lastDaily";
const COOLDOWNS: &str = "cooldowns";

const KNOWN_FIELDS: [&str; 7] = [
    WALLET,
    BANK,
    WALLET_CAPACITY,
    BANK_CAPACITY,
    SHIELD_UNTIL,
    LAST_DAILY,
    COOLDOWNS,
];

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A single user's economy record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Liquid, spendable balance.
    pub wallet: Amount,
    /// Protected balance.
    pub bank: Amount,
    /// Ceiling for `wallet`.
    pub wallet_capacity: Amount,
    /// Ceiling for `bank`.
    pub bank_capacity: Amount,
    /// Robbery immunity expiry (ms since epoch). Stored, not enforced.
    pub shield_until: Option<i64>,
    /// Last successful daily claim (ms since epoch), `0` for never.
    pub last_daily: i64,
    /// Reserved per-action cooldown timestamps.
    pub cooldowns: BTreeMap<String, i64>,
    /// Fields written by other components. Preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Account {
    /// A fresh account: empty balances, default ceilings, no history.
    pub fn new(defaults: &AccountDefaults) -> Self {
        Self {
            wallet: Amount::zero(),
            bank: Amount::zero(),
            wallet_capacity: defaults.wallet_capacity.clone(),
            bank_capacity: defaults.bank_capacity.clone(),
            shield_until: None,
            last_daily: 0,
            cooldowns: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Builds a normalized account from a stored JSON record.
    ///
    /// A record that isn't an object is replaced by [`Account::new`].
    /// Missing or `null` capacities take the defaults; a capacity that is
    /// present but garbage normalizes to zero like any other number.
    pub fn from_value(value: &Value, defaults: &AccountDefaults) -> Self {
        let Some(record) = value.as_object() else {
            return Self::new(defaults);
        };

        let amount = |key: &str| record.get(key).map(to_non_negative_int).unwrap_or_default();
        let capacity = |key: &str, default: &Amount| match record.get(key) {
            None | Some(Value::Null) => default.clone(),
            Some(v) => to_non_negative_int(v),
        };

        let cooldowns = match record.get(COOLDOWNS) {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| timestamp_of(v).map(|ts| (k.clone(), ts)))
                .collect(),
            _ => BTreeMap::new(),
        };

        let extra = record
            .iter()
            .filter(|(k, _)| !KNOWN_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            wallet: amount(WALLET),
            bank: amount(BANK),
            wallet_capacity: capacity(WALLET_CAPACITY, &defaults.wallet_capacity),
            bank_capacity: capacity(BANK_CAPACITY, &defaults.bank_capacity),
            shield_until: record.get(SHIELD_UNTIL).and_then(shield_of),
            last_daily: match record.get(LAST_DAILY) {
                Some(Value::Number(n)) => number_to_ms(n).unwrap_or(0),
                _ => 0,
            },
            cooldowns,
            extra,
        }
    }

    /// Plain-number projection for callers that don't care about
    /// arbitrary precision.
    pub fn view(&self) -> AccountView {
        AccountView {
            wallet: self.wallet.to_u64_saturating(),
            bank: self.bank.to_u64_saturating(),
            wallet_capacity: self.wallet_capacity.to_u64_saturating(),
            bank_capacity: self.bank_capacity.to_u64_saturating(),
            shield_until: self.shield_until,
            last_daily: self.last_daily,
            cooldowns: self.cooldowns.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Balance moves
    // -----------------------------------------------------------------------

    /// Adds to the wallet, stopping at `wallet_capacity`. Returns what was
    /// actually credited.
    ///
    /// The result never exceeds the ceiling: a wallet already above it is
    /// pulled down to it and the credit is zero.
    pub fn credit_wallet(&mut self, amount: &Amount) -> Amount {
        let target = (&self.wallet + amount).min(self.wallet_capacity.clone());
        let credited = target.checked_sub(&self.wallet).unwrap_or_default();
        self.wallet = target;
        credited
    }

    /// Adds to the wallet with no ceiling.
    pub fn credit_wallet_uncapped(&mut self, amount: &Amount) {
        self.wallet = &self.wallet + amount;
    }

    /// Takes from the wallet, refusing to go negative.
    pub fn debit_wallet(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        self.wallet = self
            .wallet
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientWallet {
                available: self.wallet.clone(),
                requested: amount.clone(),
            })?;
        Ok(())
    }

    /// Wallet to bank. Rejects rather than clamps.
    pub fn move_to_bank(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        let wallet = self
            .wallet
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientWallet {
                available: self.wallet.clone(),
                requested: amount.clone(),
            })?;
        let bank = &self.bank + amount;
        if bank > self.bank_capacity {
            return Err(LedgerError::BankCapacityExceeded {
                bank: self.bank.clone(),
                requested: amount.clone(),
                capacity: self.bank_capacity.clone(),
            });
        }
        self.wallet = wallet;
        self.bank = bank;
        Ok(())
    }

    /// Bank to wallet. Rejects rather than clamps.
    pub fn move_to_wallet(&mut self, amount: &Amount) -> Result<(), LedgerError> {
        let bank = self
            .bank
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientBank {
                available: self.bank.clone(),
                requested: amount.clone(),
            })?;
        let wallet = &self.wallet + amount;
        if wallet > self.wallet_capacity {
            return Err(LedgerError::WalletCapacityExceeded {
                wallet: self.wallet.clone(),
                requested: amount.clone(),
                capacity: self.wallet_capacity.clone(),
            });
        }
        self.bank = bank;
        self.wallet = wallet;
        Ok(())
    }

    /// Raises the bank ceiling by `extra`.
    pub fn grow_bank_capacity(&mut self, extra: &Amount) {
        self.bank_capacity = &self.bank_capacity + extra;
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// [`Account`] with balances as `u64` (saturating).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub wallet: u64,
    pub bank: u64,
    pub wallet_capacity: u64,
    pub bank_capacity: u64,
    pub shield_until: Option<i64>,
    pub last_daily: i64,
    pub cooldowns: BTreeMap<String, i64>,
}

impl AccountView {
    /// Drops the timestamps, keeps the four numbers.
    pub fn balance(&self) -> BalanceView {
        BalanceView {
            wallet: self.wallet,
            bank: self.bank,
            wallet_capacity: self.wallet_capacity,
            bank_capacity: self.bank_capacity,
        }
    }
}

/// Just the balances and ceilings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub wallet: u64,
    pub bank: u64,
    pub wallet_capacity: u64,
    pub bank_capacity: u64,
}

// ---------------------------------------------------------------------------
// Timestamp coercion
// ---------------------------------------------------------------------------

fn number_to_ms(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    n.as_f64()
        .filter(|f| f.is_finite())
        .map(|f| f.trunc() as i64)
}

/// Numbers pass, numeric strings are parsed, anything else is dropped.
fn timestamp_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => number_to_ms(n),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64),
        _ => None,
    }
}

/// Like [`timestamp_of`], but a zero parsed from a string means "no shield".
fn shield_of(value: &Value) -> Option<i64> {
    match value {
        Value::String(_) => timestamp_of(value).filter(|ts| *ts != 0),
        other => timestamp_of(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
