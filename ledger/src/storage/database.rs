//! In-memory snapshot of the economy file.
//!
//! A [`Database`] is a flat map from user identifier to [`Account`]. Every
//! record is normalized as it is loaded, and records that don't exist yet
//! are created on first access by [`Database::ensure_account`].

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::account::Account;
use crate::config::AccountDefaults;

/// All accounts, keyed by user id.
///
/// Serializes as a plain JSON object. Keys come out sorted so that diffs
/// of the file stay readable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Database {
    accounts: BTreeMap<String, Account>,
    defaults: AccountDefaults,
}

impl Database {
    /// An empty database that will create accounts with `defaults`.
    pub fn new(defaults: AccountDefaults) -> Self {
        Self {
            accounts: BTreeMap::new(),
            defaults,
        }
    }

    /// Normalizes every record of a parsed JSON object.
    pub fn from_map(map: &Map<String, Value>, defaults: AccountDefaults) -> Self {
        let accounts = map
            .iter()
            .map(|(user_id, record)| (user_id.clone(), Account::from_value(record, &defaults)))
            .collect();
        Self { accounts, defaults }
    }

    /// Returns the account for `user_id`, creating a default one first if
    /// the user has never been seen.
    pub fn ensure_account(&mut self, user_id: &str) -> &mut Account {
        let defaults = &self.defaults;
        self.accounts
            .entry(user_id.to_string())
            .or_insert_with(|| Account::new(defaults))
    }

    /// Read-only lookup. Does not create anything.
    pub fn get(&self, user_id: &str) -> Option<&Account> {
        self.accounts.get(user_id)
    }

    /// Returns `true` if `user_id` has a record.
    pub fn contains(&self, user_id: &str) -> bool {
        self.accounts.contains_key(user_id)
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if there are no accounts at all.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterates accounts in user-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Account)> {
        self.accounts.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Database {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.accounts.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use serde_json::json;

    #[test]
    fn ensure_account_creates_once() {
        let mut db = Database::default();
        assert!(db.is_empty());

        db.ensure_account("alice").wallet = Amount::from(10u64);
        assert_eq!(db.len(), 1);

        // Second access returns the same record, not a fresh one.
        assert_eq!(db.ensure_account("alice").wallet, Amount::from(10u64));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn get_does_not_create() {
        let db = Database::default();
        assert!(db.get("ghost").is_none());
        assert!(!db.contains("ghost"));
    }

    #[test]
    fn new_accounts_use_database_defaults() {
        let mut db = Database::new(AccountDefaults::simplified());
        assert_eq!(db.ensure_account("bob").bank_capacity, Amount::from(1_000u64));
    }

    #[test]
    fn from_map_normalizes_every_record() {
        let raw = json!({
            "alice": { "wallet": "5", "bank": 3 },
            "bob": "not a record"
        });
        let db = Database::from_map(raw.as_object().unwrap(), AccountDefaults::default());

        assert_eq!(db.len(), 2);
        assert_eq!(db.get("alice").unwrap().wallet, Amount::from(5u64));
        assert_eq!(db.get("alice").unwrap().bank, Amount::from(3u64));
        assert!(db.get("bob").unwrap().wallet.is_zero());
    }

    #[test]
    fn serializes_as_plain_object_sorted_by_key() {
        let mut db = Database::default();
        db.ensure_account("zed");
        db.ensure_account("amy");

        let value = serde_json::to_value(&db).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["amy".to_string(), "zed".to_string()]);
        assert_eq!(value["amy"]["wallet"], json!("0"));
    }

    #[test]
    fn iter_visits_all_accounts() {
        let mut db = Database::default();
        db.ensure_account("a");
        db.ensure_account("b");
        let ids: Vec<_> = db.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
