//! Business-rule failures reported by ledger operations.
//!
//! These are ordinary outcomes, not crashes: a user asking to deposit more
//! than they hold gets a [`LedgerError`] back and the store is left exactly
//! as it was. Infrastructure failures (unreadable file, bad JSON) never show
//! up here; the storage layer recovers from those on its own.

use thiserror::Error;

use crate::amount::Amount;

/// Why a ledger operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The requested amount (or capacity increase, or reward) was zero or
    /// normalized to zero.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// Wallet holds less than a deposit or deduction asked for.
    #[error("insufficient wallet funds: available {available}, requested {requested}")]
    InsufficientWallet {
        /// Current wallet balance.
        available: Amount,
        /// Amount the caller asked for.
        requested: Amount,
    },

    /// Bank holds less than a withdrawal asked for.
    #[error("insufficient bank funds: available {available}, requested {requested}")]
    InsufficientBank {
        /// Current bank balance.
        available: Amount,
        /// Amount the caller asked for.
        requested: Amount,
    },

    /// A deposit would push the bank past its ceiling.
    #[error("bank capacity exceeded: {bank} + {requested} > {capacity}")]
    BankCapacityExceeded {
        /// Current bank balance.
        bank: Amount,
        /// Amount the caller tried to deposit.
        requested: Amount,
        /// Bank ceiling.
        capacity: Amount,
    },

    /// A withdrawal would push the wallet past its ceiling.
    #[error("wallet capacity exceeded: {wallet} + {requested} > {capacity}")]
    WalletCapacityExceeded {
        /// Current wallet balance.
        wallet: Amount,
        /// Amount the caller tried to withdraw.
        requested: Amount,
        /// Wallet ceiling.
        capacity: Amount,
    },

    /// The sender of a transfer cannot cover it.
    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Sender's wallet balance.
        available: Amount,
        /// Amount the sender tried to move.
        requested: Amount,
    },

    /// Robbery target has an empty wallet.
    #[error("victim has no funds")]
    VictimHasNoFunds,

    /// The robbery share of the victim's wallet rounds down to nothing.
    #[error("amount too small to rob")]
    AmountTooSmall,

    /// Transfers and robberies need two distinct accounts.
    #[error("source and destination are the same account: {0}")]
    SameAccount(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = LedgerError::InsufficientWallet {
            available: Amount::from(5u64),
            requested: Amount::from(10u64),
        };
        assert_eq!(
            err.to_string(),
            "insufficient wallet funds: available 5, requested 10"
        );
        assert_eq!(LedgerError::VictimHasNoFunds.to_string(), "victim has no funds");
        assert_eq!(
            LedgerError::SameAccount("alice".into()).to_string(),
            "source and destination are the same account: alice"
        );
    }
}
