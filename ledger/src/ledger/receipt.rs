//! What successful ledger operations hand back.
//!
//! Every receipt carries the post-operation [`AccountView`] of each account
//! involved, so callers can render a reply without a second load.

use serde::Serialize;

use crate::account::AccountView;
use crate::amount::Amount;
use crate::config::format_remaining;

/// Result of a clamped credit (`give`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreditReceipt {
    /// What the caller asked to add.
    pub requested: Amount,
    /// What actually landed after the wallet ceiling was applied.
    pub credited: Amount,
    /// The account after the credit.
    pub account: AccountView,
}

impl CreditReceipt {
    /// `true` if the wallet ceiling swallowed part of the credit.
    pub fn was_clamped(&self) -> bool {
        self.credited < self.requested
    }
}

/// Result of a wallet-to-wallet transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    /// Debited from the sender.
    pub amount: Amount,
    /// Credited to the recipient (less than `amount` if they hit their
    /// ceiling).
    pub credited: Amount,
    pub from: AccountView,
    pub to: AccountView,
}

/// Result of a successful robbery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RobReceipt {
    /// Moved from victim to thief.
    pub amount: Amount,
    pub thief: AccountView,
    pub victim: AccountView,
}

/// Result of a daily claim attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DailyOutcome {
    /// Reward paid out; `lastDaily` moved to now.
    Claimed {
        /// Configured reward.
        reward: Amount,
        /// What landed after the wallet ceiling.
        credited: Amount,
        account: AccountView,
    },
    /// Too early. Nothing was granted or written.
    OnCooldown {
        /// Milliseconds until the next claim is allowed.
        remaining_ms: i64,
        /// `remaining_ms` rendered as `"{h}h {m}m"`.
        remaining: String,
    },
}

impl DailyOutcome {
    pub(crate) fn on_cooldown(remaining_ms: i64) -> Self {
        Self::OnCooldown {
            remaining_ms,
            remaining: format_remaining(remaining_ms),
        }
    }

    /// `true` if the claim was refused because of the cooldown.
    pub fn is_on_cooldown(&self) -> bool {
        matches!(self, Self::OnCooldown { .. })
    }

    /// The `"{h}h {m}m"` label while on cooldown.
    pub fn remaining_label(&self) -> Option<&str> {
        match self {
            Self::OnCooldown { remaining, .. } => Some(remaining),
            Self::Claimed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use crate::config::{AccountDefaults, HOUR_MS, MINUTE_MS};

    #[test]
    fn clamped_credit_is_detected() {
        let account = Account::new(&AccountDefaults::default()).view();
        let receipt = CreditReceipt {
            requested: Amount::from(10u64),
            credited: Amount::from(4u64),
            account: account.clone(),
        };
        assert!(receipt.was_clamped());

        let full = CreditReceipt {
            requested: Amount::from(10u64),
            credited: Amount::from(10u64),
            account,
        };
        assert!(!full.was_clamped());
    }

    #[test]
    fn cooldown_label() {
        let outcome = DailyOutcome::on_cooldown(5 * HOUR_MS + 7 * MINUTE_MS + 1);
        assert!(outcome.is_on_cooldown());
        assert_eq!(outcome.remaining_label(), Some("5h 7m"));
    }

    #[test]
    fn daily_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(DailyOutcome::on_cooldown(HOUR_MS)).unwrap();
        assert_eq!(value["status"], "on_cooldown");
        assert_eq!(value["remaining"], "1h 0m");
    }
}
