//! # CLI Interface
//!
//! Defines the command-line argument structure for `economy` using `clap`
//! derive. One subcommand per ledger operation, plus `dump` and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use economy_ledger::config::{DEFAULT_DB_PATH, DEFAULT_ROB_PERCENT};
use economy_ledger::Amount;

/// Economy ledger operator tool.
///
/// Runs a single ledger operation against an economy file and prints the
/// result as JSON. Useful for support work and for scripting balance fixes
/// without going through the bot.
#[derive(Parser, Debug)]
#[command(
    name = "economy",
    about = "Economy ledger operator tool",
    version,
    propagate_version = true
)]
pub struct EconomyCli {
    /// Path to the economy JSON file.
    ///
    /// Created (with parent directories) if it does not exist.
    #[arg(long, global = true, env = "ECONOMY_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Log output format: "pretty" or "json".
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: String,

    /// Create new accounts with the simplified capacity profile
    /// (1,000 bank ceiling).
    #[arg(long, global = true)]
    pub simplified: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a user's balances and ceilings.
    Balance(UserArgs),
    /// Print a user's full account, timestamps included.
    Show(UserArgs),
    /// Move funds from wallet to bank.
    Deposit(AmountArgs),
    /// Move funds from bank to wallet.
    Withdraw(AmountArgs),
    /// Take funds from a wallet.
    Deduct(AmountArgs),
    /// Add funds to a wallet, clamped to its ceiling.
    Give(AmountArgs),
    /// Move funds between two wallets.
    Transfer(TransferArgs),
    /// Raise a user's bank ceiling.
    GiveCapacity(AmountArgs),
    /// Claim the daily reward for a user.
    Daily(AmountArgs),
    /// Steal a share of one user's wallet for another.
    Rob(RobArgs),
    /// Print the whole normalized database.
    Dump,
    /// Print version information and exit.
    Version,
}

/// A single user.
#[derive(Args, Debug)]
pub struct UserArgs {
    /// User identifier.
    pub user: String,
}

/// A user and an amount.
#[derive(Args, Debug)]
pub struct AmountArgs {
    /// User identifier.
    pub user: String,

    /// Amount. Accepts integers of any size, decimals and scientific
    /// notation; negatives and anything else count as zero.
    #[arg(allow_negative_numbers = true)]
    pub amount: Amount,
}

/// Arguments for `transfer`.
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Sender.
    pub from: String,
    /// Recipient.
    pub to: String,
    /// Amount to move.
    #[arg(allow_negative_numbers = true)]
    pub amount: Amount,
}

/// Arguments for `rob`.
#[derive(Args, Debug)]
pub struct RobArgs {
    /// The robber.
    pub thief: String,
    /// The target.
    pub victim: String,
    /// Share of the victim's wallet, e.g. 0.02 for two percent.
    #[arg(long, default_value_t = DEFAULT_ROB_PERCENT)]
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        EconomyCli::command().debug_assert();
    }

    #[test]
    fn parses_transfer_with_big_amount() {
        let cli = EconomyCli::try_parse_from([
            "economy",
            "--db",
            "/tmp/e.json",
            "transfer",
            "alice",
            "bob",
            "123456789012345678901234567890",
        ])
        .unwrap();

        assert_eq!(cli.db, PathBuf::from("/tmp/e.json"));
        match cli.command {
            Commands::Transfer(args) => {
                assert_eq!(args.from, "alice");
                assert_eq!(args.to, "bob");
                assert_eq!(args.amount.to_string(), "123456789012345678901234567890");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_amounts_parse_as_zero() {
        let cli = EconomyCli::try_parse_from(["economy", "give", "alice", "-5"]).unwrap();
        match cli.command {
            Commands::Give(args) => assert!(args.amount.is_zero()),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = EconomyCli::try_parse_from(["economy", "transfer", "a", "b", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Transfer(args) if args.amount.is_zero()));
    }

    #[test]
    fn rob_percent_defaults() {
        let cli = EconomyCli::try_parse_from(["economy", "rob", "a", "b"]).unwrap();
        match cli.command {
            Commands::Rob(args) => assert_eq!(args.percent, DEFAULT_ROB_PERCENT),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            EconomyCli::try_parse_from(["economy", "give-capacity", "a", "10", "--simplified"])
                .unwrap();
        assert!(cli.simplified);
        assert!(matches!(cli.command, Commands::GiveCapacity(_)));
    }
}
