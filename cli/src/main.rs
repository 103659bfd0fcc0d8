// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Economy Operator Tool
//!
//! Entry point for the `economy` binary. Parses CLI arguments, initializes
//! logging, runs one ledger operation against the economy file and prints
//! the result as pretty JSON on stdout.
//!
//! Refused operations (not enough funds, cooldown, bad amount) exit with a
//! non-zero status and the reason on stderr.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;

use economy_ledger::{AccountDefaults, DailyOutcome, EconomyConfig, Ledger};

use cli::{Commands, EconomyCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = EconomyCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(
        "economy=info,economy_ledger=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    let mut config = EconomyConfig::at(&cli.db);
    if cli.simplified {
        config = config.with_defaults(AccountDefaults::simplified());
    }
    tracing::debug!(path = %cli.db.display(), simplified = cli.simplified, "opening economy");

    run(&Ledger::new(config), cli.command)
}

/// Dispatches one subcommand.
fn run(ledger: &Ledger, command: Commands) -> Result<()> {
    match command {
        Commands::Balance(args) => print_json(&ledger.balance(&args.user)),
        Commands::Show(args) => show_account(ledger, &args.user),
        Commands::Deposit(args) => {
            let view = ledger
                .deposit(&args.user, args.amount)
                .with_context(|| format!("deposit for {} refused", args.user))?;
            print_json(&view)
        }
        Commands::Withdraw(args) => {
            let view = ledger
                .withdraw(&args.user, args.amount)
                .with_context(|| format!("withdrawal for {} refused", args.user))?;
            print_json(&view)
        }
        Commands::Deduct(args) => {
            let view = ledger
                .deduct(&args.user, args.amount)
                .with_context(|| format!("deduction from {} refused", args.user))?;
            print_json(&view)
        }
        Commands::Give(args) => {
            let receipt = ledger
                .give(&args.user, args.amount)
                .with_context(|| format!("give to {} refused", args.user))?;
            if receipt.was_clamped() {
                tracing::info!(
                    user = %args.user,
                    requested = %receipt.requested,
                    credited = %receipt.credited,
                    "wallet ceiling reached"
                );
            }
            print_json(&receipt)
        }
        Commands::Transfer(args) => {
            let receipt = ledger
                .transfer(&args.from, &args.to, args.amount)
                .with_context(|| format!("transfer {} -> {} refused", args.from, args.to))?;
            print_json(&receipt)
        }
        Commands::GiveCapacity(args) => {
            let view = ledger
                .give_capacity(&args.user, args.amount)
                .with_context(|| format!("capacity grant for {} refused", args.user))?;
            print_json(&view)
        }
        Commands::Daily(args) => {
            let outcome = ledger
                .daily(&args.user, args.amount)
                .with_context(|| format!("daily for {} refused", args.user))?;
            if let DailyOutcome::OnCooldown { remaining, .. } = &outcome {
                bail!("daily for {} on cooldown, {} left", args.user, remaining);
            }
            print_json(&outcome)
        }
        Commands::Rob(args) => {
            let receipt = ledger
                .rob(&args.thief, &args.victim, args.percent)
                .with_context(|| format!("rob of {} by {} refused", args.victim, args.thief))?;
            print_json(&receipt)
        }
        Commands::Dump => print_json(&ledger.snapshot()),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints the exact stored record, with the two timestamps also rendered
/// as RFC 3339 for humans.
fn show_account(ledger: &Ledger, user: &str) -> Result<()> {
    // Materializes the account the same way a bot lookup would.
    ledger.account(user);

    let db = ledger.snapshot();
    let account = db
        .get(user)
        .with_context(|| format!("account {user} missing after creation"))?;

    let mut value = serde_json::to_value(account)?;
    if let Value::Object(map) = &mut value {
        map.insert("lastDailyAt".into(), rfc3339(Some(account.last_daily)));
        map.insert("shieldUntilAt".into(), rfc3339(account.shield_until));
    }
    print_json(&value)
}

/// Epoch milliseconds to an RFC 3339 string. Zero and missing map to null.
fn rfc3339(ms: Option<i64>) -> Value {
    ms.filter(|ms| *ms > 0)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map(|at| Value::String(at.to_rfc3339()))
        .unwrap_or(Value::Null)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render result")?;
    println!("{rendered}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("economy {}", env!("CARGO_PKG_VERSION"));
    println!("rustc   {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
