//! Command line definition.

use std::path::PathBuf;

use backoffice_core::ReportKind;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "backoffice", version, about = "Back office console for the jewelry POS")]
pub struct Cli {
    /// Path to console.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Cash register to operate on; overrides `[register] default_id`.
    #[arg(long, global = true)]
    pub register: Option<i64>,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Credentials used to sign in before the command runs.
#[derive(Args, Debug, Default)]
pub struct AuthArgs {
    #[arg(long, global = true, requires = "password")]
    pub username: Option<String>,

    #[arg(long, global = true, requires = "username")]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the cash registers available to the user.
    Registers,

    /// Inspect, open or close the register session.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show the cash balance of the register.
    Balance,

    /// Stage a cash top-up and confirm it.
    TopUp {
        /// Amount in minor units of the currency (AMD has none).
        #[arg(long)]
        amount: i64,

        #[arg(long, default_value = "AMD")]
        currency: String,

        #[arg(long)]
        comment: Option<String>,

        /// Confirm without prompting.
        #[arg(long)]
        yes: bool,
    },

    /// List or search products.
    Products {
        #[arg(long)]
        query: Option<String>,
    },

    Warehouses,
    Shops,

    /// List or search customers.
    Customers {
        #[arg(long)]
        query: Option<String>,
    },

    /// Current metal rates.
    Rates,

    /// Catalyst price list.
    Catalysts {
        #[arg(long)]
        query: Option<String>,
    },

    /// Estimate what the shop offers for a catalyst.
    Estimate {
        #[arg(long, default_value_t = 0)]
        platinum_mg: i64,
        #[arg(long, default_value_t = 0)]
        palladium_mg: i64,
        #[arg(long, default_value_t = 0)]
        rhodium_mg: i64,
        #[arg(long, default_value = "AMD")]
        currency: String,
        /// Buyer margin in basis points.
        #[arg(long, default_value_t = 0)]
        margin_bps: u32,
    },

    /// Fetch a register report.
    Report {
        /// sales, stock or cash-flow
        kind: ReportKind,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },

    /// Print or write the console configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Status,
    Open,
    Close,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Write the effective configuration to console.toml.
    Save,
}
