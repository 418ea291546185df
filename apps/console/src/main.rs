//! # Back Office Console
//!
//! Command line front end for the back office.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Install tracing (RUST_LOG, default info,backoffice=debug)           │
//! │  2. Load console.toml + BACKOFFICE_* overrides                          │
//! │  3. Build ReqwestBoundary (base URL, timeout) and the Controller        │
//! │  4. Sign in when --username/--password are given                        │
//! │  5. Select the register (--register, else [register] default_id)       │
//! │  6. Run the command, print the affected slice as JSON                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use backoffice_client::services::auth::Credentials;
use backoffice_client::{ClientConfig, Controller, ReqwestBoundary, RunOutcome};
use backoffice_core::{CashRegisterId, CurrencyCode, MetalContent, Money, ReportPeriod};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, ConfigAction, SessionAction};

type ConsoleController = Controller<ReqwestBoundary>;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = ClientConfig::load(cli.config.clone()).context("Failed to load console config")?;
    debug!(api = %config.api.base_url, settlement = %config.store.settlement, "configuration loaded");

    if let Command::Config { action } = &cli.command {
        return run_config(*action, &config, &cli);
    }

    let boundary = ReqwestBoundary::new(&config.api.base_url, config.api.timeout())?;
    let controller = Controller::new(Arc::new(boundary), config.store.settlement);

    if let (Some(username), Some(password)) = (&cli.auth.username, &cli.auth.password) {
        let user = controller
            .login(&Credentials {
                username: username.clone(),
                password: password.clone(),
            })
            .await?;
        info!(user = %user.username, "signed in");
    }

    let register = match cli.register {
        Some(raw) => Some(CashRegisterId::new(raw)?),
        None => config.default_register()?,
    };
    if let Some(register) = register {
        controller.switch_register(register)?;
    }

    run_command(&controller, cli.command).await
}

/// Installs the `tracing` subscriber. `RUST_LOG` wins over the default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,backoffice=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// Commands
// =============================================================================

async fn run_command(controller: &ConsoleController, command: Command) -> Result<()> {
    match command {
        Command::Registers => {
            finish(controller.load_cash_registers().await?)?;
            print_json(&controller.store().with_store(|s| s.cash_registers().data().cloned()))
        }

        Command::Session { action } => {
            let outcome = match action {
                SessionAction::Status => controller.refresh_session().await?,
                SessionAction::Open => controller.open_session().await?,
                SessionAction::Close => controller.close_session().await?,
            };
            finish(outcome)?;
            print_json(&controller.store().with_store(|s| s.session().details().cloned()))
        }

        Command::Balance => {
            finish(controller.refresh_balance().await?)?;
            print_json(&controller.store().with_store(|s| s.cash_balance().data().cloned()))
        }

        Command::TopUp {
            amount,
            currency,
            comment,
            yes,
        } => top_up(controller, Money::from_minor(amount), &currency, comment.as_deref(), yes).await,

        Command::Products { query } => {
            finish(controller.load_products(query.as_deref()).await?)?;
            print_json(&controller.store().with_store(|s| s.products().data().cloned()))
        }

        Command::Warehouses => {
            finish(controller.load_warehouses().await?)?;
            print_json(&controller.store().with_store(|s| s.warehouses().data().cloned()))
        }

        Command::Shops => {
            finish(controller.load_shops().await?)?;
            print_json(&controller.store().with_store(|s| s.shops().data().cloned()))
        }

        Command::Customers { query } => {
            finish(controller.load_customers(query.as_deref()).await?)?;
            print_json(&controller.store().with_store(|s| s.customers().data().cloned()))
        }

        Command::Rates => {
            finish(controller.load_metal_rates().await?)?;
            print_json(&controller.store().with_store(|s| s.metal_rates().data().cloned()))
        }

        Command::Catalysts { query } => {
            finish(controller.load_catalyst_prices(query.as_deref()).await?)?;
            print_json(&controller.store().with_store(|s| s.catalyst_prices().data().cloned()))
        }

        Command::Estimate {
            platinum_mg,
            palladium_mg,
            rhodium_mg,
            currency,
            margin_bps,
        } => {
            let currency = CurrencyCode::parse(&currency)?;
            finish(controller.load_metal_rates().await?)?;
            let content = MetalContent {
                platinum_mg,
                palladium_mg,
                rhodium_mg,
            };
            let offer = controller.estimate_catalyst(&content, &currency, margin_bps)?;
            println!("{}", offer.format(&currency));
            Ok(())
        }

        Command::Report { kind, from, to } => {
            let period = ReportPeriod::new(from, to)?;
            finish(controller.load_report(kind, period).await?)?;
            print_json(&controller.store().with_store(|s| s.report().data().cloned()))
        }

        Command::Config { .. } => Ok(()),
    }
}

/// Stages the top-up, asks for confirmation unless `yes`, then commits.
async fn top_up(
    controller: &ConsoleController,
    amount: Money,
    currency: &str,
    comment: Option<&str>,
    yes: bool,
) -> Result<()> {
    controller.stage_top_up(amount, currency, comment)?;

    let summary = controller.store().with_store(|s| {
        s.top_up()
            .pending()
            .map(|p| p.amount().format(p.currency_code()))
    });
    let Some(summary) = summary else {
        bail!("Nothing staged");
    };

    if !yes && !confirm(&format!("Top up register with {}?", summary))? {
        controller.cancel_top_up()?;
        println!("Cancelled");
        return Ok(());
    }

    let transaction = controller.confirm_top_up().await?;
    controller.acknowledge_top_up()?;
    print_json(&transaction)
}

fn run_config(action: ConfigAction, config: &ClientConfig, cli: &Cli) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
        ConfigAction::Save => {
            config.save(cli.config.clone())?;
            println!("Configuration saved");
            Ok(())
        }
    }
}

// =============================================================================
// Output helpers
// =============================================================================

/// Turns a slice failure into the command's error.
fn finish(outcome: RunOutcome) -> Result<()> {
    match outcome.error {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
