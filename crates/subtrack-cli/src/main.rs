//! subtrack CLI - Subscription tracker terminal client
//!
//! Usage:
//!   subtrack list --due-soon          Show what needs attention
//!   subtrack add "DStv" --amount 15800 --due 2024-07-01
//!   subtrack paid 3 --method ussd     Record a payment
//!   subtrack report --period monthly  Spending by category with trend

mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List { due_soon } => commands::cmd_list(&config, due_soon).await,
        Commands::Add {
            name,
            amount,
            category,
            cycle,
            due,
            provider,
            remind_days,
        } => {
            commands::cmd_add(
                &config,
                &name,
                amount,
                &category,
                &cycle,
                &due,
                provider,
                remind_days,
            )
            .await
        }
        Commands::Cancel { id } => commands::cmd_cancel(&config, id).await,
        Commands::Delete { id } => commands::cmd_delete(&config, id).await,
        Commands::Paid { id, amount, method } => {
            commands::cmd_paid(&config, id, amount, &method).await
        }
        Commands::Skip { id, days } => commands::cmd_skip(&config, id, days).await,
        Commands::Payments { id, limit } => commands::cmd_payments(&config, id, limit).await,
        Commands::Report { period, buckets } => {
            commands::cmd_report(&config, &period, buckets).await
        }
        Commands::Budget { amount } => commands::cmd_budget(&config, amount).await,
    }
}
