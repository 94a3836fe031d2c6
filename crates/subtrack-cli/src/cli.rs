//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// subtrack - Track subscriptions, due dates, and reminders
#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Terminal client for the subtrack subscription tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to ~/.config/subtrack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List subscriptions with due-date badges
    List {
        /// Only show subscriptions due within their reminder lead time
        #[arg(long)]
        due_soon: bool,
    },

    /// Add a subscription
    Add {
        /// Subscription name (e.g., "DStv Compact")
        name: String,

        /// Amount charged per billing cycle
        #[arg(short, long)]
        amount: f64,

        /// Category (e.g., TV, Entertainment, Utilities)
        #[arg(short, long, default_value = "Other")]
        category: String,

        /// Billing cycle: daily, weekly, monthly, yearly
        #[arg(long, default_value = "monthly")]
        cycle: String,

        /// Next billing date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        /// Service provider name
        #[arg(long)]
        provider: Option<String>,

        /// Days before the billing date to be reminded
        #[arg(long)]
        remind_days: Option<u32>,
    },

    /// Cancel a subscription (terminal; idempotent)
    Cancel {
        /// Subscription id
        id: i64,
    },

    /// Delete a subscription and its pending reminder
    Delete {
        /// Subscription id
        id: i64,
    },

    /// Mark a subscription as paid
    Paid {
        /// Subscription id
        id: i64,

        /// Amount paid (defaults to the subscription amount)
        #[arg(short, long)]
        amount: Option<f64>,

        /// Payment method (manual, website, ussd, bank_transfer,
        /// mobile_app, card, bank_ussd, quickteller)
        #[arg(short, long, default_value = "manual")]
        method: String,
    },

    /// Snooze the reminder for a subscription
    Skip {
        /// Subscription id
        id: i64,

        /// Days to snooze for
        #[arg(short, long, default_value = "7")]
        days: u32,
    },

    /// Show payment history for a subscription
    Payments {
        /// Subscription id
        id: i64,

        /// Maximum number of payments to show
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Spending report by category, with trend
    Report {
        /// Period to normalize to: weekly, monthly, yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,

        /// Number of trend buckets
        #[arg(long, default_value = "6")]
        buckets: usize,
    },

    /// Show or set the monthly budget
    Budget {
        /// New budget amount (omit to show the current budget)
        amount: Option<f64>,
    },
}
