//! Subscription command implementations

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use subtrack_core::{classify, due_within_lead, BillingCycle, DueStatus, NewSubscription};

use super::{client, fmt_amount, truncate};
use crate::config::CliConfig;

pub async fn cmd_list(config: &CliConfig, due_soon_only: bool) -> Result<()> {
    let api = client(config)?;
    let settings = config.user_settings()?;
    let today = Utc::now().date_naive();

    let mut subs = api.list_subscriptions(&settings).await?;
    if due_soon_only {
        subs.retain(|s| due_within_lead(s, today));
    }

    if subs.is_empty() {
        if due_soon_only {
            println!("Nothing due within its reminder lead time. 🎉");
        } else {
            println!("No subscriptions yet. Add one:");
            println!("  subtrack add \"DStv Compact\" --amount 15800 --due 2024-07-01");
        }
        return Ok(());
    }

    subs.sort_by_key(|s| s.next_billing_date);

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &subs {
        let badge = match classify(sub.next_billing_date, today, sub.status) {
            DueStatus::Overdue => "⚠️ overdue",
            DueStatus::DueToday => "⏰ due today",
            DueStatus::DueTomorrow => "⏰ due tomorrow",
            DueStatus::DueSoon => "🔜 due soon",
            DueStatus::Normal => "",
        };

        println!(
            "   [{:>3}] {:24} │ {:>12}/{:<7} │ {} {} {}",
            sub.id,
            truncate(&sub.name, 24),
            fmt_amount(sub.amount, sub.currency),
            sub.billing_cycle,
            sub.next_billing_date,
            sub.status,
            badge,
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_add(
    config: &CliConfig,
    name: &str,
    amount: f64,
    category: &str,
    cycle: &str,
    due: &str,
    provider: Option<String>,
    remind_days: Option<u32>,
) -> Result<()> {
    let api = client(config)?;
    let settings = config.user_settings()?;

    let billing_cycle: BillingCycle = cycle
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid --cycle (use daily, weekly, monthly, or yearly)")?;
    let next_billing_date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .context("Invalid --due format (use YYYY-MM-DD)")?;

    let fields = NewSubscription {
        name: name.to_string(),
        service_provider: provider,
        category: category.to_string(),
        amount,
        currency: settings.display_currency,
        billing_cycle,
        next_billing_date: Some(next_billing_date),
        auto_renew: true,
        reminder_days_before: remind_days,
        is_shared: false,
        notes: None,
        cancellation_link: None,
        logo_url: None,
    };

    let sub = api.create_subscription(&fields, &settings).await?;
    println!(
        "✅ Added {} (ID: {}), {} per {} cycle, next billing {}",
        sub.name,
        sub.id,
        fmt_amount(sub.amount, sub.currency),
        sub.billing_cycle,
        sub.next_billing_date
    );
    Ok(())
}

pub async fn cmd_cancel(config: &CliConfig, id: i64) -> Result<()> {
    let api = client(config)?;
    api.cancel_subscription(id).await?;
    println!("✅ Subscription cancelled (ID: {})", id);
    println!("   Its reminder will be dropped on the next reschedule.");
    Ok(())
}

pub async fn cmd_delete(config: &CliConfig, id: i64) -> Result<()> {
    let api = client(config)?;
    api.delete_subscription(id).await?;
    println!("✅ Subscription deleted (ID: {})", id);
    Ok(())
}
