//! Spending report and budget command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use subtrack_core::{Aggregator, BillingCycle, Budget, Error};

use super::{client, fmt_amount, truncate};
use crate::config::CliConfig;

pub async fn cmd_report(config: &CliConfig, period: &str, buckets: usize) -> Result<()> {
    let api = client(config)?;
    let settings = config.user_settings()?;
    let today = Utc::now().date_naive();

    let period: BillingCycle = period
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid --period (use weekly, monthly, or yearly)")?;

    // Subscription truth has no fallback; analytics degrade silently
    let subs = api.list_subscriptions(&settings).await?;
    let aggregator = Aggregator::new(&api);

    let summary = aggregator.spending(&subs, &settings, period).await;
    let categories = aggregator.categories(&subs, &settings, period).await;
    let trend = aggregator.trends(&subs, &settings, period, buckets, today).await;

    println!();
    println!("📊 Spending per {} period", period);
    println!("   ─────────────────────────────────────────────");
    println!(
        "   Total: {}{}",
        fmt_amount(summary.total_amount, summary.currency),
        if summary.estimated { " (estimated)" } else { "" }
    );

    println!();
    for cat in &categories {
        println!(
            "   {:20} {:>14}",
            truncate(&cat.category, 20),
            fmt_amount(cat.total_amount, settings.display_currency)
        );
    }

    if !trend.points.is_empty() {
        println!();
        let label = if trend.estimated { "Trend (estimated)" } else { "Trend" };
        println!("   {}:", label);
        let max = trend
            .points
            .iter()
            .map(|p| p.total_amount)
            .fold(0.0_f64, f64::max);
        for point in &trend.points {
            let width = if max > 0.0 {
                ((point.total_amount / max) * 30.0).round() as usize
            } else {
                0
            };
            println!("   {:>6} │ {}", point.label, "█".repeat(width));
        }
    }

    // Compare against the budget when one is set
    match api.get_budget().await {
        Ok(budget) if budget.currency == settings.display_currency => {
            let monthly = aggregator
                .spending(&subs, &settings, BillingCycle::Monthly)
                .await;
            println!();
            if monthly.total_amount > budget.budget {
                println!(
                    "   ⚠️ Over budget: {} of {} monthly",
                    fmt_amount(monthly.total_amount, budget.currency),
                    fmt_amount(budget.budget, budget.currency)
                );
            } else {
                println!(
                    "   Within budget: {} of {} monthly",
                    fmt_amount(monthly.total_amount, budget.currency),
                    fmt_amount(budget.budget, budget.currency)
                );
            }
        }
        Ok(_) => {}
        Err(Error::NotFound(_)) => {}
        Err(e) => tracing::debug!("Budget unavailable: {}", e),
    }

    Ok(())
}

pub async fn cmd_budget(config: &CliConfig, amount: Option<f64>) -> Result<()> {
    let api = client(config)?;
    let settings = config.user_settings()?;

    match amount {
        Some(amount) => {
            let budget = Budget {
                budget: amount,
                currency: settings.display_currency,
            };
            api.put_budget(&budget).await?;
            println!(
                "✅ Monthly budget set to {}",
                fmt_amount(budget.budget, budget.currency)
            );
        }
        None => {
            let budget = api.get_budget().await.context("No budget set yet")?;
            println!(
                "Monthly budget: {}",
                fmt_amount(budget.budget, budget.currency)
            );
        }
    }

    Ok(())
}
