//! Payment command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use subtrack_core::{next_charge_date, NewPayment, PaymentMethod};

use super::{client, fmt_amount};
use crate::config::CliConfig;

pub async fn cmd_paid(
    config: &CliConfig,
    id: i64,
    amount: Option<f64>,
    method: &str,
) -> Result<()> {
    let api = client(config)?;
    let settings = config.user_settings()?;

    let method: PaymentMethod = method
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("Invalid --method")?;

    // Look the subscription up first so we can default the amount and
    // suggest the rollover date afterwards
    let subs = api.list_subscriptions(&settings).await?;
    let sub = subs
        .iter()
        .find(|s| s.id == id)
        .with_context(|| format!("Subscription not found: {}", id))?;

    let now = Utc::now();
    let payment = NewPayment {
        amount: amount.unwrap_or(sub.amount),
        currency: sub.currency,
        method,
        paid_at: now,
        receipt_url: None,
    };

    api.mark_paid(id, &payment).await?;

    println!(
        "✅ Recorded {} payment for {} ({})",
        fmt_amount(payment.amount, payment.currency),
        sub.name,
        method
    );

    // Paying never advances the billing date; suggest the rollover so the
    // user can apply it explicitly
    let suggested = next_charge_date(sub.next_billing_date, sub.billing_cycle, now.date_naive());
    if sub.next_billing_date <= now.date_naive() {
        println!(
            "   Billing date {} has passed. Suggested next date: {}",
            sub.next_billing_date, suggested
        );
        println!("   Apply it with the edit screen or your backend of choice.");
    }

    Ok(())
}

pub async fn cmd_skip(config: &CliConfig, id: i64, days: u32) -> Result<()> {
    let api = client(config)?;
    api.skip_reminder(id, days).await?;
    println!("✅ Reminder snoozed for {} day(s) (ID: {})", days, id);
    Ok(())
}

pub async fn cmd_payments(config: &CliConfig, id: i64, limit: u32) -> Result<()> {
    let api = client(config)?;
    let payments = api.payment_history(id, limit, 0).await?;

    if payments.is_empty() {
        println!("No payments recorded for subscription {}.", id);
        return Ok(());
    }

    println!();
    println!("💳 Payments for subscription {}", id);
    println!("   ─────────────────────────────────────────────");
    for p in &payments {
        println!(
            "   {} │ {:>12} │ {}",
            p.paid_at.format("%Y-%m-%d"),
            fmt_amount(p.amount, p.currency),
            p.method
        );
    }

    Ok(())
}
