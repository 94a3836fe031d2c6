//! Spending analytics
//!
//! Groups and sums subscriptions by category and period. The primary
//! source is the backend analytics API; on any failure (network error,
//! 404, timeout) the same output shape is recomputed locally from the
//! current subscription list — lower fidelity, but the screen still
//! renders. Locally computed trend data is extrapolated from current
//! state, not real payment history, and is flagged `estimated`.
//!
//! Subscriptions in a currency other than the display currency are
//! excluded from totals rather than converted; there is no FX policy.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::api::ApiClient;
use crate::cycle::period_equivalent;
use crate::models::{BillingCycle, Currency, Subscription, SubscriptionStatus};
use crate::settings::UserSettings;

/// Smoothing multipliers for estimated trend buckets. Spreads the current
/// total across buckets with slight variation so the chart reads as a
/// trend rather than a flat line.
const TREND_SMOOTHING: [f64; 8] = [0.95, 1.02, 0.97, 1.05, 0.99, 1.03, 0.96, 1.04];

/// Per-category spending total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: f64,
}

/// Total spend for a period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub period: BillingCycle,
    pub currency: Currency,
    pub total_amount: f64,
    /// True when computed locally from current state rather than real
    /// payment history
    #[serde(default)]
    pub estimated: bool,
}

/// One bucket in a spending trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub total_amount: f64,
}

/// Spending over time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSeries {
    pub period: BillingCycle,
    pub points: Vec<TrendPoint>,
    /// True when the series is a smoothed extrapolation of the current
    /// total, not authoritative history
    #[serde(default)]
    pub estimated: bool,
}

/// Active subscriptions in the display currency, as period equivalents
fn countable<'a>(
    subs: &'a [Subscription],
    display_currency: Currency,
) -> impl Iterator<Item = &'a Subscription> {
    subs.iter().filter(move |s| {
        if s.status != SubscriptionStatus::Active {
            return false;
        }
        if s.currency != display_currency {
            debug!(
                "Excluding '{}' from totals: currency {} != display currency {}",
                s.name, s.currency, display_currency
            );
            return false;
        }
        true
    })
}

/// Total period-equivalent spend across the current subscription list
pub fn spending_total(
    subs: &[Subscription],
    period: BillingCycle,
    display_currency: Currency,
) -> f64 {
    countable(subs, display_currency)
        .map(|s| period_equivalent(s.amount, s.billing_cycle, period))
        .sum()
}

/// Sum period-equivalent spend per category, largest first.
///
/// An empty subscription list produces an empty result, never an error.
pub fn group_by_category(
    subs: &[Subscription],
    period: BillingCycle,
    display_currency: Currency,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for sub in countable(subs, display_currency) {
        *totals.entry(sub.category.as_str()).or_insert(0.0) +=
            period_equivalent(sub.amount, sub.billing_cycle, period);
    }

    let mut result: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_amount)| CategoryTotal {
            category: category.to_string(),
            total_amount,
        })
        .collect();
    result.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

/// Build an estimated trend series from the current subscription list.
///
/// Without real payment history, the current total is distributed across
/// `bucket_count` buckets (oldest first) using fixed smoothing
/// multipliers. The result is always flagged `estimated`.
pub fn trend_series(
    subs: &[Subscription],
    period: BillingCycle,
    bucket_count: usize,
    display_currency: Currency,
    today: NaiveDate,
) -> TrendSeries {
    let total = spending_total(subs, period, display_currency);

    let points = (0..bucket_count)
        .map(|i| {
            let back = bucket_count - 1 - i;
            TrendPoint {
                label: bucket_label(period, today, back),
                total_amount: total * TREND_SMOOTHING[i % TREND_SMOOTHING.len()],
            }
        })
        .collect();

    TrendSeries {
        period,
        points,
        estimated: true,
    }
}

/// Human label for the bucket `back` periods before today
fn bucket_label(period: BillingCycle, today: NaiveDate, back: usize) -> String {
    match period {
        BillingCycle::Daily => (today - Duration::days(back as i64))
            .format("%d %b")
            .to_string(),
        BillingCycle::Weekly => {
            let date = today - Duration::weeks(back as i64);
            format!("Wk {}", date.iso_week().week())
        }
        BillingCycle::Monthly => months_back(today, back as u32).format("%b").to_string(),
        BillingCycle::Yearly => (today.year() - back as i32).to_string(),
    }
}

/// First day of the month `back` months before `date`
fn months_back(date: NaiveDate, back: u32) -> NaiveDate {
    let months = date.year() * 12 + date.month0() as i32 - back as i32;
    let year = months.div_euclid(12);
    let month0 = months.rem_euclid(12) as u32;
    // Day 1 of a valid year/month pair always exists
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap()
}

/// Remote-first analytics with silent local fallback.
///
/// Built without a client it computes locally only, which is also the
/// degraded mode when every remote call fails.
pub struct Aggregator<'a> {
    client: Option<&'a ApiClient>,
}

impl<'a> Aggregator<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// Local-only aggregator (no backend analytics endpoint available)
    pub fn local() -> Self {
        Self { client: None }
    }

    /// Total spend for the period, remote first.
    pub async fn spending(
        &self,
        subs: &[Subscription],
        settings: &UserSettings,
        period: BillingCycle,
    ) -> SpendingSummary {
        if let Some(client) = self.client {
            match client.analytics_spending(period, settings.display_currency).await {
                Ok(summary) => return summary,
                Err(e) => debug!("Remote spending aggregate unavailable, recomputing locally: {}", e),
            }
        }
        SpendingSummary {
            period,
            currency: settings.display_currency,
            total_amount: spending_total(subs, period, settings.display_currency),
            estimated: true,
        }
    }

    /// Per-category totals for the period, remote first.
    pub async fn categories(
        &self,
        subs: &[Subscription],
        settings: &UserSettings,
        period: BillingCycle,
    ) -> Vec<CategoryTotal> {
        if let Some(client) = self.client {
            match client.analytics_categories(period, settings.display_currency).await {
                Ok(totals) => return totals,
                Err(e) => debug!("Remote category aggregate unavailable, recomputing locally: {}", e),
            }
        }
        group_by_category(subs, period, settings.display_currency)
    }

    /// Spending trend for the period, remote first.
    pub async fn trends(
        &self,
        subs: &[Subscription],
        settings: &UserSettings,
        period: BillingCycle,
        bucket_count: usize,
        today: NaiveDate,
    ) -> TrendSeries {
        if let Some(client) = self.client {
            match client.analytics_trends(period, settings.display_currency).await {
                Ok(series) => return series,
                Err(e) => debug!("Remote trend aggregate unavailable, recomputing locally: {}", e),
            }
        }
        trend_series(subs, period, bucket_count, settings.display_currency, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::subscription;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_group_by_category_sums_per_category() {
        let tv = subscription("DStv", "TV", 15800.0);
        let mut ent = subscription("Showmax", "Entertainment", 3600.0);
        ent.id = 2;
        let subs = vec![tv, ent];

        let totals = group_by_category(&subs, BillingCycle::Monthly, Currency::Ngn);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "TV".to_string(),
                    total_amount: 15800.0
                },
                CategoryTotal {
                    category: "Entertainment".to_string(),
                    total_amount: 3600.0
                },
            ]
        );
        let sum: f64 = totals.iter().map(|t| t.total_amount).sum();
        assert_eq!(sum, 19400.0);
    }

    #[test]
    fn test_group_by_category_excludes_other_currencies() {
        let ngn = subscription("DStv", "TV", 15800.0);
        let mut usd = subscription("Netflix", "TV", 9.99);
        usd.id = 2;
        usd.currency = Currency::Usd;

        let totals = group_by_category(&[ngn, usd], BillingCycle::Monthly, Currency::Ngn);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_amount, 15800.0);
    }

    #[test]
    fn test_group_by_category_excludes_inactive() {
        let mut cancelled = subscription("Old", "TV", 9999.0);
        cancelled.status = SubscriptionStatus::Cancelled;
        let mut active = subscription("DStv", "TV", 15800.0);
        active.id = 2;

        let totals = group_by_category(&[cancelled, active], BillingCycle::Monthly, Currency::Ngn);
        assert_eq!(totals, vec![CategoryTotal {
            category: "TV".to_string(),
            total_amount: 15800.0
        }]);
    }

    #[test]
    fn test_group_by_category_converts_cycles() {
        let mut yearly = subscription("Domain", "Utilities", 12000.0);
        yearly.billing_cycle = BillingCycle::Yearly;

        let totals = group_by_category(&[yearly], BillingCycle::Monthly, Currency::Ngn);
        assert_eq!(totals[0].total_amount, 1000.0);
    }

    #[test]
    fn test_empty_list_yields_empty_results_not_errors() {
        assert!(group_by_category(&[], BillingCycle::Monthly, Currency::Ngn).is_empty());
        assert_eq!(spending_total(&[], BillingCycle::Monthly, Currency::Ngn), 0.0);

        let series = trend_series(&[], BillingCycle::Monthly, 6, Currency::Ngn, today());
        assert_eq!(series.points.len(), 6);
        assert!(series.points.iter().all(|p| p.total_amount == 0.0));
        assert!(series.estimated);
    }

    #[test]
    fn test_trend_series_is_flagged_estimated() {
        let subs = vec![subscription("DStv", "TV", 15800.0)];
        let series = trend_series(&subs, BillingCycle::Monthly, 6, Currency::Ngn, today());

        assert!(series.estimated);
        assert_eq!(series.points.len(), 6);
        // Oldest bucket first: Jan..Jun for a June 15 today
        assert_eq!(series.points[0].label, "Jan");
        assert_eq!(series.points[5].label, "Jun");
        // Every bucket is a smoothed variation of the current total
        for point in &series.points {
            assert!(point.total_amount > 14000.0 && point.total_amount < 17000.0);
        }
    }

    #[test]
    fn test_months_back_crosses_year_boundary() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        assert_eq!(months_back(jan, 2), NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
    }

    #[tokio::test]
    async fn test_local_aggregator_spending_is_estimated() {
        let subs = vec![subscription("DStv", "TV", 15800.0)];
        let settings = UserSettings::default();

        let summary = Aggregator::local()
            .spending(&subs, &settings, BillingCycle::Monthly)
            .await;
        assert_eq!(summary.total_amount, 15800.0);
        assert!(summary.estimated);
    }
}
