//! subtrack Core Library
//!
//! The billing and reminder engine behind the subtrack subscription
//! tracker:
//! - Billing cycle normalization (per-period cost equivalents)
//! - Due-date classification into urgency buckets
//! - Subscription lifecycle state machine and payment bookkeeping
//! - Local reminder scheduling over an injected notification gateway
//! - Spending analytics with remote-first, local-fallback aggregation
//! - Backend API client with one normalization point for legacy payloads

pub mod analytics;
pub mod api;
pub mod cycle;
pub mod due;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod reminders;
pub mod settings;

/// Test utilities including the in-memory notification gateway
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use analytics::{
    group_by_category, spending_total, trend_series, Aggregator, CategoryTotal, SpendingSummary,
    TrendPoint, TrendSeries,
};
pub use api::{ApiClient, RawSubscription};
pub use cycle::{monthly_equivalent, period_equivalent};
pub use due::{classify, due_within_lead, is_overdue, DueStatus, DUE_SOON_BADGE_DAYS};
pub use error::{Error, Result};
pub use lifecycle::{next_charge_date, SubscriptionBook, DUPLICATE_PAYMENT_WINDOW_SECS};
pub use models::{
    BillingCycle, Budget, Currency, NewPayment, NewSubscription, Payment, PaymentMethod,
    Subscription, SubscriptionStatus, SubscriptionUpdate,
};
pub use reminders::{
    reminder_date, NotificationGateway, ReminderScheduler, ReminderTrigger, TriggerKind,
};
pub use settings::UserSettings;
