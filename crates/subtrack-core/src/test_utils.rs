//! Test utilities
//!
//! Builders for domain records and an in-memory notification gateway,
//! available to unit tests and (via the `test-utils` feature) to
//! integration tests.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::models::{
    BillingCycle, Currency, NewPayment, NewSubscription, PaymentMethod, Subscription,
    SubscriptionStatus,
};
use crate::reminders::{NotificationGateway, ReminderTrigger};

fn fixed_now() -> DateTime<Utc> {
    "2024-06-01T00:00:00Z".parse().unwrap()
}

/// An active monthly NGN subscription with sensible defaults
pub fn subscription(name: &str, category: &str, amount: f64) -> Subscription {
    Subscription {
        id: 1,
        name: name.to_string(),
        service_provider: None,
        category: category.to_string(),
        amount,
        currency: Currency::Ngn,
        billing_cycle: BillingCycle::Monthly,
        next_billing_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        last_payment_date: None,
        status: SubscriptionStatus::Active,
        auto_renew: true,
        reminder_days_before: 3,
        is_shared: false,
        notes: None,
        cancellation_link: None,
        logo_url: None,
        payment_count: 0,
        total_payments: 0.0,
        skipped_at: None,
        next_reminder_date: None,
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

/// Creation fields for a monthly NGN subscription
pub fn new_subscription(name: &str, amount: f64) -> NewSubscription {
    NewSubscription {
        name: name.to_string(),
        service_provider: None,
        category: "Entertainment".to_string(),
        amount,
        currency: Currency::Ngn,
        billing_cycle: BillingCycle::Monthly,
        next_billing_date: Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
        auto_renew: true,
        reminder_days_before: None,
        is_shared: false,
        notes: None,
        cancellation_link: None,
        logo_url: None,
    }
}

/// A card payment of `amount` NGN, paid mid-June 2024
pub fn new_payment(amount: f64) -> NewPayment {
    NewPayment {
        amount,
        currency: Currency::Ngn,
        method: PaymentMethod::Card,
        paid_at: "2024-06-15T09:00:00Z".parse().unwrap(),
        receipt_url: None,
    }
}

/// In-memory notification gateway that records triggers.
///
/// `unsupported()` simulates a platform without local notifications; every
/// call fails with `NotSupported` so tests can assert the scheduler
/// swallows it.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    triggers: Vec<ReminderTrigger>,
    supported: bool,
    /// Number of cancel_all calls observed, for ordering assertions
    pub resets: usize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            triggers: Vec::new(),
            supported: true,
            resets: 0,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            triggers: Vec::new(),
            supported: false,
            resets: 0,
        }
    }

    /// Currently scheduled triggers, in scheduling order
    pub fn pending(&self) -> &[ReminderTrigger] {
        &self.triggers
    }
}

impl NotificationGateway for MemoryGateway {
    fn schedule(&mut self, trigger: ReminderTrigger) -> Result<()> {
        if !self.supported {
            return Err(Error::NotSupported(
                "local notifications unavailable".to_string(),
            ));
        }
        self.triggers.push(trigger);
        Ok(())
    }

    fn cancel(&mut self, subscription_id: i64) -> Result<()> {
        if !self.supported {
            return Err(Error::NotSupported(
                "local notifications unavailable".to_string(),
            ));
        }
        self.triggers.retain(|t| t.subscription_id != subscription_id);
        Ok(())
    }

    fn cancel_all(&mut self) -> Result<()> {
        if !self.supported {
            return Err(Error::NotSupported(
                "local notifications unavailable".to_string(),
            ));
        }
        self.resets += 1;
        self.triggers.clear();
        Ok(())
    }
}
