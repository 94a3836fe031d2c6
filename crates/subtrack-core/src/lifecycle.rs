//! Subscription lifecycle operations
//!
//! `SubscriptionBook` is the engine-side working copy of the user's
//! subscription list (the backend remains the source of truth; the book is
//! rebuilt from a fresh fetch per invocation). It owns status transitions
//! and payment bookkeeping:
//!
//! - created subscriptions start `active`
//! - `cancel` is terminal and idempotent
//! - `mark_as_paid` appends a payment and updates the counters but never
//!   advances `next_billing_date`; rolling the date forward is an explicit
//!   user edit (see `next_charge_date` for the suggested rollover)

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    NewPayment, NewSubscription, Payment, Subscription, SubscriptionStatus, SubscriptionUpdate,
};

/// Window within which a repeated mark-as-paid for the same subscription
/// is rejected as a duplicate instead of being recorded twice
pub const DUPLICATE_PAYMENT_WINDOW_SECS: i64 = 30;

/// Default reminder lead time when a new subscription does not specify one
pub const DEFAULT_REMINDER_DAYS: u32 = 3;

/// In-memory subscription list with lifecycle operations
#[derive(Debug, Default)]
pub struct SubscriptionBook {
    subs: HashMap<i64, Subscription>,
    payments: Vec<Payment>,
    next_sub_id: i64,
    next_payment_id: i64,
    /// Last mark-as-paid time per subscription, for duplicate detection
    last_marked: HashMap<i64, DateTime<Utc>>,
}

impl SubscriptionBook {
    pub fn new() -> Self {
        Self {
            next_sub_id: 1,
            next_payment_id: 1,
            ..Default::default()
        }
    }

    /// Build a book from a freshly fetched subscription list
    pub fn from_subscriptions(subs: Vec<Subscription>) -> Self {
        let next_sub_id = subs.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Self {
            subs: subs.into_iter().map(|s| (s.id, s)).collect(),
            payments: Vec::new(),
            next_sub_id,
            next_payment_id: 1,
            last_marked: HashMap::new(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Subscription> {
        self.subs.get(&id)
    }

    /// All subscriptions, ordered by next billing date
    pub fn list(&self) -> Vec<&Subscription> {
        let mut subs: Vec<&Subscription> = self.subs.values().collect();
        subs.sort_by_key(|s| (s.next_billing_date, s.id));
        subs
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Create a subscription. Status always starts `active`.
    pub fn create(&mut self, fields: NewSubscription, now: DateTime<Utc>) -> Result<&Subscription> {
        if fields.amount < 0.0 {
            return Err(Error::Validation(format!(
                "Amount must not be negative (got {})",
                fields.amount
            )));
        }
        let next_billing_date = fields.next_billing_date.ok_or_else(|| {
            Error::Validation(format!("Missing next billing date for '{}'", fields.name))
        })?;

        let id = self.next_sub_id;
        self.next_sub_id += 1;

        let sub = Subscription {
            id,
            name: fields.name,
            service_provider: fields.service_provider,
            category: fields.category,
            amount: fields.amount,
            currency: fields.currency,
            billing_cycle: fields.billing_cycle,
            next_billing_date,
            last_payment_date: None,
            status: SubscriptionStatus::Active,
            auto_renew: fields.auto_renew,
            reminder_days_before: fields.reminder_days_before.unwrap_or(DEFAULT_REMINDER_DAYS),
            is_shared: fields.is_shared,
            notes: fields.notes,
            cancellation_link: fields.cancellation_link,
            logo_url: fields.logo_url,
            payment_count: 0,
            total_payments: 0.0,
            skipped_at: None,
            next_reminder_date: None,
            created_at: now,
            updated_at: now,
        };

        Ok(self.subs.entry(id).or_insert(sub))
    }

    /// Apply a partial update. Fields left `None` are unchanged.
    pub fn update(
        &mut self,
        id: i64,
        fields: SubscriptionUpdate,
        now: DateTime<Utc>,
    ) -> Result<&Subscription> {
        if let Some(amount) = fields.amount {
            if amount < 0.0 {
                return Err(Error::Validation(format!(
                    "Amount must not be negative (got {})",
                    amount
                )));
            }
        }

        let sub = self
            .subs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))?;

        // Cancelled is terminal; a status update may not leave it
        if let Some(status) = fields.status {
            if sub.status == SubscriptionStatus::Cancelled
                && status != SubscriptionStatus::Cancelled
            {
                return Err(Error::Validation(format!(
                    "Subscription {} is cancelled and cannot be reactivated",
                    id
                )));
            }
        }

        if let Some(name) = fields.name {
            sub.name = name;
        }
        if let Some(provider) = fields.service_provider {
            sub.service_provider = Some(provider);
        }
        if let Some(category) = fields.category {
            sub.category = category;
        }
        if let Some(amount) = fields.amount {
            sub.amount = amount;
        }
        if let Some(currency) = fields.currency {
            sub.currency = currency;
        }
        if let Some(cycle) = fields.billing_cycle {
            sub.billing_cycle = cycle;
        }
        if let Some(date) = fields.next_billing_date {
            sub.next_billing_date = date;
        }
        if let Some(date) = fields.last_payment_date {
            sub.last_payment_date = Some(date);
        }
        if let Some(status) = fields.status {
            sub.status = status;
        }
        if let Some(auto_renew) = fields.auto_renew {
            sub.auto_renew = auto_renew;
        }
        if let Some(days) = fields.reminder_days_before {
            sub.reminder_days_before = days;
        }
        if let Some(is_shared) = fields.is_shared {
            sub.is_shared = is_shared;
        }
        if let Some(notes) = fields.notes {
            sub.notes = Some(notes);
        }
        if let Some(link) = fields.cancellation_link {
            sub.cancellation_link = Some(link);
        }
        if let Some(url) = fields.logo_url {
            sub.logo_url = Some(url);
        }
        sub.updated_at = now;

        Ok(sub)
    }

    /// Cancel a subscription. Cancelling an already-cancelled subscription
    /// is a no-op, not an error.
    pub fn cancel(&mut self, id: i64, now: DateTime<Utc>) -> Result<()> {
        let sub = self
            .subs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))?;

        if sub.status == SubscriptionStatus::Cancelled {
            debug!("Subscription {} already cancelled, ignoring", id);
            return Ok(());
        }

        sub.status = SubscriptionStatus::Cancelled;
        sub.updated_at = now;
        Ok(())
    }

    /// Remove a subscription regardless of status.
    ///
    /// Returns the removed record so the caller can also drop its pending
    /// reminder trigger (see `ReminderScheduler::cancel_for`).
    pub fn delete(&mut self, id: i64) -> Option<Subscription> {
        self.last_marked.remove(&id);
        self.subs.remove(&id)
    }

    /// Record a payment against an active subscription.
    ///
    /// Increments `payment_count` by exactly 1 and `total_payments` by
    /// exactly the paid amount. `next_billing_date` is deliberately left
    /// untouched. A repeat call for the same subscription within
    /// `DUPLICATE_PAYMENT_WINDOW_SECS` is rejected as a duplicate.
    pub fn mark_as_paid(
        &mut self,
        id: i64,
        payment: NewPayment,
        now: DateTime<Utc>,
    ) -> Result<&Payment> {
        let sub = match self.subs.get_mut(&id) {
            Some(sub) if sub.status == SubscriptionStatus::Active => sub,
            Some(_) => {
                return Err(Error::NotFound(format!(
                    "No active subscription with id {}",
                    id
                )))
            }
            None => return Err(Error::NotFound(format!("Subscription {}", id))),
        };

        if let Some(last) = self.last_marked.get(&id) {
            if (now - *last) < Duration::seconds(DUPLICATE_PAYMENT_WINDOW_SECS) {
                return Err(Error::DuplicatePayment(format!(
                    "Subscription {} was marked paid {}s ago",
                    id,
                    (now - *last).num_seconds()
                )));
            }
        }

        sub.payment_count += 1;
        sub.total_payments += payment.amount;
        sub.last_payment_date = Some(payment.paid_at.date_naive());
        sub.updated_at = now;
        self.last_marked.insert(id, now);

        let record = Payment {
            id: self.next_payment_id,
            subscription_id: id,
            amount: payment.amount,
            currency: payment.currency,
            method: payment.method,
            paid_at: payment.paid_at,
            receipt_url: payment.receipt_url,
        };
        self.next_payment_id += 1;
        self.payments.push(record);

        Ok(self.payments.last().unwrap())
    }

    /// Snooze the reminder for a subscription by `skip_days`.
    ///
    /// Only touches the reminder markers; status and billing date are
    /// unchanged.
    pub fn skip_reminder(&mut self, id: i64, skip_days: u32, now: DateTime<Utc>) -> Result<()> {
        let sub = self
            .subs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Subscription {}", id)))?;

        sub.skipped_at = Some(now);
        sub.next_reminder_date = Some(now.date_naive() + Duration::days(i64::from(skip_days)));
        sub.updated_at = now;
        Ok(())
    }

    /// Payments recorded in this book for a subscription, oldest first
    pub fn payments_for(&self, id: i64) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| p.subscription_id == id)
            .collect()
    }
}

/// Expected next charge date for a subscription, advanced by whole billing
/// cycles until it is strictly in the future.
///
/// Used to suggest the manual rollover after a payment; the engine never
/// applies this automatically.
pub fn next_charge_date(from: NaiveDate, cycle: crate::models::BillingCycle, today: NaiveDate) -> NaiveDate {
    let interval = Duration::days(cycle.interval_days());

    let mut next = from + interval;
    while next <= today {
        next += interval;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingCycle, Currency, PaymentMethod};
    use crate::test_utils::{new_payment, new_subscription};

    fn now() -> DateTime<Utc> {
        "2024-06-15T09:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_create_defaults_to_active_with_default_lead() {
        let mut book = SubscriptionBook::new();
        let sub = book.create(new_subscription("Netflix", 3600.0), now()).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.reminder_days_before, DEFAULT_REMINDER_DAYS);
        assert_eq!(sub.payment_count, 0);
        assert_eq!(sub.total_payments, 0.0);
    }

    #[test]
    fn test_create_rejects_negative_amount() {
        let mut book = SubscriptionBook::new();
        let err = book
            .create(new_subscription("Bad", -1.0), now())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_create_rejects_missing_billing_date() {
        let mut book = SubscriptionBook::new();
        let mut fields = new_subscription("No date", 500.0);
        fields.next_billing_date = None;
        let err = book.create(fields, now()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_cancel_is_idempotent_and_terminal() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("DStv", 15800.0), now()).unwrap().id;

        book.cancel(id, now()).unwrap();
        assert_eq!(book.get(id).unwrap().status, SubscriptionStatus::Cancelled);

        // Second cancel is a no-op
        book.cancel(id, now()).unwrap();
        assert_eq!(book.get(id).unwrap().status, SubscriptionStatus::Cancelled);

        // Unknown id is an error
        assert!(matches!(book.cancel(999, now()), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_update_cannot_reactivate_cancelled() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("DStv", 15800.0), now()).unwrap().id;
        book.cancel(id, now()).unwrap();

        let err = book
            .update(
                id,
                SubscriptionUpdate {
                    status: Some(SubscriptionStatus::Active),
                    ..Default::default()
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(book.get(id).unwrap().status, SubscriptionStatus::Cancelled);

        // Restating cancelled is fine, and other fields stay editable
        let sub = book
            .update(
                id,
                SubscriptionUpdate {
                    status: Some(SubscriptionStatus::Cancelled),
                    notes: Some("ended June".to_string()),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.notes.as_deref(), Some("ended June"));
    }

    #[test]
    fn test_mark_as_paid_bookkeeping() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("Spotify", 1200.0), now()).unwrap().id;
        let billing_date = book.get(id).unwrap().next_billing_date;

        let payment = book
            .mark_as_paid(id, new_payment(1200.0), now())
            .unwrap()
            .clone();
        assert_eq!(payment.subscription_id, id);
        assert_eq!(payment.method, PaymentMethod::Card);

        let sub = book.get(id).unwrap();
        assert_eq!(sub.payment_count, 1);
        assert_eq!(sub.total_payments, 1200.0);
        assert_eq!(sub.last_payment_date, Some(payment.paid_at.date_naive()));
        // The billing date is never advanced by a payment
        assert_eq!(sub.next_billing_date, billing_date);
    }

    #[test]
    fn test_mark_as_paid_rejects_rapid_duplicate() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("Netflix", 3600.0), now()).unwrap().id;

        book.mark_as_paid(id, new_payment(3600.0), now()).unwrap();
        let err = book
            .mark_as_paid(id, new_payment(3600.0), now() + Duration::seconds(5))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicatePayment(_)));

        // Outside the window the payment is accepted again
        let later = now() + Duration::seconds(DUPLICATE_PAYMENT_WINDOW_SECS + 1);
        book.mark_as_paid(id, new_payment(3600.0), later).unwrap();
        assert_eq!(book.get(id).unwrap().payment_count, 2);
        assert_eq!(book.get(id).unwrap().total_payments, 7200.0);
    }

    #[test]
    fn test_mark_as_paid_requires_active_subscription() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("Netflix", 3600.0), now()).unwrap().id;
        book.cancel(id, now()).unwrap();

        let err = book.mark_as_paid(id, new_payment(3600.0), now()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(matches!(
            book.mark_as_paid(42, new_payment(1.0), now()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_skip_reminder_only_touches_reminder_markers() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("Showmax", 2900.0), now()).unwrap().id;
        let before = book.get(id).unwrap().clone();

        book.skip_reminder(id, 7, now()).unwrap();

        let sub = book.get(id).unwrap();
        assert_eq!(sub.skipped_at, Some(now()));
        assert_eq!(
            sub.next_reminder_date,
            Some(now().date_naive() + Duration::days(7))
        );
        assert_eq!(sub.status, before.status);
        assert_eq!(sub.next_billing_date, before.next_billing_date);
    }

    #[test]
    fn test_delete_removes_regardless_of_status() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("Apple Music", 1100.0), now()).unwrap().id;
        book.cancel(id, now()).unwrap();

        let removed = book.delete(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(book.get(id).is_none());
        assert!(book.delete(id).is_none());
    }

    #[test]
    fn test_update_is_partial() {
        let mut book = SubscriptionBook::new();
        let id = book.create(new_subscription("GOtv", 4150.0), now()).unwrap().id;

        let update = SubscriptionUpdate {
            amount: Some(4700.0),
            billing_cycle: Some(BillingCycle::Monthly),
            ..Default::default()
        };
        let sub = book.update(id, update, now()).unwrap();
        assert_eq!(sub.amount, 4700.0);
        assert_eq!(sub.name, "GOtv");
        assert_eq!(sub.currency, Currency::Ngn);

        let err = book
            .update(
                id,
                SubscriptionUpdate {
                    amount: Some(-5.0),
                    ..Default::default()
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_next_charge_date_advances_past_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let stale = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let next = next_charge_date(stale, BillingCycle::Monthly, today);
        assert!(next > today);
        // 30-day steps from Mar 1: Mar 31, Apr 30, May 30, Jun 29
        assert_eq!(next, NaiveDate::from_ymd_opt(2024, 6, 29).unwrap());

        let weekly = next_charge_date(today, BillingCycle::Weekly, today);
        assert_eq!(weekly, today + Duration::days(7));
    }
}
