//! Local reminder scheduling
//!
//! Maintains one local notification trigger per active subscription, firing
//! `reminder_days_before` days ahead of the next billing date. The device
//! notification capability is injected behind `NotificationGateway`; the
//! engine never talks to a platform API directly.
//!
//! Scheduling is a global reset: every call to `schedule_all` cancels all
//! existing triggers before adding new ones, which makes repeated calls
//! idempotent by construction. An O(N) reset is fine at the scale of a
//! personal subscription list; a diffing scheduler keyed by id would be the
//! upgrade path if N ever grew past that.
//!
//! Scheduling failures are logged and swallowed. A lost reminder must never
//! block core app functionality.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Subscription, SubscriptionStatus};

/// Kind of local notification. Only payment reminders exist today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    PaymentReminder,
}

/// One scheduled local notification, tied to a subscription id.
///
/// Serializes to the device notification payload:
/// `{"subscription_id": ..., "type": "payment_reminder", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTrigger {
    pub subscription_id: i64,
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    /// Device-local calendar date the notification fires
    pub fire_date: NaiveDate,
}

/// Injected device notification capability.
///
/// Implementations may fail with `Error::NotSupported` when the platform
/// cannot schedule local notifications; the scheduler swallows that.
pub trait NotificationGateway {
    fn schedule(&mut self, trigger: ReminderTrigger) -> Result<()>;

    /// Cancel the pending trigger for one subscription, if any
    fn cancel(&mut self, subscription_id: i64) -> Result<()>;

    /// Cancel every pending trigger
    fn cancel_all(&mut self) -> Result<()>;
}

/// Derives notification triggers from the subscription list
pub struct ReminderScheduler<G: NotificationGateway> {
    gateway: G,
}

impl<G: NotificationGateway> ReminderScheduler<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn into_inner(self) -> G {
        self.gateway
    }

    /// Reset and reschedule all reminder triggers.
    ///
    /// Cancels every previously scheduled trigger first, then schedules one
    /// trigger per active subscription whose reminder date is strictly in
    /// the future. Reminder dates that have already passed are silently
    /// skipped; there is no back-fill and no immediate firing.
    ///
    /// Returns the number of triggers scheduled. Gateway failures are
    /// logged and swallowed, never propagated.
    pub fn schedule_all(&mut self, subs: &[Subscription], now: DateTime<Utc>) -> usize {
        // The cancel must complete before any new trigger is added, or
        // duplicate/orphan triggers result.
        if let Err(e) = self.gateway.cancel_all() {
            warn!("Cannot reset notification triggers, skipping reschedule: {}", e);
            return 0;
        }

        let today = now.date_naive();
        let mut scheduled = 0;

        for sub in subs {
            if sub.status != SubscriptionStatus::Active {
                continue;
            }

            let fire_date = reminder_date(sub);
            if fire_date <= today {
                debug!(
                    "Reminder date {} for '{}' already passed, skipping",
                    fire_date, sub.name
                );
                continue;
            }

            let trigger = ReminderTrigger {
                subscription_id: sub.id,
                kind: TriggerKind::PaymentReminder,
                fire_date,
            };

            match self.gateway.schedule(trigger) {
                Ok(()) => scheduled += 1,
                Err(e) => {
                    warn!("Failed to schedule reminder for '{}': {}", sub.name, e);
                }
            }
        }

        debug!("Scheduled {} reminder trigger(s)", scheduled);
        scheduled
    }

    /// Cancel the trigger for one subscription immediately (on cancel or
    /// delete), instead of waiting for the next full reschedule.
    pub fn cancel_for(&mut self, subscription_id: i64) {
        if let Err(e) = self.gateway.cancel(subscription_id) {
            warn!(
                "Failed to cancel reminder trigger for subscription {}: {}",
                subscription_id, e
            );
        }
    }
}

/// The date a subscription's reminder should fire:
/// `next_billing_date - reminder_days_before`.
pub fn reminder_date(sub: &Subscription) -> NaiveDate {
    sub.next_billing_date - Duration::days(i64::from(sub.reminder_days_before))
}
