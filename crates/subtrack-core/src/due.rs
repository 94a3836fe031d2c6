//! Due-date classification
//!
//! Classifies a subscription's next billing date relative to "today" into
//! urgency buckets. All arithmetic is calendar-day based (dates carry no
//! time component), so a subscription due "tomorrow" stays due tomorrow
//! whether it is checked at 00:05 or 23:55.
//!
//! Two independent "due soon" thresholds exist on purpose:
//! - a fixed 3-day badge used for list row urgency styling, and
//! - the per-subscription `reminder_days_before` lead used for the
//!   "due soon" filter and for reminder timing.
//!
//! A subscription 5 days out with a 7-day lead is due-soon for the filter
//! but not for the badge; both answers are correct at the same time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Subscription, SubscriptionStatus};

/// Fixed threshold for the cosmetic "due soon" badge
pub const DUE_SOON_BADGE_DAYS: i64 = 3;

/// Urgency bucket for a subscription's next billing date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    /// Billing date is in the past
    Overdue,
    DueToday,
    DueTomorrow,
    /// Within the fixed badge threshold
    DueSoon,
    /// Not urgent, or the subscription is not active
    Normal,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueToday => "due_today",
            Self::DueTomorrow => "due_tomorrow",
            Self::DueSoon => "due_soon",
            Self::Normal => "normal",
        }
    }
}

impl std::fmt::Display for DueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a billing date against today.
///
/// Only active subscriptions are classified; paused and cancelled ones are
/// always `Normal` regardless of date.
pub fn classify(
    next_billing_date: NaiveDate,
    today: NaiveDate,
    status: SubscriptionStatus,
) -> DueStatus {
    if status != SubscriptionStatus::Active {
        return DueStatus::Normal;
    }

    let days_until = (next_billing_date - today).num_days();

    match days_until {
        d if d < 0 => DueStatus::Overdue,
        0 => DueStatus::DueToday,
        1 => DueStatus::DueTomorrow,
        d if d <= DUE_SOON_BADGE_DAYS => DueStatus::DueSoon,
        _ => DueStatus::Normal,
    }
}

/// Whether a subscription's billing date has passed without being handled
pub fn is_overdue(sub: &Subscription, today: NaiveDate) -> bool {
    sub.status == SubscriptionStatus::Active && sub.next_billing_date < today
}

/// The per-subscription "due soon" filter: due within the subscription's
/// own reminder lead time. Independent of the fixed badge threshold.
pub fn due_within_lead(sub: &Subscription, today: NaiveDate) -> bool {
    if sub.status != SubscriptionStatus::Active {
        return false;
    }
    let days_until = (sub.next_billing_date - today).num_days();
    days_until >= 0 && days_until <= i64::from(sub.reminder_days_before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_classify_buckets() {
        let t = today();
        let active = SubscriptionStatus::Active;

        assert_eq!(classify(t - Duration::days(1), t, active), DueStatus::Overdue);
        assert_eq!(classify(t, t, active), DueStatus::DueToday);
        assert_eq!(classify(t + Duration::days(1), t, active), DueStatus::DueTomorrow);
        assert_eq!(classify(t + Duration::days(2), t, active), DueStatus::DueSoon);
        assert_eq!(classify(t + Duration::days(3), t, active), DueStatus::DueSoon);
        assert_eq!(classify(t + Duration::days(4), t, active), DueStatus::Normal);
        assert_eq!(classify(t + Duration::days(10), t, active), DueStatus::Normal);
    }

    #[test]
    fn test_classify_inactive_is_always_normal() {
        let t = today();
        for status in [SubscriptionStatus::Paused, SubscriptionStatus::Cancelled] {
            assert_eq!(classify(t - Duration::days(30), t, status), DueStatus::Normal);
            assert_eq!(classify(t, t, status), DueStatus::Normal);
        }
    }

    #[test]
    fn test_is_overdue_requires_active_status() {
        let t = today();
        let mut sub = crate::test_utils::subscription("Netflix", "Entertainment", 3600.0);
        sub.next_billing_date = t - Duration::days(2);

        assert!(is_overdue(&sub, t));

        sub.status = SubscriptionStatus::Cancelled;
        assert!(!is_overdue(&sub, t));
    }

    #[test]
    fn test_badge_and_lead_filter_are_independent() {
        // 5 days out with a 7-day lead: filter says due soon, badge says not
        let t = today();
        let mut sub = crate::test_utils::subscription("DStv", "TV", 3000.0);
        sub.next_billing_date = t + Duration::days(5);
        sub.reminder_days_before = 7;

        assert!(due_within_lead(&sub, t));
        assert_eq!(classify(sub.next_billing_date, t, sub.status), DueStatus::Normal);
    }

    #[test]
    fn test_due_within_lead_excludes_overdue_and_inactive() {
        let t = today();
        let mut sub = crate::test_utils::subscription("Spotify", "Entertainment", 1200.0);
        sub.reminder_days_before = 7;

        sub.next_billing_date = t - Duration::days(1);
        assert!(!due_within_lead(&sub, t));

        sub.next_billing_date = t + Duration::days(2);
        sub.status = SubscriptionStatus::Paused;
        assert!(!due_within_lead(&sub, t));
    }
}
