//! User settings
//!
//! Settings are read from the device key-value store by the app shell and
//! passed into the engine explicitly; no engine code reads global state.

use serde::{Deserialize, Serialize};

use crate::lifecycle::DEFAULT_REMINDER_DAYS;
use crate::models::Currency;

/// Per-user settings injected into the scheduler, aggregator, and the
/// API-boundary normalization
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserSettings {
    /// Currency analytics are displayed in; subscriptions in any other
    /// currency are excluded from totals
    pub display_currency: Currency,
    /// Reminder lead time applied when a subscription record does not
    /// carry its own
    pub default_reminder_days: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            display_currency: Currency::Ngn,
            default_reminder_days: DEFAULT_REMINDER_DAYS,
        }
    }
}
