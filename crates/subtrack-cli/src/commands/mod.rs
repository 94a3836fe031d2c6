//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `subscriptions` - Subscription management (list, add, cancel, delete)
//! - `payments` - Payment commands (paid, skip, payments)
//! - `report` - Spending report and budget commands

pub mod payments;
pub mod report;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use payments::*;
pub use report::*;
pub use subscriptions::*;

use anyhow::{Context, Result};
use subtrack_core::{ApiClient, Currency};

use crate::config::CliConfig;

/// Build the API client from config + environment
pub fn client(config: &CliConfig) -> Result<ApiClient> {
    let url = config.api_url()?;
    ApiClient::new(&url, config.token()).context("Failed to build API client")
}

/// Truncate a string to a maximum length in characters, adding "..." if
/// truncated. Counts chars, not bytes, so multi-byte names never split.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with its currency symbol, e.g. "₦15,800.00"
pub fn fmt_amount(amount: f64, currency: Currency) -> String {
    // Round to cents first so e.g. 9.999 carries into the whole part
    let total_cents = (amount * 100.0).round() as i64;
    let whole = total_cents / 100;
    let cents = (total_cents % 100).abs();

    // Insert thousands separators into the whole part
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if whole < 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, currency.symbol(), grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long subscription name", 10), "a very ...");
    }

    #[test]
    fn test_truncate_multibyte_names() {
        // Must never split inside a multi-byte character
        assert_eq!(truncate("Caé long subscription name", 6), "Caé...");
        assert_eq!(truncate("Canal+ Décalé", 20), "Canal+ Décalé");
        assert_eq!(truncate("₦₦₦₦₦₦₦₦", 5), "₦₦...");
    }

    #[test]
    fn test_fmt_amount() {
        assert_eq!(fmt_amount(15800.0, Currency::Ngn), "₦15,800.00");
        assert_eq!(fmt_amount(9.99, Currency::Usd), "$9.99");
        assert_eq!(fmt_amount(1234567.5, Currency::Ngn), "₦1,234,567.50");
    }

    #[test]
    fn test_fmt_amount_carries_rounded_cents() {
        assert_eq!(fmt_amount(9.999, Currency::Usd), "$10.00");
        assert_eq!(fmt_amount(15999.999, Currency::Ngn), "₦16,000.00");
    }
}
