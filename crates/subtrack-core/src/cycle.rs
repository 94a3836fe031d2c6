//! Billing cycle normalization
//!
//! Converts a subscription's per-cycle amount into its equivalent in another
//! recurrence unit, using the same fixed constants everywhere so that
//! "₦3,000/year ≈ ₦250/month" is computed identically on every screen.

use crate::models::BillingCycle;

/// Average weeks per month
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Days per month used for daily-cycle conversion
pub const DAYS_PER_MONTH: f64 = 30.0;
/// Months per year
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// Weeks per year
pub const WEEKS_PER_YEAR: f64 = 52.0;
/// Days per year
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Monthly equivalent of a per-cycle amount.
///
/// Monthly input is returned unchanged (exactly, no float round trip).
pub fn monthly_equivalent(amount: f64, cycle: BillingCycle) -> f64 {
    match cycle {
        BillingCycle::Daily => amount * DAYS_PER_MONTH,
        BillingCycle::Weekly => amount * WEEKS_PER_MONTH,
        BillingCycle::Monthly => amount,
        BillingCycle::Yearly => amount / MONTHS_PER_YEAR,
    }
}

/// Re-express a per-cycle amount in a target recurrence unit.
///
/// Each conversion pair has one authoritative constant, applied
/// symmetrically in both directions; converting a cycle to itself returns
/// the amount exactly. Daily-to-weekly has no constant of its own and is
/// routed through the monthly pair.
pub fn period_equivalent(amount: f64, cycle: BillingCycle, target: BillingCycle) -> f64 {
    use BillingCycle::*;

    if cycle == target {
        return amount;
    }

    match (cycle, target) {
        (Weekly, Monthly) => amount * WEEKS_PER_MONTH,
        (Monthly, Weekly) => amount / WEEKS_PER_MONTH,
        (Monthly, Yearly) => amount * MONTHS_PER_YEAR,
        (Yearly, Monthly) => amount / MONTHS_PER_YEAR,
        (Weekly, Yearly) => amount * WEEKS_PER_YEAR,
        (Yearly, Weekly) => amount / WEEKS_PER_YEAR,
        (Daily, Monthly) => amount * DAYS_PER_MONTH,
        (Monthly, Daily) => amount / DAYS_PER_MONTH,
        (Daily, Yearly) => amount * DAYS_PER_YEAR,
        (Yearly, Daily) => amount / DAYS_PER_YEAR,
        (Daily, Weekly) => amount * DAYS_PER_MONTH / WEEKS_PER_MONTH,
        (Weekly, Daily) => amount * WEEKS_PER_MONTH / DAYS_PER_MONTH,
        // Same-cycle pairs are handled by the early return
        _ => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CYCLES: [BillingCycle; 4] = [
        BillingCycle::Daily,
        BillingCycle::Weekly,
        BillingCycle::Monthly,
        BillingCycle::Yearly,
    ];

    #[test]
    fn test_monthly_equivalent_is_identity_for_monthly() {
        for amount in [0.0, 0.01, 15800.0, 3600.55] {
            assert_eq!(monthly_equivalent(amount, BillingCycle::Monthly), amount);
        }
    }

    #[test]
    fn test_monthly_equivalent_known_values() {
        assert_eq!(monthly_equivalent(1200.0, BillingCycle::Yearly), 100.0);
        assert_eq!(monthly_equivalent(100.0, BillingCycle::Weekly), 433.0);
        assert_eq!(monthly_equivalent(50.0, BillingCycle::Daily), 1500.0);
    }

    #[test]
    fn test_monthly_equivalent_never_negative_for_nonnegative_amounts() {
        for cycle in ALL_CYCLES {
            for amount in [0.0, 1.0, 2999.99, 1_000_000.0] {
                assert!(monthly_equivalent(amount, cycle) >= 0.0);
            }
        }
    }

    #[test]
    fn test_period_equivalent_round_trip_identity() {
        for cycle in ALL_CYCLES {
            assert_eq!(period_equivalent(3000.0, cycle, cycle), 3000.0);
        }
    }

    #[test]
    fn test_period_equivalent_symmetric_constants() {
        // monthly -> weekly divides by the same 4.33 weekly -> monthly multiplies by
        assert_eq!(
            period_equivalent(433.0, BillingCycle::Monthly, BillingCycle::Weekly),
            100.0
        );
        assert_eq!(
            period_equivalent(100.0, BillingCycle::Weekly, BillingCycle::Monthly),
            433.0
        );
        // yearly pairs use 52 weeks and 365 days directly, not the monthly route
        assert_eq!(
            period_equivalent(52.0, BillingCycle::Weekly, BillingCycle::Yearly),
            2704.0
        );
        assert_eq!(
            period_equivalent(365.0, BillingCycle::Yearly, BillingCycle::Daily),
            1.0
        );
    }

    #[test]
    fn test_period_equivalent_matches_monthly_equivalent() {
        for cycle in ALL_CYCLES {
            assert_eq!(
                period_equivalent(250.0, cycle, BillingCycle::Monthly),
                monthly_equivalent(250.0, cycle)
            );
        }
    }
}
