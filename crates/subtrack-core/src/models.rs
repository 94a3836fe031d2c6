//! Domain models for subtrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Supported display/billing currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Ngn,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ngn => "NGN",
            Self::Usd => "USD",
        }
    }

    /// Symbol used when rendering amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ngn => "₦",
            Self::Usd => "$",
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NGN" => Ok(Self::Ngn),
            "USD" => Ok(Self::Usd),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription billing cycle (recurrence unit of the charge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Whole-day length of one cycle, used for advancing billing dates
    pub fn interval_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }

    /// Parse a cycle string from a legacy payload.
    ///
    /// Unrecognized values fall back to monthly rather than erroring, so a
    /// malformed record still normalizes and still sums into monthly totals.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Monthly)
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" | "annually" => Ok(Self::Yearly),
            _ => Err(format!("Unknown billing cycle: {}", s)),
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription status
///
/// `Cancelled` is terminal in this engine: no transition back to active
/// is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method used when marking a subscription as paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Marked paid by hand, no channel recorded
    Manual,
    /// Paid on the provider's website
    Website,
    /// USSD short code
    Ussd,
    /// Direct bank transfer
    BankTransfer,
    /// Provider's mobile app
    MobileApp,
    /// Card charge
    Card,
    /// Bank USSD channel
    BankUssd,
    /// Quickteller
    Quickteller,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Website => "website",
            Self::Ussd => "ussd",
            Self::BankTransfer => "bank_transfer",
            Self::MobileApp => "mobile_app",
            Self::Card => "card",
            Self::BankUssd => "bank_ussd",
            Self::Quickteller => "quickteller",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "website" => Ok(Self::Website),
            "ussd" => Ok(Self::Ussd),
            "bank_transfer" => Ok(Self::BankTransfer),
            "mobile_app" => Ok(Self::MobileApp),
            "card" => Ok(Self::Card),
            "bank_ussd" => Ok(Self::BankUssd),
            "quickteller" => Ok(Self::Quickteller),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tracked subscription
///
/// The canonical record produced by normalizing whatever legacy shape the
/// backend sends (see `api::RawSubscription`). All engine operations work
/// on this type only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub name: String,
    pub service_provider: Option<String>,
    pub category: String,
    /// Charge per billing cycle, always >= 0
    pub amount: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    /// Next date the provider will charge (calendar date, no time component)
    pub next_billing_date: NaiveDate,
    pub last_payment_date: Option<NaiveDate>,
    pub status: SubscriptionStatus,
    pub auto_renew: bool,
    /// Days ahead of next_billing_date a reminder should fire
    pub reminder_days_before: u32,
    pub is_shared: bool,
    pub notes: Option<String>,
    pub cancellation_link: Option<String>,
    pub logo_url: Option<String>,
    /// Number of payments recorded against this subscription
    pub payment_count: u32,
    /// Lifetime sum of recorded payments
    pub total_payments: f64,
    /// Set when the user snoozed the reminder for this subscription
    pub skipped_at: Option<DateTime<Utc>>,
    pub next_reminder_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a subscription (before the backend assigns an id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubscription {
    pub name: String,
    pub service_provider: Option<String>,
    pub category: String,
    pub amount: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: Option<NaiveDate>,
    #[serde(default)]
    pub auto_renew: bool,
    /// Defaults to 3 when omitted
    pub reminder_days_before: Option<u32>,
    #[serde(default)]
    pub is_shared: bool,
    pub notes: Option<String>,
    pub cancellation_link: Option<String>,
    pub logo_url: Option<String>,
}

/// Partial update for a subscription; None fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub service_provider: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
    pub billing_cycle: Option<BillingCycle>,
    pub next_billing_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub status: Option<SubscriptionStatus>,
    pub auto_renew: Option<bool>,
    pub reminder_days_before: Option<u32>,
    pub is_shared: Option<bool>,
    pub notes: Option<String>,
    pub cancellation_link: Option<String>,
    pub logo_url: Option<String>,
}

/// A recorded payment against a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub subscription_id: i64,
    pub amount: f64,
    pub currency: Currency,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
    pub receipt_url: Option<String>,
}

/// A payment to record (before an id is assigned)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub amount: f64,
    pub currency: Currency,
    pub method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
    pub receipt_url: Option<String>,
}

/// Single per-user monthly budget, compared against aggregated spend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub budget: f64,
    pub currency: Currency,
}
