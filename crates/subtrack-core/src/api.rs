//! Backend API client
//!
//! HTTP client for the subscription backend. All responses pass through a
//! single normalization point (`RawSubscription::normalize`) that converts
//! the several legacy payload shapes still in the wild (camelCase fields,
//! amounts as strings, wrapped lists) into the one canonical
//! `Subscription` record the engine operates on.
//!
//! Transport failures and timeouts surface as `Error::Network`; requests
//! are never retried automatically and are bounded by a client-side
//! timeout.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analytics::{CategoryTotal, SpendingSummary, TrendSeries};
use crate::error::{Error, Result};
use crate::models::{
    BillingCycle, Budget, Currency, NewPayment, NewSubscription, Payment, Subscription,
    SubscriptionStatus, SubscriptionUpdate,
};
use crate::settings::UserSettings;

/// Client-side timeout applied to every request
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Authenticated client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create from environment variables (`SUBTRACK_API_URL`,
    /// `SUBTRACK_API_TOKEN`)
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SUBTRACK_API_URL").ok()?;
        let token = std::env::var("SUBTRACK_API_TOKEN").ok();
        Self::new(&base_url, token).ok()
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    // ========== Subscriptions ==========

    /// Fetch the subscription list.
    ///
    /// There is no local substitute for subscription truth, so failures
    /// here are hard errors. Individual records that fail normalization
    /// are logged and skipped rather than poisoning the whole list.
    pub async fn list_subscriptions(&self, settings: &UserSettings) -> Result<Vec<Subscription>> {
        let resp = self
            .request(Method::GET, "/subscriptions")
            .send()
            .await
            .map_err(transport)?;
        let payload: ListPayload = check(resp).await?.json().await.map_err(transport)?;

        let raw = payload.into_vec();
        let mut subs = Vec::with_capacity(raw.len());
        for record in raw {
            match record.normalize(settings) {
                Ok(sub) => subs.push(sub),
                Err(e) => warn!("Skipping malformed subscription record: {}", e),
            }
        }
        debug!("Fetched {} subscription(s)", subs.len());
        Ok(subs)
    }

    pub async fn create_subscription(
        &self,
        fields: &NewSubscription,
        settings: &UserSettings,
    ) -> Result<Subscription> {
        let resp = self
            .request(Method::POST, "/subscriptions")
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        let raw: RawSubscription = check(resp).await?.json().await.map_err(transport)?;
        raw.normalize(settings)
    }

    pub async fn update_subscription(
        &self,
        id: i64,
        fields: &SubscriptionUpdate,
        settings: &UserSettings,
    ) -> Result<Subscription> {
        let resp = self
            .request(Method::PUT, &format!("/subscriptions/{}", id))
            .json(fields)
            .send()
            .await
            .map_err(transport)?;
        let raw: RawSubscription = check(resp).await?.json().await.map_err(transport)?;
        raw.normalize(settings)
    }

    pub async fn delete_subscription(&self, id: i64) -> Result<()> {
        let resp = self
            .request(Method::DELETE, &format!("/subscriptions/{}", id))
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    pub async fn cancel_subscription(&self, id: i64) -> Result<()> {
        let resp = self
            .request(Method::PUT, &format!("/subscriptions/{}/cancel", id))
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    // ========== Payments ==========

    pub async fn mark_paid(&self, id: i64, payment: &NewPayment) -> Result<()> {
        let body = MarkPaidRequest {
            payment_method: payment.method.as_str(),
            payment_date: payment.paid_at.date_naive(),
            amount: payment.amount,
            currency: payment.currency,
        };
        let resp = self
            .request(Method::PUT, &format!("/payments/subscriptions/{}/mark-paid", id))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    pub async fn skip_reminder(&self, id: i64, skip_days: u32) -> Result<()> {
        let body = SkipRequest {
            skip_duration: skip_days,
        };
        let resp = self
            .request(Method::PUT, &format!("/payments/subscriptions/{}/skip", id))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }

    pub async fn payment_history(
        &self,
        id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Payment>> {
        let resp = self
            .request(
                Method::GET,
                &format!(
                    "/payments/subscriptions/{}/payments?limit={}&offset={}",
                    id, limit, offset
                ),
            )
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    // ========== Analytics (optional; callers fall back locally) ==========

    pub async fn analytics_spending(
        &self,
        period: BillingCycle,
        currency: Currency,
    ) -> Result<SpendingSummary> {
        let resp = self
            .request(
                Method::GET,
                &format!("/analytics/spending?period={}&currency={}", period, currency),
            )
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    pub async fn analytics_categories(
        &self,
        period: BillingCycle,
        currency: Currency,
    ) -> Result<Vec<CategoryTotal>> {
        let resp = self
            .request(
                Method::GET,
                &format!("/analytics/categories?period={}&currency={}", period, currency),
            )
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    pub async fn analytics_trends(
        &self,
        period: BillingCycle,
        currency: Currency,
    ) -> Result<TrendSeries> {
        let resp = self
            .request(
                Method::GET,
                &format!("/analytics/trends?period={}&currency={}", period, currency),
            )
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    // ========== Budget ==========

    pub async fn get_budget(&self) -> Result<Budget> {
        let resp = self
            .request(Method::GET, "/budget")
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?.json().await.map_err(transport)
    }

    pub async fn put_budget(&self, budget: &Budget) -> Result<()> {
        let resp = self
            .request(Method::PUT, "/budget")
            .json(budget)
            .send()
            .await
            .map_err(transport)?;
        check(resp).await?;
        Ok(())
    }
}

/// Map a transport-level failure; timeouts and connection errors become
/// `Network`, everything else keeps its reqwest detail.
fn transport(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() {
        Error::Network(err.to_string())
    } else {
        Error::Http(err)
    }
}

/// Map non-success statuses onto the engine error taxonomy
async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let mut message = resp.text().await.unwrap_or_default();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("request failed").to_string();
    }

    match status {
        StatusCode::NOT_FOUND => Err(Error::NotFound(message)),
        StatusCode::CONFLICT => Err(Error::DuplicatePayment(message)),
        s if s.is_client_error() => Err(Error::Validation(message)),
        s => Err(Error::Server {
            status: s.as_u16(),
            message,
        }),
    }
}

/// Body for `PUT /payments/subscriptions/:id/mark-paid`
#[derive(Debug, Serialize)]
struct MarkPaidRequest<'a> {
    payment_method: &'a str,
    payment_date: NaiveDate,
    amount: f64,
    currency: Currency,
}

/// Body for `PUT /payments/subscriptions/:id/skip`
#[derive(Debug, Serialize)]
struct SkipRequest {
    skip_duration: u32,
}

/// The subscription list arrives bare from the current backend and wrapped
/// from the two legacy ones
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListPayload {
    Bare(Vec<RawSubscription>),
    Data { data: Vec<RawSubscription> },
    Subscriptions { subscriptions: Vec<RawSubscription> },
}

impl ListPayload {
    fn into_vec(self) -> Vec<RawSubscription> {
        match self {
            Self::Bare(v) => v,
            Self::Data { data } => data,
            Self::Subscriptions { subscriptions } => subscriptions,
        }
    }
}

/// An amount that legacy payloads sometimes send as a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl Default for RawAmount {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl RawAmount {
    fn value(&self) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .replace(',', "")
                .parse()
                .map_err(|_| Error::Validation(format!("Unparseable amount: '{}'", s))),
        }
    }
}

/// A subscription as it arrives over the wire, before normalization.
///
/// Field aliases absorb the camelCase spellings of the legacy payloads so
/// every consumer downstream of this point sees exactly one shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSubscription {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(alias = "serviceProvider", alias = "provider", default)]
    pub service_provider: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "price", default)]
    pub amount: RawAmount,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(alias = "billingCycle", alias = "cycle", default)]
    pub billing_cycle: Option<String>,
    #[serde(alias = "nextBillingDate", alias = "renewal_date", default)]
    pub next_billing_date: Option<NaiveDate>,
    #[serde(alias = "lastPaymentDate", default)]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "autoRenew", default)]
    pub auto_renew: Option<bool>,
    #[serde(alias = "reminderDaysBefore", default)]
    pub reminder_days_before: Option<u32>,
    #[serde(alias = "isShared", default)]
    pub is_shared: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "cancellationLink", default)]
    pub cancellation_link: Option<String>,
    #[serde(alias = "logo", alias = "logoUrl", default)]
    pub logo_url: Option<String>,
    #[serde(alias = "paymentCount", default)]
    pub payment_count: Option<u32>,
    #[serde(alias = "totalPayments", default)]
    pub total_payments: Option<RawAmount>,
    #[serde(alias = "skippedAt", default)]
    pub skipped_at: Option<DateTime<Utc>>,
    #[serde(alias = "nextReminderDate", default)]
    pub next_reminder_date: Option<NaiveDate>,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(alias = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawSubscription {
    /// Produce the canonical record.
    ///
    /// Unrecognized billing cycles fall back to monthly (never an error);
    /// a missing billing date or unparseable/negative amount rejects the
    /// record with a validation error.
    pub fn normalize(self, settings: &UserSettings) -> Result<Subscription> {
        let id = self
            .id
            .ok_or_else(|| Error::Validation(format!("Record '{}' has no id", self.name)))?;

        let amount = self.amount.value()?;
        if amount < 0.0 {
            return Err(Error::Validation(format!(
                "Negative amount {} for '{}'",
                amount, self.name
            )));
        }

        let next_billing_date = self.next_billing_date.ok_or_else(|| {
            Error::Validation(format!("Record '{}' has no next billing date", self.name))
        })?;

        let currency = match self.currency.as_deref() {
            Some(s) => s
                .parse()
                .map_err(|e: String| Error::Validation(e))?,
            None => settings.display_currency,
        };

        let billing_cycle = self
            .billing_cycle
            .as_deref()
            .map(BillingCycle::parse_lenient)
            .unwrap_or(BillingCycle::Monthly);

        let status: SubscriptionStatus = self
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let total_payments = match self.total_payments {
            Some(raw) => raw.value()?,
            None => 0.0,
        };

        let now = Utc::now();
        Ok(Subscription {
            id,
            name: self.name,
            service_provider: self.service_provider,
            category: self.category.unwrap_or_else(|| "Other".to_string()),
            amount,
            currency,
            billing_cycle,
            next_billing_date,
            last_payment_date: self.last_payment_date,
            status,
            auto_renew: self.auto_renew.unwrap_or(false),
            reminder_days_before: self
                .reminder_days_before
                .unwrap_or(settings.default_reminder_days),
            is_shared: self.is_shared.unwrap_or(false),
            notes: self.notes,
            cancellation_link: self.cancellation_link,
            logo_url: self.logo_url,
            payment_count: self.payment_count.unwrap_or(0),
            total_payments,
            skipped_at: self.skipped_at,
            next_reminder_date: self.next_reminder_date,
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}
