//! Per-operation request options.
//!
//! Optional fields left as `None` (or blank) are omitted from the request.
//! Boolean directives are sent only when `true`. Required fields are also
//! `Option` so that a missing value is reported as a `ValidationError`
//! rather than being impossible to express when options come from JSON.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{DayOfWeek, FeesPayer, PaymentPeriod};

/// Fields feeding the `clientDetails` block of every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    pub remote_ip: String,
    pub device_id: Option<String>,
    pub partner_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PayOptions {
    #[serde(flatten)]
    pub client: ClientOptions,
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
    pub currency: Option<String>,
    pub fees_payer: Option<FeesPayer>,
    pub ipn_notification_url: Option<String>,
    pub log_default_shipping_address: bool,
    pub memo: Option<String>,
    pub pin: Option<String>,
    pub preapproval_key: Option<String>,
    pub reverse_all_parallel_payments_on_error: bool,
    pub sender_email: Option<String>,
    pub tracking_id: Option<String>,
    /// Marks every receiver without its own flag as primary.
    pub primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaymentDetailsOptions {
    #[serde(flatten)]
    pub client: ClientOptions,
    pub transaction_id: Option<String>,
    pub tracking_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreapprovalOptions {
    #[serde(flatten)]
    pub client: ClientOptions,
    pub return_url: Option<String>,
    pub cancel_url: Option<String>,
    /// ISO-8601 date (or date-time) after which the preapproval lapses.
    pub ending_date: Option<String>,
    pub currency: Option<String>,
    pub date_of_month: Option<u8>,
    #[serde(alias = "date_of_week")]
    pub day_of_week: Option<DayOfWeek>,
    pub max_amount_per_payment: Option<Decimal>,
    pub max_number_of_payments: Option<u32>,
    pub max_number_of_payments_per_period: Option<u32>,
    pub payment_period: Option<PaymentPeriod>,
    pub sender_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreapprovalDetailsOptions {
    #[serde(flatten)]
    pub client: ClientOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefundOptions {
    #[serde(flatten)]
    pub client: ClientOptions,
    pub currency: Option<String>,
    pub pay_key: Option<String>,
    pub tracking_id: Option<String>,
    pub transaction_id: Option<String>,
    pub primary: bool,
}
