//! Normalized results returned to callers.
//!
//! # Design
//! `GatewayResponse` is chosen by `Operation` once, in the client.
//! `PaymentDetails` gets its own variant because its payment list is the
//! point of the call; every other operation shares `Response`.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::classify::{classify, Classification};
use crate::response::NormalizedResponse;
use crate::types::Operation;

/// Outcome of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub success: bool,
    pub message: String,
    pub raw: NormalizedResponse,
    /// Whether the client was configured for the sandbox.
    pub test: bool,
    /// Pay key or preapproval key issued by the vendor.
    pub authorization: Option<String>,
}

impl Response {
    pub fn from_normalized(raw: NormalizedResponse, test: bool) -> Self {
        let Classification {
            success,
            message,
            authorization,
        } = classify(&raw);
        Self {
            success,
            message,
            raw,
            test,
            authorization,
        }
    }

    pub fn error_codes(&self) -> Option<&str> {
        self.raw.error_codes()
    }
}

/// A `PaymentDetails` result with access to the per-receiver payments.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetailsResponse {
    pub response: Response,
    pub payment_list: Vec<Value>,
}

impl PaymentDetailsResponse {
    pub fn new(response: Response) -> Self {
        let payment_list = response.raw.payment_list.clone().unwrap_or_default();
        Self {
            response,
            payment_list,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.response.raw.get("status")
    }

    pub fn pay_key(&self) -> Option<&str> {
        self.response.raw.get("pay_key")
    }

    pub fn sender_email(&self) -> Option<&str> {
        self.response.raw.get("sender_email")
    }

    pub fn currency_code(&self) -> Option<&str> {
        self.response.raw.get("currency_code")
    }

    /// Typed view of `payment_list`.
    pub fn payments(&self) -> Result<Vec<PaymentInfo>, serde_json::Error> {
        self.payment_list
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()))
            .collect()
    }
}

/// One entry of a payment's `paymentInfo` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub receiver: PaymentReceiver,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub sender_transaction_id: Option<String>,
    #[serde(default)]
    pub sender_transaction_status: Option<String>,
    #[serde(default)]
    pub refunded_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "flag")]
    pub pending_refund: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentReceiver {
    pub amount: Decimal,
    pub email: String,
    #[serde(default, deserialize_with = "flag")]
    pub primary: bool,
}

/// The vendor sends booleans as `"true"`/`"false"` strings.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => value,
        Raw::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

/// The result of `commit`, discriminated by operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    Standard(Response),
    PaymentDetails(PaymentDetailsResponse),
}

impl GatewayResponse {
    pub fn build(operation: Operation, raw: NormalizedResponse, test: bool) -> Self {
        let response = Response::from_normalized(raw, test);
        match operation {
            Operation::PaymentDetails => {
                GatewayResponse::PaymentDetails(PaymentDetailsResponse::new(response))
            }
            Operation::Pay
            | Operation::Preapproval
            | Operation::PreapprovalDetails
            | Operation::Refund => GatewayResponse::Standard(response),
        }
    }

    pub fn response(&self) -> &Response {
        match self {
            GatewayResponse::Standard(response) => response,
            GatewayResponse::PaymentDetails(details) => &details.response,
        }
    }

    pub fn success(&self) -> bool {
        self.response().success
    }

    pub fn message(&self) -> &str {
        &self.response().message
    }

    pub fn authorization(&self) -> Option<&str> {
        self.response().authorization.as_deref()
    }

    pub fn as_payment_details(&self) -> Option<&PaymentDetailsResponse> {
        match self {
            GatewayResponse::PaymentDetails(details) => Some(details),
            GatewayResponse::Standard(_) => None,
        }
    }
}
