//! In-memory stand-in for the Adaptive Payments endpoints.
//!
//! Accepts the XML request envelope on `POST /AdaptivePayments/{action}` and
//! answers with the vendor's JSON shapes. Payments and preapprovals live in
//! a shared map for the lifetime of the router.

pub mod xml;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

use crate::xml::Fields;

pub const USER_ID_HEADER: &str = "X-PAYPAL-SECURITY-USERID";

pub const ERROR_AUTHENTICATION: &str = "520003";
pub const ERROR_INVALID_REQUEST: &str = "580001";
pub const ERROR_UNKNOWN_KEY: &str = "580022";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiverRecord {
    pub amount: String,
    pub email: String,
    pub primary: bool,
}

#[derive(Clone, Debug)]
pub struct Payment {
    pub pay_key: String,
    pub status: String,
    pub currency_code: String,
    pub sender_email: Option<String>,
    pub return_url: String,
    pub cancel_url: String,
    pub receivers: Vec<ReceiverRecord>,
}

#[derive(Clone, Debug)]
pub struct Preapproval {
    pub preapproval_key: String,
    pub currency_code: String,
    pub ending_date: String,
    pub sender_email: Option<String>,
}

#[derive(Default)]
pub struct Store {
    payments: HashMap<String, Payment>,
    preapprovals: HashMap<String, Preapproval>,
}

pub type Db = Arc<RwLock<Store>>;

/// One entry of the vendor's `error` array.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub error_id: String,
    pub domain: &'static str,
    pub severity: &'static str,
    pub category: &'static str,
    pub message: String,
}

impl ErrorData {
    pub fn new(error_id: &str, message: &str) -> Self {
        Self {
            error_id: error_id.to_string(),
            domain: "PLATFORM",
            severity: "Error",
            category: "Application",
            message: message.to_string(),
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/AdaptivePayments/{action}", post(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(db): State<Db>,
    Path(action): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, StatusCode> {
    let authenticated = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| !value.is_empty());
    if !authenticated {
        tracing::debug!(%action, "rejecting unauthenticated request");
        return Ok(Json(failure(
            ERROR_AUTHENTICATION,
            "Authentication failed. API credentials are incorrect.",
        )));
    }

    let fields = match Fields::parse(&body) {
        Ok(fields) => fields,
        Err(err) => {
            tracing::debug!(%action, error = %err, "rejecting malformed XML");
            return Ok(Json(failure(ERROR_INVALID_REQUEST, "Invalid request: malformed XML")));
        }
    };

    tracing::debug!(%action, "handling request");
    let response = match action.as_str() {
        "Pay" => pay(&db, &fields).await,
        "PaymentDetails" => payment_details(&db, &fields).await,
        "Preapproval" => preapproval(&db, &fields).await,
        "PreapprovalDetails" => preapproval_details(&db, &fields).await,
        "Refund" => refund(&db, &fields).await,
        _ => return Err(StatusCode::NOT_FOUND),
    };
    Ok(Json(response))
}

async fn pay(db: &Db, fields: &Fields) -> Value {
    let receivers = receivers(fields, "receiverList");
    if receivers.is_empty() {
        return failure(ERROR_INVALID_REQUEST, "Invalid request: receiverList is required");
    }
    if let Some(bad) = receivers.iter().find(|r| !is_positive(&r.amount)) {
        return failure(
            ERROR_INVALID_REQUEST,
            &format!("Invalid request parameter: amount with value {}", bad.amount),
        );
    }
    let (Some(return_url), Some(cancel_url)) = (fields.get("returnUrl"), fields.get("cancelUrl"))
    else {
        return failure(ERROR_INVALID_REQUEST, "Invalid request: returnUrl and cancelUrl are required");
    };

    let payment = Payment {
        pay_key: format!("AP-{}", Uuid::new_v4().simple()),
        status: "CREATED".to_string(),
        currency_code: fields.get("currencyCode").unwrap_or("USD").to_string(),
        sender_email: fields.get("senderEmail").map(str::to_string),
        return_url: return_url.to_string(),
        cancel_url: cancel_url.to_string(),
        receivers,
    };
    let pay_key = payment.pay_key.clone();
    db.write().await.payments.insert(pay_key.clone(), payment);

    success(json!({
        "payKey": pay_key,
        "paymentExecStatus": "CREATED"
    }))
}

async fn payment_details(db: &Db, fields: &Fields) -> Value {
    let pay_key = fields.get("payKey").unwrap_or_default();
    let store = db.read().await;
    let Some(payment) = store.payments.get(pay_key) else {
        return invalid_parameter("payKey", pay_key);
    };

    let payment_info: Vec<Value> = payment
        .receivers
        .iter()
        .map(|r| {
            json!({
                "receiver": {
                    "amount": r.amount,
                    "email": r.email,
                    "primary": r.primary.to_string()
                },
                "pendingRefund": "false",
                "transactionStatus": payment.status
            })
        })
        .collect();

    let mut body = json!({
        "payKey": payment.pay_key,
        "status": payment.status,
        "currencyCode": payment.currency_code,
        "returnUrl": payment.return_url,
        "cancelUrl": payment.cancel_url,
        "actionType": "PAY",
        "paymentInfoList": {"paymentInfo": payment_info}
    });
    if let Some(sender) = &payment.sender_email {
        body["senderEmail"] = json!(sender);
    }
    success(body)
}

async fn preapproval(db: &Db, fields: &Fields) -> Value {
    let (Some(_), Some(_)) = (fields.get("returnUrl"), fields.get("cancelUrl")) else {
        return failure(ERROR_INVALID_REQUEST, "Invalid request: returnUrl and cancelUrl are required");
    };
    let Some(ending_date) = fields.get("endingDate") else {
        return failure(ERROR_INVALID_REQUEST, "Invalid request: endingDate is required");
    };

    let record = Preapproval {
        preapproval_key: format!("PA-{}", Uuid::new_v4().simple()),
        currency_code: fields.get("currencyCode").unwrap_or("USD").to_string(),
        ending_date: ending_date.to_string(),
        sender_email: fields.get("senderEmail").map(str::to_string),
    };
    let key = record.preapproval_key.clone();
    db.write().await.preapprovals.insert(key.clone(), record);

    success(json!({ "preapprovalKey": key }))
}

async fn preapproval_details(db: &Db, fields: &Fields) -> Value {
    let key = fields.get("preapprovalKey").unwrap_or_default();
    let store = db.read().await;
    let Some(record) = store.preapprovals.get(key) else {
        return invalid_parameter("preapprovalKey", key);
    };

    let mut body = json!({
        "approved": "false",
        "status": "ACTIVE",
        "endingDate": record.ending_date,
        "currencyCode": record.currency_code,
        "curPayments": "0"
    });
    if let Some(sender) = &record.sender_email {
        body["senderEmail"] = json!(sender);
    }
    success(body)
}

async fn refund(db: &Db, fields: &Fields) -> Value {
    let pay_key = fields.get("payKey").unwrap_or_default();
    let mut store = db.write().await;
    let Some(payment) = store.payments.get_mut(pay_key) else {
        return invalid_parameter("payKey", pay_key);
    };

    let requested = receivers(fields, "receivers");
    let refunded = if requested.is_empty() {
        payment.receivers.clone()
    } else {
        requested
    };
    payment.status = "REFUNDED".to_string();

    let refund_info: Vec<Value> = refunded
        .iter()
        .map(|r| {
            json!({
                "receiver": {"amount": r.amount, "email": r.email},
                "refundStatus": "REFUNDED",
                "refundGrossAmount": r.amount
            })
        })
        .collect();

    success(json!({
        "currencyCode": payment.currency_code,
        "refundInfoList": {"refundInfo": refund_info}
    }))
}

fn receivers(fields: &Fields, list: &str) -> Vec<ReceiverRecord> {
    fields
        .groups(&format!("{list}/receiver"))
        .into_iter()
        .map(|group| ReceiverRecord {
            amount: group.get("amount").unwrap_or_default().to_string(),
            email: group.get("email").unwrap_or_default().to_string(),
            primary: group.get("primary") == Some("true"),
        })
        .collect()
}

fn is_positive(amount: &str) -> bool {
    amount.parse::<f64>().is_ok_and(|value| value > 0.0)
}

fn envelope(ack: &str) -> Value {
    json!({
        "ack": ack,
        "build": "mock",
        "correlationId": Uuid::new_v4().simple().to_string()
    })
}

fn success(mut body: Value) -> Value {
    body["responseEnvelope"] = envelope("Success");
    body
}

pub fn failure(error_id: &str, message: &str) -> Value {
    json!({
        "responseEnvelope": envelope("Failure"),
        "error": [ErrorData::new(error_id, message)]
    })
}

fn invalid_parameter(name: &str, value: &str) -> Value {
    failure(
        ERROR_UNKNOWN_KEY,
        &format!("Invalid request parameter: {name} with value {value}"),
    )
}
