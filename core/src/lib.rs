//! Synchronous client core for the PayPal Adaptive Payments API.
//!
//! # Overview
//! Translates pay, payment details, preapproval, preapproval details and
//! refund operations into the vendor's XML request envelope, and decodes
//! the JSON answer into a flat, normalized result with a uniform
//! success/failure classification.
//!
//! # Design
//! - `request` builds immutable XML trees from typed per-operation options;
//!   validation happens before any tree exists.
//! - `response` flattens the decoded JSON; `classify` derives success,
//!   message and authorization from the flat map.
//! - `AdaptivePaymentsClient` is stateless apart from its configuration and
//!   either hands back `HttpRequest`s for the host to execute or drives an
//!   injected `Transport` via `commit`.
//! - Vendor failures are ordinary results with `success == false`; only
//!   validation, transport and decoding problems are `Err`.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod request;
pub mod response;
pub mod result;
pub mod types;
pub mod xml;

pub use classify::{classify, Ack, Classification};
pub use client::AdaptivePaymentsClient;
pub use config::GatewayConfig;
pub use error::{GatewayError, ValidationError};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError};
pub use options::{
    ClientOptions, PayOptions, PaymentDetailsOptions, PreapprovalDetailsOptions,
    PreapprovalOptions, RefundOptions,
};
pub use request::{RequestBody, RequestBuilder};
pub use response::{parse, NormalizedResponse};
pub use result::{GatewayResponse, PaymentDetailsResponse, PaymentInfo, Response};
pub use types::{ClientDetails, DayOfWeek, FeesPayer, Operation, PaymentPeriod, Receiver};
