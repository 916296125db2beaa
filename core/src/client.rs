//! Stateless request builder and response decoder for adaptive payments.
//!
//! # Design
//! `AdaptivePaymentsClient` holds only its `GatewayConfig` and keeps no
//! state between calls, so one instance can serve concurrent callers.
//! Each operation can be driven two ways:
//!
//! - host-does-IO: `build_request` produces an `HttpRequest`, the caller
//!   executes it, and `parse_response` decodes the `HttpResponse`;
//! - `commit` (or the per-operation shortcuts) runs the same steps through
//!   an injected `Transport`.
//!
//! Transport failures are returned unchanged. Vendor failures are not
//! errors; they come back as a `GatewayResponse` with `success == false`.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::options::{
    PayOptions, PaymentDetailsOptions, PreapprovalDetailsOptions, PreapprovalOptions,
    RefundOptions,
};
use crate::request::{RequestBody, RequestBuilder};
use crate::response::parse_body;
use crate::result::GatewayResponse;
use crate::types::{Operation, Receiver};

const PAY_KEY_PREFIX: &str = "AP-";
const PREAPPROVAL_KEY_PREFIX: &str = "PA-";

#[derive(Debug, Clone)]
pub struct AdaptivePaymentsClient {
    config: GatewayConfig,
}

impl AdaptivePaymentsClient {
    /// Fails when the login or password is blank.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn requests(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config)
    }

    pub fn endpoint_url(&self, operation: Operation) -> String {
        format!("{}/{}", self.config.endpoint_base(), operation.action())
    }

    /// Where to send the buyer to approve a payment or preapproval.
    ///
    /// Returns `None` for tokens that are neither pay keys (`AP-`) nor
    /// preapproval keys (`PA-`).
    pub fn redirect_url_for(&self, token: &str) -> Option<String> {
        let base = self.config.redirect_base();
        if token.starts_with(PAY_KEY_PREFIX) {
            Some(format!("{base}_ap-payment&payKey={token}"))
        } else if token.starts_with(PREAPPROVAL_KEY_PREFIX) {
            Some(format!("{base}_ap-preapproval&preapprovalkey={token}"))
        } else {
            None
        }
    }

    /// Wrap a body in its envelope and attach the endpoint and headers.
    pub fn build_request(&self, body: &RequestBody) -> Result<HttpRequest, GatewayError> {
        Ok(HttpRequest {
            url: self.endpoint_url(body.operation()),
            headers: self.config.headers(),
            body: body.envelope().to_document()?,
        })
    }

    /// Decode a raw response for `operation` into its result variant.
    pub fn parse_response(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<GatewayResponse, GatewayError> {
        check_status(&response)?;
        let normalized = parse_body(&response.body)?;
        let result = GatewayResponse::build(operation, normalized, self.config.test);

        let inner = result.response();
        if inner.success {
            tracing::debug!(%operation, authorization = ?inner.authorization, "request acknowledged");
        } else {
            tracing::warn!(
                %operation,
                ack = ?inner.raw.ack(),
                error_codes = ?inner.error_codes(),
                message = %inner.message,
                "vendor reported failure"
            );
        }
        Ok(result)
    }

    /// Submit a built body through `transport` and decode the answer.
    pub fn commit<T>(&self, transport: &T, body: RequestBody) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let operation = body.operation();
        let request = self.build_request(&body)?;
        tracing::debug!(%operation, url = %request.url, "submitting request");
        let response = transport.post(&request).map_err(GatewayError::Transport)?;
        self.parse_response(operation, response)
    }

    pub fn pay<T>(
        &self,
        transport: &T,
        receivers: &[Receiver],
        options: &PayOptions,
    ) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let body = self.requests().pay(receivers, options)?;
        self.commit(transport, body)
    }

    pub fn payment_details<T>(
        &self,
        transport: &T,
        pay_key: &str,
        options: &PaymentDetailsOptions,
    ) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let body = self.requests().payment_details(Some(pay_key), options)?;
        self.commit(transport, body)
    }

    pub fn preapproval<T>(
        &self,
        transport: &T,
        options: &PreapprovalOptions,
    ) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let body = self.requests().preapproval(options)?;
        self.commit(transport, body)
    }

    pub fn preapproval_details<T>(
        &self,
        transport: &T,
        preapproval_key: &str,
        options: &PreapprovalDetailsOptions,
    ) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let body = self.requests().preapproval_details(preapproval_key, options)?;
        self.commit(transport, body)
    }

    pub fn refund<T>(
        &self,
        transport: &T,
        receivers: &[Receiver],
        options: &RefundOptions,
    ) -> Result<GatewayResponse, GatewayError>
    where
        T: Transport + ?Sized,
    {
        let body = self.requests().refund(receivers, options)?;
        self.commit(transport, body)
    }
}

/// Non-2xx responses handed back as data are transport failures.
fn check_status(response: &HttpResponse) -> Result<(), GatewayError> {
    if response.is_success() {
        return Ok(());
    }
    Err(GatewayError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
