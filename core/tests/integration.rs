//! Payment and preapproval lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through a ureq-backed `Transport`. Validates
//! that request building and response decoding work end-to-end.

use std::net::SocketAddr;

use adaptive_core::{
    AdaptivePaymentsClient, GatewayConfig, GatewayError, HttpRequest, HttpResponse, PayOptions,
    PaymentDetailsOptions, PreapprovalDetailsOptions, PreapprovalOptions, Receiver, RefundOptions,
    Transport, TransportError, ValidationError,
};
use rust_decimal::Decimal;

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data and the client interprets the status.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .content_type("text/xml")
            .send(request.body.as_bytes())?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> AdaptivePaymentsClient {
    let config = GatewayConfig::new("merchant_api1.example.com", "secret")
        .with_signature("sig")
        .test_mode(true)
        .with_endpoint(format!("http://{addr}/AdaptivePayments/"));
    AdaptivePaymentsClient::new(config).unwrap()
}

fn pay_options() -> PayOptions {
    PayOptions {
        return_url: Some("http://example.com/return".to_string()),
        cancel_url: Some("http://example.com/cancel".to_string()),
        currency: Some("EUR".to_string()),
        sender_email: Some("john@example.com".to_string()),
        ..Default::default()
    }
}

#[test]
fn payment_lifecycle() {
    let addr = start_server();
    let client = client_for(addr);
    let transport = UreqTransport::new();

    // Step 1: parallel payment to two receivers.
    let receivers = [
        Receiver::new(Decimal::new(1000, 2), "fred@example.com"),
        Receiver::new(Decimal::new(245, 1), "wilma@example.com").primary(),
    ];
    let paid = client.pay(&transport, &receivers, &pay_options()).unwrap();
    assert!(paid.success(), "pay failed: {}", paid.message());
    assert_eq!(paid.message(), "CREATED");
    let pay_key = paid.authorization().unwrap().to_string();
    assert!(pay_key.starts_with("AP-"));
    assert!(paid.response().test);

    // Step 2: the buyer is sent to the sandbox approval page.
    assert_eq!(
        client.redirect_url_for(&pay_key).unwrap(),
        format!("https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-payment&payKey={pay_key}")
    );

    // Step 3: details list both receivers.
    let details = client
        .payment_details(&transport, &pay_key, &PaymentDetailsOptions::default())
        .unwrap();
    assert!(details.success());
    let details = details.as_payment_details().unwrap();
    assert_eq!(details.status(), Some("CREATED"));
    assert_eq!(details.pay_key(), Some(pay_key.as_str()));
    assert_eq!(details.currency_code(), Some("EUR"));
    assert_eq!(details.sender_email(), Some("john@example.com"));

    let payments = details.payments().unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].receiver.email, "fred@example.com");
    assert_eq!(payments[0].receiver.amount, Decimal::new(1000, 2));
    assert!(!payments[0].receiver.primary);
    assert_eq!(payments[1].receiver.amount, Decimal::new(2450, 2));
    assert!(payments[1].receiver.primary);
    assert!(!payments[1].pending_refund);

    // Step 4: full refund.
    let refund = RefundOptions {
        pay_key: Some(pay_key.clone()),
        currency: Some("EUR".to_string()),
        ..Default::default()
    };
    let refunded = client.refund(&transport, &[], &refund).unwrap();
    assert!(refunded.success(), "refund failed: {}", refunded.message());
    assert_eq!(refunded.authorization(), None);

    // Step 5: details now report the refund.
    let details = client
        .payment_details(&transport, &pay_key, &PaymentDetailsOptions::default())
        .unwrap();
    assert_eq!(details.as_payment_details().unwrap().status(), Some("REFUNDED"));
}

#[test]
fn preapproval_lifecycle() {
    let addr = start_server();
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let options = PreapprovalOptions {
        return_url: Some("http://example.com/return".to_string()),
        cancel_url: Some("http://example.com/cancel".to_string()),
        ending_date: Some("2027-06-30".to_string()),
        max_amount_per_payment: Some(Decimal::new(50, 0)),
        sender_email: Some("john@example.com".to_string()),
        ..Default::default()
    };
    let approved = client.preapproval(&transport, &options).unwrap();
    assert!(approved.success(), "preapproval failed: {}", approved.message());
    let key = approved.authorization().unwrap().to_string();
    assert!(key.starts_with("PA-"));
    assert_eq!(
        client.redirect_url_for(&key).unwrap(),
        format!("https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_ap-preapproval&preapprovalkey={key}")
    );

    let details = client
        .preapproval_details(&transport, &key, &PreapprovalDetailsOptions::default())
        .unwrap();
    assert!(details.success());
    assert_eq!(details.message(), "ACTIVE");
    assert_eq!(details.response().raw.get("ending_date"), Some("2027-06-30"));
    assert_eq!(details.response().raw.get("currency_code"), Some("USD"));
    assert!(details.as_payment_details().is_none());
}

#[test]
fn unknown_pay_key_is_an_unsuccessful_result() {
    let addr = start_server();
    let client = client_for(addr);
    let transport = UreqTransport::new();

    let result = client
        .payment_details(&transport, "AP-unknown", &PaymentDetailsOptions::default())
        .unwrap();
    assert!(!result.success());
    assert_eq!(result.message(), "Invalid request parameter: payKey with value AP-unknown");
    assert_eq!(result.response().error_codes(), Some("580022"));
    assert_eq!(result.authorization(), None);
    assert!(result.as_payment_details().unwrap().payment_list.is_empty());
}

#[test]
fn validation_fails_before_any_request() {
    let client = client_for("127.0.0.1:9".parse().unwrap());
    let transport = |_: &HttpRequest| -> Result<HttpResponse, TransportError> {
        panic!("transport must not be called")
    };

    let options = PayOptions {
        return_url: None,
        ..pay_options()
    };
    let err = client
        .pay(&transport, &[Receiver::new(Decimal::ONE, "bob@example.com")], &options)
        .unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Validation(ValidationError::MissingOption { field: "return_url", .. })
    ));
}

#[test]
fn unreachable_endpoint_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr);

    let err = client
        .preapproval_details(&UreqTransport::new(), "PA-1", &PreapprovalDetailsOptions::default())
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)), "got {err:?}");
}

#[test]
fn unknown_action_surfaces_http_status() {
    let addr = start_server();
    let client = client_for(addr);
    let request = HttpRequest {
        url: format!("http://{addr}/AdaptivePayments/ConvertCurrency"),
        headers: client.config().headers(),
        body: "<ConvertCurrencyRequest/>".to_string(),
    };

    let response = UreqTransport::new().post(&request).unwrap();
    assert_eq!(response.status, 404);
    let err = client
        .parse_response(adaptive_core::Operation::Pay, response)
        .unwrap_err();
    assert!(matches!(err, GatewayError::HttpStatus { status: 404, .. }));
}
