//! Operation request bodies.
//!
//! # Design
//! Each builder validates its options first and only then assembles an
//! immutable list of body elements, so a request with missing required
//! options never produces XML. The orchestrator wraps the body in the
//! `<Operation>Request` envelope when it turns it into an `HttpRequest`.
//!
//! Currency for pay and refund resolves as: explicit option, then the
//! first receiver's currency, then the configured default.

use rust_decimal::Decimal;

use crate::config::GatewayConfig;
use crate::error::ValidationError;
use crate::options::{
    ClientOptions, PayOptions, PaymentDetailsOptions, PreapprovalDetailsOptions,
    PreapprovalOptions, RefundOptions,
};
use crate::types::{ClientDetails, Operation, Receiver};
use crate::xml::{ElementBuilder, XmlElement};

pub const DETAIL_LEVEL: &str = "ReturnAll";

/// Operation-specific body fields, ready to be enveloped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBody {
    operation: Operation,
    fields: Vec<XmlElement>,
}

impl RequestBody {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn fields(&self) -> &[XmlElement] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&XmlElement> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// The complete request document tree: root element, `requestEnvelope`,
    /// then the body fields.
    pub fn envelope(&self) -> XmlElement {
        let mut children = Vec::with_capacity(self.fields.len() + 1);
        children.push(XmlElement::parent(
            "requestEnvelope",
            vec![XmlElement::text("detailLevel", DETAIL_LEVEL)],
        ));
        children.extend(self.fields.iter().cloned());
        XmlElement::parent(self.operation.request_element(), children)
    }
}

/// Pure builders for every operation.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    application_id: &'a str,
    default_currency: &'a str,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a GatewayConfig) -> Self {
        Self {
            application_id: &config.application_id,
            default_currency: &config.default_currency,
        }
    }

    /// A single receiver is a simple payment; several make a parallel one.
    pub fn pay(&self, receivers: &[Receiver], options: &PayOptions) -> Result<RequestBody, ValidationError> {
        let operation = Operation::Pay;
        let return_url = required(operation, "return_url", options.return_url.as_deref())?;
        let cancel_url = required(operation, "cancel_url", options.cancel_url.as_deref())?;
        if receivers.is_empty() {
            return Err(ValidationError::NoReceivers { operation });
        }
        check_amounts(operation, receivers)?;

        let currency = self.resolve_currency(options.currency.as_deref(), receivers);
        let fees_payer = options.fees_payer.and_then(|payer| {
            let wire = payer.as_wire();
            if wire.is_none() {
                tracing::debug!(field = "feesPayer", "dropping unrecognized option value");
            }
            wire
        });

        let fields = ElementBuilder::new("body")
            .child(self.client_details(&options.client))
            .text("actionType", "PAY")
            .opt_text("feesPayer", fees_payer)
            .text("cancelUrl", cancel_url)
            .text("currencyCode", currency)
            .opt_text("ipnNotificationUrl", options.ipn_notification_url.as_deref())
            .flag("logDefaultShippingAddress", options.log_default_shipping_address)
            .opt_text("memo", options.memo.as_deref())
            .opt_text("pin", options.pin.as_deref())
            .opt_text("preapprovalKey", options.preapproval_key.as_deref())
            .child(receiver_list("receiverList", receivers, options.primary))
            .flag(
                "reverseAllParallelPaymentsOnError",
                options.reverse_all_parallel_payments_on_error,
            )
            .opt_text("senderEmail", options.sender_email.as_deref())
            .text("returnUrl", return_url)
            .opt_text("trackingId", options.tracking_id.as_deref())
            .into_children();

        Ok(RequestBody { operation, fields })
    }

    pub fn payment_details(
        &self,
        pay_key: Option<&str>,
        options: &PaymentDetailsOptions,
    ) -> Result<RequestBody, ValidationError> {
        let fields = ElementBuilder::new("body")
            .child(self.client_details(&options.client))
            .opt_text("payKey", pay_key)
            .opt_text("transactionId", options.transaction_id.as_deref())
            .opt_text("trackingId", options.tracking_id.as_deref())
            .into_children();

        Ok(RequestBody {
            operation: Operation::PaymentDetails,
            fields,
        })
    }

    pub fn preapproval(&self, options: &PreapprovalOptions) -> Result<RequestBody, ValidationError> {
        let operation = Operation::Preapproval;
        let return_url = required(operation, "return_url", options.return_url.as_deref())?;
        let cancel_url = required(operation, "cancel_url", options.cancel_url.as_deref())?;
        let ending_date = required(operation, "ending_date", options.ending_date.as_deref())?;
        if let Some(max) = options.max_amount_per_payment {
            if !rounds_positive(max) {
                return Err(ValidationError::NonPositiveAmount {
                    operation,
                    field: "max_amount_per_payment",
                });
            }
        }

        let currency = options
            .currency
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(self.default_currency);
        let day_of_week = options.day_of_week.and_then(|day| {
            let wire = day.as_wire();
            if wire.is_none() {
                tracing::debug!(field = "dayOfWeek", "dropping unrecognized option value");
            }
            wire
        });
        let payment_period = options.payment_period.and_then(|period| {
            let wire = period.as_wire();
            if wire.is_none() {
                tracing::debug!(field = "paymentPeriod", "dropping unrecognized option value");
            }
            wire
        });

        let fields = ElementBuilder::new("body")
            .child(self.client_details(&options.client))
            .text("cancelUrl", cancel_url)
            .text("currencyCode", currency)
            .opt_text("dateOfMonth", options.date_of_month.map(|d| d.to_string()).as_deref())
            .opt_text("dayOfWeek", day_of_week)
            .text("endingDate", ending_date)
            .opt_text(
                "maxAmountPerPayment",
                options.max_amount_per_payment.map(format_amount).as_deref(),
            )
            .opt_text(
                "maxNumberOfPayments",
                options.max_number_of_payments.map(|n| n.to_string()).as_deref(),
            )
            .opt_text(
                "maxNumberOfPaymentsPerPeriod",
                options
                    .max_number_of_payments_per_period
                    .map(|n| n.to_string())
                    .as_deref(),
            )
            .opt_text("paymentPeriod", payment_period)
            .opt_text("senderEmail", options.sender_email.as_deref())
            .text("returnUrl", return_url)
            .into_children();

        Ok(RequestBody { operation, fields })
    }

    pub fn preapproval_details(
        &self,
        preapproval_key: &str,
        options: &PreapprovalDetailsOptions,
    ) -> Result<RequestBody, ValidationError> {
        let operation = Operation::PreapprovalDetails;
        let key = required(operation, "preapproval_key", Some(preapproval_key))?;
        let fields = ElementBuilder::new("body")
            .child(self.client_details(&options.client))
            .text("preapprovalKey", key)
            .into_children();

        Ok(RequestBody { operation, fields })
    }

    /// An empty receiver list refunds the full payment.
    pub fn refund(&self, receivers: &[Receiver], options: &RefundOptions) -> Result<RequestBody, ValidationError> {
        let operation = Operation::Refund;
        check_amounts(operation, receivers)?;

        let currency = self.resolve_currency(options.currency.as_deref(), receivers);
        let fields = ElementBuilder::new("body")
            .child(self.client_details(&options.client))
            .text("currencyCode", currency)
            .opt_text("payKey", options.pay_key.as_deref())
            .opt_text("trackingId", options.tracking_id.as_deref())
            .opt_text("transactionId", options.transaction_id.as_deref())
            .child(receiver_list("receivers", receivers, options.primary))
            .into_children();

        Ok(RequestBody { operation, fields })
    }

    pub fn client_details_for(&self, client: &ClientOptions) -> ClientDetails {
        ClientDetails {
            ip_address: client.remote_ip.clone(),
            device_id: client.device_id.clone(),
            application_id: self.application_id.to_string(),
            partner_name: client.partner_name.clone(),
        }
    }

    fn client_details(&self, client: &ClientOptions) -> XmlElement {
        let details = self.client_details_for(client);
        ElementBuilder::new("clientDetails")
            .text("ipAddress", details.ip_address)
            .opt_text("deviceId", details.device_id.as_deref())
            .text("applicationId", details.application_id)
            .opt_text("partnerName", details.partner_name.as_deref())
            .build()
    }

    fn resolve_currency<'r>(&'r self, explicit: Option<&'r str>, receivers: &'r [Receiver]) -> &'r str {
        explicit
            .filter(|c| !c.trim().is_empty())
            .or_else(|| {
                receivers
                    .first()
                    .and_then(|r| r.currency.as_deref())
                    .filter(|c| !c.trim().is_empty())
            })
            .unwrap_or(self.default_currency)
    }
}

fn required<'v>(
    operation: Operation,
    field: &'static str,
    value: Option<&'v str>,
) -> Result<&'v str, ValidationError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ValidationError::MissingOption { operation, field })
}

fn check_amounts(operation: Operation, receivers: &[Receiver]) -> Result<(), ValidationError> {
    if receivers.iter().any(|r| !rounds_positive(r.amount)) {
        return Err(ValidationError::NonPositiveAmount {
            operation,
            field: "amount",
        });
    }
    Ok(())
}

fn receiver_list(name: &str, receivers: &[Receiver], default_primary: bool) -> XmlElement {
    let entries = receivers
        .iter()
        .map(|receiver| {
            ElementBuilder::new("receiver")
                .text("amount", format_amount(receiver.amount))
                .text("email", receiver.email.as_str())
                .flag("primary", receiver.primary.unwrap_or(default_primary))
                .build()
        })
        .collect();
    XmlElement::parent(name, entries)
}

/// Amounts are checked as they will be written, so `0.004` counts as zero.
fn rounds_positive(amount: Decimal) -> bool {
    amount.round_dp(2) > Decimal::ZERO
}

/// Two decimal places, banker's rounding.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
