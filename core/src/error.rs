//! Error types for the adaptive payments client.
//!
//! # Design
//! Only local and transport failures are errors. A request the vendor
//! rejects still decodes into a `GatewayResponse` with `success == false`;
//! callers branch on that flag, never on `Err`.
//!
//! `ValidationError` is raised before any XML is built, so a request that
//! fails validation never reaches the transport. Transport failures are
//! carried through as-is in `GatewayError::Transport`.

use thiserror::Error;

use crate::http::TransportError;
use crate::types::Operation;

/// A request could not be built because its options are incomplete.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required option was absent or blank.
    #[error("{operation} requires option `{field}`")]
    MissingOption {
        operation: Operation,
        field: &'static str,
    },

    /// A payment was requested without any receivers.
    #[error("{operation} requires at least one receiver")]
    NoReceivers { operation: Operation },

    /// A monetary amount was zero or negative.
    #[error("{operation} option `{field}` must be greater than zero")]
    NonPositiveAmount {
        operation: Operation,
        field: &'static str,
    },
}

/// Errors returned by `AdaptivePaymentsClient`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The injected transport failed. The source error is passed through
    /// untouched.
    #[error(transparent)]
    Transport(TransportError),

    /// The transport returned a non-2xx status as data.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("response deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The request tree could not be rendered to XML.
    #[error("request serialization failed: {0}")]
    Serialization(#[from] quick_xml::Error),

    /// A required gateway setting is absent or blank.
    #[error("missing gateway configuration `{0}`")]
    MissingConfig(&'static str),
}

impl GatewayError {
    pub fn is_validation(&self) -> bool {
        matches!(self, GatewayError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_operation_and_field() {
        let err = ValidationError::MissingOption {
            operation: Operation::Pay,
            field: "return_url",
        };
        assert_eq!(err.to_string(), "Pay requires option `return_url`");
    }

    #[test]
    fn validation_converts_into_gateway_error() {
        let err: GatewayError = ValidationError::NoReceivers {
            operation: Operation::Pay,
        }
        .into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Pay requires at least one receiver");
    }

    #[test]
    fn transport_error_displays_source_verbatim() {
        let source: TransportError = "connection reset".into();
        let err = GatewayError::Transport(source);
        assert_eq!(err.to_string(), "connection reset");
        assert!(!err.is_validation());
    }

    #[test]
    fn http_status_includes_body() {
        let err = GatewayError::HttpStatus {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }
}
