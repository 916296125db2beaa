//! Success, message and authorization derivation for normalized responses.

use std::fmt;

use crate::response::NormalizedResponse;

/// The vendor's coarse acknowledgement code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    Success,
    SuccessWithWarning,
    Failure,
    FailureWithWarning,
    Other(String),
}

impl Ack {
    /// Exact, case-sensitive match on the vendor vocabulary.
    pub fn parse(value: &str) -> Self {
        match value {
            "Success" => Ack::Success,
            "SuccessWithWarning" => Ack::SuccessWithWarning,
            "Failure" => Ack::Failure,
            "FailureWithWarning" => Ack::FailureWithWarning,
            other => Ack::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ack::Success | Ack::SuccessWithWarning)
    }
}

impl fmt::Display for Ack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ack::Success => f.write_str("Success"),
            Ack::SuccessWithWarning => f.write_str("SuccessWithWarning"),
            Ack::Failure => f.write_str("Failure"),
            Ack::FailureWithWarning => f.write_str("FailureWithWarning"),
            Ack::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub success: bool,
    pub message: String,
    pub authorization: Option<String>,
}

const MESSAGE_KEYS: [&str; 4] = ["message", "status", "payment_exec_status", "ack"];
const AUTHORIZATION_KEYS: [&str; 2] = ["pay_key", "preapproval_key"];

pub fn classify(response: &NormalizedResponse) -> Classification {
    let success = response.ack().map(Ack::parse).is_some_and(|ack| ack.is_success());
    let message = first_present(response, &MESSAGE_KEYS).unwrap_or_default();
    let authorization = first_present(response, &AUTHORIZATION_KEYS).map(str::to_string);

    Classification {
        success,
        message: message.to_string(),
        authorization,
    }
}

fn first_present<'r>(response: &'r NormalizedResponse, keys: &[&str]) -> Option<&'r str> {
    keys.iter().find_map(|key| response.non_empty(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(pairs: &[(&str, &str)]) -> NormalizedResponse {
        NormalizedResponse {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            payment_list: None,
        }
    }

    #[test]
    fn success_only_for_success_acks() {
        for (ack, expected) in [
            ("Success", true),
            ("SuccessWithWarning", true),
            ("Failure", false),
            ("FailureWithWarning", false),
            ("success", false),
            ("", false),
        ] {
            let result = classify(&response(&[("ack", ack)]));
            assert_eq!(result.success, expected, "ack {ack:?}");
        }
        assert!(!classify(&response(&[])).success);
    }

    #[test]
    fn message_priority_order() {
        let all = response(&[
            ("ack", "Failure"),
            ("payment_exec_status", "ERROR"),
            ("status", "CANCELED"),
            ("message", "Invalid request"),
        ]);
        assert_eq!(classify(&all).message, "Invalid request");

        let no_message = response(&[("ack", "Success"), ("status", "ACTIVE"), ("message", "")]);
        assert_eq!(classify(&no_message).message, "ACTIVE");

        let exec = response(&[("ack", "Success"), ("payment_exec_status", "CREATED")]);
        assert_eq!(classify(&exec).message, "CREATED");

        assert_eq!(classify(&response(&[("ack", "Success")])).message, "Success");
        assert_eq!(classify(&response(&[])).message, "");
    }

    #[test]
    fn authorization_prefers_pay_key() {
        let both = response(&[("pay_key", "AP-1"), ("preapproval_key", "PA-1")]);
        assert_eq!(classify(&both).authorization.as_deref(), Some("AP-1"));

        let preapproval = response(&[("preapproval_key", "PA-1")]);
        assert_eq!(classify(&preapproval).authorization.as_deref(), Some("PA-1"));

        assert_eq!(classify(&response(&[("pay_key", "")])).authorization, None);
    }

    #[test]
    fn ack_display_round_trips_vocabulary() {
        assert_eq!(Ack::parse("SuccessWithWarning").to_string(), "SuccessWithWarning");
        assert_eq!(Ack::parse("PartialSuccess"), Ack::Other("PartialSuccess".to_string()));
    }
}
