//! Flattening of decoded vendor responses.
//!
//! # Design
//! The vendor answers with a JSON object whose interesting values are
//! strings scattered between the top level and a nested `responseEnvelope`.
//! `parse` collapses both into one map keyed by snake_case names. Values
//! under `responseEnvelope` overwrite top-level values with the same key.
//! Non-string scalars and unrelated nested objects are dropped.
//!
//! Two structured values survive: the `paymentInfoList.paymentInfo` array,
//! kept verbatim, and the `error` array, reduced to a deduplicated
//! `message` and `error_codes`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::GatewayError;

/// A vendor response reduced to string fields plus the raw payment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResponse {
    pub fields: BTreeMap<String, String>,
    pub payment_list: Option<Vec<Value>>,
}

impl NormalizedResponse {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Like `get`, but treats an empty string as absent.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn ack(&self) -> Option<&str> {
        self.get("ack")
    }

    pub fn message(&self) -> Option<&str> {
        self.get("message")
    }

    pub fn error_codes(&self) -> Option<&str> {
        self.get("error_codes")
    }
}

/// Decode a response body and flatten it.
pub fn parse_body(body: &str) -> Result<NormalizedResponse, GatewayError> {
    let raw: Value = serde_json::from_str(body)?;
    Ok(parse(&raw))
}

/// Flatten a decoded response. Anything other than an object yields an
/// empty response.
pub fn parse(raw: &Value) -> NormalizedResponse {
    let mut response = NormalizedResponse::default();
    let Some(object) = raw.as_object() else {
        return response;
    };

    copy_strings(object, &mut response.fields);
    if let Some(envelope) = object.get("responseEnvelope").and_then(Value::as_object) {
        copy_strings(envelope, &mut response.fields);
    }

    if let Some(list) = object.get("paymentInfoList").and_then(Value::as_object) {
        response.payment_list = match list.get("paymentInfo") {
            Some(Value::Array(items)) => Some(items.clone()),
            Some(Value::Null) | None => None,
            Some(single) => Some(vec![single.clone()]),
        };
    }

    if let Some(errors) = object.get("error").and_then(Value::as_array) {
        let messages = unique(errors.iter().filter_map(|e| scalar(e.get("message"))));
        let codes = unique(errors.iter().filter_map(|e| scalar(e.get("errorId"))));
        response.fields.insert("message".to_string(), messages.join(". "));
        response.fields.insert("error_codes".to_string(), codes.join(", "));
    }

    response
}

fn copy_strings(object: &Map<String, Value>, fields: &mut BTreeMap<String, String>) {
    for (key, value) in object {
        if let Value::String(value) = value {
            fields.insert(snake_case(key), value.clone());
        }
    }
}

/// Error ids are usually strings but occasionally arrive as numbers.
fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Rewrite a camelCase key the way the vendor's field names expect:
/// `payKey` → `pay_key`, `senderID` → `sender_id`, `XMLData` → `xml_data`.
pub fn snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        match c {
            '-' => out.push('_'),
            _ => out.push(c.to_ascii_lowercase()),
        }
    }
    out
}
