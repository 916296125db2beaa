//! Gateway credentials and environment selection.

use std::fmt;

use serde::Deserialize;

use crate::error::GatewayError;

pub const SANDBOX_ENDPOINT: &str = "https://svcs.sandbox.paypal.com/AdaptivePayments";
pub const LIVE_ENDPOINT: &str = "https://svcs.paypal.com/AdaptivePayments";

pub const SANDBOX_REDIRECT: &str = "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=";
pub const LIVE_REDIRECT: &str = "https://www.paypal.com/cgi-bin/webscr?cmd=";

pub const API_VERSION: &str = "1.1.0";

/// The vendor's shared sandbox application id.
pub const SANDBOX_APPLICATION_ID: &str = "APP-80W284485P519543T";

pub const DEFAULT_CURRENCY: &str = "USD";

const ENV_PREFIX: &str = "ADAPTIVE_PAYMENTS_";

/// Immutable per-client settings.
///
/// `endpoint` replaces the sandbox/live base URL, which is how tests point
/// the client at a local mock server.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default = "default_application_id")]
    pub application_id: String,
    #[serde(default)]
    pub test: bool,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

fn default_application_id() -> String {
    SANDBOX_APPLICATION_ID.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl GatewayConfig {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            signature: None,
            application_id: default_application_id(),
            test: false,
            default_currency: default_currency(),
            endpoint: None,
        }
    }

    /// Load from `ADAPTIVE_PAYMENTS_*` environment variables.
    ///
    /// `LOGIN` and `PASSWORD` are required. `TEST` accepts `1`/`true`/`yes`.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let login = lookup("LOGIN").ok_or(GatewayError::MissingConfig("login"))?;
        let password = lookup("PASSWORD").ok_or(GatewayError::MissingConfig("password"))?;
        let mut config = Self::new(login, password);
        config.signature = lookup("SIGNATURE");
        if let Some(application_id) = lookup("APPLICATION_ID") {
            config.application_id = application_id;
        }
        if let Some(test) = lookup("TEST") {
            config.test = matches!(test.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(currency) = lookup("CURRENCY") {
            config.default_currency = currency;
        }
        config.endpoint = lookup("ENDPOINT");
        config.validate()?;
        Ok(config)
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = application_id.into();
        self
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn test_mode(mut self, test: bool) -> Self {
        self.test = test;
        self
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.login.trim().is_empty() {
            return Err(GatewayError::MissingConfig("login"));
        }
        if self.password.trim().is_empty() {
            return Err(GatewayError::MissingConfig("password"));
        }
        Ok(())
    }

    pub fn endpoint_base(&self) -> &str {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/'),
            None if self.test => SANDBOX_ENDPOINT,
            None => LIVE_ENDPOINT,
        }
    }

    pub fn redirect_base(&self) -> &'static str {
        if self.test {
            SANDBOX_REDIRECT
        } else {
            LIVE_REDIRECT
        }
    }

    /// Credential and format headers sent with every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("X-PAYPAL-REQUEST-DATA-FORMAT", "XML"),
            ("X-PAYPAL-RESPONSE-DATA-FORMAT", "JSON"),
            ("X-PAYPAL-SECURITY-USERID", self.login.as_str()),
            ("X-PAYPAL-SECURITY-PASSWORD", self.password.as_str()),
        ];
        if let Some(signature) = self.signature.as_deref() {
            headers.push(("X-PAYPAL-SECURITY-SIGNATURE", signature));
        }
        headers.push(("X-PAYPAL-SERVICE-VERSION", API_VERSION));
        headers.push(("X-PAYPAL-APPLICATION-ID", self.application_id.as_str()));
        headers
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("login", &self.login)
            .field("password", &"[redacted]")
            .field("signature", &self.signature.as_ref().map(|_| "[redacted]"))
            .field("application_id", &self.application_id)
            .field("test", &self.test)
            .field("default_currency", &self.default_currency)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_live_usd_and_sandbox_app_id() {
        let config = GatewayConfig::new("user", "secret");
        assert_eq!(config.endpoint_base(), LIVE_ENDPOINT);
        assert_eq!(config.redirect_base(), LIVE_REDIRECT);
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.application_id, SANDBOX_APPLICATION_ID);
    }

    #[test]
    fn test_mode_selects_sandbox() {
        let config = GatewayConfig::new("user", "secret").test_mode(true);
        assert_eq!(config.endpoint_base(), SANDBOX_ENDPOINT);
        assert_eq!(config.redirect_base(), SANDBOX_REDIRECT);
    }

    #[test]
    fn endpoint_override_wins_and_drops_trailing_slash() {
        let config = GatewayConfig::new("user", "secret")
            .test_mode(true)
            .with_endpoint("http://127.0.0.1:3000/AdaptivePayments/");
        assert_eq!(config.endpoint_base(), "http://127.0.0.1:3000/AdaptivePayments");
    }

    #[test]
    fn headers_carry_credentials_and_version() {
        let headers = GatewayConfig::new("user", "secret")
            .with_signature("sig")
            .with_application_id("APP-1")
            .headers();
        let get = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("X-PAYPAL-REQUEST-DATA-FORMAT"), Some("XML"));
        assert_eq!(get("X-PAYPAL-RESPONSE-DATA-FORMAT"), Some("JSON"));
        assert_eq!(get("X-PAYPAL-SECURITY-USERID"), Some("user"));
        assert_eq!(get("X-PAYPAL-SECURITY-PASSWORD"), Some("secret"));
        assert_eq!(get("X-PAYPAL-SECURITY-SIGNATURE"), Some("sig"));
        assert_eq!(get("X-PAYPAL-SERVICE-VERSION"), Some("1.1.0"));
        assert_eq!(get("X-PAYPAL-APPLICATION-ID"), Some("APP-1"));
    }

    #[test]
    fn signature_header_omitted_when_unset() {
        let headers = GatewayConfig::new("user", "secret").headers();
        assert!(headers.iter().all(|(k, _)| k != "X-PAYPAL-SECURITY-SIGNATURE"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = GatewayConfig::new("user", "hunter2").with_signature("sig-value");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("sig-value"));
        assert!(rendered.contains("user"));
    }

    #[test]
    fn loads_from_lookup() {
        let config = GatewayConfig::from_lookup(lookup(&[
            ("LOGIN", "user"),
            ("PASSWORD", "secret"),
            ("TEST", "true"),
            ("CURRENCY", "EUR"),
        ]))
        .unwrap();
        assert!(config.test);
        assert_eq!(config.default_currency, "EUR");
        assert!(config.signature.is_none());
    }

    #[test]
    fn lookup_requires_credentials() {
        let err = GatewayConfig::from_lookup(lookup(&[("LOGIN", "user")])).unwrap_err();
        assert!(matches!(err, GatewayError::MissingConfig("password")));
        let err = GatewayConfig::from_lookup(lookup(&[("LOGIN", " "), ("PASSWORD", "p")]))
            .unwrap_err();
        assert!(matches!(err, GatewayError::MissingConfig("login")));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"login":"user","password":"secret","test":true}"#).unwrap();
        assert_eq!(config.application_id, SANDBOX_APPLICATION_ID);
        assert_eq!(config.default_currency, "USD");
        assert!(config.test);
    }
}
