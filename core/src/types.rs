//! Domain types shared by request building and response decoding.
//!
//! # Design
//! The vendor's enumerated fields arrive as loosely formatted strings (or,
//! for the weekday, a numeric index). Each is normalized once, when it is
//! converted into its enum, and anything that does not match maps to
//! `Unspecified`. The builder omits `Unspecified` from the wire, so an
//! unrecognized value behaves like an absent one instead of failing the
//! request.

use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

/// The fixed set of adaptive payments operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Pay,
    PaymentDetails,
    Preapproval,
    PreapprovalDetails,
    Refund,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Pay,
        Operation::PaymentDetails,
        Operation::Preapproval,
        Operation::PreapprovalDetails,
        Operation::Refund,
    ];

    /// Action name used in the endpoint path and the request root element.
    pub fn action(self) -> &'static str {
        match self {
            Operation::Pay => "Pay",
            Operation::PaymentDetails => "PaymentDetails",
            Operation::Preapproval => "Preapproval",
            Operation::PreapprovalDetails => "PreapprovalDetails",
            Operation::Refund => "Refund",
        }
    }

    /// Root element of the request document, e.g. `PayRequest`.
    pub fn request_element(self) -> String {
        format!("{}Request", self.action())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// A recipient of funds in a pay or refund request.
///
/// `currency` is the monetary context of `amount`; the first receiver's
/// currency is used when the request does not name one. `primary` left as
/// `None` falls back to the request-wide `primary` option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Receiver {
    pub amount: Decimal,
    pub email: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub primary: Option<bool>,
}

impl Receiver {
    pub fn new(amount: Decimal, email: impl Into<String>) -> Self {
        Self {
            amount,
            email: email.into(),
            currency: None,
            primary: None,
        }
    }

    pub fn primary(mut self) -> Self {
        self.primary = Some(true);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// Caller identification attached to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDetails {
    pub ip_address: String,
    pub device_id: Option<String>,
    pub application_id: String,
    pub partner_name: Option<String>,
}

/// Billing cadence for a preapproval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum PaymentPeriod {
    Daily,
    Weekly,
    Biweekly,
    Semimonthly,
    Monthly,
    Annually,
    Unspecified,
}

impl PaymentPeriod {
    /// Case-insensitive match against the vendor's period names.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_uppercase().as_str() {
            "DAILY" => PaymentPeriod::Daily,
            "WEEKLY" => PaymentPeriod::Weekly,
            "BIWEEKLY" => PaymentPeriod::Biweekly,
            "SEMIMONTHLY" => PaymentPeriod::Semimonthly,
            "MONTHLY" => PaymentPeriod::Monthly,
            "ANNUALLY" => PaymentPeriod::Annually,
            _ => PaymentPeriod::Unspecified,
        }
    }

    pub fn as_wire(self) -> Option<&'static str> {
        match self {
            PaymentPeriod::Daily => Some("DAILY"),
            PaymentPeriod::Weekly => Some("WEEKLY"),
            PaymentPeriod::Biweekly => Some("BIWEEKLY"),
            PaymentPeriod::Semimonthly => Some("SEMIMONTHLY"),
            PaymentPeriod::Monthly => Some("MONTHLY"),
            PaymentPeriod::Annually => Some("ANNUALLY"),
            PaymentPeriod::Unspecified => None,
        }
    }
}

impl From<String> for PaymentPeriod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for PaymentPeriod {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Which party pays the transaction fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum FeesPayer {
    Sender,
    PrimaryReceiver,
    EachReceiver,
    SecondaryOnly,
    Unspecified,
}

impl FeesPayer {
    /// Strips underscores and ignores case, so `primary_receiver` and
    /// `PRIMARYRECEIVER` are the same value.
    pub fn parse(input: &str) -> Self {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "SENDER" => FeesPayer::Sender,
            "PRIMARYRECEIVER" => FeesPayer::PrimaryReceiver,
            "EACHRECEIVER" => FeesPayer::EachReceiver,
            "SECONDARYONLY" => FeesPayer::SecondaryOnly,
            _ => FeesPayer::Unspecified,
        }
    }

    pub fn as_wire(self) -> Option<&'static str> {
        match self {
            FeesPayer::Sender => Some("SENDER"),
            FeesPayer::PrimaryReceiver => Some("PRIMARYRECEIVER"),
            FeesPayer::EachReceiver => Some("EACHRECEIVER"),
            FeesPayer::SecondaryOnly => Some("SECONDARYONLY"),
            FeesPayer::Unspecified => None,
        }
    }
}

impl From<String> for FeesPayer {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for FeesPayer {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Weekday on which preapproved payments may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawDay")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Unspecified,
}

const WEEK: [DayOfWeek; 7] = [
    DayOfWeek::Sunday,
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
];

impl DayOfWeek {
    /// Sunday is day 0.
    pub fn from_index(index: i64) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| WEEK.get(i).copied())
            .unwrap_or(DayOfWeek::Unspecified)
    }

    /// Accepts a day name in any case, or a numeric index in string form.
    /// Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let upper = input.to_ascii_uppercase();
        if let Some(day) = WEEK.iter().find(|day| day.as_wire() == Some(upper.as_str())) {
            return *day;
        }
        input
            .parse::<i64>()
            .map(Self::from_index)
            .unwrap_or(DayOfWeek::Unspecified)
    }

    pub fn as_wire(self) -> Option<&'static str> {
        match self {
            DayOfWeek::Sunday => Some("SUNDAY"),
            DayOfWeek::Monday => Some("MONDAY"),
            DayOfWeek::Tuesday => Some("TUESDAY"),
            DayOfWeek::Wednesday => Some("WEDNESDAY"),
            DayOfWeek::Thursday => Some("THURSDAY"),
            DayOfWeek::Friday => Some("FRIDAY"),
            DayOfWeek::Saturday => Some("SATURDAY"),
            DayOfWeek::Unspecified => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDay {
    Index(i64),
    Name(String),
}

impl From<RawDay> for DayOfWeek {
    fn from(raw: RawDay) -> Self {
        match raw {
            RawDay::Index(index) => Self::from_index(index),
            RawDay::Name(name) => Self::parse(&name),
        }
    }
}

impl From<&str> for DayOfWeek {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
