//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage discount, always within `[0, 100]`.
///
/// Out-of-range input is clamped rather than rejected so a malformed
/// discount coming from the catalog or the site config never blocks a sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self { Self(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)) }
    pub fn from_int(value: i64) -> Self { Self::new(Decimal::from(value)) }
    pub fn value(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }

    /// `amount × percent / 100`, unrounded.
    pub fn of(&self, amount: Decimal) -> Decimal { amount * self.0 / Decimal::ONE_HUNDRED }

    /// The multiplier left after this discount, `1 − percent/100`.
    pub fn complement(&self) -> Decimal { Decimal::ONE - self.0 / Decimal::ONE_HUNDRED }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self { Self::new(value) }
}

impl From<Percent> for Decimal {
    fn from(value: Percent) -> Self { value.0 }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}%", self.0.normalize()) }
}

/// Email address, trimmed and lowercased so comparisons are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, EmailError> {
        let value = value.as_ref().trim().to_lowercase();
        if value.is_empty() { return Err(EmailError::Empty); }
        let (local, domain) = value.split_once('@').ok_or(EmailError::Malformed)?;
        if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(EmailError::Malformed);
        }
        Ok(Self(value))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for Email {
    type Error = EmailError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(value) }
}

impl From<Email> for String {
    fn from(value: Email) -> Self { value.0 }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum EmailError { Empty, Malformed }
impl std::error::Error for EmailError {}
impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Empty => write!(f, "email empty"), Self::Malformed => write!(f, "email malformed") }
    }
}

/// Keeps only the digits of a phone number, the form `wa.me` expects.
pub fn phone_digits(raw: &str) -> String { raw.chars().filter(char::is_ascii_digit).collect() }

/// Formats an amount for customers with two decimals.
pub fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
