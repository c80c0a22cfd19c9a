//! Monetary amounts in minor currency units.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Number of minor units in one major unit (two decimal places).
const MINOR_PER_MAJOR: u64 = 100;

/// A non-negative amount of money in the smallest currency unit (e.g. paise).
///
/// No currency is attached; the desk works in a single implicit currency.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole major units (`Money::from_major(100)` is `100.00`).
    pub fn from_major(major: u64) -> Option<Self> {
        major.checked_mul(MINOR_PER_MAJOR).map(Self)
    }

    pub fn minor(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiply by a line quantity. Negative quantities yield `None`.
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        let quantity = u64::try_from(quantity).ok()?;
        self.0.checked_mul(quantity).map(Money)
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    pub fn saturating_mul(self, quantity: u64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }

    /// Sum a sequence of amounts, `None` on overflow. Empty sums to zero.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / MINOR_PER_MAJOR, self.0 % MINOR_PER_MAJOR)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse a plain decimal amount such as `"82999.99"`, `"100"` or `"0.5"`.
    ///
    /// Signs, exponents, thousands separators and more than two fractional
    /// digits are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || DomainError::validation(format!("invalid amount: {raw:?}"));

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if raw.ends_with('.') {
            return Err(invalid());
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|minor| minor.checked_add(fraction))
            .map(Money)
            .ok_or_else(|| DomainError::validation(format!("amount out of range: {raw:?}")))
    }
}
