//! Currency codes and exact ledger amounts
//!
//! Every amount that reaches the ledger is a `rust_decimal::Decimal` held at a
//! fixed scale of two fractional digits. This module owns the rules for
//! getting a value into that shape and for summing such values without
//! silently overflowing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits carried by every ledger amount
pub const LEDGER_SCALE: u32 = 2;

/// Exclusive bound on the magnitude of a ledger amount, the capacity of a
/// `NUMERIC(19, 2)` column
pub const LEDGER_AMOUNT_LIMIT: Decimal = dec!(100000000000000000);

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
    AED,
    SGD,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::INR => "₹",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::AED => "AED",
            Currency::SGD => "S$",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::INR => "INR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AED => "AED",
            Currency::SGD => "SGD",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Currency::INR),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "AED" => Ok(Currency::AED),
            "SGD" => Ok(Currency::SGD),
            "JPY" => Ok(Currency::JPY),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur while shaping or combining amounts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount {amount} has more than {max_scale} fractional digits")]
    ExcessPrecision { amount: Decimal, max_scale: u32 },

    #[error("Amount {amount} must be smaller than {limit} in magnitude")]
    OutOfRange { amount: Decimal, limit: Decimal },

    #[error("Overflow during calculation")]
    Overflow,
}

/// Brings an amount to the ledger scale
///
/// Trailing zeros are ignored, so `100.500` is accepted as `100.50`, while
/// `100.505` is rejected rather than rounded. Magnitudes of
/// [`LEDGER_AMOUNT_LIMIT`] or more are rejected.
pub fn ledger_amount(value: Decimal) -> Result<Decimal, MoneyError> {
    if value.abs() >= LEDGER_AMOUNT_LIMIT {
        return Err(MoneyError::OutOfRange {
            amount: value,
            limit: LEDGER_AMOUNT_LIMIT,
        });
    }
    let normalized = value.normalize();
    if normalized.scale() > LEDGER_SCALE {
        return Err(MoneyError::ExcessPrecision {
            amount: value,
            max_scale: LEDGER_SCALE,
        });
    }
    let mut scaled = normalized;
    scaled.rescale(LEDGER_SCALE);
    Ok(scaled)
}

/// Like [`ledger_amount`] but additionally requires a strictly positive value
pub fn positive_ledger_amount(value: Decimal) -> Result<Decimal, MoneyError> {
    if value <= Decimal::ZERO {
        return Err(MoneyError::InvalidAmount(format!(
            "amount must be greater than zero, got {}",
            value
        )));
    }
    ledger_amount(value)
}

/// Sums amounts, reporting overflow instead of panicking
pub fn checked_sum<I>(values: I) -> Result<Decimal, MoneyError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(dec!(0.00), |acc, v| {
        acc.checked_add(v).ok_or(MoneyError::Overflow)
    })
}

/// A percentage rate such as a GST slab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.18 for 18%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a percentage in the inclusive range 0..=100
    pub fn from_percentage(percentage: Decimal) -> Result<Self, MoneyError> {
        if percentage < Decimal::ZERO || percentage > dec!(100) {
            return Err(MoneyError::InvalidAmount(format!(
                "percentage must be between 0 and 100, got {}",
                percentage
            )));
        }
        Ok(Self {
            value: percentage / dec!(100),
        })
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4).normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_amount_rescales() {
        let amount = ledger_amount(dec!(100)).unwrap();
        assert_eq!(amount.scale(), 2);
        assert_eq!(amount, dec!(100.00));
    }

    #[test]
    fn test_ledger_amount_accepts_trailing_zeros() {
        assert_eq!(ledger_amount(dec!(100.500)).unwrap(), dec!(100.50));
    }

    #[test]
    fn test_ledger_amount_rejects_excess_precision() {
        let result = ledger_amount(dec!(100.505));
        assert!(matches!(result, Err(MoneyError::ExcessPrecision { .. })));
    }

    #[test]
    fn test_ledger_amount_rejects_out_of_range() {
        assert!(ledger_amount(dec!(99999999999999999.99)).is_ok());
        assert!(matches!(
            ledger_amount(dec!(100000000000000000)),
            Err(MoneyError::OutOfRange { .. })
        ));
        assert!(matches!(
            ledger_amount(dec!(-1000000000000000000)),
            Err(MoneyError::OutOfRange { .. })
        ));
        assert!(matches!(
            positive_ledger_amount(Decimal::MAX),
            Err(MoneyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_positive_ledger_amount_rejects_zero() {
        assert!(matches!(
            positive_ledger_amount(Decimal::ZERO),
            Err(MoneyError::InvalidAmount(_))
        ));
        assert!(positive_ledger_amount(dec!(-5)).is_err());
    }

    #[test]
    fn test_checked_sum_overflow() {
        let result = checked_sum(vec![Decimal::MAX, dec!(1)]);
        assert_eq!(result, Err(MoneyError::Overflow));
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("inr".parse::<Currency>().unwrap(), Currency::INR);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_rate_bounds() {
        assert_eq!(Rate::from_percentage(dec!(18)).unwrap().as_decimal(), dec!(0.18));
        assert!(Rate::from_percentage(dec!(101)).is_err());
        assert!(Rate::from_percentage(dec!(-1)).is_err());
    }
}
