//! Timezone and fiscal calendar helpers
//!
//! Ledger dates are plain calendar dates. A tenant's timezone decides what
//! "today" means for it, and its fiscal-year start decides period bounds.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::str::FromStr;

/// Timezone wrapper for tenant locales
///
/// Wraps chrono_tz::Tz with IANA-name serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::UnknownTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// IANA name, e.g. `Asia/Kolkata`
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Calendar date in this timezone at the given instant
    pub fn date_at(&self, utc: DateTime<Utc>) -> NaiveDate {
        self.to_local(utc).date_naive()
    }

    /// Current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Asia::Kolkata)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Date out of range")]
    OutOfRange,
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Fiscal year containing `date`, for a year beginning on the month/day
    /// of `fiscal_year_start`
    ///
    /// A 29 February start is treated as 1 March in non-leap years.
    pub fn fiscal_year_containing(
        fiscal_year_start: NaiveDate,
        date: NaiveDate,
    ) -> Result<Self, TemporalError> {
        let anchor = |year: i32| -> Result<NaiveDate, TemporalError> {
            NaiveDate::from_ymd_opt(year, fiscal_year_start.month(), fiscal_year_start.day())
                .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
                .ok_or(TemporalError::OutOfRange)
        };

        let this_year = anchor(date.year())?;
        let start = if date >= this_year {
            this_year
        } else {
            anchor(date.year() - 1)?
        };
        let next = anchor(start.year() + 1)?;
        let end = next.pred_opt().ok_or(TemporalError::OutOfRange)?;
        Self::new(start, end)
    }
}
