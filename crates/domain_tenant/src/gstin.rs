//! GST identification numbers
//!
//! A GSTIN is 15 characters: a two-digit state code, the holder's ten
//! character PAN, an entity number, the literal `Z` and a check character.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TenantError;

pub const GSTIN_LENGTH: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gstin(String);

impl Gstin {
    /// Parses and normalizes a GSTIN to upper case
    pub fn parse(raw: &str) -> Result<Self, TenantError> {
        let value = raw.trim().to_ascii_uppercase();
        let bytes = value.as_bytes();
        if bytes.len() != GSTIN_LENGTH {
            return Err(TenantError::InvalidGstin(format!(
                "expected {} characters, got {}",
                GSTIN_LENGTH,
                bytes.len()
            )));
        }

        let digit = |i: usize| bytes[i].is_ascii_digit();
        let letter = |i: usize| bytes[i].is_ascii_uppercase();
        let alnum = |i: usize| bytes[i].is_ascii_digit() || bytes[i].is_ascii_uppercase();

        let well_formed = (0..2).all(digit)
            && (2..7).all(letter)
            && (7..11).all(digit)
            && letter(11)
            && alnum(12)
            && bytes[12] != b'0'
            && bytes[13] == b'Z'
            && alnum(14);

        if !well_formed {
            return Err(TenantError::InvalidGstin(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit state code
    pub fn state_code(&self) -> &str {
        &self.0[0..2]
    }

    /// PAN embedded in the GSTIN
    pub fn pan(&self) -> &str {
        &self.0[2..12]
    }
}

impl fmt::Display for Gstin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Gstin {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Gstin {
    type Error = TenantError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Gstin> for String {
    fn from(gstin: Gstin) -> String {
        gstin.0
    }
}
