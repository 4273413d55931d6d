//! Pre-built Test Fixtures
//!
//! Consistent, predictable values shared by the integration suites.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use core_kernel::{CustomerId, ProductId, TenantId};

/// GSTINs that pass the format check
pub struct GstinFixtures;

impl GstinFixtures {
    /// Maharashtra-registered company
    pub fn primary() -> &'static str {
        "27AAPCS1234H1Z0"
    }

    /// A second tenant in the same state
    pub fn secondary() -> &'static str {
        "27AAPCS5678H1Z0"
    }

    /// Karnataka-registered company
    pub fn karnataka() -> &'static str {
        "29AABCT1332L1ZS"
    }

    /// Fails the format check (14 characters)
    pub fn malformed() -> &'static str {
        "27AAPCS1234H1Z"
    }
}

/// Account codes used by the standard test chart
pub struct AccountCodeFixtures;

impl AccountCodeFixtures {
    pub fn cash() -> &'static str {
        "1000"
    }

    pub fn bank() -> &'static str {
        "1010"
    }

    pub fn sales() -> &'static str {
        "4000"
    }

    pub fn rent() -> &'static str {
        "5100"
    }
}

pub struct DateFixtures;

impl DateFixtures {
    /// First day of the 2024-25 Indian fiscal year
    pub fn fiscal_year_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    pub fn mid_year() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    pub fn fiscal_year_end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }
}

/// Deterministic identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn unknown_tenant() -> TenantId {
        TenantId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    pub fn customer() -> CustomerId {
        CustomerId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    pub fn product() -> ProductId {
        ProductId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }
}

pub struct AmountFixtures;

impl AmountFixtures {
    pub fn cash_sale() -> Decimal {
        dec!(100.00)
    }

    /// Pairs with `cash_sale` to produce a difference of 10
    pub fn short_credit() -> Decimal {
        dec!(90.00)
    }

    pub fn monthly_rent() -> Decimal {
        dec!(25000.00)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_tenant::Gstin;

    #[test]
    fn test_gstin_fixtures_parse() {
        assert!(Gstin::parse(GstinFixtures::primary()).is_ok());
        assert!(Gstin::parse(GstinFixtures::secondary()).is_ok());
        assert!(Gstin::parse(GstinFixtures::karnataka()).is_ok());
        assert!(Gstin::parse(GstinFixtures::malformed()).is_err());
    }

    #[test]
    fn test_fiscal_year_ordering() {
        assert!(DateFixtures::fiscal_year_start() < DateFixtures::mid_year());
        assert!(DateFixtures::mid_year() < DateFixtures::fiscal_year_end());
    }

    #[test]
    fn test_id_fixtures_are_deterministic() {
        assert_eq!(IdFixtures::product(), IdFixtures::product());
    }
}
