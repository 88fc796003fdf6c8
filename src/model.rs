//! Normalized shipping domain types.
//!
//! These are the carrier-neutral value objects callers work with. They are
//! built fresh for every lookup and owned by the caller afterwards.

use crate::error::{CarrierError, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Carrier name attached to every result.
pub const CARRIER_NAME: &str = "Golden State Overnight";

/// Currency of every GSO quote.
pub const CURRENCY: &str = "USD";

/// Wire timestamp layout used by the GSO service in both directions.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a timestamp the way the GSO service expects it.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a GSO timestamp (`YYYY-MM-DDTHH:MM:SS`).
///
/// Fractional seconds and a trailing UTC offset are tolerated; the offset is
/// dropped and the local wall-clock time kept.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
        .map_err(|_| CarrierError::malformed(format!("invalid timestamp '{raw}'")))
}

/// A shipping origin or destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub postal_code: String,
    pub country: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
}

impl Location {
    /// Create a location from a postal code alone.
    pub fn new(postal_code: impl Into<String>) -> Self {
        Self {
            postal_code: postal_code.into().trim().to_string(),
            country: None,
            province: None,
            city: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Postal code, or an error if blank.
    pub fn require_postal_code(&self, role: &str) -> Result<&str> {
        if self.postal_code.is_empty() {
            Err(CarrierError::InvalidRequest(format!(
                "{role} postal code is empty"
            )))
        } else {
            Ok(&self.postal_code)
        }
    }
}

impl From<&str> for Location {
    fn from(postal_code: &str) -> Self {
        Self::new(postal_code)
    }
}

impl From<String> for Location {
    fn from(postal_code: String) -> Self {
        Self::new(postal_code)
    }
}

/// A physical parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    /// Weight in pounds
    pub pounds: f64,
}

impl Package {
    /// Create a package of the given weight in pounds.
    pub fn new(pounds: f64) -> Self {
        Self { pounds }
    }

    /// Create a package from a weight in ounces.
    pub fn from_ounces(ounces: f64) -> Self {
        Self::new(ounces / 16.0)
    }

    /// Weight as sent on the wire: whole pounds, fraction truncated.
    ///
    /// Parcels under one pound go out as `0`. Weights beyond `u32::MAX`
    /// pounds saturate.
    pub fn wire_pounds(&self) -> Result<u32> {
        if !self.pounds.is_finite() || self.pounds <= 0.0 {
            return Err(CarrierError::InvalidRequest(format!(
                "package weight must be positive, got {}",
                self.pounds
            )));
        }
        Ok(self.pounds.trunc() as u32)
    }
}

/// GSO delivery services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceCode {
    /// PDS
    PriorityOvernight,
    /// EPS
    EarlyPriorityOvernight,
    /// NPS
    NoonPriority,
    /// SDS
    SaturdayDelivery,
    /// ESS
    EarlySaturday,
    /// CPS
    Ground,
}

impl ServiceCode {
    /// All services, in table order.
    pub const ALL: [ServiceCode; 6] = [
        Self::PriorityOvernight,
        Self::EarlyPriorityOvernight,
        Self::NoonPriority,
        Self::SaturdayDelivery,
        Self::EarlySaturday,
        Self::Ground,
    ];

    /// Get the vendor code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriorityOvernight => "PDS",
            Self::EarlyPriorityOvernight => "EPS",
            Self::NoonPriority => "NPS",
            Self::SaturdayDelivery => "SDS",
            Self::EarlySaturday => "ESS",
            Self::Ground => "CPS",
        }
    }

    /// Human-readable service name.
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::PriorityOvernight => "GSO Priority Overnight",
            Self::EarlyPriorityOvernight => "GSO Early Priority Overnight",
            Self::NoonPriority => "GSO Noon Priority",
            Self::SaturdayDelivery => "GSO Saturday Delivery",
            Self::EarlySaturday => "GSO Early Saturday",
            Self::Ground => "GSO Ground",
        }
    }
}

impl FromStr for ServiceCode {
    type Err = CarrierError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CarrierError::malformed(format!("unknown service code '{s}'")))
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price of one package for one service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRate {
    pub package: Package,
    /// Charge in cents
    pub rate: i64,
}

/// A priced shipping option covering every package of the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEstimate {
    pub carrier: String,
    pub service_name: String,
    pub service_code: String,
    /// One entry per input package, in input order
    pub package_rates: Vec<PackageRate>,
    pub currency: String,
    /// `[earliest, latest]`; both equal the guaranteed delivery time
    pub delivery_range: Option<[NaiveDateTime; 2]>,
}

impl RateEstimate {
    /// Sum of all package charges, in cents.
    pub fn total_price(&self) -> i64 {
        self.package_rates.iter().map(|r| r.rate).sum()
    }

    /// Earliest delivery time, if GSO guaranteed one.
    pub fn delivery_date(&self) -> Option<NaiveDateTime> {
        self.delivery_range.map(|[earliest, _]| earliest)
    }
}

/// Result of a rate lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateResponse {
    pub rates: Vec<RateEstimate>,
}

impl RateResponse {
    /// Find the estimate for a service code.
    pub fn rate_for(&self, code: ServiceCode) -> Option<&RateEstimate> {
        self.rates.iter().find(|r| r.service_code == code.as_str())
    }
}

/// One tracking-history entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentEvent {
    pub time: NaiveDateTime,
    pub message: String,
    /// Never populated for GSO
    pub location: Option<Location>,
    /// Never populated for GSO
    pub kind: Option<String>,
}

/// Lower-cased GSO transit status, e.g. `delivered` or `in transit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrackingStatus(String);

impl TrackingStatus {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_delivered(&self) -> bool {
        self.0 == "delivered"
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a tracking lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingResponse {
    pub carrier: String,
    pub status: TrackingStatus,
    pub scheduled_delivery_date: Option<NaiveDateTime>,
    pub tracking_number: String,
    /// Document order
    pub shipment_events: Vec<ShipmentEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp("2024-03-01T17:00:00").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(format_timestamp(&parsed), "2024-03-01T17:00:00");
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let fractional = parse_timestamp("2024-03-01T17:00:00.123").unwrap();
        assert_eq!(format_timestamp(&fractional), "2024-03-01T17:00:00");

        let offset = parse_timestamp("2024-03-01T17:00:00-08:00").unwrap();
        assert_eq!(format_timestamp(&offset), "2024-03-01T17:00:00");

        assert!(matches!(
            parse_timestamp("03/01/2024"),
            Err(CarrierError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_package_wire_pounds_truncates() {
        assert_eq!(Package::new(2.9).wire_pounds().unwrap(), 2);
        assert_eq!(Package::new(10.0).wire_pounds().unwrap(), 10);
        assert_eq!(Package::from_ounces(40.0).wire_pounds().unwrap(), 2);
    }

    #[test]
    fn test_package_under_one_pound_sends_zero() {
        assert_eq!(Package::new(0.4).wire_pounds().unwrap(), 0);
        assert_eq!(Package::from_ounces(12.0).wire_pounds().unwrap(), 0);
        assert_eq!(Package::new(1e12).wire_pounds().unwrap(), u32::MAX);
    }

    #[test]
    fn test_package_rejects_non_positive_weight() {
        assert!(Package::new(0.0).wire_pounds().is_err());
        assert!(Package::new(-1.5).wire_pounds().is_err());
        assert!(Package::new(f64::NAN).wire_pounds().is_err());
    }

    #[test]
    fn test_service_code_table() {
        let names: Vec<(&str, &str)> = ServiceCode::ALL
            .iter()
            .map(|c| (c.as_str(), c.service_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("PDS", "GSO Priority Overnight"),
                ("EPS", "GSO Early Priority Overnight"),
                ("NPS", "GSO Noon Priority"),
                ("SDS", "GSO Saturday Delivery"),
                ("ESS", "GSO Early Saturday"),
                ("CPS", "GSO Ground"),
            ]
        );
        assert_eq!("cps".parse::<ServiceCode>().unwrap(), ServiceCode::Ground);
        assert!("XYZ".parse::<ServiceCode>().is_err());
    }

    #[test]
    fn test_location_normalizes_postal_code() {
        let loc = Location::from("  90210 ").with_country("US");
        assert_eq!(loc.postal_code, "90210");
        assert_eq!(loc.country.as_deref(), Some("US"));
        assert!(Location::new("").require_postal_code("origin").is_err());
    }

    #[test]
    fn test_tracking_status_lowercases() {
        let status = TrackingStatus::new("DELIVERED");
        assert_eq!(status.as_str(), "delivered");
        assert!(status.is_delivered());
        assert!(!TrackingStatus::new("In Transit").is_delivered());
    }

    #[test]
    fn test_total_price() {
        let estimate = RateEstimate {
            carrier: CARRIER_NAME.to_string(),
            service_name: "GSO Ground".to_string(),
            service_code: "CPS".to_string(),
            package_rates: vec![
                PackageRate { package: Package::new(1.0), rate: 850 },
                PackageRate { package: Package::new(5.0), rate: 1275 },
            ],
            currency: CURRENCY.to_string(),
            delivery_range: None,
        };
        assert_eq!(estimate.total_price(), 2125);
        assert!(estimate.delivery_date().is_none());
    }
}
