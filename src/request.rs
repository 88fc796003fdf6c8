//! SOAP request construction for the GSO web service.

use crate::config::{Credentials, Requirement};
use crate::error::{CarrierError, Result};
use crate::model::{format_timestamp, Location, Package};
use chrono::NaiveDateTime;
use quick_xml::escape::escape;

/// SOAP 1.1 envelope namespace.
pub const SOAP_11_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
/// GSO service namespace.
pub const GSO_NS: &str = "http://gso.com/GsoShipWS";

/// Content-Type of every outbound call.
pub const CONTENT_TYPE: &str = "text/xml;charset=UTF-8";

/// Search type for tracking-number lookups.
const TRACKING_SEARCH_TYPE: &str = "TRACKINGNUM";

/// GSO operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapAction {
    GetShippingRatesAndTimes,
    TrackShipment,
}

impl SoapAction {
    /// Operation element name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetShippingRatesAndTimes => "GetShippingRatesAndTimes",
            Self::TrackShipment => "TrackShipment",
        }
    }

    /// Value of the `SOAPAction` HTTP header.
    pub fn uri(&self) -> String {
        format!("{}/{}", GSO_NS, self.as_str())
    }
}

/// A ready-to-send SOAP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    pub action: SoapAction,
    pub body: String,
}

/// Build a rate-and-time lookup for a single package.
///
/// GSO rates one package per call, so multi-package lookups build one of
/// these per package.
pub fn build_rate_request(
    origin: &Location,
    destination: &Location,
    package: &Package,
    credentials: &Credentials,
    ship_date: &NaiveDateTime,
) -> Result<SoapRequest> {
    credentials.validate()?;
    let username = credentials.require(Requirement::Username)?;
    let password = credentials.require(Requirement::Password)?;
    let account_number = credentials.require(Requirement::AccountNumber)?;

    let origin_zip = origin.require_postal_code("origin")?;
    let destination_zip = destination.require_postal_code("destination")?;
    let weight = package.wire_pounds()?;

    let body = format!(
        r#"<soapenv:Envelope xmlns:soapenv="{soap_ns}" xmlns:gsos="{gso_ns}">
  <soapenv:Header>
    <gsos:AuthenticationHeader>
      <gsos:UserName>{username}</gsos:UserName>
      <gsos:Password>{password}</gsos:Password>
    </gsos:AuthenticationHeader>
  </soapenv:Header>
  <soapenv:Body>
    <gsos:GetShippingRatesAndTimes>
      <gsos:GetShippingRatesAndTimesRequest>
        <gsos:AccountNumber>{account_number}</gsos:AccountNumber>
        <gsos:OriginZip>{origin_zip}</gsos:OriginZip>
        <gsos:DestinationZip>{destination_zip}</gsos:DestinationZip>
        <gsos:PackageWeight>{weight}</gsos:PackageWeight>
        <gsos:ShipDate>{ship_date}</gsos:ShipDate>
      </gsos:GetShippingRatesAndTimesRequest>
    </gsos:GetShippingRatesAndTimes>
  </soapenv:Body>
</soapenv:Envelope>"#,
        soap_ns = SOAP_11_NS,
        gso_ns = GSO_NS,
        username = escape(username),
        password = escape(password),
        account_number = escape(account_number),
        origin_zip = escape(origin_zip),
        destination_zip = escape(destination_zip),
        weight = weight,
        ship_date = format_timestamp(ship_date),
    );

    Ok(SoapRequest {
        action: SoapAction::GetShippingRatesAndTimes,
        body,
    })
}

/// Build a shipment tracking lookup.
///
/// Unlike rate lookups, GSO tracking calls have always been sent without the
/// authentication header; only the account number travels in the body.
// TODO: confirm with GSO whether TrackShipment requires AuthenticationHeader.
pub fn build_tracking_request(
    tracking_number: &str,
    credentials: &Credentials,
) -> Result<SoapRequest> {
    credentials.validate()?;
    let account_number = credentials.require(Requirement::AccountNumber)?;

    let tracking_number = tracking_number.trim();
    if tracking_number.is_empty() {
        return Err(CarrierError::InvalidRequest(
            "tracking number is empty".to_string(),
        ));
    }

    let body = format!(
        r#"<soapenv:Envelope xmlns:soapenv="{soap_ns}" xmlns:gsos="{gso_ns}">
  <soapenv:Body>
    <gsos:TrackShipment>
      <gsos:TrackShipmentRequest>
        <gsos:AccountNumber>{account_number}</gsos:AccountNumber>
        <gsos:SearchType>{search_type}</gsos:SearchType>
        <gsos:SearchValue>{search_value}</gsos:SearchValue>
      </gsos:TrackShipmentRequest>
    </gsos:TrackShipment>
  </soapenv:Body>
</soapenv:Envelope>"#,
        soap_ns = SOAP_11_NS,
        gso_ns = GSO_NS,
        account_number = escape(account_number),
        search_type = TRACKING_SEARCH_TYPE,
        search_value = escape(tracking_number),
    );

    Ok(SoapRequest {
        action: SoapAction::TrackShipment,
        body,
    })
}
