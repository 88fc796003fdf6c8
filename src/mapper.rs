//! Mapping of GSO SOAP responses onto normalized rate and tracking results.

use crate::error::{CarrierError, Result};
use crate::model::{
    parse_timestamp, Package, PackageRate, RateEstimate, ServiceCode, ShipmentEvent,
    TrackingResponse, TrackingStatus, CARRIER_NAME, CURRENCY,
};
use crate::parser::{ParsedDocument, XmlNode};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

const DELIVERY_SERVICES_PATH: [&str; 5] = [
    "Envelope",
    "Body",
    "GetShippingRatesAndTimesResponse",
    "GetShippingRatesAndTimesResult",
    "DeliveryServices",
];

const SHIPMENT_INFO_PATH: [&str; 5] = [
    "Envelope",
    "Body",
    "TrackShipmentResponse",
    "TrackShipmentResult",
    "ShipmentInfo",
];

/// One delivery service as quoted for a single package.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceQuote {
    pub code: String,
    pub description: String,
    pub guaranteed_delivery: Option<NaiveDateTime>,
    /// Charge in cents
    pub total_charge: i64,
}

impl ServiceQuote {
    fn from_node(node: &XmlNode) -> Result<Self> {
        let code = required_text(node, "ServiceCode")?.trim().to_string();
        let description = optional_text(node, "ServiceDescription")
            .unwrap_or_default()
            .to_string();
        let guaranteed_delivery = optional_text(node, "DeliveryDate")
            .map(parse_timestamp)
            .transpose()?;

        let raw_charge = node
            .at(&["ShipmentCharges", "TotalCharge"])
            .and_then(XmlNode::text)
            .ok_or_else(|| {
                CarrierError::malformed(format!("service {code} has no ShipmentCharges/TotalCharge"))
            })?;

        Ok(Self {
            total_charge: parse_cents(raw_charge)?,
            code,
            description,
            guaranteed_delivery,
        })
    }

    /// Display name from the service table, falling back to GSO's description.
    pub fn service_name(&self) -> String {
        match self.code.parse::<ServiceCode>() {
            Ok(code) => code.service_name().to_string(),
            Err(_) => {
                warn!(service_code = %self.code, "Unknown GSO service code");
                if self.description.is_empty() {
                    self.code.clone()
                } else {
                    self.description.clone()
                }
            }
        }
    }
}

/// Extract the delivery services quoted in one rate response, in document order.
pub fn delivery_services(document: &ParsedDocument) -> Result<Vec<ServiceQuote>> {
    let services = document.at(&DELIVERY_SERVICES_PATH).ok_or_else(|| {
        CarrierError::malformed(format!("missing {}", DELIVERY_SERVICES_PATH.join("/")))
    })?;

    services
        .get("DeliveryService")
        .map(XmlNode::as_list)
        .unwrap_or_default()
        .into_iter()
        .map(ServiceQuote::from_node)
        .collect()
}

/// Combine per-package rate responses into one estimate per service.
///
/// `documents[k]` must be the response for `packages[k]`. Every document has
/// to list the same services in the same order as the first one, since
/// charges are matched up by position.
pub fn map_rates(packages: &[Package], documents: &[ParsedDocument]) -> Result<Vec<RateEstimate>> {
    if packages.is_empty() {
        return Err(CarrierError::InvalidRequest(
            "at least one package is required".to_string(),
        ));
    }
    if documents.len() != packages.len() {
        return Err(CarrierError::shape_mismatch(
            documents.len().min(packages.len()),
            format!(
                "expected {} responses, received {}",
                packages.len(),
                documents.len()
            ),
        ));
    }

    let quotes: Vec<Vec<ServiceQuote>> = documents
        .iter()
        .map(delivery_services)
        .collect::<Result<_>>()?;

    let first = &quotes[0];
    for (index, other) in quotes.iter().enumerate().skip(1) {
        check_same_services(first, other, index)?;
    }

    debug!(
        services = first.len(),
        packages = packages.len(),
        "Mapping GSO rate responses"
    );

    let estimates = first
        .iter()
        .enumerate()
        .map(|(position, service)| RateEstimate {
            carrier: CARRIER_NAME.to_string(),
            service_name: service.service_name(),
            service_code: service.code.clone(),
            package_rates: packages
                .iter()
                .zip(&quotes)
                .map(|(package, package_quotes)| PackageRate {
                    package: package.clone(),
                    rate: package_quotes[position].total_charge,
                })
                .collect(),
            currency: CURRENCY.to_string(),
            delivery_range: service.guaranteed_delivery.map(|at| [at, at]),
        })
        .collect();

    Ok(estimates)
}

fn check_same_services(first: &[ServiceQuote], other: &[ServiceQuote], index: usize) -> Result<()> {
    if first.len() != other.len() {
        warn!(
            package_index = index,
            expected = first.len(),
            found = other.len(),
            "GSO rate responses disagree on service count"
        );
        return Err(CarrierError::shape_mismatch(
            index,
            format!("expected {} services, found {}", first.len(), other.len()),
        ));
    }

    if let Some((position, (a, b))) = first
        .iter()
        .zip(other)
        .enumerate()
        .find(|(_, (a, b))| a.code != b.code)
    {
        warn!(
            package_index = index,
            position,
            expected = %a.code,
            found = %b.code,
            "GSO rate responses disagree on service order"
        );
        return Err(CarrierError::shape_mismatch(
            index,
            format!(
                "service at position {} is {}, expected {}",
                position, b.code, a.code
            ),
        ));
    }

    Ok(())
}

/// Map a tracking response for `tracking_number`.
pub fn map_tracking(tracking_number: &str, document: &ParsedDocument) -> Result<TrackingResponse> {
    let info = document.at(&SHIPMENT_INFO_PATH).ok_or_else(|| {
        CarrierError::malformed(format!("missing {}", SHIPMENT_INFO_PATH.join("/")))
    })?;

    let status = TrackingStatus::new(required_text(info, "TransitStatus")?);
    let scheduled_delivery_date = optional_text(info, "ScheduledDeliveryDate")
        .map(parse_timestamp)
        .transpose()?;

    let shipment_events = info
        .at(&["TransitNotes", "TransitNote"])
        .map(XmlNode::as_list)
        .unwrap_or_default()
        .into_iter()
        .map(|note| {
            Ok(ShipmentEvent {
                time: parse_timestamp(required_text(note, "EventDate")?)?,
                message: optional_text(note, "Comments").unwrap_or_default().to_string(),
                location: None,
                kind: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        tracking_number,
        status = %status,
        events = shipment_events.len(),
        "Mapped GSO tracking response"
    );

    Ok(TrackingResponse {
        carrier: CARRIER_NAME.to_string(),
        status,
        scheduled_delivery_date,
        tracking_number: tracking_number.to_string(),
        shipment_events,
    })
}

fn required_text<'a>(node: &'a XmlNode, name: &str) -> Result<&'a str> {
    node.get(name)
        .and_then(XmlNode::text)
        .ok_or_else(|| CarrierError::malformed(format!("missing {name}")))
}

/// Text of a child element; blank counts as absent.
fn optional_text<'a>(node: &'a XmlNode, name: &str) -> Option<&'a str> {
    node.get(name)
        .and_then(XmlNode::text)
        .filter(|text| !text.trim().is_empty())
}

/// Decimal dollar amount to cents.
fn parse_cents(raw: &str) -> Result<i64> {
    let dollars: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CarrierError::malformed(format!("invalid charge '{raw}'")))?;
    if !dollars.is_finite() {
        return Err(CarrierError::malformed(format!("invalid charge '{raw}'")));
    }
    Ok((dollars * 100.0).round() as i64)
}
