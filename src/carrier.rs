//! GSO carrier: rate and tracking lookups.
//!
//! Coordinates request building, transport and response mapping. A carrier
//! holds only immutable configuration, so one instance can serve concurrent
//! lookups.

use crate::config::{GsoConfig, Requirement, REQUIREMENTS};
use crate::error::{CarrierError, Result};
use crate::mapper::{map_rates, map_tracking};
use crate::model::{Location, Package, RateResponse, TrackingResponse, CARRIER_NAME};
use crate::request::{build_rate_request, build_tracking_request};
use crate::transport::{HttpTransport, SoapTransport};
use chrono::{NaiveDateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info};

/// Golden State Overnight carrier.
pub struct GsoCarrier<T = HttpTransport> {
    config: GsoConfig,
    transport: T,
}

impl GsoCarrier<HttpTransport> {
    /// Create a carrier talking HTTP to the configured endpoint.
    pub fn from_config(config: GsoConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: SoapTransport> GsoCarrier<T> {
    /// Create a carrier with a custom transport.
    pub fn new(config: GsoConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn name(&self) -> &'static str {
        CARRIER_NAME
    }

    /// Credentials that must be configured before any lookup.
    pub fn requirements(&self) -> &'static [Requirement] {
        &REQUIREMENTS
    }

    pub fn config(&self) -> &GsoConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Quote every GSO service for the given packages, shipping now.
    pub async fn find_rates(
        &self,
        origin: impl Into<Location>,
        destination: impl Into<Location>,
        packages: &[Package],
    ) -> Result<RateResponse> {
        let ship_date = Utc::now().naive_utc();
        self.find_rates_on(origin, destination, packages, ship_date)
            .await
    }

    /// Quote every GSO service for the given packages and ship date.
    ///
    /// Issues one call per package, concurrently. Any failed call fails the
    /// whole lookup. Every request is built, and its credentials checked,
    /// before the first call goes out.
    pub async fn find_rates_on(
        &self,
        origin: impl Into<Location>,
        destination: impl Into<Location>,
        packages: &[Package],
        ship_date: NaiveDateTime,
    ) -> Result<RateResponse> {
        if packages.is_empty() {
            return Err(CarrierError::InvalidRequest(
                "at least one package is required".to_string(),
            ));
        }

        let origin = origin.into();
        let destination = destination.into();

        let requests = packages
            .iter()
            .map(|package| {
                build_rate_request(
                    &origin,
                    &destination,
                    package,
                    &self.config.credentials,
                    &ship_date,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            origin = %origin.postal_code,
            destination = %destination.postal_code,
            packages = packages.len(),
            "Requesting GSO rates"
        );

        let documents = try_join_all(
            requests
                .iter()
                .map(|request| self.transport.post(&self.config.endpoint, request)),
        )
        .await?;

        let rates = map_rates(packages, &documents)?;
        debug!(services = rates.len(), "GSO rates mapped");

        Ok(RateResponse { rates })
    }

    /// Look up the tracking history of a shipment.
    pub async fn find_tracking_info(&self, tracking_number: &str) -> Result<TrackingResponse> {
        let request = build_tracking_request(tracking_number, &self.config.credentials)?;

        info!(tracking_number, "Requesting GSO tracking info");
        let document = self.transport.post(&self.config.endpoint, &request).await?;

        map_tracking(tracking_number.trim(), &document)
    }
}
