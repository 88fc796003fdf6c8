//! Golden State Overnight carrier adapter
//!
//! Translates normalized rate and tracking lookups into GSO SOAP calls and
//! maps the SOAP responses back onto carrier-neutral results.
//!
//! # Features
//!
//! - Multi-package rate quotes (one SOAP call per package, joined by position)
//! - Shipment tracking with transit-note history
//! - Strict checking that per-package responses agree on their service list
//! - Pluggable transport for testing or custom HTTP stacks
//!
//! # Example
//!
//! ```ignore
//! use gso_carrier::{Credentials, GsoCarrier, GsoConfig, Package};
//!
//! let config = GsoConfig {
//!     credentials: Credentials::new("user", "password", "12345"),
//!     ..Default::default()
//! };
//! let carrier = GsoCarrier::from_config(config)?;
//! let rates = carrier
//!     .find_rates("90210", "94105", &[Package::new(2.5)])
//!     .await?;
//! ```

pub mod carrier;
pub mod config;
pub mod error;
pub mod mapper;
pub mod model;
pub mod parser;
pub mod request;
pub mod transport;

pub use carrier::GsoCarrier;
pub use config::{Credentials, GsoConfig, Requirement};
pub use error::{CarrierError, Result};
pub use model::{
    Location, Package, PackageRate, RateEstimate, RateResponse, ServiceCode, ShipmentEvent,
    TrackingResponse, TrackingStatus,
};
pub use transport::{HttpTransport, SoapTransport};
