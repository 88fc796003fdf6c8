//! Error types for the GSO carrier adapter.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CarrierError>;

/// GSO carrier errors.
///
/// Every variant is terminal: lookups never return partial results.
#[derive(Error, Debug)]
pub enum CarrierError {
    /// A required credential or configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input that cannot be turned into a vendor request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP level failure, passed through as-is.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The vendor answered with a SOAP Fault.
    #[error("SOAP fault [{code}]: {message}")]
    SoapFault { code: String, message: String },

    /// The response lacks an expected element or holds an unparseable value.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Per-package rate responses disagree on their service list.
    #[error("Response shape mismatch for package {package_index}: {detail}")]
    ResponseShapeMismatch { package_index: usize, detail: String },
}

impl CarrierError {
    /// Get the string code for this error.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::SoapFault { .. } => "SOAP_FAULT",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::ResponseShapeMismatch { .. } => "RESPONSE_SHAPE_MISMATCH",
        }
    }

    /// Transport failure with no underlying HTTP client error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Whether the failure was an HTTP client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source: Some(err), .. } if err.is_timeout())
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub(crate) fn shape_mismatch(package_index: usize, detail: impl Into<String>) -> Self {
        Self::ResponseShapeMismatch {
            package_index,
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for CarrierError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CarrierError::Configuration("missing".into()).as_str(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            CarrierError::shape_mismatch(1, "x").as_str(),
            "RESPONSE_SHAPE_MISMATCH"
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = CarrierError::shape_mismatch(2, "expected 3 services, found 2");
        assert_eq!(
            err.to_string(),
            "Response shape mismatch for package 2: expected 3 services, found 2"
        );

        let fault = CarrierError::SoapFault {
            code: "soap:Server".into(),
            message: "Invalid account".into(),
        };
        assert_eq!(fault.to_string(), "SOAP fault [soap:Server]: Invalid account");
    }

    #[test]
    fn test_transport_error_keeps_source() {
        use std::error::Error as _;

        let client_err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = CarrierError::from(client_err);
        assert_eq!(err.as_str(), "TRANSPORT_ERROR");
        assert!(err.source().is_some());
        assert!(!err.is_timeout());

        let plain = CarrierError::transport("HTTP status 503 Service Unavailable");
        assert!(plain.source().is_none());
        assert_eq!(
            plain.to_string(),
            "Transport error: HTTP status 503 Service Unavailable"
        );
    }
}
