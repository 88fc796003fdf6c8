//! HTTP transport for SOAP calls.

use crate::config::GsoConfig;
use crate::error::{CarrierError, Result};
use crate::parser::ParsedDocument;
use crate::request::{SoapRequest, CONTENT_TYPE};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE as CONTENT_TYPE_HEADER, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

/// Sends one SOAP request and returns the parsed response.
///
/// Implementations must not retry; every failure is handed back to the caller.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    async fn post(&self, url: &str, request: &SoapRequest) -> Result<ParsedDocument>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    user_agent: String,
}

impl HttpTransport {
    /// Create a transport honouring the configured timeout and User-Agent.
    pub fn new(config: &GsoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CarrierError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl SoapTransport for HttpTransport {
    async fn post(&self, url: &str, request: &SoapRequest) -> Result<ParsedDocument> {
        let action = request.action.uri();
        debug!(url, soap_action = %action, "Sending SOAP request");

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .header(USER_AGENT, &self.user_agent)
            .header("SOAPAction", action.as_str())
            .body(request.body.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            let document = ParsedDocument::parse(&body)?;
            if let Some((code, message)) = document.fault() {
                return Err(CarrierError::SoapFault { code, message });
            }
            return Ok(document);
        }

        // SOAP 1.1 servers report faults with HTTP 500
        if let Ok(document) = ParsedDocument::parse(&body) {
            if let Some((code, message)) = document.fault() {
                warn!(status = %status, code = %code, "GSO returned SOAP fault");
                return Err(CarrierError::SoapFault { code, message });
            }
        }

        warn!(status = %status, soap_action = %action, "GSO request failed");
        Err(CarrierError::transport(format!("HTTP status {}", status)))
    }
}
