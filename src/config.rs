//! Configuration types for the GSO carrier adapter.

use crate::error::{CarrierError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default GSO web service endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://wsa.gso.com/gsoshipws1.0/gsoshipws.asmx";

/// Main configuration for a GSO carrier instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GsoConfig {
    /// SOAP endpoint URL
    pub endpoint: String,

    /// Per-call HTTP timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent sent with every call
    pub user_agent: String,

    /// Account credentials
    pub credentials: Credentials,
}

impl Default for GsoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 30,
            user_agent: concat!("gso-carrier/", env!("CARGO_PKG_VERSION")).to_string(),
            credentials: Credentials::default(),
        }
    }
}

impl GsoConfig {
    /// Per-call timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Credential fields a GSO account needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Username,
    Password,
    AccountNumber,
}

impl Requirement {
    /// Get the configuration key for this requirement.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::AccountNumber => "account_number",
        }
    }
}

/// The credential set every request requires.
pub const REQUIREMENTS: [Requirement; 3] = [
    Requirement::Username,
    Requirement::Password,
    Requirement::AccountNumber,
];

/// Fixed username/password/account-number credential set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub account_number: Option<String>,
}

impl Credentials {
    /// Create a complete credential set.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            account_number: Some(account_number.into()),
        }
    }

    /// Look up a credential; blank values count as missing.
    pub fn get(&self, requirement: Requirement) -> Option<&str> {
        let value = match requirement {
            Requirement::Username => &self.username,
            Requirement::Password => &self.password,
            Requirement::AccountNumber => &self.account_number,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Fetch a credential or fail with a configuration error.
    pub fn require(&self, requirement: Requirement) -> Result<&str> {
        self.get(requirement).ok_or_else(|| {
            CarrierError::Configuration(format!(
                "missing required credential: {}",
                requirement.as_str()
            ))
        })
    }

    /// Check every entry of [`REQUIREMENTS`], reporting all missing keys at once.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = REQUIREMENTS
            .iter()
            .filter(|r| self.get(**r).is_none())
            .map(|r| r.as_str())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CarrierError::Configuration(format!(
                "missing required credentials: {}",
                missing.join(", ")
            )))
        }
    }
}
