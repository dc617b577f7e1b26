// ── Provider configuration ──
//
// Flat settings struct loaded from `AZURE_`-prefixed environment
// variables. Credential material stays wrapped in `SecretString` so it
// never shows up in debug output.

use figment::Figment;
use figment::providers::Env;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use azdns_api::AzureCloud;

use crate::error::ProviderError;

/// Settings for a [`Provider`](crate::Provider).
///
/// `subscription_id` and `resource_group` are required. The three
/// service-principal fields select the authentication mode: set any of
/// them and the provider runs a client-secret grant; leave all of them
/// unset and it asks the instance metadata endpoint for a managed
/// identity token instead.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Subscription holding the DNS zones.
    pub subscription_id: String,

    /// Resource group holding the DNS zones.
    pub resource_group: String,

    /// Tenant for the client-secret grant.
    #[serde(default)]
    pub tenant_id: String,

    /// Application (client) id for the client-secret grant.
    #[serde(default)]
    pub client_id: String,

    /// Client secret for the client-secret grant.
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Sovereign cloud to target. Defaults to the public cloud.
    #[serde(default)]
    pub cloud: AzureCloud,
}

impl ProviderConfig {
    /// Load from `AZURE_`-prefixed environment variables:
    /// `AZURE_SUBSCRIPTION_ID`, `AZURE_RESOURCE_GROUP`,
    /// `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`,
    /// and `AZURE_CLOUD` (`public`, `government`, or `china`).
    pub fn from_env() -> Result<Self, ProviderError> {
        let config = Figment::new()
            .merge(Env::prefixed("AZURE_"))
            .extract()
            .map_err(|e| ProviderError::Config {
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// True when any service-principal field is set.
    pub(crate) fn has_service_principal(&self) -> bool {
        !self.tenant_id.is_empty()
            || !self.client_id.is_empty()
            || self
                .client_secret
                .as_ref()
                .is_some_and(|secret| !secret.expose_secret().is_empty())
    }
}
