// ── Entra ID token credentials ──
//
// Bearer-token acquisition for the management plane. Two flows:
// service-principal client-secret grant against the cloud authority,
// and managed identity via the instance-metadata service (IMDS).
// A chained credential tries its links in order and reports an
// aggregate failure once every link has been exhausted.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const IMDS_API_VERSION: &str = "2018-02-01";

/// A bearer token plus its expiry deadline.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub expires_at: Instant,
}

impl AccessToken {
    /// Wrap a raw bearer token valid for `lifetime` from now.
    pub fn new(token: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            token: SecretString::from(token.into()),
            expires_at: Instant::now() + lifetime,
        }
    }

    /// Returns `true` once the token is within `window` of its deadline.
    pub fn expires_within(&self, window: Duration) -> bool {
        Instant::now() + window >= self.expires_at
    }
}

/// A source of management-plane bearer tokens.
///
/// `scope` is the OAuth2 scope of the target audience, e.g.
/// `https://management.azure.com/.default`.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Acquire a token for the given scope.
    async fn token(&self, scope: &str) -> Result<AccessToken, Error>;
}

// ── Service principal ───────────────────────────────────────────────

/// OAuth2 client-credentials grant against the cloud authority:
/// `POST {authority}/{tenant}/oauth2/v2.0/token`.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: Url,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
}

#[derive(Deserialize)]
struct AuthorityTokenResponse {
    access_token: String,
    expires_in: u64,
}

impl ClientSecretCredential {
    pub fn new(
        authority: Url,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            authority,
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
        })
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn token(&self, scope: &str) -> Result<AccessToken, Error> {
        let url = self
            .authority
            .join(&format!("{}/oauth2/v2.0/token", self.tenant_id))
            .map_err(Error::InvalidUrl)?;

        debug!("requesting service-principal token for {}", self.client_id);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", scope),
        ];
        let resp = self
            .http
            .post(url)
            .form(&params)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("client-secret grant failed (HTTP {status}): {body}"),
            });
        }

        // Token responses are never echoed into errors: the body holds
        // the bearer secret.
        let token: AuthorityTokenResponse =
            resp.json().await.map_err(|e| Error::Authentication {
                message: format!("unparseable token response: {e}"),
            })?;
        Ok(AccessToken::new(
            token.access_token,
            Duration::from_secs(token.expires_in),
        ))
    }
}

// ── Managed identity ────────────────────────────────────────────────

/// Managed-identity token from the instance-metadata service on
/// Azure-hosted compute:
/// `GET {imds}/metadata/identity/oauth2/token` with `Metadata: true`.
pub struct ManagedIdentityCredential {
    http: reqwest::Client,
    imds: Url,
}

#[derive(Deserialize)]
struct ImdsTokenResponse {
    access_token: String,
    // IMDS serializes numbers as JSON strings.
    expires_in: String,
}

impl ManagedIdentityCredential {
    pub fn new(imds: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            imds,
        })
    }
}

#[async_trait]
impl TokenCredential for ManagedIdentityCredential {
    async fn token(&self, scope: &str) -> Result<AccessToken, Error> {
        // IMDS takes the bare audience, not an OAuth2 scope.
        let resource = scope.strip_suffix("/.default").unwrap_or(scope);

        let mut url = self
            .imds
            .join("metadata/identity/oauth2/token")
            .map_err(Error::InvalidUrl)?;
        url.query_pairs_mut()
            .append_pair("api-version", IMDS_API_VERSION)
            .append_pair("resource", resource);

        debug!("requesting managed-identity token from IMDS");

        let resp = self
            .http
            .get(url)
            .header("Metadata", "true")
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("IMDS token request failed (HTTP {status}): {body}"),
            });
        }

        let token: ImdsTokenResponse = resp.json().await.map_err(|e| Error::Authentication {
            message: format!("unparseable token response: {e}"),
        })?;
        let expires_in = token
            .expires_in
            .parse::<u64>()
            .map_err(|_| Error::Authentication {
                message: format!("IMDS returned unparseable expires_in: {:?}", token.expires_in),
            })?;
        Ok(AccessToken::new(
            token.access_token,
            Duration::from_secs(expires_in),
        ))
    }
}

// ── Fallback chain ──────────────────────────────────────────────────

/// Ordered fallback over credential sources.
///
/// Links are tried in sequence; the first token wins. Only when every
/// link has failed does the chain fail, carrying all link errors in
/// one message.
pub struct ChainedTokenCredential {
    sources: Vec<Box<dyn TokenCredential>>,
}

impl ChainedTokenCredential {
    pub fn new(sources: Vec<Box<dyn TokenCredential>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl TokenCredential for ChainedTokenCredential {
    async fn token(&self, scope: &str) -> Result<AccessToken, Error> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.token(scope).await {
                Ok(token) => return Ok(token),
                Err(e) => {
                    debug!("credential source failed: {e}");
                    failures.push(e.to_string());
                }
            }
        }
        let message = if failures.is_empty() {
            "credential chain is empty".to_owned()
        } else {
            format!("all credential sources failed: {}", failures.join("; "))
        };
        Err(Error::Authentication { message })
    }
}
