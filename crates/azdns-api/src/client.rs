// Hand-crafted async HTTP client for the Azure DNS resource-manager API (2018-05-01).
//
// Base path: /subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/dnsZones/
// Auth: Bearer token from a TokenCredential

use std::sync::Arc;
use std::time::Duration;

use async_stream::try_stream;
use futures_core::Stream;
use reqwest::header::{AUTHORIZATION, HeaderValue, IF_MATCH, IF_NONE_MATCH};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::auth::{AccessToken, TokenCredential};
use crate::cloud::Endpoints;
use crate::error::Error;
use crate::records::{RecordSet, RecordSetListResult, RecordType};
use crate::transport::TransportConfig;

const API_VERSION: &str = "2018-05-01";

// Refresh the cached token once it gets this close to its deadline.
const TOKEN_REFRESH_WINDOW: Duration = Duration::from_secs(300);

// ── Error response shape from the management plane ───────────────────

#[derive(serde::Deserialize, Default)]
struct CloudError {
    #[serde(default)]
    error: CloudErrorBody,
}

#[derive(serde::Deserialize, Default)]
struct CloudErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for zone record sets.
///
/// Scoped to one subscription; resource group and zone are per-call
/// parameters. Bearer tokens come from the supplied credential and are
/// cached until shortly before expiry.
pub struct RecordSetsClient {
    http: reqwest::Client,
    management_url: Url,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
    scope: String,
    token: RwLock<Option<AccessToken>>,
}

impl RecordSetsClient {
    // ── Constructor ──────────────────────────────────────────────────

    /// Build a client for one subscription.
    pub fn new(
        subscription_id: impl Into<String>,
        credential: Arc<dyn TokenCredential>,
        endpoints: &Endpoints,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            management_url: endpoints.management.clone(),
            subscription_id: subscription_id.into(),
            credential,
            scope: endpoints.management_scope(),
            token: RwLock::new(None),
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn zone_path(&self, resource_group: &str, zone: &str) -> String {
        format!(
            "subscriptions/{}/resourceGroups/{resource_group}/providers/Microsoft.Network/dnsZones/{zone}",
            self.subscription_id
        )
    }

    /// `.../dnsZones/{zone}/recordsets` -- all record sets in a zone.
    fn recordsets_url(&self, resource_group: &str, zone: &str) -> Url {
        let mut url = self
            .management_url
            .join(&format!("{}/recordsets", self.zone_path(resource_group, zone)))
            .expect("path should be valid relative URL");
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    /// `.../dnsZones/{zone}/{TYPE}/{name}` -- one record set.
    fn record_set_url(
        &self,
        resource_group: &str,
        zone: &str,
        record_type: RecordType,
        relative_name: &str,
    ) -> Url {
        let mut url = self
            .management_url
            .join(&format!(
                "{}/{record_type}/{relative_name}",
                self.zone_path(resource_group, zone)
            ))
            .expect("path should be valid relative URL");
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    // ── Token cache ──────────────────────────────────────────────────

    /// Authorization header from the cached token, going back to the
    /// credential when the cache is empty or near expiry.
    async fn bearer(&self) -> Result<HeaderValue, Error> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.expires_within(TOKEN_REFRESH_WINDOW) {
                    return Self::bearer_value(token);
                }
            }
        }

        let mut guard = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            if !token.expires_within(TOKEN_REFRESH_WINDOW) {
                return Self::bearer_value(token);
            }
        }

        debug!("acquiring management-plane token");
        let fresh = self.credential.token(&self.scope).await?;
        let value = Self::bearer_value(&fresh)?;
        *guard = Some(fresh);
        Ok(value)
    }

    fn bearer_value(token: &AccessToken) -> Result<HeaderValue, Error> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid bearer header value: {e}"),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let bearer = self.bearer().await?;
        let resp = self.http.get(url).header(AUTHORIZATION, bearer).send().await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<CloudError>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.error.message.unwrap_or_else(|| status.to_string()),
                code: err.error.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() { status.to_string() } else { raw },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Page through every record set in a zone, following `nextLink`.
    ///
    /// Yields sets in service order, page by page; page size is chosen
    /// by the service. A failure mid-pagination ends the stream with
    /// that error.
    pub fn list_by_dns_zone<'a>(
        &'a self,
        resource_group: &'a str,
        zone: &'a str,
    ) -> impl Stream<Item = Result<RecordSet, Error>> + 'a {
        try_stream! {
            let mut next = Some(self.recordsets_url(resource_group, zone));
            while let Some(url) = next {
                let page: RecordSetListResult = self.get(url).await?;
                for set in page.value {
                    yield set;
                }
                // nextLink is absolute and already carries api-version.
                next = page.next_link.as_deref().map(Url::parse).transpose()?;
            }
        }
    }

    /// PUT one record set, returning the service's view of it (fresh
    /// ETag included).
    ///
    /// `if_match` / `if_none_match` map straight onto the conditional
    /// headers: `if_none_match = Some("*")` makes the call create-only,
    /// both `None` makes it an unconditional upsert.
    pub async fn create_or_update(
        &self,
        resource_group: &str,
        zone: &str,
        record_type: RecordType,
        relative_name: &str,
        record_set: &RecordSet,
        if_match: Option<&str>,
        if_none_match: Option<&str>,
    ) -> Result<RecordSet, Error> {
        let url = self.record_set_url(resource_group, zone, record_type, relative_name);
        debug!("PUT {url}");

        let bearer = self.bearer().await?;
        let mut req = self
            .http
            .put(url)
            .header(AUTHORIZATION, bearer)
            .json(record_set);
        if let Some(etag) = if_match {
            req = req.header(IF_MATCH, etag);
        }
        if let Some(etag) = if_none_match {
            req = req.header(IF_NONE_MATCH, etag);
        }

        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    /// DELETE one record set by name and type.
    ///
    /// Deleting an absent set is not an error: the service answers 204,
    /// and a 404 is treated the same way.
    pub async fn delete(
        &self,
        resource_group: &str,
        zone: &str,
        record_type: RecordType,
        relative_name: &str,
    ) -> Result<(), Error> {
        let url = self.record_set_url(resource_group, zone, record_type, relative_name);
        debug!("DELETE {url}");

        let bearer = self.bearer().await?;
        let resp = self
            .http
            .delete(url)
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        self.handle_empty(resp).await
    }
}
