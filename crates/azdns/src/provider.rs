// ── Provider ──
//
// The public record-management surface. One provider serves one
// subscription + resource group; the zone is a per-call argument
// (trailing dot optional). The authenticated client is built on first
// use, and every operation holds the same mutex for its whole remote
// exchange, so calls against one provider never overlap.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::debug;

use azdns_api::records::RecordSet;
use azdns_api::{
    ChainedTokenCredential, ClientSecretCredential, Endpoints, ManagedIdentityCredential,
    RecordSetsClient, TokenCredential, TransportConfig,
};

use crate::config::ProviderConfig;
use crate::convert;
use crate::error::ProviderError;
use crate::name;
use crate::record::Record;

/// Azure DNS record provider.
///
/// Construct with [`Provider::new`] or [`Provider::from_env`], then
/// drive it through the inherent methods or the [`DnsProvider`] trait.
/// Nothing talks to the network until the first operation runs.
pub struct Provider {
    config: ProviderConfig,
    endpoints: Endpoints,
    client: Mutex<Option<RecordSetsClient>>,
}

impl Provider {
    /// Build a provider from explicit settings. Endpoints follow the
    /// configured cloud.
    pub fn new(config: ProviderConfig) -> Self {
        let endpoints = config.cloud.endpoints();
        Self {
            config,
            endpoints,
            client: Mutex::new(None),
        }
    }

    /// Build a provider from `AZURE_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Ok(Self::new(ProviderConfig::from_env()?))
    }

    /// Replace the service endpoints, e.g. to point every call at a
    /// local stub.
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    // ── Lazy client ──────────────────────────────────────────────────

    /// Get or build the memoized client. The caller holds the
    /// operation mutex, so construction happens at most once.
    fn ensure_client<'a>(
        &self,
        slot: &'a mut Option<RecordSetsClient>,
    ) -> Result<&'a RecordSetsClient, ProviderError> {
        match slot {
            Some(client) => Ok(client),
            None => {
                let client = self.build_client()?;
                Ok(slot.insert(client))
            }
        }
    }

    fn build_client(&self) -> Result<RecordSetsClient, ProviderError> {
        let transport = TransportConfig::default();
        let credential = self.credential(&transport)?;
        let client = RecordSetsClient::new(
            self.config.subscription_id.as_str(),
            credential,
            &self.endpoints,
            &transport,
        )?;
        Ok(client)
    }

    /// Pick the credential for the configured mode and wrap it in a
    /// single-link chain.
    fn credential(
        &self,
        transport: &TransportConfig,
    ) -> Result<Arc<dyn TokenCredential>, ProviderError> {
        let source: Box<dyn TokenCredential> = if self.config.has_service_principal() {
            debug!("authenticating with a service principal");
            let secret = SecretString::from(
                self.config
                    .client_secret
                    .as_ref()
                    .map_or("", ExposeSecret::expose_secret),
            );
            Box::new(ClientSecretCredential::new(
                self.endpoints.authority.clone(),
                self.config.tenant_id.as_str(),
                self.config.client_id.as_str(),
                secret,
                transport,
            )?)
        } else {
            debug!("authenticating with the instance's managed identity");
            Box::new(ManagedIdentityCredential::new(
                self.endpoints.imds.clone(),
                transport,
            )?)
        };
        Ok(Arc::new(ChainedTokenCredential::new(vec![source])))
    }

    // ── Operations ───────────────────────────────────────────────────

    /// List every record in the zone.
    ///
    /// All pages are fetched before conversion starts; a failure on
    /// any page or any record set aborts the whole call with no
    /// partial result.
    pub async fn get_records(&self, zone: &str) -> Result<Vec<Record>, ProviderError> {
        let mut guard = self.client.lock().await;
        let client = self.ensure_client(&mut guard)?;
        let zone = name::zone_name(zone);

        let sets: Vec<RecordSet> = client
            .list_by_dns_zone(&self.config.resource_group, zone)
            .try_collect()
            .await?;
        debug!("listed {} record sets in zone {zone}", sets.len());
        convert::records_from_sets(&sets)
    }

    /// Create each record in turn.
    ///
    /// A record whose (name, type) already exists in the zone fails
    /// the batch at that point; earlier creations are not rolled back.
    /// Returned records are the service's view, ETag ids included.
    pub async fn append_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        let mut appended = Vec::with_capacity(records.len());
        for record in &records {
            appended.push(self.create_record(zone, record).await?);
        }
        Ok(appended)
    }

    /// Create or overwrite each record in turn, unconditionally.
    ///
    /// Same batch semantics as [`Provider::append_records`].
    pub async fn set_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        let mut updated = Vec::with_capacity(records.len());
        for record in &records {
            updated.push(self.update_record(zone, record).await?);
        }
        Ok(updated)
    }

    /// Delete each record's (name, type) set in turn. Deleting an
    /// absent set is not an error. Returns the input records.
    pub async fn delete_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        for record in &records {
            self.delete_record(zone, record).await?;
        }
        Ok(records)
    }

    // ── Per-record calls (each one locks) ────────────────────────────

    async fn create_record(&self, zone: &str, record: &Record) -> Result<Record, ProviderError> {
        let mut guard = self.client.lock().await;
        let client = self.ensure_client(&mut guard)?;

        let record_set = convert::record_to_record_set(record)?;
        let record_type = convert::record_type_of(record)?;
        let set_name = name::record_set_name(&record.rr_name(), zone);

        let created = client
            .create_or_update(
                &self.config.resource_group,
                name::zone_name(zone),
                record_type,
                &set_name,
                &record_set,
                None,
                Some("*"),
            )
            .await?;
        first_record(&created)
    }

    async fn update_record(&self, zone: &str, record: &Record) -> Result<Record, ProviderError> {
        let mut guard = self.client.lock().await;
        let client = self.ensure_client(&mut guard)?;

        let record_set = convert::record_to_record_set(record)?;
        let record_type = convert::record_type_of(record)?;
        let set_name = name::record_set_name(&record.rr_name(), zone);

        let updated = client
            .create_or_update(
                &self.config.resource_group,
                name::zone_name(zone),
                record_type,
                &set_name,
                &record_set,
                None,
                None,
            )
            .await?;
        first_record(&updated)
    }

    async fn delete_record(&self, zone: &str, record: &Record) -> Result<(), ProviderError> {
        let mut guard = self.client.lock().await;
        let client = self.ensure_client(&mut guard)?;

        let record_type = convert::record_type_of(record)?;
        let set_name = name::record_set_name(&record.rr_name(), zone);

        client
            .delete(
                &self.config.resource_group,
                name::zone_name(zone),
                record_type,
                &set_name,
            )
            .await?;
        Ok(())
    }
}

/// First record out of a write response. A PUT carries exactly one
/// payload entry, so the response converts back to exactly one record.
fn first_record(set: &RecordSet) -> Result<Record, ProviderError> {
    convert::records_from_set(set)?
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Api {
            message: "record set response carried no records".to_owned(),
            code: None,
            status: None,
        })
}

// ── Record-management contract ───────────────────────────────────────

/// The four-operation record-management contract.
///
/// [`Provider`] implements it; the trait object form lets callers stay
/// generic over DNS backends.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in the zone.
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>, ProviderError>;

    /// Create records, failing on any (name, type) that already exists.
    async fn append_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError>;

    /// Create or overwrite records unconditionally.
    async fn set_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError>;

    /// Delete records by (name, type). Absent records are not an error.
    async fn delete_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError>;
}

#[async_trait]
impl DnsProvider for Provider {
    async fn get_records(&self, zone: &str) -> Result<Vec<Record>, ProviderError> {
        Provider::get_records(self, zone).await
    }

    async fn append_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        Provider::append_records(self, zone, records).await
    }

    async fn set_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        Provider::set_records(self, zone, records).await
    }

    async fn delete_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, ProviderError> {
        Provider::delete_records(self, zone, records).await
    }
}
