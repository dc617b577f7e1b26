// azdns-api: Async Rust client for the Azure DNS resource-manager API

pub mod auth;
pub mod client;
pub mod cloud;
pub mod error;
pub mod records;
pub mod transport;

pub use auth::{
    AccessToken, ChainedTokenCredential, ClientSecretCredential, ManagedIdentityCredential,
    TokenCredential,
};
pub use client::RecordSetsClient;
pub use cloud::{AzureCloud, Endpoints};
pub use error::Error;
pub use records::{RecordSet, RecordSetProperties, RecordType};
pub use transport::TransportConfig;
