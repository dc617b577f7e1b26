// azdns: Azure DNS provider for normalized record management.

pub mod config;
pub mod error;
pub mod provider;
pub mod record;

mod convert;
mod name;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use provider::{DnsProvider, Provider};
pub use record::Record;

// Cloud selection and endpoint overrides come from the API crate.
pub use azdns_api::{AzureCloud, Endpoints};
