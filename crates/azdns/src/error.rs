// ── Provider error types ──
//
// Caller-facing errors from azdns. Conversion failures identify the
// offending record data; remote failures are translated from
// `azdns_api::Error` into domain variants rather than exposed raw.

use thiserror::Error;

/// Unified error type for the provider crate.
#[derive(Debug, Error)]
pub enum ProviderError {
    // ── Conversion errors ────────────────────────────────────────────
    /// A record or record set carries a type this provider cannot map.
    #[error("the record type {type_name:?} cannot be interpreted")]
    UnsupportedType { type_name: String },

    /// An A/AAAA payload value failed to parse as an IP literal.
    #[error("invalid IP address {address:?}: {reason}")]
    InvalidIpAddress { address: String, reason: String },

    /// An SRV record-set name does not decompose into
    /// `_service._proto.name`.
    #[error("invalid SRV record name {name:?}, expected _service._proto.name")]
    InvalidSrvName { name: String },

    /// An SOA data string does not carry the seven expected fields.
    #[error("invalid SOA data {data:?}: {reason}")]
    InvalidSoaData { data: String, reason: String },

    /// A singleton record set (CNAME, SOA) arrived without its payload.
    #[error("record set {name:?} carries no {record_type} payload")]
    EmptyRecordData { record_type: String, name: String },

    // ── Authentication errors ────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Remote service errors (wrapped, not exposed raw) ─────────────
    #[error("Azure DNS API error: {message}")]
    Api {
        message: String,
        /// The resource-manager error code (e.g. "PreconditionFailed").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ProviderError {
    /// Returns `true` if the service rejected a guarded create because
    /// a record set with the same name and type already exists.
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self, Self::Api { status: Some(412), .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: Some(404), .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<azdns_api::Error> for ProviderError {
    fn from(err: azdns_api::Error) -> Self {
        match err {
            azdns_api::Error::Authentication { message } => {
                ProviderError::AuthenticationFailed { message }
            }
            azdns_api::Error::Transport(ref e) => ProviderError::Api {
                message: e.to_string(),
                code: None,
                status: err.status(),
            },
            azdns_api::Error::InvalidUrl(e) => ProviderError::Config {
                message: format!("Invalid URL: {e}"),
            },
            azdns_api::Error::Api {
                message,
                code,
                status,
            } => ProviderError::Api {
                message,
                code,
                status: Some(status),
            },
            azdns_api::Error::Deserialization { message, .. } => ProviderError::Api {
                message: format!("unexpected response shape: {message}"),
                code: None,
                status: None,
            },
        }
    }
}
