// ── DNS resource-manager wire model ──
//
// Serde mirrors of the record-set schema from the 2018-05-01 API
// version. Field casing follows the service exactly (`TTL`,
// `ARecords`, `caaRecords`, ...) so these types round-trip without
// custom (de)serializers. Writes send only `properties`; the service
// fills in `id`, `name`, `type`, and `etag` on responses.

use std::fmt;

use serde::{Deserialize, Serialize};

// Aggregate `type` field prefix on listed record sets.
const RESOURCE_TYPE_PREFIX: &str = "Microsoft.Network/dnszones/";

/// The ten record-set types the service models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
    Caa,
    Cname,
    Mx,
    Ns,
    Ptr,
    Soa,
    Srv,
    Txt,
}

impl RecordType {
    /// Canonical uppercase name, as used in request paths and type tags.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Caa => "CAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Txt => "TXT",
        }
    }

    /// Parse an exact uppercase type name. Anything else (including
    /// mixed case) is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "A" => Some(Self::A),
            "AAAA" => Some(Self::Aaaa),
            "CAA" => Some(Self::Caa),
            "CNAME" => Some(Self::Cname),
            "MX" => Some(Self::Mx),
            "NS" => Some(Self::Ns),
            "PTR" => Some(Self::Ptr),
            "SOA" => Some(Self::Soa),
            "SRV" => Some(Self::Srv),
            "TXT" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Parse the `type` field of a listed record set, stripping the
    /// aggregate resource prefix (`Microsoft.Network/dnszones/`) when
    /// present.
    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        Self::from_name(
            resource_type
                .strip_prefix(RESOURCE_TYPE_PREFIX)
                .unwrap_or(resource_type),
        )
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record set, the service's unit of storage for DNS answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    /// Full ARM resource id, response-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Zone-relative name (`@` at the apex), response-only.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Aggregate resource type, e.g. `Microsoft.Network/dnszones/A`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub record_type: String,
    /// Concurrency token. Changes on every successful write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub properties: RecordSetProperties,
}

/// Record-set properties: the TTL plus exactly one populated payload
/// field matching the set's declared type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSetProperties {
    #[serde(rename = "TTL", default)]
    pub ttl: i64,
    /// Fully-qualified name, response-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(rename = "ARecords", default, skip_serializing_if = "Option::is_none")]
    pub a_records: Option<Vec<ARecord>>,
    #[serde(rename = "AAAARecords", default, skip_serializing_if = "Option::is_none")]
    pub aaaa_records: Option<Vec<AaaaRecord>>,
    #[serde(rename = "caaRecords", default, skip_serializing_if = "Option::is_none")]
    pub caa_records: Option<Vec<CaaRecord>>,
    #[serde(rename = "CNAMERecord", default, skip_serializing_if = "Option::is_none")]
    pub cname_record: Option<CnameRecord>,
    #[serde(rename = "MXRecords", default, skip_serializing_if = "Option::is_none")]
    pub mx_records: Option<Vec<MxRecord>>,
    #[serde(rename = "NSRecords", default, skip_serializing_if = "Option::is_none")]
    pub ns_records: Option<Vec<NsRecord>>,
    #[serde(rename = "PTRRecords", default, skip_serializing_if = "Option::is_none")]
    pub ptr_records: Option<Vec<PtrRecord>>,
    #[serde(rename = "SOARecord", default, skip_serializing_if = "Option::is_none")]
    pub soa_record: Option<SoaRecord>,
    #[serde(rename = "SRVRecords", default, skip_serializing_if = "Option::is_none")]
    pub srv_records: Option<Vec<SrvRecord>>,
    #[serde(rename = "TXTRecords", default, skip_serializing_if = "Option::is_none")]
    pub txt_records: Option<Vec<TxtRecord>>,
}

/// A-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ARecord {
    #[serde(rename = "ipv4Address")]
    pub ipv4_address: String,
}

/// AAAA-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AaaaRecord {
    #[serde(rename = "ipv6Address")]
    pub ipv6_address: String,
}

/// CAA-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaaRecord {
    pub flags: i32,
    pub tag: String,
    pub value: String,
}

/// CNAME payload. Singleton: a CNAME set holds exactly one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CnameRecord {
    pub cname: String,
}

/// MX-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MxRecord {
    pub preference: i32,
    pub exchange: String,
}

/// NS-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NsRecord {
    pub nsdname: String,
}

/// PTR-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtrRecord {
    pub ptrdname: String,
}

/// SOA payload. Singleton, apex-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoaRecord {
    pub host: String,
    pub email: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: i64,
    #[serde(rename = "refreshTime")]
    pub refresh_time: i64,
    #[serde(rename = "retryTime")]
    pub retry_time: i64,
    #[serde(rename = "expireTime")]
    pub expire_time: i64,
    #[serde(rename = "minimumTTL")]
    pub minimum_ttl: i64,
}

/// SRV-record payload entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrvRecord {
    pub priority: i32,
    pub weight: i32,
    pub port: i32,
    pub target: String,
}

/// TXT-record payload entry: one entry holds the string values of one
/// logical TXT record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxtRecord {
    #[serde(default)]
    pub value: Vec<String>,
}

/// Response envelope for the list-by-zone call.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordSetListResult {
    #[serde(default)]
    pub value: Vec<RecordSet>,
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}
