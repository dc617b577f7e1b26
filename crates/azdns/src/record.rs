// ── Normalized DNS records ──
//
// Provider-agnostic record model. One variant per rdata shape the
// converter understands, plus a generic `Rr` fallback carrying rdata
// as an opaque string (PTR and SOA travel that way). Records are
// ephemeral values: built by a caller or parsed out of a record set,
// never mutated in place.

use std::net::IpAddr;
use std::time::Duration;

/// A DNS record in provider-agnostic form.
///
/// `name` is relative to the zone (`@` at the apex). `id` is the
/// owning record set's concurrency token (ETag); it is present only on
/// records that round-tripped through the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A or AAAA, depending on the address family of `ip`.
    Address {
        id: Option<String>,
        name: String,
        ttl: Duration,
        ip: IpAddr,
    },
    Caa {
        id: Option<String>,
        name: String,
        ttl: Duration,
        flags: u8,
        tag: String,
        value: String,
    },
    Cname {
        id: Option<String>,
        name: String,
        ttl: Duration,
        target: String,
    },
    Mx {
        id: Option<String>,
        name: String,
        ttl: Duration,
        preference: u16,
        target: String,
    },
    Ns {
        id: Option<String>,
        name: String,
        ttl: Duration,
        target: String,
    },
    /// SRV with its owner name decomposed: on the wire the record set
    /// is named `_{service}._{transport}.{name}`.
    Srv {
        id: Option<String>,
        service: String,
        transport: String,
        name: String,
        ttl: Duration,
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    /// One TXT record per value string, even when the record set
    /// groups several.
    Txt {
        id: Option<String>,
        name: String,
        ttl: Duration,
        text: String,
    },
    /// Generic fallback: any record type with its rdata as a string.
    Rr {
        id: Option<String>,
        record_type: String,
        name: String,
        ttl: Duration,
        data: String,
    },
}

impl Record {
    /// The owner name as stored, zone-relative (`@` at the apex). For
    /// SRV this is the bare name without the service/transport labels.
    pub fn name(&self) -> &str {
        match self {
            Record::Address { name, .. }
            | Record::Caa { name, .. }
            | Record::Cname { name, .. }
            | Record::Mx { name, .. }
            | Record::Ns { name, .. }
            | Record::Srv { name, .. }
            | Record::Txt { name, .. }
            | Record::Rr { name, .. } => name,
        }
    }

    /// The record's type tag. `Address` reports `A` or `AAAA` by
    /// address family; `Rr` reports its tag verbatim, unvalidated.
    pub fn kind(&self) -> &str {
        match self {
            Record::Address { ip, .. } => {
                if ip.is_ipv4() {
                    "A"
                } else {
                    "AAAA"
                }
            }
            Record::Caa { .. } => "CAA",
            Record::Cname { .. } => "CNAME",
            Record::Mx { .. } => "MX",
            Record::Ns { .. } => "NS",
            Record::Srv { .. } => "SRV",
            Record::Txt { .. } => "TXT",
            Record::Rr { record_type, .. } => record_type,
        }
    }

    /// The record set name this record lives under, zone-relative.
    ///
    /// For SRV the service and transport labels are joined back onto
    /// the name; a name of `@` (or empty) yields the two labels alone,
    /// mirroring how a two-label SRV set name means the apex.
    pub fn rr_name(&self) -> String {
        match self {
            Record::Address { name, .. }
            | Record::Caa { name, .. }
            | Record::Cname { name, .. }
            | Record::Mx { name, .. }
            | Record::Ns { name, .. }
            | Record::Txt { name, .. }
            | Record::Rr { name, .. } => name.clone(),
            Record::Srv {
                service,
                transport,
                name,
                ..
            } => {
                if name.is_empty() || name == "@" {
                    format!("_{service}._{transport}")
                } else {
                    format!("_{service}._{transport}.{name}")
                }
            }
        }
    }

    /// Time to live. Serialized in whole seconds on the wire.
    pub fn ttl(&self) -> Duration {
        match self {
            Record::Address { ttl, .. }
            | Record::Caa { ttl, .. }
            | Record::Cname { ttl, .. }
            | Record::Mx { ttl, .. }
            | Record::Ns { ttl, .. }
            | Record::Srv { ttl, .. }
            | Record::Txt { ttl, .. }
            | Record::Rr { ttl, .. } => *ttl,
        }
    }

    /// The opaque identifier assigned by the service, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Record::Address { id, .. }
            | Record::Caa { id, .. }
            | Record::Cname { id, .. }
            | Record::Mx { id, .. }
            | Record::Ns { id, .. }
            | Record::Srv { id, .. }
            | Record::Txt { id, .. }
            | Record::Rr { id, .. } => id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srv_rr_name_joins_service_and_transport() {
        let record = Record::Srv {
            id: None,
            service: "xmpp".into(),
            transport: "tcp".into(),
            name: "chat".into(),
            ttl: Duration::from_secs(30),
            priority: 1,
            weight: 10,
            port: 5269,
            target: "app.example.com".into(),
        };
        assert_eq!(record.rr_name(), "_xmpp._tcp.chat");
    }

    #[test]
    fn apex_srv_rr_name_has_two_labels() {
        let record = Record::Srv {
            id: None,
            service: "sip".into(),
            transport: "udp".into(),
            name: "@".into(),
            ttl: Duration::from_secs(30),
            priority: 0,
            weight: 0,
            port: 5060,
            target: "pbx.example.com".into(),
        };
        assert_eq!(record.rr_name(), "_sip._udp");
    }

    #[test]
    fn plain_records_pass_their_name_through() {
        let record = Record::Cname {
            id: None,
            name: "www".into(),
            ttl: Duration::from_secs(3600),
            target: "apex.example.com".into(),
        };
        assert_eq!(record.name(), "www");
        assert_eq!(record.rr_name(), "www");
        assert_eq!(record.kind(), "CNAME");
        assert_eq!(record.id(), None);
    }

    #[test]
    fn kind_follows_the_address_family() {
        let address = |ip: &str| Record::Address {
            id: None,
            name: "x".into(),
            ttl: Duration::from_secs(30),
            ip: ip.parse().unwrap(),
        };
        assert_eq!(address("192.0.2.7").kind(), "A");
        assert_eq!(address("2001:db8::7").kind(), "AAAA");

        let generic = Record::Rr {
            id: None,
            record_type: "PTR".into(),
            name: "7".into(),
            ttl: Duration::from_secs(30),
            data: "host.example.com".into(),
        };
        assert_eq!(generic.kind(), "PTR");
    }
}
