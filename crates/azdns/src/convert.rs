// ── Record-set conversions ──
//
// Bidirectional translation between normalized records and the wire
// model. Going wire-to-domain, one record set fans out into one record
// per payload entry (CNAME and SOA are singletons). Going
// domain-to-wire, only the properties are filled in: name, type, and
// ETag depend on zone context and are stamped on by the provider at
// write time.

use std::net::IpAddr;
use std::time::Duration;

use azdns_api::records::{
    AaaaRecord, ARecord, CaaRecord, CnameRecord, MxRecord, NsRecord, PtrRecord, RecordSet,
    RecordSetProperties, SoaRecord, SrvRecord, TxtRecord,
};
use azdns_api::RecordType;

use crate::error::ProviderError;
use crate::record::Record;

/// Convert listed record sets into normalized records, preserving set
/// order. The first unconvertible set aborts the whole batch.
pub(crate) fn records_from_sets(sets: &[RecordSet]) -> Result<Vec<Record>, ProviderError> {
    let mut records = Vec::new();
    for set in sets {
        records.extend(records_from_set(set)?);
    }
    Ok(records)
}

/// Convert one record set into normalized records, one per payload
/// entry. All share the set's name, TTL, and ETag. Singleton sets
/// (CNAME, SOA) must carry their payload.
pub(crate) fn records_from_set(set: &RecordSet) -> Result<Vec<Record>, ProviderError> {
    let Some(record_type) = RecordType::from_resource_type(&set.record_type) else {
        return Err(ProviderError::UnsupportedType {
            type_name: set.record_type.clone(),
        });
    };

    let name = set.name.clone();
    let ttl = Duration::from_secs(u64::try_from(set.properties.ttl).unwrap_or_default());
    let id = set.etag.clone();
    let mut records = Vec::new();

    match record_type {
        RecordType::A => {
            for entry in set.properties.a_records.as_deref().unwrap_or_default() {
                records.push(Record::Address {
                    id: id.clone(),
                    name: name.clone(),
                    ttl,
                    ip: parse_ip(&entry.ipv4_address)?,
                });
            }
        }
        RecordType::Aaaa => {
            for entry in set.properties.aaaa_records.as_deref().unwrap_or_default() {
                records.push(Record::Address {
                    id: id.clone(),
                    name: name.clone(),
                    ttl,
                    ip: parse_ip(&entry.ipv6_address)?,
                });
            }
        }
        RecordType::Caa => {
            for entry in set.properties.caa_records.as_deref().unwrap_or_default() {
                records.push(Record::Caa {
                    id: id.clone(),
                    name: name.clone(),
                    ttl,
                    flags: u8::try_from(entry.flags).unwrap_or_default(),
                    tag: entry.tag.clone(),
                    value: entry.value.clone(),
                });
            }
        }
        RecordType::Cname => {
            let Some(cname) = set.properties.cname_record.as_ref() else {
                return Err(ProviderError::EmptyRecordData {
                    record_type: record_type.to_string(),
                    name,
                });
            };
            records.push(Record::Cname {
                id,
                name,
                ttl,
                target: cname.cname.clone(),
            });
        }
        RecordType::Mx => {
            for entry in set.properties.mx_records.as_deref().unwrap_or_default() {
                records.push(Record::Mx {
                    id: id.clone(),
                    name: name.clone(),
                    ttl,
                    preference: u16::try_from(entry.preference).unwrap_or_default(),
                    target: entry.exchange.clone(),
                });
            }
        }
        RecordType::Ns => {
            for entry in set.properties.ns_records.as_deref().unwrap_or_default() {
                records.push(Record::Ns {
                    id: id.clone(),
                    name: name.clone(),
                    ttl,
                    target: entry.nsdname.clone(),
                });
            }
        }
        RecordType::Ptr => {
            for entry in set.properties.ptr_records.as_deref().unwrap_or_default() {
                records.push(Record::Rr {
                    id: id.clone(),
                    record_type: "PTR".to_owned(),
                    name: name.clone(),
                    ttl,
                    data: entry.ptrdname.clone(),
                });
            }
        }
        RecordType::Soa => {
            let Some(soa) = set.properties.soa_record.as_ref() else {
                return Err(ProviderError::EmptyRecordData {
                    record_type: record_type.to_string(),
                    name,
                });
            };
            records.push(Record::Rr {
                id,
                record_type: "SOA".to_owned(),
                name,
                ttl,
                data: soa_data(soa),
            });
        }
        RecordType::Srv => {
            let (service, transport, srv_name) = split_srv_name(&name)?;
            for entry in set.properties.srv_records.as_deref().unwrap_or_default() {
                records.push(Record::Srv {
                    id: id.clone(),
                    service: service.clone(),
                    transport: transport.clone(),
                    name: srv_name.clone(),
                    ttl,
                    priority: u16::try_from(entry.priority).unwrap_or_default(),
                    weight: u16::try_from(entry.weight).unwrap_or_default(),
                    port: u16::try_from(entry.port).unwrap_or_default(),
                    target: entry.target.clone(),
                });
            }
        }
        RecordType::Txt => {
            for entry in set.properties.txt_records.as_deref().unwrap_or_default() {
                for value in &entry.value {
                    records.push(Record::Txt {
                        id: id.clone(),
                        name: name.clone(),
                        ttl,
                        text: value.clone(),
                    });
                }
            }
        }
    }

    Ok(records)
}

/// Build the properties-only record set for a write.
pub(crate) fn record_to_record_set(record: &Record) -> Result<RecordSet, ProviderError> {
    let ttl = i64::try_from(record.ttl().as_secs()).unwrap_or(i64::MAX);
    let mut properties = RecordSetProperties {
        ttl,
        ..RecordSetProperties::default()
    };

    match record {
        Record::Address { ip, .. } => match ip {
            IpAddr::V4(v4) => {
                properties.a_records = Some(vec![ARecord {
                    ipv4_address: v4.to_string(),
                }]);
            }
            IpAddr::V6(v6) => {
                properties.aaaa_records = Some(vec![AaaaRecord {
                    ipv6_address: v6.to_string(),
                }]);
            }
        },
        Record::Caa {
            flags, tag, value, ..
        } => {
            properties.caa_records = Some(vec![CaaRecord {
                flags: i32::from(*flags),
                tag: tag.clone(),
                value: value.clone(),
            }]);
        }
        Record::Cname { target, .. } => {
            properties.cname_record = Some(CnameRecord {
                cname: target.clone(),
            });
        }
        Record::Mx {
            preference, target, ..
        } => {
            properties.mx_records = Some(vec![MxRecord {
                preference: i32::from(*preference),
                exchange: target.clone(),
            }]);
        }
        Record::Ns { target, .. } => {
            properties.ns_records = Some(vec![NsRecord {
                nsdname: target.clone(),
            }]);
        }
        Record::Srv {
            priority,
            weight,
            port,
            target,
            ..
        } => {
            properties.srv_records = Some(vec![SrvRecord {
                priority: i32::from(*priority),
                weight: i32::from(*weight),
                port: i32::from(*port),
                target: target.clone(),
            }]);
        }
        Record::Txt { text, .. } => {
            properties.txt_records = Some(vec![TxtRecord {
                value: vec![text.clone()],
            }]);
        }
        Record::Rr {
            record_type, data, ..
        } => match record_type.to_uppercase().as_str() {
            "PTR" => {
                properties.ptr_records = Some(vec![PtrRecord {
                    ptrdname: data.clone(),
                }]);
            }
            "SOA" => {
                properties.soa_record = Some(parse_soa_data(data)?);
            }
            _ => {
                return Err(ProviderError::UnsupportedType {
                    type_name: record_type.clone(),
                });
            }
        },
    }

    Ok(RecordSet {
        properties,
        ..RecordSet::default()
    })
}

/// Map a record onto the service's type enumeration. `Rr` type tags
/// must be exact uppercase; anything unrecognized is an error.
pub(crate) fn record_type_of(record: &Record) -> Result<RecordType, ProviderError> {
    match record {
        Record::Address { ip, .. } if ip.is_ipv4() => Ok(RecordType::A),
        Record::Address { .. } => Ok(RecordType::Aaaa),
        Record::Caa { .. } => Ok(RecordType::Caa),
        Record::Cname { .. } => Ok(RecordType::Cname),
        Record::Mx { .. } => Ok(RecordType::Mx),
        Record::Ns { .. } => Ok(RecordType::Ns),
        Record::Srv { .. } => Ok(RecordType::Srv),
        Record::Txt { .. } => Ok(RecordType::Txt),
        Record::Rr { record_type, .. } => {
            RecordType::from_name(record_type).ok_or_else(|| ProviderError::UnsupportedType {
                type_name: record_type.clone(),
            })
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn parse_ip(value: &str) -> Result<IpAddr, ProviderError> {
    value.parse().map_err(|e: std::net::AddrParseError| {
        ProviderError::InvalidIpAddress {
            address: value.to_owned(),
            reason: e.to_string(),
        }
    })
}

/// Split `_service._transport.name` into its three parts, stripping
/// one leading underscore from the first two. Two labels alone mean
/// the apex (`@`).
fn split_srv_name(name: &str) -> Result<(String, String, String), ProviderError> {
    let mut parts = name.splitn(3, '.');
    let (Some(service), Some(transport)) = (parts.next(), parts.next()) else {
        return Err(ProviderError::InvalidSrvName {
            name: name.to_owned(),
        });
    };
    let service = service.strip_prefix('_').unwrap_or(service).to_owned();
    let transport = transport.strip_prefix('_').unwrap_or(transport).to_owned();
    let srv_name = parts.next().unwrap_or("@").to_owned();
    Ok((service, transport, srv_name))
}

fn soa_data(soa: &SoaRecord) -> String {
    format!(
        "{} {} {} {} {} {} {}",
        soa.host,
        soa.email,
        soa.serial_number,
        soa.refresh_time,
        soa.retry_time,
        soa.expire_time,
        soa.minimum_ttl
    )
}

/// Parse the seven-field SOA rdata string:
/// `host email serial refresh retry expire minimum`. Extra fields are
/// ignored; a short or non-numeric string is an error.
fn parse_soa_data(data: &str) -> Result<SoaRecord, ProviderError> {
    let fields: Vec<&str> = data.split_whitespace().collect();
    if fields.len() < 7 {
        return Err(ProviderError::InvalidSoaData {
            data: data.to_owned(),
            reason: format!("expected 7 fields, found {}", fields.len()),
        });
    }
    let int_field = |value: &str, field: &str| -> Result<i64, ProviderError> {
        value.parse().map_err(|_| ProviderError::InvalidSoaData {
            data: data.to_owned(),
            reason: format!("{field} is not an integer: {value:?}"),
        })
    };
    Ok(SoaRecord {
        host: fields[0].to_owned(),
        email: fields[1].to_owned(),
        serial_number: int_field(fields[2], "serial")?,
        refresh_time: int_field(fields[3], "refresh")?,
        retry_time: int_field(fields[4], "retry")?,
        expire_time: int_field(fields[5], "expire")?,
        minimum_ttl: int_field(fields[6], "minimum")?,
    })
}
