// Round-trip demo: list a zone, create a few records, overwrite them,
// then delete them again.
//
// Expects the usual AZURE_* settings plus AZURE_DNS_ZONE_FQDN naming a
// zone that is safe to write to. RUST_LOG=azdns=debug shows the wire
// traffic.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use azdns::{Provider, Record};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let zone = std::env::var("AZURE_DNS_ZONE_FQDN").context("AZURE_DNS_ZONE_FQDN is not set")?;
    let provider = Provider::from_env()?;

    println!("(1) existing records in {zone}");
    for record in provider.get_records(&zone).await? {
        println!(
            "  {:5} {} (ttl {}s): {record:?}",
            record.kind(),
            record.rr_name(),
            record.ttl().as_secs(),
        );
    }

    let test_records = vec![
        Record::Address {
            id: None,
            name: "demo-a".to_owned(),
            ttl: Duration::from_secs(30),
            ip: "127.0.0.1".parse()?,
        },
        Record::Txt {
            id: None,
            name: "demo-txt".to_owned(),
            ttl: Duration::from_secs(30),
            text: "TEST VALUE".to_owned(),
        },
        Record::Srv {
            id: None,
            service: "service".to_owned(),
            transport: "proto".to_owned(),
            name: "demo-srv".to_owned(),
            ttl: Duration::from_secs(30),
            priority: 1,
            weight: 10,
            port: 5269,
            target: format!("app.{zone}"),
        },
    ];

    println!("(2) create the demo records");
    for record in provider.append_records(&zone, test_records.clone()).await? {
        println!("  created: {record:?}");
    }

    println!("(3) overwrite them");
    for record in provider.set_records(&zone, test_records.clone()).await? {
        println!("  updated: {record:?}");
    }

    println!("(4) delete them");
    for record in provider.delete_records(&zone, test_records).await? {
        println!("  deleted: {record:?}");
    }

    Ok(())
}
