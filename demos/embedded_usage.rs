//! Minimal embedding example for mailjet-core
//!
//! Drives the built-in resources against the in-memory remote: create a
//! sender, delete it, declare it again (the deleted record is adopted),
//! validate it and read its DNS settings.

use mailjet_core::remote::MemoryRemote;
use mailjet_core::{ProviderRegistry, Result};
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Embedded mailjet-core Example ===\n");

    let remote = MemoryRemote::new();
    let registry = ProviderRegistry::with_builtins(Arc::new(remote.clone()));

    let sender = registry.resource("mailjet_sender")?;
    let validate = registry.resource("mailjet_sender_validate")?;
    let dns = registry.data_source("mailjet_dns")?;

    let planned = json!({
        "email": "alerts@example.com",
        "name": "Alerts",
        "is_default_sender": false,
        "email_type": "transactional"
    });

    let report = |step: &str, value: &serde_json::Value| println!("[{}] {}", step, value);

    let created = sender.create(&planned).await.map_err(to_error)?;
    report("create", &created);

    sender.delete(&created).await.map_err(to_error)?;
    println!("[delete] sender #{} soft-deleted", created["id"]);

    let adopted = sender.create(&planned).await.map_err(to_error)?;
    report("create again", &adopted);
    assert_eq!(adopted["id"], created["id"], "deleted sender is adopted");
    assert_eq!(remote.sender_count().await, 1);

    let validation = validate
        .create(&json!({"id": adopted["id"], "wait_for": "5s"}))
        .await
        .map_err(to_error)?;
    report("validate", &validation);

    let settings = dns
        .read(&json!({"dns_id": adopted["dns_id"]}))
        .await
        .map_err(to_error)?;
    report("dns", &settings);

    println!("\n=== Example completed successfully ===");
    Ok(())
}

fn to_error(diagnostic: mailjet_core::Diagnostic) -> mailjet_core::Error {
    mailjet_core::Error::Other(diagnostic.to_string())
}
