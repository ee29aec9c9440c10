// # Sender Validation Tool
//
// Runs the sender validation loop against the real Mailjet API.
//
// ## Usage
//
// ```bash
// MJ_APIKEY_PUBLIC=... \
// MJ_APIKEY_PRIVATE=... \
// MAILJET_SENDER_ID=123456 \
// MAILJET_WAIT_FOR=30s \
// cargo run -p demos --bin sender_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `MJ_APIKEY_PUBLIC`, `MJ_APIKEY_PRIVATE`: API keys
// - `MAILJET_SENDER_ID`: Sender to validate
//
// Optional:
// - `MAILJET_BASE_URL`: API root (default: https://api.mailjet.com/v3)
// - `MAILJET_WAIT_FOR`: Retry budget, e.g. "30s" (default: single attempt)

use mailjet_client::MailjetClient;
use mailjet_core::config::ProviderConfig;
use mailjet_core::engine::{SenderReconciler, SenderValidator};
use mailjet_core::validation::parse_wait_for;
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let sender_id: i64 = env::var("MAILJET_SENDER_ID")
        .map_err(|_| "MAILJET_SENDER_ID environment variable is required")?
        .parse()
        .map_err(|_| "MAILJET_SENDER_ID must be a numeric sender ID")?;
    let max_wait = match env::var("MAILJET_WAIT_FOR") {
        Ok(raw) => Some(parse_wait_for(&raw)?),
        Err(_) => None,
    };

    let config = ProviderConfig {
        base_url: env::var("MAILJET_BASE_URL").ok(),
        ..Default::default()
    }
    .resolve()?;
    tracing::info!("Configuration: {:?}", config);

    let client = Arc::new(MailjetClient::new(&config)?);

    let sender = SenderReconciler::new(client.clone()).refresh(sender_id).await?;
    tracing::info!(
        "Sender #{} ({}) is currently {}",
        sender.id,
        sender.email,
        sender.status
    );

    match SenderValidator::new(client).converge(sender_id, max_wait).await {
        Ok(()) => tracing::info!("Sender #{} is validated", sender_id),
        Err(e) => {
            tracing::error!("Validation failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
