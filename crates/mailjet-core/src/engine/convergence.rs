//! Sender validation convergence loop
//!
//! Validation depends on remote side effects that take time to show up (DNS
//! propagation, activation emails), so a single call may be rejected now and
//! accepted a few seconds later. The loop runs in two phases:
//!
//! 1. **Retry phase**: one attempt per second, starting the clock at the
//!    first attempt, until an attempt succeeds or the budget is spent. Only
//!    runs when a non-zero budget is given.
//! 2. **Final phase**: exactly one more attempt whose outcome is reported.
//!
//! A sender already `Active` is left alone: no validation call is made.

use super::decode;
use crate::error::{Error, Result};
use crate::records::{SenderRecord, SenderValidation};
use crate::traits::{Endpoint, RecordKey, RemoteClient};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Delay between two validation attempts
pub const VALIDATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Drives a sender to the validated state
#[derive(Clone)]
pub struct SenderValidator {
    client: Arc<dyn RemoteClient>,
}

impl SenderValidator {
    /// Create a validator on top of a shared client
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// Validate sender `id`, retrying for up to `max_wait`
    ///
    /// `None` or a zero budget means a single validation call.
    ///
    /// # Errors
    ///
    /// Reported from the final attempt only:
    /// - [`Error::ActionFailed`]: the call itself failed
    /// - [`Error::NoValidationMethod`]: no result returned
    /// - [`Error::AmbiguousValidation`]: more than one result returned
    /// - [`Error::ValidationRejected`]: the remote declined, with its reason
    pub async fn converge(&self, id: i64, max_wait: Option<Duration>) -> Result<()> {
        if self.is_active(id).await {
            info!("Sender #{} is already active, skipping validation", id);
            return Ok(());
        }

        let key = RecordKey::Id(id);

        if let Some(budget) = max_wait.filter(|budget| !budget.is_zero()) {
            let started = Instant::now();
            let mut attempt = 0usize;

            loop {
                attempt += 1;
                match self.attempt(&key).await {
                    Ok(results) if is_accepted(&results) => {
                        info!("Sender #{} validated after {} attempt(s)", id, attempt);
                        return Ok(());
                    }
                    Ok(results) => {
                        warn!(
                            "Validation attempt {} for sender #{} not accepted: {}",
                            attempt,
                            id,
                            describe(&results)
                        );
                    }
                    Err(e) => {
                        warn!("Validation attempt {} for sender #{} failed: {}", attempt, id, e);
                    }
                }

                if started.elapsed() >= budget {
                    debug!(
                        "Validation budget of {:?} spent for sender #{} after {} attempt(s)",
                        budget, id, attempt
                    );
                    break;
                }

                tokio::time::sleep(VALIDATION_POLL_INTERVAL).await;
            }
        }

        let results = self
            .attempt(&key)
            .await
            .map_err(|e| Error::action_failed(e.to_string()))?;

        match results.as_slice() {
            [] => Err(Error::NoValidationMethod),
            [single] if single.is_success() => {
                info!("Sender #{} validated", id);
                Ok(())
            }
            [single] => Err(Error::validation_rejected(single.global_error.clone())),
            many => Err(Error::AmbiguousValidation(many.len())),
        }
    }

    /// Whether the sender already reports `Active`
    ///
    /// Lookup failures count as "not active" so validation still runs.
    async fn is_active(&self, id: i64) -> bool {
        let records = match self.client.get(Endpoint::SENDER, &RecordKey::Id(id)).await {
            Ok(records) => records,
            Err(e) => {
                debug!("Status lookup for sender #{} failed: {}", id, e);
                return false;
            }
        };

        match decode::<SenderRecord>(records).as_deref() {
            Ok([sender]) => sender.status.is_active(),
            Ok(_) | Err(_) => false,
        }
    }

    /// One call to the `validate` action
    async fn attempt(&self, key: &RecordKey) -> Result<Vec<SenderValidation>> {
        debug!("Calling {} for sender {}", Endpoint::SENDER_VALIDATE, key);
        let records = self
            .client
            .post(Endpoint::SENDER_VALIDATE, Some(key), &Value::Null)
            .await?;
        decode(records)
    }
}

impl std::fmt::Debug for SenderValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderValidator")
            .field("client", &self.client.client_name())
            .finish()
    }
}

fn is_accepted(results: &[SenderValidation]) -> bool {
    matches!(results, [single] if single.is_success())
}

fn describe(results: &[SenderValidation]) -> String {
    match results {
        [] => "no validation method".to_string(),
        [single] => single.global_error.clone(),
        many => format!("{} validation results", many.len()),
    }
}
