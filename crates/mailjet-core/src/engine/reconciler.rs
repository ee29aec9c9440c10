//! Sender upsert reconciler
//!
//! The remote keeps soft-deleted senders around and still resolves them by
//! email. Creating a sender for an email address the remote remembers as
//! deleted therefore revives that record (an in-place update) instead of
//! posting a duplicate.

use super::{decode, exactly_one};
use crate::error::{Error, Result};
use crate::projection::{SENDER_UPDATE_FIELDS, SenderSpec};
use crate::records::SenderRecord;
use crate::traits::{Endpoint, RecordKey, RemoteClient};
use std::sync::Arc;
use tracing::{debug, info};

/// Creates, adopts, refreshes, updates and deletes sender records
#[derive(Clone)]
pub struct SenderReconciler {
    client: Arc<dyn RemoteClient>,
}

impl SenderReconciler {
    /// Create a reconciler on top of a shared client
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// Create the sender, or adopt a soft-deleted one with the same email
    ///
    /// Issues one lookup by email followed by exactly one write:
    /// - a single `Deleted` match is updated in place and re-fetched, keeping
    ///   its ID
    /// - anything else (no match, several matches, lookup failure, a live
    ///   record) falls through to a plain create
    ///
    /// Failures while adopting are reported as [`Error::AdoptionFailed`];
    /// failures of the plain create are [`Error::CreationFailed`], or
    /// [`Error::InconsistentResponse`] when the remote does not return
    /// exactly one record.
    pub async fn create(&self, spec: &SenderSpec) -> Result<SenderRecord> {
        if let Some(existing) = self.find_deleted(&spec.email).await {
            info!(
                "Adopting deleted sender #{} for {}",
                existing.id, spec.email
            );
            return self
                .adopt(existing.id, spec)
                .await
                .map_err(|e| Error::adoption_failed(spec.email.clone(), e));
        }

        let payload = serde_json::to_value(spec.create_payload())
            .map_err(|e| Error::creation_failed(format!("could not encode the sender: {}", e)))?;
        let records = self
            .client
            .post(Endpoint::SENDER, None, &payload)
            .await
            .map_err(|e| Error::creation_failed(e.to_string()))?;

        let records: Vec<SenderRecord> = decode(records).map_err(|e| {
            Error::creation_failed(format!("could not decode the created sender: {}", e))
        })?;
        let created = exactly_one(records, || format!("creation of sender {}", spec.email))?;

        info!("Created sender #{} for {}", created.id, created.email);
        Ok(created)
    }

    /// Revive a deleted sender in place, then read it back
    async fn adopt(&self, id: i64, spec: &SenderSpec) -> Result<SenderRecord> {
        self.update(id, spec).await?;
        self.refresh(id).await
    }

    /// Fetch the authoritative state of a sender by ID
    pub async fn refresh(&self, id: i64) -> Result<SenderRecord> {
        debug!("Reading sender #{}", id);

        let records = self
            .client
            .get(Endpoint::SENDER, &RecordKey::Id(id))
            .await
            .map_err(|e| Error::not_found(format!("could not read sender #{}: {}", id, e)))?;

        exactly_one(decode(records)?, || format!("sender #{}", id))
    }

    /// Update the mutable fields of a sender
    ///
    /// Only `Name`, `EmailType` and `IsDefaultSender` are sent; the email is
    /// immutable and a change to it replaces the resource.
    pub async fn update(&self, id: i64, spec: &SenderSpec) -> Result<()> {
        let payload = serde_json::to_value(spec.update_payload())?;

        self.client
            .put(
                Endpoint::SENDER,
                &RecordKey::Id(id),
                &payload,
                &SENDER_UPDATE_FIELDS,
            )
            .await?;

        info!("Updated sender #{}", id);
        Ok(())
    }

    /// Delete a sender
    ///
    /// The remote only soft-deletes it; a later create with the same email
    /// adopts the record again.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client
            .delete(Endpoint::SENDER, &RecordKey::Id(id))
            .await?;

        info!("Deleted sender #{}", id);
        Ok(())
    }

    /// Look up a soft-deleted sender by email
    async fn find_deleted(&self, email: &str) -> Option<SenderRecord> {
        let records = match self.client.get(Endpoint::SENDER, &RecordKey::alt(email)).await {
            Ok(records) => records,
            Err(e) => {
                debug!("No existing sender found for {}: {}", email, e);
                return None;
            }
        };

        if records.len() != 1 {
            debug!(
                "Lookup for {} returned {} senders, creating a new one",
                email,
                records.len()
            );
            return None;
        }

        let mut senders: Vec<SenderRecord> = match decode(records) {
            Ok(senders) => senders,
            Err(e) => {
                debug!("Ignoring undecodable sender for {}: {}", email, e);
                return None;
            }
        };

        let sender = senders.remove(0);
        if sender.status.is_deleted() {
            Some(sender)
        } else {
            debug!(
                "Sender for {} exists with status {}, creating a new one",
                email, sender.status
            );
            None
        }
    }
}

impl std::fmt::Debug for SenderReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderReconciler")
            .field("client", &self.client.client_name())
            .finish()
    }
}
