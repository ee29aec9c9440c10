//! `mailjet_sender` resource

use super::{config_str, decode_document, encode_state};
use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics};
use crate::engine::SenderReconciler;
use crate::error::Error;
use crate::projection::{SenderModel, SenderSpec};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::traits::{RemoteClient, Resource};
use crate::validation::ConfigValue;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const EMAIL_TYPES: [&str; 3] = ["transactional", "bulk", "unknown"];

/// A sender email address or domain
#[derive(Debug, Clone)]
pub struct SenderResource {
    reconciler: SenderReconciler,
}

impl SenderResource {
    pub const TYPE_NAME: &'static str = "mailjet_sender";

    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            reconciler: SenderReconciler::new(client),
        }
    }

    fn spec_from(&self, planned: &SenderModel, summary: &str) -> Result<SenderSpec, Diagnostic> {
        SenderSpec::from_model(planned).map_err(|e| {
            Diagnostic::attribute_error(AttributePath::root("email"), summary, e.to_string())
        })
    }
}

/// Diagnostic for a failed create, named after the step that failed
fn create_failure(summary: &str, error: Error) -> Diagnostic {
    match error {
        Error::AdoptionFailed { .. } => Diagnostic::error(
            "Unable to update existing Mailjet sender information",
            error.to_string(),
        ),
        Error::InconsistentResponse { .. } => {
            Diagnostic::error("Sender creation response is not coherent", error.to_string())
        }
        other => Diagnostic::error(summary, other.to_string()),
    }
}

#[async_trait]
impl Resource for SenderResource {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Sender email address or domain.")
            .with_attribute(
                "email",
                Attribute::required(AttributeType::String)
                    .requires_replace()
                    .with_description(
                        "The email address for this sender. To register a domain use *@example.com.",
                    ),
            )
            .with_attribute(
                "name",
                Attribute::required(AttributeType::String)
                    .with_description("User-provided name for this sender."),
            )
            .with_attribute(
                "is_default_sender",
                Attribute::required(AttributeType::Bool)
                    .with_description("Indicates whether this is the default sender or not."),
            )
            .with_attribute(
                "email_type",
                Attribute::required(AttributeType::String).with_description(
                    "Type of emails this sender will send. This is for purely informative purposes - the values do not place any sending restrictions on the sender email or domain. Can be transactional, bulk or unknown",
                ),
            )
            .with_attribute(
                "dns_id",
                Attribute::computed(AttributeType::Int64)
                    .use_state_for_unknown()
                    .with_description("Unique numeric ID of the DNS domain to which sender belongs."),
            )
            .with_attribute(
                "id",
                Attribute::computed(AttributeType::Int64)
                    .use_state_for_unknown()
                    .with_description("Unique numeric ID of this sender."),
            )
            .with_attribute(
                "created_at",
                Attribute::computed(AttributeType::String)
                    .use_state_for_unknown()
                    .with_description("Timestamp indicating when this sender object was created."),
            )
    }

    fn validate_config(&self, config: &Value) -> Diagnostics {
        match config_str(config, "email_type") {
            ConfigValue::Known(raw) if !EMAIL_TYPES.contains(&raw) => Diagnostic::attribute_error(
                AttributePath::root("email_type"),
                "Invalid email type",
                format!("{:?} must be one of {}", raw, EMAIL_TYPES.join(", ")),
            )
            .into(),
            ConfigValue::Known(_) | ConfigValue::Null | ConfigValue::Unknown => Diagnostics::new(),
        }
    }

    async fn create(&self, planned: &Value) -> Result<Value, Diagnostic> {
        const SUMMARY: &str = "Unable to create a Mailjet sender";

        let mut model: SenderModel = decode_document(planned, SUMMARY)?;
        let spec = self.spec_from(&model, SUMMARY)?;

        let record = self
            .reconciler
            .create(&spec)
            .await
            .map_err(|e| create_failure(SUMMARY, e))?;

        model.refresh_from(&record);
        encode_state(&model, SUMMARY)
    }

    async fn read(&self, state: &Value) -> Result<Value, Diagnostic> {
        const SUMMARY: &str = "Unable to read Mailjet sender information";

        let mut model: SenderModel = decode_document(state, SUMMARY)?;
        let id = model
            .require_id()
            .map_err(|e| Diagnostic::error(SUMMARY, e.to_string()))?;

        let record = self.reconciler.refresh(id).await.map_err(|e| match e {
            Error::InconsistentResponse { .. } => Diagnostic::error(
                "Retrieved Mailjet sender information are not coherent",
                format!("Could not read sender #{}: {}", id, e),
            ),
            other => Diagnostic::error(SUMMARY, other.to_string()),
        })?;

        model.refresh_from(&record);
        encode_state(&model, SUMMARY)
    }

    async fn update(&self, prior: &Value, planned: &Value) -> Result<Value, Diagnostic> {
        const SUMMARY: &str = "Unable to update Mailjet sender information";

        let prior: SenderModel = decode_document(prior, SUMMARY)?;
        let mut model: SenderModel = decode_document(planned, SUMMARY)?;
        let id = model
            .id
            .or(prior.id)
            .ok_or_else(|| Diagnostic::error(SUMMARY, "sender state has no id"))?;
        let spec = self.spec_from(&model, SUMMARY)?;

        let fail = |e: Error| {
            Diagnostic::error(SUMMARY, format!("Could not update sender #{}: {}", id, e))
        };
        self.reconciler.update(id, &spec).await.map_err(fail)?;
        let record = self.reconciler.refresh(id).await.map_err(fail)?;

        model.refresh_from(&record);
        encode_state(&model, SUMMARY)
    }

    async fn delete(&self, state: &Value) -> Result<(), Diagnostic> {
        const SUMMARY: &str = "Error deleting a Mailjet sender";

        let model: SenderModel = decode_document(state, SUMMARY)?;
        let id = model
            .require_id()
            .map_err(|e| Diagnostic::error(SUMMARY, e.to_string()))?;

        self.reconciler.delete(id).await.map_err(|e| {
            Diagnostic::error(
                SUMMARY,
                format!("Could not delete the sender, unexpected error: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{SenderRecord, SenderStatus};
    use crate::remote::MemoryRemote;
    use crate::traits::{Endpoint, RecordKey};
    use serde_json::json;

    /// Remote with fixed answers: email lookup, POST result, PUT outcome
    struct CannedRemote {
        lookup: Vec<Value>,
        created: Vec<Value>,
        put_fails: bool,
    }

    #[async_trait]
    impl RemoteClient for CannedRemote {
        async fn get(&self, _endpoint: Endpoint, _key: &RecordKey) -> crate::Result<Vec<Value>> {
            Ok(self.lookup.clone())
        }

        async fn post(
            &self,
            _endpoint: Endpoint,
            _key: Option<&RecordKey>,
            _payload: &Value,
        ) -> crate::Result<Vec<Value>> {
            Ok(self.created.clone())
        }

        async fn put(
            &self,
            _endpoint: Endpoint,
            _key: &RecordKey,
            _payload: &Value,
            _fields: &[&str],
        ) -> crate::Result<()> {
            if self.put_fails {
                return Err(Error::transport("connection reset"));
            }
            Ok(())
        }

        async fn delete(&self, _endpoint: Endpoint, _key: &RecordKey) -> crate::Result<()> {
            Ok(())
        }

        fn client_name(&self) -> &'static str {
            "canned"
        }
    }

    fn resource(remote: &MemoryRemote) -> SenderResource {
        SenderResource::new(Arc::new(remote.clone()))
    }

    fn planned(email: &str, name: &str) -> Value {
        json!({
            "email": email,
            "name": name,
            "is_default_sender": false,
            "email_type": "transactional",
            "id": null,
            "dns_id": null,
            "created_at": null
        })
    }

    #[tokio::test]
    async fn lifecycle_against_memory_remote() {
        let remote = MemoryRemote::new();
        let sender = resource(&remote);

        let state = sender
            .create(&planned("a@example.com", "Alerts"))
            .await
            .unwrap();
        let id = state["id"].as_i64().unwrap();
        assert_eq!(state["email_type"], json!("transactional"));
        assert!(state["dns_id"].as_i64().is_some());
        assert!(state["created_at"].as_str().is_some());

        let refreshed = sender.read(&state).await.unwrap();
        assert_eq!(refreshed, state);

        let mut renamed = state.clone();
        renamed["name"] = json!("Renamed");
        let updated = sender.update(&state, &renamed).await.unwrap();
        assert_eq!(updated["name"], json!("Renamed"));
        assert_eq!(updated["id"], json!(id));

        sender.delete(&updated).await.unwrap();
        assert_eq!(
            remote.sender(id).await.unwrap().status,
            SenderStatus::Deleted
        );
    }

    #[tokio::test]
    async fn recreate_adopts_deleted_sender() {
        let remote = MemoryRemote::new();
        let sender = resource(&remote);

        let first = sender.create(&planned("a@example.com", "One")).await.unwrap();
        sender.delete(&first).await.unwrap();

        let second = sender.create(&planned("a@example.com", "Two")).await.unwrap();
        assert_eq!(second["id"], first["id"]);
        assert_eq!(second["name"], json!("Two"));
        assert_eq!(remote.sender_count().await, 1);
    }

    #[tokio::test]
    async fn import_then_read_fills_state() {
        let remote = MemoryRemote::new();
        remote
            .insert_sender(SenderRecord {
                id: 12,
                email: "b@example.com".to_string(),
                name: "B".to_string(),
                is_default_sender: true,
                email_type: Default::default(),
                dns_id: 3,
                status: SenderStatus::Active,
                created_at: None,
            })
            .await;
        let sender = resource(&remote);

        let seeded = sender.import_state("12").unwrap();
        let state = sender.read(&seeded).await.unwrap();

        assert_eq!(state["email"], json!("b@example.com"));
        assert_eq!(state["is_default_sender"], json!(true));
        assert_eq!(state["created_at"], Value::Null);
    }

    #[tokio::test]
    async fn read_of_missing_sender_reports_diagnostic() {
        let remote = MemoryRemote::new();
        let diagnostic = resource(&remote)
            .read(&json!({"id": 404}))
            .await
            .unwrap_err();

        assert_eq!(diagnostic.summary, "Unable to read Mailjet sender information");
        assert!(diagnostic.detail.contains("#404"));
    }

    #[test]
    fn email_change_requires_replacement() {
        let remote = MemoryRemote::new();
        let paths = resource(&remote).requires_replace(
            &planned("a@example.com", "A"),
            &planned("b@example.com", "A"),
        );
        assert_eq!(paths, vec![AttributePath::root("email")]);
    }

    #[test]
    fn unknown_email_type_is_rejected() {
        let remote = MemoryRemote::new();
        let diagnostics =
            resource(&remote).validate_config(&json!({"email_type": "newsletter"}));
        assert!(diagnostics.has_error());

        let diagnostics = resource(&remote).validate_config(&json!({"email_type": "bulk"}));
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn undecodable_create_response_is_a_create_failure() {
        let sender = SenderResource::new(Arc::new(CannedRemote {
            lookup: vec![],
            created: vec![json!({"ID": 1, "Email": "a@example.com", "CreatedAt": "not-a-date"})],
            put_fails: false,
        }));

        let diagnostic = sender
            .create(&planned("a@example.com", "A"))
            .await
            .unwrap_err();

        assert_eq!(diagnostic.summary, "Unable to create a Mailjet sender");
        assert!(diagnostic.detail.contains("could not decode the created sender"));
    }

    #[tokio::test]
    async fn failed_adoption_is_an_update_failure() {
        let sender = SenderResource::new(Arc::new(CannedRemote {
            lookup: vec![json!({"ID": 42, "Email": "a@example.com", "Status": "Deleted"})],
            created: vec![],
            put_fails: true,
        }));

        let diagnostic = sender
            .create(&planned("a@example.com", "A"))
            .await
            .unwrap_err();

        assert_eq!(
            diagnostic.summary,
            "Unable to update existing Mailjet sender information"
        );
        assert!(diagnostic.detail.starts_with("Could not update sender a@example.com"));
        assert!(diagnostic.detail.contains("connection reset"));
    }

    #[test]
    fn incoherent_adoption_reread_is_not_a_create_error() {
        let error = Error::adoption_failed("a@example.com", Error::inconsistent("sender #42", 0));
        let diagnostic = create_failure("Unable to create a Mailjet sender", error);

        assert_eq!(
            diagnostic.summary,
            "Unable to update existing Mailjet sender information"
        );
    }

    #[test]
    fn create_failures_keep_their_summary() {
        let summary = "Unable to create a Mailjet sender";

        let rejected = create_failure(summary, Error::creation_failed("duplicate"));
        assert_eq!(rejected.summary, summary);

        let incoherent = create_failure(summary, Error::inconsistent("creation of sender a", 2));
        assert_eq!(incoherent.summary, "Sender creation response is not coherent");
    }
}
