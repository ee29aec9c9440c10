//! `mailjet_sender_validate` resource
//!
//! A pseudo-resource: creating it validates a sender, and nothing else in
//! its lifecycle touches the remote.

use super::{config_str, decode_document, encode_state};
use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics};
use crate::engine::SenderValidator;
use crate::projection::SenderValidateModel;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::traits::{RemoteClient, Resource};
use crate::validation::validate_wait_for;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

const SUMMARY: &str = "Error validating the Mailjet sender";

/// Validation of an existing sender
#[derive(Debug, Clone)]
pub struct SenderValidateResource {
    validator: SenderValidator,
}

impl SenderValidateResource {
    pub const TYPE_NAME: &'static str = "mailjet_sender_validate";

    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            validator: SenderValidator::new(client),
        }
    }
}

#[async_trait]
impl Resource for SenderValidateResource {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new("Validate a sender email address or domain.")
            .with_attribute(
                "id",
                Attribute::required(AttributeType::Int64)
                    .requires_replace()
                    .with_description("Unique numeric ID for the sender you want to validate."),
            )
            .with_attribute(
                "wait_for",
                Attribute::optional(AttributeType::String).with_description(
                    "When specified, the provider will make multiple attempts to validate the resource until the specified duration is reached. One attempt is made per second.",
                ),
            )
    }

    fn validate_config(&self, config: &Value) -> Diagnostics {
        validate_wait_for(&AttributePath::root("wait_for"), config_str(config, "wait_for"))
    }

    async fn create(&self, planned: &Value) -> Result<Value, Diagnostic> {
        let model: SenderValidateModel = decode_document(planned, SUMMARY)?;
        let max_wait = model.max_wait().map_err(|e| {
            Diagnostic::attribute_error(
                AttributePath::root("wait_for"),
                "Failed to parse wait_for",
                e.to_string(),
            )
        })?;

        self.validator
            .converge(model.id, max_wait)
            .await
            .map_err(|e| Diagnostic::error(SUMMARY, e.to_string()))?;

        encode_state(&model, SUMMARY)
    }

    async fn read(&self, state: &Value) -> Result<Value, Diagnostic> {
        Ok(state.clone())
    }

    async fn update(&self, _prior: &Value, planned: &Value) -> Result<Value, Diagnostic> {
        Ok(planned.clone())
    }

    async fn delete(&self, _state: &Value) -> Result<(), Diagnostic> {
        Ok(())
    }

    fn import_state(&self, identifier: &str) -> Result<Value, Diagnostic> {
        Err(Diagnostic::error(
            "Resource import not supported",
            format!(
                "{} cannot be imported (got {:?}); declare it instead",
                Self::TYPE_NAME,
                identifier
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::SenderStatus;
    use crate::remote::MemoryRemote;
    use crate::traits::{Endpoint, RemoteClient};
    use serde_json::json;

    async fn seeded() -> (MemoryRemote, i64) {
        let remote = MemoryRemote::new();
        let created = remote
            .post(Endpoint::SENDER, None, &json!({"Email": "a@example.com"}))
            .await
            .unwrap();
        let id = created[0]["ID"].as_i64().unwrap();
        (remote, id)
    }

    #[tokio::test]
    async fn create_validates_the_sender() {
        let (remote, id) = seeded().await;
        let resource = SenderValidateResource::new(Arc::new(remote.clone()));

        let state = resource.create(&json!({"id": id})).await.unwrap();

        assert_eq!(state, json!({"id": id, "wait_for": null}));
        assert_eq!(remote.sender(id).await.unwrap().status, SenderStatus::Active);
    }

    #[tokio::test]
    async fn failure_carries_the_validation_summary() {
        let (remote, _) = seeded().await;
        let resource = SenderValidateResource::new(Arc::new(remote));

        let diagnostic = resource.create(&json!({"id": 999})).await.unwrap_err();

        assert_eq!(diagnostic.summary, SUMMARY);
        assert!(diagnostic.detail.starts_with("Unexpected error while validating the sender"));
    }

    #[tokio::test]
    async fn read_update_delete_are_silent() {
        let (remote, _) = seeded().await;
        let resource = SenderValidateResource::new(Arc::new(remote));
        let state = json!({"id": 1, "wait_for": "10s"});

        assert_eq!(resource.read(&state).await.unwrap(), state);
        assert_eq!(resource.update(&state, &state).await.unwrap(), state);
        assert!(resource.delete(&state).await.is_ok());
    }

    #[test]
    fn wait_for_is_validated() {
        let resource = SenderValidateResource::new(Arc::new(MemoryRemote::new()));

        let diagnostics = resource.validate_config(&json!({"id": 1, "wait_for": "500ms"}));
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.summary, "the time duration must be at least 1 second");
        assert_eq!(diagnostic.attribute, Some(AttributePath::root("wait_for")));

        assert!(resource
            .validate_config(&json!({"id": 1, "wait_for": {"$unknown": true}}))
            .is_empty());
    }

    #[test]
    fn changing_the_sender_replaces_the_validation() {
        let resource = SenderValidateResource::new(Arc::new(MemoryRemote::new()));
        let paths = resource.requires_replace(&json!({"id": 1}), &json!({"id": 2}));
        assert_eq!(paths, vec![AttributePath::root("id")]);
    }
}
