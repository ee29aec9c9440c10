// # Resource Traits
//
// Boundary between the declarative engine and the provider.
//
// ## Values
//
// Configuration, plan and state travel as `serde_json::Value` objects keyed
// by attribute name. Implementations decode them into their own models and
// encode the new state back.
//
// ## Failures
//
// Every lifecycle failure is reported as exactly one error [`Diagnostic`]
// whose summary names the operation and whose detail carries the cause.
// Configuration checks may report several diagnostics at once.

use crate::diagnostics::{AttributePath, Diagnostic, Diagnostics};
use crate::schema::Schema;
use async_trait::async_trait;
use serde_json::{Value, json};

/// A managed object
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name used in configuration (e.g. "mailjet_sender")
    fn type_name(&self) -> &'static str;

    /// Attribute declarations
    fn schema(&self) -> Schema;

    /// Check user configuration before planning
    ///
    /// Values may still be unknown at this point; unknown values are accepted.
    fn validate_config(&self, _config: &Value) -> Diagnostics {
        Diagnostics::new()
    }

    /// Create the object and return its state
    async fn create(&self, planned: &Value) -> Result<Value, Diagnostic>;

    /// Refresh state from the remote
    async fn read(&self, state: &Value) -> Result<Value, Diagnostic>;

    /// Apply an in-place change and return the new state
    async fn update(&self, prior: &Value, planned: &Value) -> Result<Value, Diagnostic>;

    /// Delete the object
    async fn delete(&self, state: &Value) -> Result<(), Diagnostic>;

    /// Seed state from an import identifier
    ///
    /// The default accepts numeric identifiers and stores them as `id`; the
    /// engine calls [`Resource::read`] right after.
    fn import_state(&self, identifier: &str) -> Result<Value, Diagnostic> {
        let id: i64 = identifier.trim().parse().map_err(|_| {
            Diagnostic::attribute_error(
                AttributePath::root("id"),
                "Invalid import identifier",
                format!("expected a numeric ID, got {:?}", identifier),
            )
        })?;
        Ok(json!({ "id": id }))
    }

    /// Attributes whose planned change cannot be applied in place
    fn requires_replace(&self, prior: &Value, planned: &Value) -> Vec<AttributePath> {
        self.schema().replacement_paths(prior, planned)
    }
}

/// A read-only lookup
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name used in configuration (e.g. "mailjet_dns")
    fn type_name(&self) -> &'static str;

    /// Attribute declarations
    fn schema(&self) -> Schema;

    /// Resolve the data source from its configuration
    async fn read(&self, config: &Value) -> Result<Value, Diagnostic>;
}
