//! Request and response documents exchanged with the engine
//!
//! One request is read from stdin and one response written to stdout, both
//! JSON. The operation name selects the remaining request fields:
//!
//! ```json
//! {
//!   "provider": {"api_key_public": "...", "api_key_private": "..."},
//!   "operation": "create",
//!   "type": "mailjet_sender",
//!   "planned": {"email": "a@example.com", "name": "Alerts", ...}
//! }
//! ```

use mailjet_core::config::ProviderConfig;
use mailjet_core::diagnostics::{AttributePath, Diagnostic, Diagnostics};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One engine request
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Provider block; keys may come from the environment instead
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(flatten)]
    pub operation: Operation,
}

/// Requested operation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    /// Provider, resource and data source schemas
    Schema,
    /// Check a resource configuration
    Validate {
        #[serde(rename = "type")]
        type_name: String,
        config: Value,
    },
    /// Detect attribute changes that force replacement
    Plan {
        #[serde(rename = "type")]
        type_name: String,
        #[serde(default)]
        prior: Value,
        planned: Value,
    },
    /// Create a resource
    Create {
        #[serde(rename = "type")]
        type_name: String,
        planned: Value,
    },
    /// Refresh a resource
    Read {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    /// Update a resource in place
    Update {
        #[serde(rename = "type")]
        type_name: String,
        prior: Value,
        planned: Value,
    },
    /// Delete a resource
    Delete {
        #[serde(rename = "type")]
        type_name: String,
        state: Value,
    },
    /// Import an existing object, then refresh it
    Import {
        #[serde(rename = "type")]
        type_name: String,
        id: String,
    },
    /// Resolve a data source
    ReadDataSource {
        #[serde(rename = "type")]
        type_name: String,
        config: Value,
    },
}

impl Operation {
    /// Whether the operation calls the Mailjet API
    pub fn needs_remote(&self) -> bool {
        match self {
            Operation::Schema
            | Operation::Validate { .. }
            | Operation::Plan { .. } => false,
            Operation::Create { .. }
            | Operation::Read { .. }
            | Operation::Update { .. }
            | Operation::Delete { .. }
            | Operation::Import { .. }
            | Operation::ReadDataSource { .. } => true,
        }
    }

    /// Operation name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Schema => "schema",
            Operation::Validate { .. } => "validate",
            Operation::Plan { .. } => "plan",
            Operation::Create { .. } => "create",
            Operation::Read { .. } => "read",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
            Operation::Import { .. } => "import",
            Operation::ReadDataSource { .. } => "read_data_source",
        }
    }
}

/// One engine response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    /// New state; absent after a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,

    /// Schemas, for the `schema` operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    /// Attributes forcing replacement, for the `plan` operation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<AttributePath>,

    pub diagnostics: Diagnostics,
}

impl Response {
    /// Response carrying new state
    pub fn state(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }

    /// Response carrying diagnostics only
    pub fn diagnostics(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            ..Default::default()
        }
    }

    /// Response carrying a single failure
    pub fn failure(diagnostic: Diagnostic) -> Self {
        Self::diagnostics(diagnostic.into())
    }

    /// Whether any diagnostic is an error
    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }
}
