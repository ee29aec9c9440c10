//! Resource and data source adapters
//!
//! Each adapter decodes the engine's JSON documents into the projection
//! models, drives the sender engine, and encodes the resulting state. Errors
//! are turned into a single [`Diagnostic`] at this layer and nowhere else.

pub mod dns;
pub mod sender;
pub mod sender_validate;

pub use dns::DnsDataSource;
pub use sender::SenderResource;
pub use sender_validate::SenderValidateResource;

use crate::diagnostics::Diagnostic;
use crate::validation::ConfigValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key marking a value that is not known until apply: `{"$unknown": true}`
pub const UNKNOWN_MARKER: &str = "$unknown";

/// Whether a configuration value is the unknown marker
pub fn is_unknown(value: &Value) -> bool {
    value.get(UNKNOWN_MARKER).and_then(Value::as_bool) == Some(true)
}

/// Read a string attribute from a configuration document
pub(crate) fn config_str<'a>(config: &'a Value, name: &str) -> ConfigValue<&'a str> {
    match config.get(name) {
        None | Some(Value::Null) => ConfigValue::Null,
        Some(value) if is_unknown(value) => ConfigValue::Unknown,
        Some(Value::String(raw)) => ConfigValue::Known(raw.as_str()),
        Some(_) => ConfigValue::Unknown,
    }
}

/// Decode an engine document, reporting failures under `summary`
pub(crate) fn decode_document<T: DeserializeOwned>(
    document: &Value,
    summary: &str,
) -> Result<T, Diagnostic> {
    serde_json::from_value(document.clone())
        .map_err(|e| Diagnostic::error(summary, format!("Invalid attribute values: {}", e)))
}

/// Encode state for the engine
pub(crate) fn encode_state<T: Serialize>(model: &T, summary: &str) -> Result<Value, Diagnostic> {
    serde_json::to_value(model)
        .map_err(|e| Diagnostic::error(summary, format!("Could not encode state: {}", e)))
}
