//! Schema declarations for resources and data sources
//!
//! A schema tells the declarative engine which attributes a resource has,
//! which ones the user sets and which ones the provider computes, and which
//! changes cannot be applied in place.

use crate::diagnostics::AttributePath;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute value type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int64,
    /// Boolean
    Bool,
    /// List of nested objects
    ListNested {
        /// Attributes of each element
        attributes: BTreeMap<String, Attribute>,
    },
}

/// How an attribute gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Set by the user, mandatory
    Required,
    /// Set by the user, may be omitted
    Optional,
    /// Set by the provider
    Computed,
}

/// Declaration of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Value type
    #[serde(flatten)]
    pub kind: AttributeType,
    /// Who sets the value
    pub presence: Presence,
    /// Documentation
    pub description: String,
    /// Value must be hidden from plan output
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// Changing the value forces replacement of the resource
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_replace: bool,
    /// Keep the prior state value while planning instead of marking unknown
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub use_state_for_unknown: bool,
}

impl Attribute {
    fn new(kind: AttributeType, presence: Presence) -> Self {
        Self {
            kind,
            presence,
            description: String::new(),
            sensitive: false,
            requires_replace: false,
            use_state_for_unknown: false,
        }
    }

    /// Required attribute
    pub fn required(kind: AttributeType) -> Self {
        Self::new(kind, Presence::Required)
    }

    /// Optional attribute
    pub fn optional(kind: AttributeType) -> Self {
        Self::new(kind, Presence::Optional)
    }

    /// Computed attribute
    pub fn computed(kind: AttributeType) -> Self {
        Self::new(kind, Presence::Computed)
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the attribute sensitive
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing this attribute forces replacement
    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Keep the prior state value during planning
    pub fn use_state_for_unknown(mut self) -> Self {
        self.use_state_for_unknown = true;
        self
    }
}

/// Schema of a provider block, resource or data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Documentation
    pub description: String,
    /// Attributes by name
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Empty schema
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Look up an attribute
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Attributes whose change between `prior` and `planned` forces replacement
    ///
    /// A missing prior value (nothing created yet) never forces replacement.
    pub fn replacement_paths(&self, prior: &Value, planned: &Value) -> Vec<AttributePath> {
        self.attributes
            .iter()
            .filter(|(_, attribute)| attribute.requires_replace)
            .filter(|(name, _)| {
                let before = prior.get(name.as_str()).unwrap_or(&Value::Null);
                let after = planned.get(name.as_str()).unwrap_or(&Value::Null);
                !before.is_null() && before != after
            })
            .map(|(name, _)| AttributePath::root(name.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .with_attribute(
                "email",
                Attribute::required(AttributeType::String).requires_replace(),
            )
            .with_attribute("name", Attribute::required(AttributeType::String))
    }

    #[test]
    fn changed_immutable_attribute_forces_replacement() {
        let paths = schema().replacement_paths(
            &json!({"email": "a@example.com", "name": "A"}),
            &json!({"email": "b@example.com", "name": "A"}),
        );
        assert_eq!(paths, vec![AttributePath::root("email")]);
    }

    #[test]
    fn mutable_change_is_in_place() {
        let paths = schema().replacement_paths(
            &json!({"email": "a@example.com", "name": "A"}),
            &json!({"email": "a@example.com", "name": "B"}),
        );
        assert!(paths.is_empty());
    }

    #[test]
    fn creation_never_forces_replacement() {
        let paths =
            schema().replacement_paths(&Value::Null, &json!({"email": "a@example.com"}));
        assert!(paths.is_empty());
    }

    #[test]
    fn schema_serializes_flags_only_when_set() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["attributes"]["email"]["requires_replace"], json!(true));
        assert!(json["attributes"]["name"].get("requires_replace").is_none());
        assert_eq!(json["attributes"]["name"]["type"], json!("string"));
    }
}
