//! Provider configuration
//!
//! The provider block may set the API base URL and both halves of the API
//! key. Missing keys fall back to the `MJ_APIKEY_PUBLIC` and
//! `MJ_APIKEY_PRIVATE` environment variables. Resolution happens once, when
//! the provider is configured; the resulting [`ResolvedConfig`] is immutable
//! and handed to the client factory.

use crate::schema::{Attribute, AttributeType, Schema};
use serde::{Deserialize, Serialize};

/// Default Mailjet API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.mailjet.com/v3";

/// Environment variable holding the public API key
pub const ENV_API_KEY_PUBLIC: &str = "MJ_APIKEY_PUBLIC";

/// Environment variable holding the private API key
pub const ENV_API_KEY_PRIVATE: &str = "MJ_APIKEY_PRIVATE";

/// Provider block as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Mailjet API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Public API key
    #[serde(default)]
    pub api_key_public: Option<String>,

    /// Private API key
    #[serde(default)]
    pub api_key_private: Option<String>,
}

impl ProviderConfig {
    /// Schema of the provider block
    pub fn schema() -> Schema {
        Schema::new("Manage Mailjet senders and inspect their DNS settings.")
            .with_attribute(
                "base_url",
                Attribute::optional(AttributeType::String).with_description(format!(
                    "Base URL of the Mailjet API. Default to {}.",
                    DEFAULT_BASE_URL
                )),
            )
            .with_attribute(
                "api_key_public",
                Attribute::optional(AttributeType::String).with_description(format!(
                    "Public API key for Mailjet. Default to the value of the `{}` environment variable.",
                    ENV_API_KEY_PUBLIC
                )),
            )
            .with_attribute(
                "api_key_private",
                Attribute::optional(AttributeType::String)
                    .sensitive()
                    .with_description(format!(
                        "Private API key for Mailjet. Default to the value of the `{}` environment variable.",
                        ENV_API_KEY_PRIVATE
                    )),
            )
    }

    /// Resolve against the process environment
    pub fn resolve(self) -> Result<ResolvedConfig, crate::Error> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary variable lookup
    ///
    /// Explicit values win over the environment.
    pub fn resolve_with<F>(self, lookup: F) -> Result<ResolvedConfig, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key_public = self
            .api_key_public
            .or_else(|| lookup(ENV_API_KEY_PUBLIC))
            .unwrap_or_default();
        let api_key_private = self
            .api_key_private
            .or_else(|| lookup(ENV_API_KEY_PRIVATE))
            .unwrap_or_default();

        let resolved = ResolvedConfig {
            base_url,
            api_key_public,
            api_key_private,
        };
        resolved.validate()?;
        Ok(resolved)
    }
}

/// Provider configuration after environment fallback
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Base URL of the Mailjet API
    pub base_url: String,
    /// Public API key
    pub api_key_public: String,
    /// Private API key
    /// ⚠️ NEVER log this value
    pub api_key_private: String,
}

impl ResolvedConfig {
    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("base_url cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "base_url must use HTTP or HTTPS scheme. Got: {}",
                self.base_url
            )));
        }
        if self.api_key_public.is_empty() {
            return Err(crate::Error::config(format!(
                "Public API key is required. Set api_key_public or {}",
                ENV_API_KEY_PUBLIC
            )));
        }
        if self.api_key_private.is_empty() {
            return Err(crate::Error::config(format!(
                "Private API key is required. Set api_key_private or {}",
                ENV_API_KEY_PRIVATE
            )));
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the private key
impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("base_url", &self.base_url)
            .field("api_key_public", &self.api_key_public)
            .field("api_key_private", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Option<String> {
        match name {
            ENV_API_KEY_PUBLIC => Some("env-public".to_string()),
            ENV_API_KEY_PRIVATE => Some("env-private".to_string()),
            _ => None,
        }
    }

    #[test]
    fn environment_fills_missing_keys() {
        let resolved = ProviderConfig::default().resolve_with(env).unwrap();

        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.api_key_public, "env-public");
        assert_eq!(resolved.api_key_private, "env-private");
    }

    #[test]
    fn explicit_values_win() {
        let config = ProviderConfig {
            base_url: Some("http://localhost:8080/v3".to_string()),
            api_key_public: Some("explicit-public".to_string()),
            api_key_private: None,
        };
        let resolved = config.resolve_with(env).unwrap();

        assert_eq!(resolved.base_url, "http://localhost:8080/v3");
        assert_eq!(resolved.api_key_public, "explicit-public");
        assert_eq!(resolved.api_key_private, "env-private");
    }

    #[test]
    fn missing_keys_are_rejected() {
        let result = ProviderConfig::default().resolve_with(|_| None);
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn bad_scheme_is_rejected() {
        let config = ProviderConfig {
            base_url: Some("ftp://api.mailjet.com".to_string()),
            ..Default::default()
        };
        assert!(config.resolve_with(env).is_err());
    }

    #[test]
    fn private_key_not_exposed_in_debug() {
        let resolved = ProviderConfig::default().resolve_with(env).unwrap();
        let debug_str = format!("{:?}", resolved);
        assert!(!debug_str.contains("env-private"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn provider_schema_marks_private_key_sensitive() {
        let schema = ProviderConfig::schema();
        assert!(schema.attribute("api_key_private").unwrap().sensitive);
        assert!(!schema.attribute("api_key_public").unwrap().sensitive);
    }
}
