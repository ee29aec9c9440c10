// # Mailjet REST Client
//
// HTTP implementation of `RemoteClient` for the Mailjet REST API v3.
//
// ## Behaviour
//
// - One HTTP request per call, no retries (the validation loop is the only
//   caller allowed to retry)
// - HTTP timeout configured (30 seconds)
// - Status codes mapped to specific errors (401/403, 404, 429, 5xx)
// - The private API key never appears in logs or Debug output
//
// ## API Reference
//
// - Requests: `{base_url}/REST/{resource}[/{id or email}][/{action}]`
// - Authentication: HTTP basic, public key as user, private key as password
// - Responses: `{"Count": n, "Data": [...], "Total": n}`
// - Errors: `{"ErrorInfo": "...", "ErrorMessage": "...", "StatusCode": n}`

use async_trait::async_trait;
use mailjet_core::config::ResolvedConfig;
use mailjet_core::traits::{Endpoint, RecordKey, RemoteClient, RemoteClientFactory};
use mailjet_core::{Error, Result};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope of every successful call
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Data", default)]
    data: Vec<Value>,
}

/// Error body returned by the API
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(rename = "ErrorMessage", default)]
    error_message: String,
    #[serde(rename = "ErrorInfo", default)]
    error_info: String,
}

/// Mailjet REST API client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the private key.
pub struct MailjetClient {
    /// API root, e.g. `https://api.mailjet.com/v3`
    base_url: Url,

    /// Public API key
    api_key_public: String,

    /// Private API key
    /// ⚠️ NEVER log this value
    api_key_private: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the private key
impl std::fmt::Debug for MailjetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailjetClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key_public", &self.api_key_public)
            .field("api_key_private", &"<REDACTED>")
            .finish()
    }
}

impl MailjetClient {
    /// Create a client from resolved configuration
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the HTTP client cannot be
    /// built.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom HTTP timeout
    pub fn with_timeout(config: &ResolvedConfig, timeout: Duration) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Invalid base_url {}: not a base URL",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key_public: config.api_key_public.clone(),
            api_key_private: config.api_key_private.clone(),
            client,
        })
    }

    /// URL of an endpoint, optionally narrowed to one record
    fn url(&self, endpoint: Endpoint, key: Option<&RecordKey>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::config("base_url cannot be a base"))?;
            segments.pop_if_empty().push("REST").push(endpoint.resource);
            match key {
                Some(RecordKey::Id(id)) => {
                    segments.push(&id.to_string());
                }
                Some(RecordKey::Alt(alt)) => {
                    segments.push(alt);
                }
                None => {}
            }
            if let Some(action) = endpoint.action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    /// Send one request and map non-success statuses to errors
    async fn execute(
        &self,
        method: Method,
        endpoint: Endpoint,
        key: Option<&RecordKey>,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let url = self.url(endpoint, key)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&self.api_key_public, Some(&self.api_key_private));
        if let Some(body) = body.filter(|body| !body.is_null()) {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = describe_error(&text);
        let target = match key {
            Some(key) => format!("{} {}", endpoint, key),
            None => endpoint.to_string(),
        };

        Err(match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "Invalid API key or insufficient permissions. Status: {} - {}",
                status, message
            )),
            404 => Error::not_found(format!("{}: {}", target, message)),
            429 => Error::rate_limited(format!(
                "Rate limit exceeded. Please retry later. Status: {}",
                status
            )),
            500..=599 => Error::transport(format!(
                "Mailjet server error on {}: {} - {}",
                target, status, message
            )),
            _ => Error::transport(format!(
                "Request on {} failed: {} - {}",
                target, status, message
            )),
        })
    }

    /// Records of a response envelope
    async fn records(response: reqwest::Response) -> Result<Vec<Value>> {
        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| Error::transport(format!("Failed to parse response: {}", e)))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl RemoteClient for MailjetClient {
    async fn get(&self, endpoint: Endpoint, key: &RecordKey) -> Result<Vec<Value>> {
        let response = self.execute(Method::GET, endpoint, Some(key), None).await?;
        Self::records(response).await
    }

    async fn post(
        &self,
        endpoint: Endpoint,
        key: Option<&RecordKey>,
        payload: &Value,
    ) -> Result<Vec<Value>> {
        let response = self
            .execute(Method::POST, endpoint, key, Some(payload))
            .await?;
        Self::records(response).await
    }

    async fn put(
        &self,
        endpoint: Endpoint,
        key: &RecordKey,
        payload: &Value,
        fields: &[&str],
    ) -> Result<()> {
        let body = restrict_to(payload, fields);
        self.execute(Method::PUT, endpoint, Some(key), Some(&body))
            .await?;
        Ok(())
    }

    async fn delete(&self, endpoint: Endpoint, key: &RecordKey) -> Result<()> {
        self.execute(Method::DELETE, endpoint, Some(key), None)
            .await?;
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "mailjet"
    }
}

/// Keep only the fields named in `fields`
fn restrict_to(payload: &Value, fields: &[&str]) -> Value {
    let filtered: Map<String, Value> = payload
        .as_object()
        .map(|object| {
            object
                .iter()
                .filter(|(name, _)| fields.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(filtered)
}

/// Human-readable message from an API error body
fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(error) if !error.error_message.is_empty() => {
            if error.error_info.is_empty() {
                error.error_message
            } else {
                format!("{} ({})", error.error_message, error.error_info)
            }
        }
        _ => body.to_string(),
    }
}

/// Factory for creating Mailjet clients
pub struct MailjetClientFactory;

impl RemoteClientFactory for MailjetClientFactory {
    fn create(&self, config: &ResolvedConfig) -> Result<Arc<dyn RemoteClient>> {
        tracing::debug!("Creating Mailjet client for {}", config.base_url);
        Ok(Arc::new(MailjetClient::new(config)?))
    }
}
