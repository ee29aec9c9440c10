// # Remote Client Trait
//
// Defines the interface used to reach the Mailjet REST API.
//
// ## Implementations
//
// - HTTP: `mailjet-client` crate
// - In-memory: `mailjet_core::remote::MemoryRemote` (tests, demos)
//
// ## Usage
//
// ```rust,ignore
// use mailjet_core::traits::{Endpoint, RecordKey, RemoteClient};
//
// let records = client.get(Endpoint::SENDER, &RecordKey::alt("a@example.com")).await?;
// ```

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// A remote resource family, optionally narrowed to an action sub-resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Resource name (e.g. "sender")
    pub resource: &'static str,
    /// Action applied to a single record (e.g. "validate")
    pub action: Option<&'static str>,
}

impl Endpoint {
    /// Sender records
    pub const SENDER: Endpoint = Endpoint {
        resource: "sender",
        action: None,
    };

    /// The sender validation action
    pub const SENDER_VALIDATE: Endpoint = Endpoint {
        resource: "sender",
        action: Some("validate"),
    };

    /// DNS settings of sending domains
    pub const DNS: Endpoint = Endpoint {
        resource: "dns",
        action: None,
    };
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Some(action) => write!(f, "{}/{}", self.resource, action),
            None => f.write_str(self.resource),
        }
    }
}

/// How a single record is addressed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Primary numeric ID
    Id(i64),
    /// Alternate key (the email address for senders)
    Alt(String),
}

impl RecordKey {
    /// Address a record by alternate key
    pub fn alt(key: impl Into<String>) -> Self {
        RecordKey::Alt(key.into())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Id(id) => write!(f, "#{}", id),
            RecordKey::Alt(key) => f.write_str(key),
        }
    }
}

/// Trait for clients of the Mailjet REST API
///
/// Every call returns the raw records of the response envelope. A result set
/// may hold zero, one or many records; the client performs no cardinality
/// checks, callers do.
///
/// # Thread Safety
///
/// Implementations must be stateless between calls and usable across async
/// tasks. The provider shares one instance for every operation.
///
/// # Retries
///
/// Implementations must not retry. A failed call is surfaced as an error and
/// the caller decides what to do; the only retrying caller is the sender
/// validation loop.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Fetch the records matching `key`
    async fn get(&self, endpoint: Endpoint, key: &RecordKey) -> Result<Vec<Value>, crate::Error>;

    /// Create a record, or trigger an action when `key` is given
    ///
    /// Returns the records of the response (the created record, or the
    /// action results).
    async fn post(
        &self,
        endpoint: Endpoint,
        key: Option<&RecordKey>,
        payload: &Value,
    ) -> Result<Vec<Value>, crate::Error>;

    /// Update the fields listed in `fields` of the record addressed by `key`
    ///
    /// Fields of `payload` that are not in `fields` must not be sent.
    async fn put(
        &self,
        endpoint: Endpoint,
        key: &RecordKey,
        payload: &Value,
        fields: &[&str],
    ) -> Result<(), crate::Error>;

    /// Delete the record addressed by `key`
    async fn delete(&self, endpoint: Endpoint, key: &RecordKey) -> Result<(), crate::Error>;

    /// Client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing remote clients from resolved configuration
pub trait RemoteClientFactory: Send + Sync {
    /// Create a RemoteClient instance
    fn create(
        &self,
        config: &crate::config::ResolvedConfig,
    ) -> Result<std::sync::Arc<dyn RemoteClient>, crate::Error>;
}
