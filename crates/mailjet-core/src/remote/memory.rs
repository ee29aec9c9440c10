// # Memory Remote
//
// In-memory implementation of RemoteClient.
//
// ## Purpose
//
// Behaves like the Mailjet API closely enough to exercise the provider
// without network access: numeric IDs are assigned on create, senders are
// addressable by ID or by email, deletes are soft and a PUT revives a
// deleted sender.
//
// ## When to Use
//
// - Testing environments
// - Embedding the provider in demos

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::Error;
use crate::records::{DnsRecord, SenderRecord, SenderStatus, SenderValidation};
use crate::traits::{Endpoint, RecordKey, RemoteClient};

#[derive(Debug, Default)]
struct Inner {
    senders: HashMap<i64, SenderRecord>,
    dns: HashMap<i64, DnsRecord>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// DNS settings of a domain, created on first use
    fn dns_id_for(&mut self, email: &str) -> i64 {
        let domain = email.rsplit('@').next().unwrap_or(email).to_string();
        if let Some(existing) = self.dns.values().find(|dns| dns.domain == domain) {
            return existing.id;
        }

        let id = self.next_id();
        let token = format!("{:032x}", id);
        self.dns.insert(
            id,
            DnsRecord {
                id,
                domain: domain.clone(),
                ownership_token_record_name: format!("mailjet._{}.{}.", &token[24..], domain),
                ownership_token: token,
                spf_record_value: "v=spf1 include:spf.mailjet.com ?all".to_string(),
                dkim_record_name: format!("mailjet._domainkey.{}.", domain),
                dkim_record_value: "k=rsa; p=MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQ".to_string(),
                spf_status: Some("Not checked".to_string()),
                dkim_status: Some("Not checked".to_string()),
            },
        );
        id
    }

    fn sender_mut(&mut self, key: &RecordKey) -> Result<&mut SenderRecord, Error> {
        let found = match key {
            RecordKey::Id(id) => self.senders.get_mut(id),
            RecordKey::Alt(email) => self.senders.values_mut().find(|s| &s.email == email),
        };
        found.ok_or_else(|| Error::not_found(format!("Object not found: sender {}", key)))
    }
}

/// In-memory Mailjet API
///
/// # Example
///
/// ```rust,no_run
/// use mailjet_core::remote::MemoryRemote;
/// use mailjet_core::traits::{Endpoint, RecordKey, RemoteClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let remote = MemoryRemote::new();
///     let payload = serde_json::json!({"Email": "a@example.com", "Name": "A"});
///     let created = remote.post(Endpoint::SENDER, None, &payload).await?;
///     assert_eq!(created.len(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryRemote {
    /// Create an empty remote
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a sender record as-is
    pub async fn insert_sender(&self, sender: SenderRecord) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(sender.id);
        inner.senders.insert(sender.id, sender);
    }

    /// Seed DNS settings as-is
    pub async fn insert_dns(&self, dns: DnsRecord) {
        let mut inner = self.inner.write().await;
        inner.next_id = inner.next_id.max(dns.id);
        inner.dns.insert(dns.id, dns);
    }

    /// Current copy of a sender
    pub async fn sender(&self, id: i64) -> Option<SenderRecord> {
        self.inner.read().await.senders.get(&id).cloned()
    }

    /// Number of stored senders, deleted ones included
    pub async fn sender_count(&self) -> usize {
        self.inner.read().await.senders.len()
    }

    async fn create_sender(&self, payload: &Value) -> Result<Vec<Value>, Error> {
        let email = payload
            .get("Email")
            .and_then(Value::as_str)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| Error::invalid_input("Email is required"))?
            .to_string();

        let mut inner = self.inner.write().await;
        if inner
            .senders
            .values()
            .any(|s| s.email == email && !s.status.is_deleted())
        {
            return Err(Error::transport(format!(
                "A sender with the email {} already exists",
                email
            )));
        }

        let dns_id = inner.dns_id_for(&email);
        let mut sender = SenderRecord {
            id: inner.next_id(),
            email,
            name: String::new(),
            is_default_sender: false,
            email_type: Default::default(),
            dns_id,
            status: SenderStatus::Inactive,
            created_at: Some(Utc::now()),
        };
        apply_fields(&mut sender, payload, None)?;

        let record = serde_json::to_value(&sender)?;
        inner.senders.insert(sender.id, sender);
        Ok(vec![record])
    }

    async fn validate_sender(&self, key: &RecordKey) -> Result<Vec<Value>, Error> {
        let mut inner = self.inner.write().await;
        let sender = inner.sender_mut(key)?;

        let outcome = match sender.status {
            SenderStatus::Deleted => SenderValidation {
                global_error: "The sender is deleted".to_string(),
                ..Default::default()
            },
            SenderStatus::Unset
            | SenderStatus::Inactive
            | SenderStatus::Active
            | SenderStatus::Unrecognized(_) => {
                sender.status = SenderStatus::Active;
                SenderValidation {
                    validation_method: "ActivationEmail".to_string(),
                    ..Default::default()
                }
            }
        };

        Ok(vec![serde_json::to_value(outcome)?])
    }
}

#[async_trait]
impl RemoteClient for MemoryRemote {
    async fn get(&self, endpoint: Endpoint, key: &RecordKey) -> Result<Vec<Value>, Error> {
        let inner = self.inner.read().await;

        match (endpoint.resource, key) {
            ("sender", RecordKey::Id(id)) => {
                let sender = inner
                    .senders
                    .get(id)
                    .ok_or_else(|| Error::not_found(format!("Object not found: sender {}", key)))?;
                Ok(vec![serde_json::to_value(sender)?])
            }
            ("sender", RecordKey::Alt(email)) => {
                let mut matches: Vec<&SenderRecord> =
                    inner.senders.values().filter(|s| &s.email == email).collect();
                if matches.is_empty() {
                    return Err(Error::not_found(format!("Object not found: sender {}", key)));
                }
                matches.sort_by_key(|s| s.id);
                matches
                    .into_iter()
                    .map(|s| serde_json::to_value(s).map_err(Error::from))
                    .collect()
            }
            ("dns", RecordKey::Id(id)) => {
                let dns = inner
                    .dns
                    .get(id)
                    .ok_or_else(|| Error::not_found(format!("Object not found: dns {}", key)))?;
                Ok(vec![serde_json::to_value(dns)?])
            }
            _ => Err(Error::invalid_input(format!(
                "unsupported lookup {} {}",
                endpoint, key
            ))),
        }
    }

    async fn post(
        &self,
        endpoint: Endpoint,
        key: Option<&RecordKey>,
        payload: &Value,
    ) -> Result<Vec<Value>, Error> {
        match (endpoint, key) {
            (Endpoint::SENDER, None) => self.create_sender(payload).await,
            (Endpoint::SENDER_VALIDATE, Some(key)) => self.validate_sender(key).await,
            _ => Err(Error::invalid_input(format!("unsupported POST on {}", endpoint))),
        }
    }

    async fn put(
        &self,
        endpoint: Endpoint,
        key: &RecordKey,
        payload: &Value,
        fields: &[&str],
    ) -> Result<(), Error> {
        if endpoint != Endpoint::SENDER {
            return Err(Error::invalid_input(format!("unsupported PUT on {}", endpoint)));
        }

        let mut inner = self.inner.write().await;
        let sender = inner.sender_mut(key)?;
        apply_fields(sender, payload, Some(fields))?;
        if sender.status.is_deleted() {
            sender.status = SenderStatus::Inactive;
        }
        Ok(())
    }

    async fn delete(&self, endpoint: Endpoint, key: &RecordKey) -> Result<(), Error> {
        if endpoint != Endpoint::SENDER {
            return Err(Error::invalid_input(format!("unsupported DELETE on {}", endpoint)));
        }

        let mut inner = self.inner.write().await;
        let sender = inner.sender_mut(key)?;
        sender.status = SenderStatus::Deleted;
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "memory"
    }
}

/// Copy the mutable sender fields present in `payload`
fn apply_fields(
    sender: &mut SenderRecord,
    payload: &Value,
    mask: Option<&[&str]>,
) -> Result<(), Error> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);
    let allowed = |name: &str| mask.is_none_or(|mask| mask.contains(&name));

    for (name, value) in fields {
        if !allowed(name) {
            continue;
        }
        match name.as_str() {
            "Name" => sender.name = serde_json::from_value(value.clone())?,
            "EmailType" => sender.email_type = serde_json::from_value(value.clone())?,
            "IsDefaultSender" => sender.is_default_sender = serde_json::from_value(value.clone())?,
            _ => {}
        }
    }
    Ok(())
}
