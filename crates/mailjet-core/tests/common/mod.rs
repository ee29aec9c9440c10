//! Test doubles and common utilities for contract tests
//!
//! [`ScriptedRemote`] answers each endpoint with canned responses and counts
//! every call, so tests can assert on exactly which writes were issued.

#![allow(dead_code)]

use async_trait::async_trait;
use mailjet_core::error::{Error, Result};
use mailjet_core::traits::{Endpoint, RecordKey, RemoteClient};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A canned remote answer
pub type Reply = std::result::Result<Vec<Value>, String>;

/// A PUT as received by the remote
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub key: RecordKey,
    pub payload: Value,
    pub fields: Vec<String>,
}

#[derive(Default)]
struct Script {
    by_email: Option<Reply>,
    by_id: Option<Reply>,
    create: Option<Reply>,
    put: Option<Reply>,
    validations: VecDeque<Reply>,
    last_validation: Option<Reply>,
}

/// A RemoteClient driven by canned responses
#[derive(Clone)]
pub struct ScriptedRemote {
    script: Arc<Mutex<Script>>,
    get_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    validate_calls: Arc<AtomicUsize>,
    put_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    puts: Arc<Mutex<Vec<RecordedPut>>>,
    validate_started: Arc<Mutex<Option<Instant>>>,
    validate_offsets: Arc<Mutex<Vec<Duration>>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script::default())),
            get_calls: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(AtomicUsize::new(0)),
            validate_calls: Arc::new(AtomicUsize::new(0)),
            put_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
            puts: Arc::new(Mutex::new(Vec::new())),
            validate_started: Arc::new(Mutex::new(None)),
            validate_offsets: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer lookups by email with `reply`
    pub fn on_lookup_by_email(self, reply: Reply) -> Self {
        self.script.lock().unwrap().by_email = Some(reply);
        self
    }

    /// Answer lookups by ID with `reply`
    pub fn on_lookup_by_id(self, reply: Reply) -> Self {
        self.script.lock().unwrap().by_id = Some(reply);
        self
    }

    /// Answer sender creation with `reply`
    pub fn on_create(self, reply: Reply) -> Self {
        self.script.lock().unwrap().create = Some(reply);
        self
    }

    /// Answer updates with `reply`; updates succeed when unset
    pub fn on_put(self, reply: Reply) -> Self {
        self.script.lock().unwrap().put = Some(reply);
        self
    }

    /// Answer validation calls in order; the last reply repeats
    pub fn on_validate(self, replies: Vec<Reply>) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            script.last_validation = replies.last().cloned();
            script.validations = replies.into();
        }
        self
    }

    /// Number of GET calls
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of sender creations
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of validation calls
    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    /// Number of PUT calls
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of DELETE calls
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Every PUT received, in order
    pub fn puts(&self) -> Vec<RecordedPut> {
        self.puts.lock().unwrap().clone()
    }

    /// Time of each validation call, relative to the first one
    pub fn validate_offsets(&self) -> Vec<Duration> {
        self.validate_offsets.lock().unwrap().clone()
    }

    fn replay(reply: Option<Reply>, what: &str) -> Result<Vec<Value>> {
        match reply {
            Some(Ok(records)) => Ok(records),
            Some(Err(message)) => Err(Error::transport(message)),
            None => Err(Error::not_found(format!("no scripted reply for {}", what))),
        }
    }
}

#[async_trait]
impl RemoteClient for ScriptedRemote {
    async fn get(&self, _endpoint: Endpoint, key: &RecordKey) -> Result<Vec<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        match key {
            RecordKey::Alt(_) => Self::replay(script.by_email.clone(), "lookup by email"),
            RecordKey::Id(_) => Self::replay(script.by_id.clone(), "lookup by id"),
        }
    }

    async fn post(
        &self,
        endpoint: Endpoint,
        _key: Option<&RecordKey>,
        _payload: &Value,
    ) -> Result<Vec<Value>> {
        if endpoint == Endpoint::SENDER_VALIDATE {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            let now = Instant::now();
            let started = *self.validate_started.lock().unwrap().get_or_insert(now);
            self.validate_offsets
                .lock()
                .unwrap()
                .push(now.duration_since(started));

            let mut script = self.script.lock().unwrap();
            let reply = script
                .validations
                .pop_front()
                .or_else(|| script.last_validation.clone());
            return Self::replay(reply, "validate");
        }

        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        Self::replay(script.create.clone(), "create")
    }

    async fn put(
        &self,
        _endpoint: Endpoint,
        key: &RecordKey,
        payload: &Value,
        fields: &[&str],
    ) -> Result<()> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        self.puts.lock().unwrap().push(RecordedPut {
            key: key.clone(),
            payload: payload.clone(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        match self.script.lock().unwrap().put.clone() {
            Some(Err(message)) => Err(Error::transport(message)),
            Some(Ok(_)) | None => Ok(()),
        }
    }

    async fn delete(&self, _endpoint: Endpoint, _key: &RecordKey) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}

/// A sender record as the remote returns it
pub fn sender_json(id: i64, email: &str, status: &str) -> Value {
    json!({
        "ID": id,
        "Email": email,
        "Name": "Alerts",
        "IsDefaultSender": false,
        "EmailType": "transactional",
        "DNSID": 7,
        "Status": status,
        "CreatedAt": "2019-01-09T14:25:16Z"
    })
}

/// A validation result; an empty `global_error` means success
pub fn validation_json(global_error: &str) -> Value {
    json!({
        "GlobalError": global_error,
        "ValidationMethod": if global_error.is_empty() { "ActivationEmail" } else { "" },
        "Errors": null
    })
}
