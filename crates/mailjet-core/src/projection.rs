//! State projection
//!
//! Maps remote records to the attribute model stored by the declarative
//! engine, and desired attributes back to request payloads. There is no
//! logic here beyond type coercion: every computed attribute is copied from
//! the record, and write payloads never carry immutable or computed fields.

use crate::error::{Error, Result};
use crate::records::{DnsRecord, EmailType, SenderRecord};
use crate::validation::parse_wait_for;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Layout of `created_at` in state (RFC 850)
pub const CREATED_AT_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S %Z";

/// Fields an in-place sender update may touch
pub const SENDER_UPDATE_FIELDS: [&str; 3] = ["Name", "EmailType", "IsDefaultSender"];

/// Format a remote timestamp for state
pub fn format_created_at(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(CREATED_AT_FORMAT).to_string()
}

/// State of a `mailjet_sender` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderModel {
    /// Email address; changing it replaces the resource
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Default sender flag
    #[serde(default)]
    pub is_default_sender: Option<bool>,
    /// Email classification
    #[serde(default)]
    pub email_type: Option<EmailType>,
    /// Remote ID (computed)
    #[serde(default)]
    pub id: Option<i64>,
    /// DNS domain ID (computed)
    #[serde(default)]
    pub dns_id: Option<i64>,
    /// Creation timestamp (computed)
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SenderModel {
    /// State seeded from an imported ID
    pub fn imported(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Overwrite every attribute with the remote record
    pub fn refresh_from(&mut self, record: &SenderRecord) {
        self.email = Some(record.email.clone());
        self.name = Some(record.name.clone());
        self.is_default_sender = Some(record.is_default_sender);
        self.email_type = Some(record.email_type);
        self.id = Some(record.id);
        self.dns_id = Some(record.dns_id);
        self.created_at = record.created_at.as_ref().map(format_created_at);
    }

    /// Fresh state for a remote record
    pub fn from_record(record: &SenderRecord) -> Self {
        let mut model = Self::default();
        model.refresh_from(record);
        model
    }

    /// Remote ID, required once the resource exists
    pub fn require_id(&self) -> Result<i64> {
        self.id
            .ok_or_else(|| Error::invalid_input("sender state has no id"))
    }
}

/// Desired attributes of a sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderSpec {
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Email classification
    pub email_type: EmailType,
    /// Default sender flag
    pub is_default_sender: bool,
}

impl SenderSpec {
    /// Desired spec with defaults for the optional attributes
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            email_type: EmailType::default(),
            is_default_sender: false,
        }
    }

    /// Set the email classification
    pub fn with_email_type(mut self, email_type: EmailType) -> Self {
        self.email_type = email_type;
        self
    }

    /// Set the default sender flag
    pub fn with_default_sender(mut self, is_default_sender: bool) -> Self {
        self.is_default_sender = is_default_sender;
        self
    }

    /// Desired spec from planned state
    pub fn from_model(model: &SenderModel) -> Result<Self> {
        let email = model
            .email
            .clone()
            .filter(|email| !email.is_empty())
            .ok_or_else(|| Error::invalid_input("email is required"))?;

        Ok(Self {
            email,
            name: model.name.clone().unwrap_or_default(),
            email_type: model.email_type.unwrap_or_default(),
            is_default_sender: model.is_default_sender.unwrap_or(false),
        })
    }

    /// Body of the create request
    pub fn create_payload(&self) -> SenderCreatePayload {
        SenderCreatePayload {
            email: self.email.clone(),
            name: self.name.clone(),
            email_type: self.email_type,
            is_default_sender: self.is_default_sender,
        }
    }

    /// Body of an in-place update, mutable fields only
    pub fn update_payload(&self) -> SenderUpdatePayload {
        SenderUpdatePayload {
            name: self.name.clone(),
            email_type: self.email_type,
            is_default_sender: self.is_default_sender,
        }
    }
}

/// POST body creating a sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderCreatePayload {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "EmailType")]
    pub email_type: EmailType,
    #[serde(rename = "IsDefaultSender")]
    pub is_default_sender: bool,
}

/// PUT body updating a sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderUpdatePayload {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "EmailType")]
    pub email_type: EmailType,
    #[serde(rename = "IsDefaultSender")]
    pub is_default_sender: bool,
}

/// State of a `mailjet_sender_validate` resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderValidateModel {
    /// Sender to validate; changing it replaces the resource
    pub id: i64,
    /// Maximum time spent retrying the validation
    #[serde(default)]
    pub wait_for: Option<String>,
}

impl SenderValidateModel {
    /// Retry budget; `None` means a single attempt
    pub fn max_wait(&self) -> Result<Option<Duration>> {
        match self.wait_for.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => parse_wait_for(raw).map(Some),
        }
    }
}

/// One DNS entry of the `mailjet_dns` data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsModel {
    pub id: i64,
    pub domain: String,
    pub ownership_token_record_name: String,
    pub ownership_token: String,
    pub spf_record_value: String,
    pub dkim_record_name: String,
    pub dkim_record_value: String,
}

impl From<&DnsRecord> for DnsModel {
    fn from(record: &DnsRecord) -> Self {
        Self {
            id: record.id,
            domain: record.domain.clone(),
            ownership_token_record_name: record.ownership_token_record_name.clone(),
            ownership_token: record.ownership_token.clone(),
            spf_record_value: record.spf_record_value.clone(),
            dkim_record_name: record.dkim_record_name.clone(),
            dkim_record_value: record.dkim_record_value.clone(),
        }
    }
}

/// State of the `mailjet_dns` data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsDataSourceModel {
    /// DNS settings to read
    pub dns_id: i64,
    /// Entries returned by the remote (computed)
    #[serde(default)]
    pub entries: Vec<DnsModel>,
}

impl DnsDataSourceModel {
    /// Replace the entries with the remote records
    pub fn refresh_from(&mut self, records: &[DnsRecord]) {
        self.entries = records.iter().map(DnsModel::from).collect();
    }
}
