//! Remote record shapes
//!
//! These types mirror the JSON objects returned by the Mailjet REST API.
//! They are decoded from the `serde_json::Value` records handed back by a
//! [`RemoteClient`](crate::traits::RemoteClient); the client itself never
//! interprets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle status of a sender on the remote system
///
/// The remote reports the status as a free-form string. It is decoded into
/// a closed set so every decision point has to handle each case explicitly;
/// anything the provider does not know about lands in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SenderStatus {
    /// No status reported (freshly created record)
    #[default]
    Unset,
    /// Created but not validated yet
    Inactive,
    /// Validated and usable
    Active,
    /// Soft-deleted, still addressable by email
    Deleted,
    /// A status value this provider does not know
    Unrecognized(String),
}

impl SenderStatus {
    /// Whether the record is soft-deleted and can be adopted
    pub fn is_deleted(&self) -> bool {
        match self {
            SenderStatus::Deleted => true,
            SenderStatus::Unset
            | SenderStatus::Inactive
            | SenderStatus::Active
            | SenderStatus::Unrecognized(_) => false,
        }
    }

    /// Whether the sender is already validated
    pub fn is_active(&self) -> bool {
        match self {
            SenderStatus::Active => true,
            SenderStatus::Unset
            | SenderStatus::Inactive
            | SenderStatus::Deleted
            | SenderStatus::Unrecognized(_) => false,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            SenderStatus::Unset => "",
            SenderStatus::Inactive => "Inactive",
            SenderStatus::Active => "Active",
            SenderStatus::Deleted => "Deleted",
            SenderStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for SenderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "" => SenderStatus::Unset,
            "Inactive" => SenderStatus::Inactive,
            "Active" => SenderStatus::Active,
            "Deleted" => SenderStatus::Deleted,
            _ => SenderStatus::Unrecognized(raw),
        }
    }
}

impl From<SenderStatus> for String {
    fn from(status: SenderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for SenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderStatus::Unset => f.write_str("<unset>"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Kind of emails a sender is declared to send
///
/// Purely informative on the remote side; it places no sending restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    /// Transactional emails
    Transactional,
    /// Bulk (marketing) emails
    Bulk,
    /// Not specified
    #[default]
    #[serde(other)]
    Unknown,
}

impl EmailType {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailType::Transactional => "transactional",
            EmailType::Bulk => "bulk",
            EmailType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EmailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sender as stored on the remote system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderRecord {
    /// Unique numeric ID
    #[serde(rename = "ID")]
    pub id: i64,

    /// Email address, immutable after creation
    #[serde(rename = "Email")]
    pub email: String,

    /// Display name
    #[serde(rename = "Name", default)]
    pub name: String,

    /// Whether this is the account's default sender
    #[serde(rename = "IsDefaultSender", default)]
    pub is_default_sender: bool,

    /// Declared email classification
    #[serde(rename = "EmailType", default)]
    pub email_type: EmailType,

    /// DNS domain the sender belongs to, assigned by the remote
    #[serde(rename = "DNSID", default)]
    pub dns_id: i64,

    /// Lifecycle status
    #[serde(rename = "Status", default)]
    pub status: SenderStatus,

    /// Creation timestamp
    #[serde(
        rename = "CreatedAt",
        default,
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// DNS settings of a sending domain, computed by the remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Unique numeric ID
    #[serde(rename = "ID")]
    pub id: i64,

    /// Domain name
    #[serde(rename = "Domain", default)]
    pub domain: String,

    /// Name of the TXT record used for ownership verification
    #[serde(rename = "OwnerShipTokenRecordName", default)]
    pub ownership_token_record_name: String,

    /// Ownership verification token
    #[serde(rename = "OwnerShipToken", default)]
    pub ownership_token: String,

    /// Value to publish in the SPF record
    #[serde(rename = "SPFRecordValue", default)]
    pub spf_record_value: String,

    /// Name of the DKIM record
    #[serde(rename = "DKIMRecordName", default)]
    pub dkim_record_name: String,

    /// Value to publish in the DKIM record
    #[serde(rename = "DKIMRecordValue", default)]
    pub dkim_record_value: String,

    /// SPF check status, when reported
    #[serde(rename = "SPFStatus", default, skip_serializing_if = "Option::is_none")]
    pub spf_status: Option<String>,

    /// DKIM check status, when reported
    #[serde(rename = "DKIMStatus", default, skip_serializing_if = "Option::is_none")]
    pub dkim_status: Option<String>,
}

/// Outcome of one call to the sender `validate` action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SenderValidation {
    /// Error covering the whole validation; empty on success
    #[serde(rename = "GlobalError", default)]
    pub global_error: String,

    /// Method through which the sender got validated
    #[serde(rename = "ValidationMethod", default)]
    pub validation_method: String,

    /// Per-method errors
    #[serde(rename = "Errors", default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

impl SenderValidation {
    /// Whether the remote accepted the validation
    pub fn is_success(&self) -> bool {
        self.global_error.is_empty()
    }
}

/// The remote sends an empty string instead of null for unset timestamps
fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom),
    }
}
