//! Reconciliation engine
//!
//! The engine is where desired state meets the remote API:
//! - [`SenderReconciler`] creates, adopts, refreshes, updates and deletes
//!   sender records
//! - [`SenderValidator`] drives a sender to the validated state, polling the
//!   remote `validate` action within a caller supplied time budget
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌──────────────────┐
//! │ SenderResource   │      │ SenderValidate   │
//! │ (lifecycle verbs)│      │ Resource         │
//! └──────────────────┘      └──────────────────┘
//!          │                         │
//!          ▼                         ▼
//! ┌──────────────────┐      ┌──────────────────┐
//! │ SenderReconciler │      │ SenderValidator  │
//! └──────────────────┘      └──────────────────┘
//!          │                         │
//!          └────────────┬────────────┘
//!                       ▼
//!              ┌──────────────────┐
//!              │  RemoteClient    │
//!              └──────────────────┘
//! ```
//!
//! Both components hold the shared client by `Arc` and keep no state of
//! their own between calls.

pub mod convergence;
pub mod reconciler;

pub use convergence::{SenderValidator, VALIDATION_POLL_INTERVAL};
pub use reconciler::SenderReconciler;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode raw remote records
pub(crate) fn decode<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>> {
    records
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(Error::from))
        .collect()
}

/// Take the single element of a result set
pub(crate) fn exactly_one<T>(mut items: Vec<T>, context: impl FnOnce() -> String) -> Result<T> {
    match items.len() {
        1 => Ok(items.remove(0)),
        got => Err(Error::inconsistent(context(), got)),
    }
}
