//! Core traits of the provider
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`RemoteClient`]: Reach the Mailjet REST API
//! - [`Resource`]: Lifecycle of a managed object, as seen by the declarative engine
//! - [`DataSource`]: Read-only lookups

pub mod remote_client;
pub mod resource;

pub use remote_client::{Endpoint, RecordKey, RemoteClient, RemoteClientFactory};
pub use resource::{DataSource, Resource};
