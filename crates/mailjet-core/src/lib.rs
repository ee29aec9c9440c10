// # mailjet-core
//
// Core library of the Mailjet provider plugin.
//
// ## Architecture Overview
//
// This library manages Mailjet senders on behalf of a declarative
// infrastructure engine:
// - **RemoteClient**: Trait for reaching the Mailjet REST API
// - **SenderReconciler**: Create-or-adopt, refresh, update and delete senders
// - **SenderValidator**: Drive a sender to the validated state, with retries
// - **Projection**: Map remote records to state documents and back
// - **Resource / DataSource**: Lifecycle verbs seen by the declarative engine
// - **ProviderRegistry**: Lookup of resources and data sources by type name
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic knows nothing about HTTP
// 2. **Remote is authoritative**: State is refreshed after every mutation
// 3. **Library-First**: The host binary is a thin dispatcher over this crate
// 4. **No hidden retries**: Only sender validation polls the remote

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod projection;
pub mod records;
pub mod registry;
pub mod remote;
pub mod resources;
pub mod schema;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{ProviderConfig, ResolvedConfig};
pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use engine::{SenderReconciler, SenderValidator};
pub use error::{Error, Result};
pub use records::{DnsRecord, EmailType, SenderRecord, SenderStatus, SenderValidation};
pub use registry::ProviderRegistry;
pub use remote::MemoryRemote;
pub use traits::{DataSource, RemoteClient, RemoteClientFactory, Resource};
