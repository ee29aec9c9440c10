//! Resource and data source registry
//!
//! The registry maps configuration type names (`mailjet_sender`, ...) to
//! their implementations, so the host dispatches requests without hardcoded
//! if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailjet_core::registry::ProviderRegistry;
//!
//! // Every built-in type shares the same configured client
//! let registry = ProviderRegistry::with_builtins(client);
//!
//! let sender = registry.resource("mailjet_sender")?;
//! let state = sender.create(&planned).await?;
//! ```

use crate::error::{Error, Result};
use crate::resources::{DnsDataSource, SenderResource, SenderValidateResource};
use crate::traits::{DataSource, RemoteClient, Resource};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of resources and data sources
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered resources
    resources: RwLock<HashMap<String, Arc<dyn Resource>>>,

    /// Registered data sources
    data_sources: RwLock<HashMap<String, Arc<dyn DataSource>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in resource and data source
    pub fn with_builtins(client: Arc<dyn RemoteClient>) -> Self {
        let registry = Self::new();
        registry.register_resource(Arc::new(SenderResource::new(client.clone())));
        registry.register_resource(Arc::new(SenderValidateResource::new(client.clone())));
        registry.register_data_source(Arc::new(DnsDataSource::new(client)));
        registry
    }

    /// Register a resource under its type name
    pub fn register_resource(&self, resource: Arc<dyn Resource>) {
        let name = resource.type_name().to_string();
        let mut resources = self
            .resources
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resources.insert(name, resource);
    }

    /// Register a data source under its type name
    pub fn register_data_source(&self, data_source: Arc<dyn DataSource>) {
        let name = data_source.type_name().to_string();
        let mut data_sources = self
            .data_sources
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        data_sources.insert(name, data_source);
    }

    /// Look up a resource by type name
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn Resource>)`: Registered resource
    /// - `Err(Error)`: If no resource is registered under `name`
    pub fn resource(&self, name: &str) -> Result<Arc<dyn Resource>> {
        let resources = self
            .resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown resource type: {}", name)))
    }

    /// Look up a data source by type name
    pub fn data_source(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        let data_sources = self
            .data_sources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown data source type: {}", name)))
    }

    /// List all registered resource types, sorted
    pub fn list_resources(&self) -> Vec<String> {
        let resources = self
            .resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = resources.keys().cloned().collect();
        names.sort();
        names
    }

    /// List all registered data source types, sorted
    pub fn list_data_sources(&self) -> Vec<String> {
        let data_sources = self
            .data_sources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut names: Vec<String> = data_sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a resource type is registered
    pub fn has_resource(&self, name: &str) -> bool {
        self.resources
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(name)
    }
}
