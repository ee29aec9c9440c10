//! Routing of engine requests to resources and data sources

use crate::protocol::{Operation, Response};
use async_trait::async_trait;
use mailjet_core::config::ProviderConfig;
use mailjet_core::diagnostics::{AttributePath, Diagnostic};
use mailjet_core::traits::{Endpoint, RecordKey, RemoteClient, RemoteClientFactory};
use mailjet_core::{Error, ProviderRegistry};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Stand-in client for operations that never reach the API
struct Unconfigured;

impl Unconfigured {
    fn error() -> Error {
        Error::config("the provider is not configured")
    }
}

#[async_trait]
impl RemoteClient for Unconfigured {
    async fn get(&self, _endpoint: Endpoint, _key: &RecordKey) -> mailjet_core::Result<Vec<Value>> {
        Err(Self::error())
    }

    async fn post(
        &self,
        _endpoint: Endpoint,
        _key: Option<&RecordKey>,
        _payload: &Value,
    ) -> mailjet_core::Result<Vec<Value>> {
        Err(Self::error())
    }

    async fn put(
        &self,
        _endpoint: Endpoint,
        _key: &RecordKey,
        _payload: &Value,
        _fields: &[&str],
    ) -> mailjet_core::Result<()> {
        Err(Self::error())
    }

    async fn delete(&self, _endpoint: Endpoint, _key: &RecordKey) -> mailjet_core::Result<()> {
        Err(Self::error())
    }

    fn client_name(&self) -> &'static str {
        "unconfigured"
    }
}

/// Dispatches operations through a registry of the built-in types
pub struct Dispatcher {
    registry: ProviderRegistry,
}

impl Dispatcher {
    /// Dispatcher backed by `client`
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            registry: ProviderRegistry::with_builtins(client),
        }
    }

    /// Configure the provider for `operation`
    ///
    /// Credentials are resolved once, and only when the operation reaches
    /// the API; schema, validation and planning work without them.
    pub fn configure(
        provider: ProviderConfig,
        operation: &Operation,
        factory: &dyn RemoteClientFactory,
    ) -> Result<Self, Diagnostic> {
        if !operation.needs_remote() {
            debug!("Operation {} runs without an API client", operation.name());
            return Ok(Self::new(Arc::new(Unconfigured)));
        }

        let summary = "Unable to configure the Mailjet provider";
        let resolved = provider
            .resolve()
            .map_err(|e| Diagnostic::error(summary, e.to_string()))?;
        debug!("Resolved provider configuration: {:?}", resolved);

        let client = factory
            .create(&resolved)
            .map_err(|e| Diagnostic::error(summary, e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Run one operation
    pub async fn handle(&self, operation: Operation) -> Response {
        info!("Handling {} operation", operation.name());

        match self.run(operation).await {
            Ok(response) => response,
            Err(diagnostic) => Response::failure(diagnostic),
        }
    }

    async fn run(&self, operation: Operation) -> Result<Response, Diagnostic> {
        match operation {
            Operation::Schema => Ok(Response {
                schema: Some(self.schemas()?),
                ..Default::default()
            }),
            Operation::Validate { type_name, config } => {
                let resource = self.resource(&type_name)?;
                Ok(Response::diagnostics(resource.validate_config(&config)))
            }
            Operation::Plan {
                type_name,
                prior,
                planned,
            } => {
                let resource = self.resource(&type_name)?;
                Ok(Response {
                    requires_replace: resource.requires_replace(&prior, &planned),
                    ..Default::default()
                })
            }
            Operation::Create { type_name, planned } => {
                let resource = self.resource(&type_name)?;
                let diagnostics = resource.validate_config(&planned);
                if diagnostics.has_error() {
                    return Ok(Response::diagnostics(diagnostics));
                }
                Ok(Response::state(resource.create(&planned).await?))
            }
            Operation::Read { type_name, state } => {
                let resource = self.resource(&type_name)?;
                Ok(Response::state(resource.read(&state).await?))
            }
            Operation::Update {
                type_name,
                prior,
                planned,
            } => {
                let resource = self.resource(&type_name)?;
                let replace = resource.requires_replace(&prior, &planned);
                if !replace.is_empty() {
                    return Err(replacement_required(&replace));
                }
                Ok(Response::state(resource.update(&prior, &planned).await?))
            }
            Operation::Delete { type_name, state } => {
                let resource = self.resource(&type_name)?;
                resource.delete(&state).await?;
                Ok(Response::default())
            }
            Operation::Import { type_name, id } => {
                let resource = self.resource(&type_name)?;
                let seeded = resource.import_state(&id)?;
                Ok(Response::state(resource.read(&seeded).await?))
            }
            Operation::ReadDataSource { type_name, config } => {
                let data_source = self
                    .registry
                    .data_source(&type_name)
                    .map_err(|e| Diagnostic::error("Unknown data source", e.to_string()))?;
                Ok(Response::state(data_source.read(&config).await?))
            }
        }
    }

    fn resource(&self, type_name: &str) -> Result<Arc<dyn mailjet_core::Resource>, Diagnostic> {
        self.registry
            .resource(type_name)
            .map_err(|e| Diagnostic::error("Unknown resource", e.to_string()))
    }

    fn schemas(&self) -> Result<Value, Diagnostic> {
        let encode = |schema| {
            serde_json::to_value(schema)
                .map_err(|e| Diagnostic::error("Unable to encode schema", e.to_string()))
        };

        let mut resources = Map::new();
        for name in self.registry.list_resources() {
            let resource = self.resource(&name)?;
            resources.insert(name, encode(resource.schema())?);
        }

        let mut data_sources = Map::new();
        for name in self.registry.list_data_sources() {
            let data_source = self
                .registry
                .data_source(&name)
                .map_err(|e| Diagnostic::error("Unknown data source", e.to_string()))?;
            data_sources.insert(name, encode(data_source.schema())?);
        }

        Ok(json!({
            "provider": encode(ProviderConfig::schema())?,
            "resources": resources,
            "data_sources": data_sources,
        }))
    }
}

fn replacement_required(paths: &[AttributePath]) -> Diagnostic {
    let names: Vec<String> = paths.iter().map(ToString::to_string).collect();
    Diagnostic::attribute_error(
        paths[0].clone(),
        "Change requires replacement",
        format!("{} cannot be updated in place", names.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailjet_core::config::ResolvedConfig;
    use mailjet_core::remote::MemoryRemote;
    use mailjet_core::traits::RemoteClientFactory;

    struct MemoryFactory(MemoryRemote);

    impl RemoteClientFactory for MemoryFactory {
        fn create(&self, _config: &ResolvedConfig) -> mailjet_core::Result<Arc<dyn RemoteClient>> {
            Ok(Arc::new(self.0.clone()))
        }
    }

    fn sender(email: &str, name: &str) -> Value {
        json!({
            "email": email,
            "name": name,
            "is_default_sender": false,
            "email_type": "bulk"
        })
    }

    #[tokio::test]
    async fn schema_lists_every_type() {
        let dispatcher = Dispatcher::new(Arc::new(Unconfigured));
        let response = dispatcher.handle(Operation::Schema).await;

        let schema = response.schema.unwrap();
        assert!(schema["resources"]["mailjet_sender"].is_object());
        assert!(schema["resources"]["mailjet_sender_validate"].is_object());
        assert!(schema["data_sources"]["mailjet_dns"].is_object());
        assert_eq!(
            schema["provider"]["attributes"]["api_key_private"]["sensitive"],
            json!(true)
        );
    }

    #[tokio::test]
    async fn create_then_import_through_dispatcher() {
        let dispatcher = Dispatcher::new(Arc::new(MemoryRemote::new()));

        let created = dispatcher
            .handle(Operation::Create {
                type_name: "mailjet_sender".to_string(),
                planned: sender("a@example.com", "Alerts"),
            })
            .await;
        assert!(!created.has_error(), "{:?}", created.diagnostics);
        let state = created.state.unwrap();

        let imported = dispatcher
            .handle(Operation::Import {
                type_name: "mailjet_sender".to_string(),
                id: state["id"].to_string(),
            })
            .await;
        assert_eq!(imported.state.unwrap(), state);
    }

    #[tokio::test]
    async fn update_of_email_is_refused() {
        let dispatcher = Dispatcher::new(Arc::new(MemoryRemote::new()));
        let prior = json!({"email": "a@example.com", "name": "A", "id": 1});
        let planned = json!({"email": "b@example.com", "name": "A", "id": 1});

        let plan = dispatcher
            .handle(Operation::Plan {
                type_name: "mailjet_sender".to_string(),
                prior: prior.clone(),
                planned: planned.clone(),
            })
            .await;
        assert_eq!(plan.requires_replace, vec![AttributePath::root("email")]);

        let update = dispatcher
            .handle(Operation::Update {
                type_name: "mailjet_sender".to_string(),
                prior,
                planned,
            })
            .await;
        assert!(update.has_error());
    }

    #[tokio::test]
    async fn invalid_wait_for_blocks_creation() {
        let dispatcher = Dispatcher::new(Arc::new(MemoryRemote::new()));

        let response = dispatcher
            .handle(Operation::Create {
                type_name: "mailjet_sender_validate".to_string(),
                planned: json!({"id": 1, "wait_for": "30wrong"}),
            })
            .await;

        assert!(response.state.is_none());
        let diagnostic = response.diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.summary, "failed to parse the time duration");
    }

    #[tokio::test]
    async fn unknown_type_is_a_diagnostic() {
        let dispatcher = Dispatcher::new(Arc::new(MemoryRemote::new()));

        let response = dispatcher
            .handle(Operation::Read {
                type_name: "mailjet_template".to_string(),
                state: json!({}),
            })
            .await;

        assert!(response.has_error());
    }

    #[test]
    fn offline_operations_skip_credentials() {
        let factory = MemoryFactory(MemoryRemote::new());
        let result = Dispatcher::configure(ProviderConfig::default(), &Operation::Schema, &factory);
        assert!(result.is_ok());
    }

    #[test]
    fn remote_operations_require_credentials() {
        let factory = MemoryFactory(MemoryRemote::new());
        let config = ProviderConfig {
            api_key_public: Some(String::new()),
            api_key_private: Some(String::new()),
            ..Default::default()
        };
        let operation = Operation::Read {
            type_name: "mailjet_sender".to_string(),
            state: json!({"id": 1}),
        };

        let result = Dispatcher::configure(config, &operation, &factory);
        assert!(result.is_err());
    }
}
