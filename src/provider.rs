//! The Dokploy provider.
//!
//! [`DokployProvider`] owns the resource and data source registries and the
//! client built at Configure time, and dispatches every protocol call to the
//! registered type by name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::client::DokployClient;
use crate::config::{provider_schema, ProviderConfig};
use crate::data_sources::{self, DynamicDataSource};
use crate::error::ProviderError;
use crate::plan::normalize_config;
use crate::resources::{self, DynamicResource};
use crate::schema::{has_errors, Diagnostic, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ProviderMetadata, ServerCapabilities};
use crate::validation::validate;

/// Provider for managing a Dokploy instance.
pub struct DokployProvider {
    client: RwLock<Option<Arc<DokployClient>>>,
    resources: BTreeMap<&'static str, Box<dyn DynamicResource>>,
    data_sources: BTreeMap<&'static str, Box<dyn DynamicDataSource>>,
}

impl Default for DokployProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DokployProvider {
    /// A provider with every resource and data source registered and no
    /// client yet.
    pub fn new() -> Self {
        Self {
            client: RwLock::new(None),
            resources: resources::all().into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources::all()
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    /// Whether Configure has succeeded.
    pub async fn is_configured(&self) -> bool {
        self.client.read().await.is_some()
    }

    async fn client(&self) -> Result<Arc<DokployClient>, ProviderError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or_else(|| {
                ProviderError::Configuration("provider has not been configured".to_string())
            })
    }

    fn resource(&self, resource_type: &str) -> Result<&dyn DynamicResource, ProviderError> {
        self.resources
            .get(resource_type)
            .map(|r| r.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn data_source(&self, data_source_type: &str) -> Result<&dyn DynamicDataSource, ProviderError> {
        self.data_sources
            .get(data_source_type)
            .map(|d| d.as_ref())
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

#[async_trait::async_trait]
impl ProviderService for DokployProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(provider_schema());
        for (name, resource) in &self.resources {
            schema = schema.with_resource(*name, resource.schema());
        }
        for (name, data_source) in &self.data_sources {
            schema = schema.with_data_source(*name, data_source.schema());
        }
        schema
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: self.resources.keys().map(|k| k.to_string()).collect(),
            data_sources: self.data_sources.keys().map(|k| k.to_string()).collect(),
            capabilities: ServerCapabilities { plan_destroy: true },
        }
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = validate(&provider_schema(), &config);
        if has_errors(&diagnostics) {
            return Ok(diagnostics);
        }
        // Only the shape of a configured host is checked here; missing values
        // may still come from the environment at Configure time.
        let config = decode_config(config)?;
        if let Some(host) = config.host.as_deref().filter(|h| !h.trim().is_empty()) {
            if let Err(detail) = crate::config::parse_host(host) {
                diagnostics.push(
                    Diagnostic::error("Invalid Dokploy host")
                        .with_detail(detail)
                        .with_attribute("host"),
                );
            }
        }
        Ok(diagnostics)
    }

    #[instrument(skip_all)]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let diagnostics = validate(&provider_schema(), &config);
        if has_errors(&diagnostics) {
            return Ok(diagnostics);
        }
        let config = decode_config(config)?;
        let resolved = match config.resolve() {
            Ok(resolved) => resolved,
            Err(diagnostics) => return Ok(diagnostics),
        };

        let client = DokployClient::new(&resolved)?;
        info!(host = %resolved.host, timeout = ?resolved.timeout, "Provider configured");
        *self.client.write().await = Some(Arc::new(client));
        Ok(diagnostics)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        debug!("Dropping Dokploy client");
        self.client.write().await.take();
        Ok(())
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.resource(resource_type)?.validate(&config))
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        Ok(resource.plan(prior_state.as_ref(), &proposed_state, &config))
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.create(&client, planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.read(&client, current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.update(&client, prior_state, planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        resource.delete(&client, current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client().await?;
        let state = resource.import(&client, id).await?;
        Ok(vec![ImportedResource::new(resource_type, state)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self.data_source(data_source_type)?.validate(&config))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        let client = self.client().await?;
        data_source.read(&client, config).await
    }
}

/// Decode a validated provider block, treating a null block as empty.
fn decode_config(config: Value) -> Result<ProviderConfig, ProviderError> {
    let config = if config.is_null() {
        Value::Object(Default::default())
    } else {
        config
    };
    let config = normalize_config(&provider_schema(), config);
    Ok(serde_json::from_value(config)?)
}
