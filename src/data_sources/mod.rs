//! Read-only data sources.
//!
//! Same shape as [`crate::resources`]: a typed [`DataSource`] per module,
//! erased to JSON by [`DynamicDataSource`] for the provider's registry.
//! A data source whose object does not exist fails the read.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::plan::normalize_config;
use crate::resources::{from_value, to_value};
use crate::schema::{Diagnostic, Schema};
use crate::validation::validate;

mod application;
mod destinations;
mod domains;
mod environment;
mod project;
mod ssh_keys;

pub use application::ApplicationDataSource;
pub use destinations::DestinationsDataSource;
pub use domains::DomainsDataSource;
pub use environment::EnvironmentDataSource;
pub use project::{ProjectDataSource, ProjectsDataSource};
pub use ssh_keys::SshKeysDataSource;

/// A data source backed by Dokploy API queries.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Typed state: the inputs plus the computed outputs.
    type State: Serialize + DeserializeOwned + Send + Sync;

    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Checks that span more than one attribute.
    fn validate(&self, config: &Self::State) -> Vec<Diagnostic> {
        let _ = config;
        Vec::new()
    }

    /// Fill in the outputs for the given inputs.
    async fn read(
        &self,
        client: &DokployClient,
        config: Self::State,
    ) -> Result<Self::State, ProviderError>;
}

/// A [`DataSource`] with its state erased to JSON.
#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    async fn read(&self, client: &DokployClient, config: Value) -> Result<Value, ProviderError>;
}

#[async_trait]
impl<D: DataSource> DynamicDataSource for D {
    fn type_name(&self) -> &'static str {
        DataSource::type_name(self)
    }

    fn schema(&self) -> Schema {
        DataSource::schema(self)
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let schema = DataSource::schema(self);
        let mut diagnostics = validate(&schema, config);
        if !diagnostics.is_empty() {
            return diagnostics;
        }
        match from_value::<D::State>(normalize_config(&schema, config.clone())) {
            Ok(state) => diagnostics.extend(DataSource::validate(self, &state)),
            Err(e) => diagnostics
                .push(Diagnostic::error("Invalid configuration").with_detail(e.to_string())),
        }
        diagnostics
    }

    async fn read(&self, client: &DokployClient, config: Value) -> Result<Value, ProviderError> {
        let config = normalize_config(&DataSource::schema(self), config);
        let state = DataSource::read(self, client, from_value(config)?).await?;
        to_value(&state)
    }
}

/// Every data source the provider serves.
pub fn all() -> Vec<Box<dyn DynamicDataSource>> {
    vec![
        Box::new(ProjectDataSource),
        Box::new(ProjectsDataSource),
        Box::new(EnvironmentDataSource),
        Box::new(ApplicationDataSource),
        Box::new(SshKeysDataSource),
        Box::new(DestinationsDataSource),
        Box::new(DomainsDataSource),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_names_are_unique() {
        let names: HashSet<_> = all().iter().map(|d| d.type_name()).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains("dokploy_projects"));
    }

    #[test]
    fn test_outputs_are_computed_only() {
        for data_source in all() {
            let schema = data_source.schema();
            let outputs = schema
                .block
                .attributes
                .values()
                .filter(|a| a.flags.is_computed_only())
                .count();
            assert!(outputs > 0, "{} has no outputs", data_source.type_name());
        }
    }
}
