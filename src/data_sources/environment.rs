//! `dokploy_environment`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::Environment;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::resources::{non_empty, required};
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentData {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Look up one environment by id.
pub struct EnvironmentDataSource;

#[async_trait]
impl DataSource for EnvironmentDataSource {
    type State = EnvironmentData;

    fn type_name(&self) -> &'static str {
        "dokploy_environment"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::required_string())
            .with_attribute("project_id", Attribute::computed_string())
            .with_attribute("name", Attribute::computed_string())
            .with_attribute("description", Attribute::computed_string())
    }

    async fn read(
        &self,
        client: &DokployClient,
        config: EnvironmentData,
    ) -> Result<EnvironmentData, ProviderError> {
        let id = required(&config.id, "id")?;
        let environment: Environment = client.fetch(id).await?;
        Ok(EnvironmentData {
            id: Some(id.to_string()),
            project_id: environment.project_id,
            name: environment.name,
            description: non_empty(environment.description),
        })
    }
}
