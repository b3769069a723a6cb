//! `dokploy_environment`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{clearable, non_empty, required, state_id, Resource};
use crate::client::models::Environment;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// An environment (production, staging, ...) inside a project.
pub struct EnvironmentResource;

fn from_remote(remote: Environment, prior: &EnvironmentState) -> EnvironmentState {
    EnvironmentState {
        id: remote.environment_id.or_else(|| prior.id.clone()),
        project_id: remote.project_id.or_else(|| prior.project_id.clone()),
        name: remote.name,
        description: non_empty(remote.description),
    }
}

#[async_trait]
impl Resource for EnvironmentResource {
    type State = EnvironmentState;

    fn type_name(&self) -> &'static str {
        "dokploy_environment"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Environment ID")
            .with_attribute(
                "project_id",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("Owning project"),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("description", Attribute::optional_string())
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: EnvironmentState,
    ) -> Result<EnvironmentState, ProviderError> {
        let body = Environment {
            project_id: Some(required(&planned.project_id, "project_id")?.to_string()),
            name: planned.name.clone(),
            description: planned.description.clone(),
            ..Default::default()
        };
        let created = client
            .create::<Environment, _>(&body)
            .await?
            .ok_or_else(|| {
                ProviderError::Api("environment.create returned no environment".to_string())
            })?;
        let id = require_id(&created)?;

        let remote: Environment = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: EnvironmentState,
    ) -> Result<Option<EnvironmentState>, ProviderError> {
        let remote: Environment = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: EnvironmentState,
        planned: EnvironmentState,
    ) -> Result<EnvironmentState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Environment {
            environment_id: Some(id.to_string()),
            name: planned.name.clone(),
            description: clearable(&planned.description),
            ..Default::default()
        };
        client.update::<Environment, _>(&body).await?;

        let remote: Environment = client.fetch(id).await?;
        Ok(from_remote(remote, &prior))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: EnvironmentState,
    ) -> Result<(), ProviderError> {
        client.remove::<Environment>(state_id(&current.id)?).await?;
        Ok(())
    }
}
