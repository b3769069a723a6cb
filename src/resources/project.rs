//! `dokploy_project`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{clearable, non_empty, required, state_id, Resource};
use crate::client::models::{Project, ProjectCreated};
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub env: Option<String>,
    pub default_environment_id: Option<String>,
}

/// A project groups environments and their services.
pub struct ProjectResource;

impl ProjectResource {
    async fn refresh(
        &self,
        client: &DokployClient,
        id: &str,
        created_environment: Option<String>,
    ) -> Result<ProjectState, ProviderError> {
        let remote: Project = client.fetch(id).await?;
        let mut state = from_remote(remote);
        if state.default_environment_id.is_none() {
            state.default_environment_id = created_environment;
        }
        state.id.get_or_insert_with(|| id.to_string());
        Ok(state)
    }
}

fn from_remote(remote: Project) -> ProjectState {
    let default_environment_id = remote
        .environments
        .iter()
        .find(|e| e.is_default == Some(true))
        .or_else(|| remote.environments.first())
        .and_then(|e| e.environment_id.clone());

    ProjectState {
        id: remote.project_id,
        name: remote.name,
        description: non_empty(remote.description),
        env: non_empty(remote.env),
        default_environment_id,
    }
}

#[async_trait]
impl Resource for ProjectResource {
    type State = ProjectState;

    fn type_name(&self) -> &'static str {
        "dokploy_project"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A Dokploy project.")
            .with_id("Project ID")
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_validator(Validator::NotEmpty)
                    .with_description("Project name"),
            )
            .with_attribute("description", Attribute::optional_string())
            .with_attribute(
                "env",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("Project-wide environment variables, one KEY=value per line"),
            )
            .with_attribute(
                "default_environment_id",
                Attribute::computed_string()
                    .with_description("ID of the environment created with the project"),
            )
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: ProjectState,
    ) -> Result<ProjectState, ProviderError> {
        let body = Project {
            name: Some(required(&planned.name, "name")?.to_string()),
            description: planned.description.clone(),
            env: planned.env.clone(),
            ..Default::default()
        };
        let created: ProjectCreated = client.mutate("project.create", &body).await?;
        let (project, environment) = created.into_parts();
        let id = require_id(&project)?;

        self.refresh(client, &id, environment.and_then(|e| e.environment_id))
            .await
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: ProjectState,
    ) -> Result<Option<ProjectState>, ProviderError> {
        let id = state_id(&current.id)?;
        self.refresh(client, id, current.default_environment_id.clone())
            .await
            .map(Some)
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: ProjectState,
        planned: ProjectState,
    ) -> Result<ProjectState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Project {
            project_id: Some(id.to_string()),
            name: planned.name.clone(),
            description: clearable(&planned.description),
            env: clearable(&planned.env),
            ..Default::default()
        };
        client.update::<Project, _>(&body).await?;
        self.refresh(client, id, prior.default_environment_id.clone())
            .await
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: ProjectState,
    ) -> Result<(), ProviderError> {
        client.remove::<Project>(state_id(&current.id)?).await?;
        Ok(())
    }
}
