//! `dokploy_project` and `dokploy_projects`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::Project;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::resources::{non_empty, required};
use crate::schema::{Attribute, AttributeType, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub environment_ids: Option<Vec<String>>,
}

/// Look up one project by id.
pub struct ProjectDataSource;

#[async_trait]
impl DataSource for ProjectDataSource {
    type State = ProjectData;

    fn type_name(&self) -> &'static str {
        "dokploy_project"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::required_string())
            .with_attribute("name", Attribute::computed_string())
            .with_attribute("description", Attribute::computed_string())
            .with_attribute("environment_ids", Attribute::computed_list(AttributeType::String))
    }

    async fn read(
        &self,
        client: &DokployClient,
        config: ProjectData,
    ) -> Result<ProjectData, ProviderError> {
        let id = required(&config.id, "id")?;
        let project: Project = client.fetch(id).await?;
        Ok(ProjectData {
            id: Some(id.to_string()),
            name: project.name,
            description: non_empty(project.description),
            environment_ids: Some(
                project
                    .environments
                    .into_iter()
                    .filter_map(|e| e.environment_id)
                    .collect(),
            ),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectsData {
    pub projects: Option<Vec<ProjectSummary>>,
}

/// Every project visible to the API key.
pub struct ProjectsDataSource;

#[async_trait]
impl DataSource for ProjectsDataSource {
    type State = ProjectsData;

    fn type_name(&self) -> &'static str {
        "dokploy_projects"
    }

    fn schema(&self) -> Schema {
        Schema::v0().with_attribute(
            "projects",
            Attribute::computed_list(AttributeType::object([
                ("id", AttributeType::String),
                ("name", AttributeType::String),
                ("description", AttributeType::String),
            ])),
        )
    }

    async fn read(
        &self,
        client: &DokployClient,
        _config: ProjectsData,
    ) -> Result<ProjectsData, ProviderError> {
        let projects: Vec<Project> = client.list().await?;
        Ok(ProjectsData {
            projects: Some(
                projects
                    .into_iter()
                    .map(|p| ProjectSummary {
                        id: p.project_id,
                        name: p.name,
                        description: non_empty(p.description),
                    })
                    .collect(),
            ),
        })
    }
}
