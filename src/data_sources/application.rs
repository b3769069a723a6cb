//! `dokploy_application`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::Application;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::resources::{non_empty, required};
use crate::schema::{Attribute, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
    pub environment_id: Option<String>,
    pub source_type: Option<String>,
    pub build_type: Option<String>,
    pub docker_image: Option<String>,
    pub application_status: Option<String>,
}

/// Look up one application by id.
pub struct ApplicationDataSource;

#[async_trait]
impl DataSource for ApplicationDataSource {
    type State = ApplicationData;

    fn type_name(&self) -> &'static str {
        "dokploy_application"
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::v0().with_attribute("id", Attribute::required_string());
        for name in [
            "name",
            "app_name",
            "environment_id",
            "source_type",
            "build_type",
            "docker_image",
            "application_status",
        ] {
            schema = schema.with_attribute(name, Attribute::computed_string());
        }
        schema
    }

    async fn read(
        &self,
        client: &DokployClient,
        config: ApplicationData,
    ) -> Result<ApplicationData, ProviderError> {
        let id = required(&config.id, "id")?;
        let app: Application = client.fetch(id).await?;
        Ok(ApplicationData {
            id: Some(id.to_string()),
            name: app.name,
            app_name: app.app_name,
            environment_id: app.environment_id,
            source_type: app.source_type,
            build_type: app.build_type,
            docker_image: non_empty(app.docker_image),
            application_status: app.application_status,
        })
    }
}
