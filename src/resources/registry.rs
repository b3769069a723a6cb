//! `dokploy_registry`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{clearable, keep_secret, non_empty, required, state_id, Resource};
use crate::client::models::Registry;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryState {
    pub id: Option<String>,
    pub registry_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub registry_url: Option<String>,
    pub registry_type: Option<String>,
    pub image_prefix: Option<String>,
    pub server_id: Option<String>,
}

/// Credentials for a container registry.
pub struct RegistryResource;

fn from_remote(remote: Registry, prior: &RegistryState) -> RegistryState {
    RegistryState {
        id: remote.registry_id.or_else(|| prior.id.clone()),
        registry_name: remote.registry_name,
        username: remote.username,
        password: keep_secret(remote.password, &prior.password),
        registry_url: remote.registry_url,
        registry_type: remote.registry_type,
        image_prefix: non_empty(remote.image_prefix),
        server_id: non_empty(remote.server_id),
    }
}

#[async_trait]
impl Resource for RegistryResource {
    type State = RegistryState;

    fn type_name(&self) -> &'static str {
        "dokploy_registry"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Registry ID")
            .with_attribute(
                "registry_name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("username", Attribute::required_string())
            .with_attribute("password", Attribute::required_string().sensitive())
            .with_attribute("registry_url", Attribute::required_string())
            .with_attribute(
                "registry_type",
                Attribute::optional_string().with_default(Value::from("cloud")),
            )
            .with_attribute("image_prefix", Attribute::optional_string())
            .with_attribute("server_id", Attribute::optional_string())
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: RegistryState,
    ) -> Result<RegistryState, ProviderError> {
        let name = required(&planned.registry_name, "registry_name")?;
        let body = Registry {
            registry_name: Some(name.to_string()),
            username: planned.username.clone(),
            password: planned.password.clone(),
            registry_url: planned.registry_url.clone(),
            registry_type: planned.registry_type.clone(),
            // The create procedure requires the field even when unused.
            image_prefix: Some(planned.image_prefix.clone().unwrap_or_default()),
            server_id: planned.server_id.clone(),
            ..Default::default()
        };
        let created: Registry = client.create_or_find(&body, "registryName", name).await?;
        let id = require_id(&created)?;

        let remote: Registry = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: RegistryState,
    ) -> Result<Option<RegistryState>, ProviderError> {
        let remote: Registry = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: RegistryState,
        planned: RegistryState,
    ) -> Result<RegistryState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Registry {
            registry_id: Some(id.to_string()),
            registry_name: planned.registry_name.clone(),
            username: planned.username.clone(),
            password: planned.password.clone(),
            registry_url: planned.registry_url.clone(),
            registry_type: planned.registry_type.clone(),
            image_prefix: clearable(&planned.image_prefix),
            server_id: planned.server_id.clone(),
        };
        client.update::<Registry, _>(&body).await?;

        let remote: Registry = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: RegistryState,
    ) -> Result<(), ProviderError> {
        client.remove::<Registry>(state_id(&current.id)?).await?;
        Ok(())
    }
}
