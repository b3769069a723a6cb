//! `dokploy_destination`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{keep_secret, non_empty, required, state_id, Resource};
use crate::client::models::Destination;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub access_key: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub server_id: Option<String>,
}

/// An S3-compatible bucket backups are written to.
pub struct DestinationResource;

fn to_remote(state: &DestinationState) -> Destination {
    Destination {
        destination_id: state.id.clone(),
        name: state.name.clone(),
        provider: state.provider.clone(),
        access_key: state.access_key.clone(),
        secret_access_key: state.secret_access_key.clone(),
        bucket: state.bucket.clone(),
        region: state.region.clone(),
        endpoint: state.endpoint.clone(),
        server_id: state.server_id.clone(),
    }
}

fn from_remote(remote: Destination, prior: &DestinationState) -> DestinationState {
    DestinationState {
        id: remote.destination_id.or_else(|| prior.id.clone()),
        name: remote.name,
        provider: non_empty(remote.provider),
        access_key: keep_secret(remote.access_key, &prior.access_key),
        secret_access_key: keep_secret(remote.secret_access_key, &prior.secret_access_key),
        bucket: remote.bucket,
        region: remote.region,
        endpoint: remote.endpoint,
        server_id: non_empty(remote.server_id),
    }
}

#[async_trait]
impl Resource for DestinationResource {
    type State = DestinationState;

    fn type_name(&self) -> &'static str {
        "dokploy_destination"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("An S3-compatible backup destination.")
            .with_id("Destination ID")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute(
                "provider",
                Attribute::optional_string()
                    .with_description("Storage provider label, e.g. AWS or Cloudflare"),
            )
            .with_attribute("access_key", Attribute::required_string().sensitive())
            .with_attribute("secret_access_key", Attribute::required_string().sensitive())
            .with_attribute("bucket", Attribute::required_string())
            .with_attribute("region", Attribute::required_string())
            .with_attribute("endpoint", Attribute::required_string())
            .with_attribute("server_id", Attribute::optional_string())
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: DestinationState,
    ) -> Result<DestinationState, ProviderError> {
        let name = required(&planned.name, "name")?;
        let created: Destination = client
            .create_or_find(&to_remote(&planned), "name", name)
            .await?;
        let id = require_id(&created)?;

        let remote: Destination = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: DestinationState,
    ) -> Result<Option<DestinationState>, ProviderError> {
        let remote: Destination = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: DestinationState,
        planned: DestinationState,
    ) -> Result<DestinationState, ProviderError> {
        let id = state_id(&prior.id)?;
        let mut body = to_remote(&planned);
        body.destination_id = Some(id.to_string());
        client.update::<Destination, _>(&body).await?;

        let remote: Destination = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: DestinationState,
    ) -> Result<(), ProviderError> {
        client.remove::<Destination>(state_id(&current.id)?).await?;
        Ok(())
    }
}
