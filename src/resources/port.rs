//! `dokploy_port`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{required, state_id, Resource};
use crate::client::models::Port;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortState {
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub published_port: Option<i64>,
    pub target_port: Option<i64>,
    pub protocol: Option<String>,
    pub publish_mode: Option<String>,
}

/// A port published by an application's Swarm service.
pub struct PortResource;

fn to_remote(state: &PortState) -> Port {
    Port {
        port_id: state.id.clone(),
        application_id: state.application_id.clone(),
        published_port: state.published_port,
        target_port: state.target_port,
        protocol: state.protocol.clone(),
        publish_mode: state.publish_mode.clone(),
    }
}

fn from_remote(remote: Port, prior: &PortState) -> PortState {
    PortState {
        id: remote.port_id.or_else(|| prior.id.clone()),
        application_id: remote.application_id.or_else(|| prior.application_id.clone()),
        published_port: remote.published_port,
        target_port: remote.target_port,
        protocol: remote.protocol,
        publish_mode: remote.publish_mode,
    }
}

fn port_range() -> Validator {
    Validator::Between { min: 1, max: 65535 }
}

#[async_trait]
impl Resource for PortResource {
    type State = PortState;

    fn type_name(&self) -> &'static str {
        "dokploy_port"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Port ID")
            .with_attribute("application_id", Attribute::required_string().with_force_new())
            .with_attribute(
                "published_port",
                Attribute::required_int64().with_validator(port_range()),
            )
            .with_attribute("target_port", Attribute::required_int64().with_validator(port_range()))
            .with_attribute(
                "protocol",
                Attribute::optional_string()
                    .with_default(Value::from("tcp"))
                    .one_of(&["tcp", "udp"]),
            )
            .with_attribute(
                "publish_mode",
                Attribute::optional_string()
                    .with_default(Value::from("ingress"))
                    .one_of(&["ingress", "host"]),
            )
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: PortState,
    ) -> Result<PortState, ProviderError> {
        required(&planned.application_id, "application_id")?;
        let mut body = to_remote(&planned);
        body.port_id = None;
        let created = client
            .create::<Port, _>(&body)
            .await?
            .ok_or_else(|| ProviderError::Api("port.create returned no port".to_string()))?;
        let id = require_id(&created)?;

        let remote: Port = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: PortState,
    ) -> Result<Option<PortState>, ProviderError> {
        let remote: Port = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: PortState,
        planned: PortState,
    ) -> Result<PortState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Port {
            port_id: Some(id.to_string()),
            application_id: None,
            ..to_remote(&planned)
        };
        client.update::<Port, _>(&body).await?;

        let remote: Port = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: PortState,
    ) -> Result<(), ProviderError> {
        client.remove::<Port>(state_id(&current.id)?).await?;
        Ok(())
    }
}
