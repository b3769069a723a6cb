//! `dokploy_ssh_key`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{clearable, keep_secret, non_empty, required, state_id, Resource};
use crate::client::models::SshKey;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshKeyState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
}

/// A key pair used to pull private git repositories.
pub struct SshKeyResource;

fn from_remote(remote: SshKey, prior: &SshKeyState) -> SshKeyState {
    SshKeyState {
        id: remote.ssh_key_id.or_else(|| prior.id.clone()),
        name: remote.name,
        description: non_empty(remote.description),
        // The private half is never returned by sshKey.one.
        private_key: keep_secret(remote.private_key, &prior.private_key),
        public_key: remote.public_key.or_else(|| prior.public_key.clone()),
    }
}

#[async_trait]
impl Resource for SshKeyResource {
    type State = SshKeyState;

    fn type_name(&self) -> &'static str {
        "dokploy_ssh_key"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("SSH key ID")
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("description", Attribute::optional_string())
            .with_attribute(
                "private_key",
                Attribute::required_string().sensitive().with_force_new(),
            )
            .with_attribute(
                "public_key",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("OpenSSH public key, e.g. \"ssh-ed25519 AAAA...\""),
            )
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: SshKeyState,
    ) -> Result<SshKeyState, ProviderError> {
        let name = required(&planned.name, "name")?;
        let body = SshKey {
            name: Some(name.to_string()),
            description: planned.description.clone(),
            private_key: Some(required(&planned.private_key, "private_key")?.to_string()),
            public_key: Some(required(&planned.public_key, "public_key")?.to_string()),
            ..Default::default()
        };
        let created: SshKey = client.create_or_find(&body, "name", name).await?;
        let id = require_id(&created)?;

        let remote: SshKey = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: SshKeyState,
    ) -> Result<Option<SshKeyState>, ProviderError> {
        let remote: SshKey = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: SshKeyState,
        planned: SshKeyState,
    ) -> Result<SshKeyState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = SshKey {
            ssh_key_id: Some(id.to_string()),
            name: planned.name.clone(),
            description: clearable(&planned.description),
            ..Default::default()
        };
        client.update::<SshKey, _>(&body).await?;

        let remote: SshKey = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: SshKeyState,
    ) -> Result<(), ProviderError> {
        client.remove::<SshKey>(state_id(&current.id)?).await?;
        Ok(())
    }
}
