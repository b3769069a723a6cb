//! `dokploy_security`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{keep_secret, required, state_id, Resource};
use crate::client::models::Security;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityState {
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// HTTP basic auth in front of an application.
pub struct SecurityResource;

fn from_remote(remote: Security, prior: &SecurityState) -> SecurityState {
    SecurityState {
        id: remote.security_id.or_else(|| prior.id.clone()),
        application_id: remote.application_id.or_else(|| prior.application_id.clone()),
        username: remote.username,
        password: keep_secret(remote.password, &prior.password),
    }
}

#[async_trait]
impl Resource for SecurityResource {
    type State = SecurityState;

    fn type_name(&self) -> &'static str {
        "dokploy_security"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("HTTP basic auth credentials for an application.")
            .with_id("Security ID")
            .with_attribute("application_id", Attribute::required_string().with_force_new())
            .with_attribute(
                "username",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("password", Attribute::required_string().sensitive())
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: SecurityState,
    ) -> Result<SecurityState, ProviderError> {
        let body = Security {
            application_id: Some(required(&planned.application_id, "application_id")?.to_string()),
            username: planned.username.clone(),
            password: planned.password.clone(),
            ..Default::default()
        };
        let created = client
            .create::<Security, _>(&body)
            .await?
            .ok_or_else(|| {
                ProviderError::Api("security.create returned no credentials".to_string())
            })?;
        let id = require_id(&created)?;

        let remote: Security = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: SecurityState,
    ) -> Result<Option<SecurityState>, ProviderError> {
        let remote: Security = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: SecurityState,
        planned: SecurityState,
    ) -> Result<SecurityState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Security {
            security_id: Some(id.to_string()),
            username: planned.username.clone(),
            password: planned.password.clone(),
            ..Default::default()
        };
        client.update::<Security, _>(&body).await?;

        let remote: Security = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: SecurityState,
    ) -> Result<(), ProviderError> {
        client.remove::<Security>(state_id(&current.id)?).await?;
        Ok(())
    }
}
