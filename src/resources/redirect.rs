//! `dokploy_redirect`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{required, state_id, Resource};
use crate::client::models::Redirect;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedirectState {
    pub id: Option<String>,
    pub application_id: Option<String>,
    pub regex: Option<String>,
    pub replacement: Option<String>,
    pub permanent: Option<bool>,
}

/// A regex redirect in front of an application.
pub struct RedirectResource;

fn from_remote(remote: Redirect, prior: &RedirectState) -> RedirectState {
    RedirectState {
        id: remote.redirect_id.or_else(|| prior.id.clone()),
        application_id: remote.application_id.or_else(|| prior.application_id.clone()),
        regex: remote.regex,
        replacement: remote.replacement,
        permanent: remote.permanent,
    }
}

#[async_trait]
impl Resource for RedirectResource {
    type State = RedirectState;

    fn type_name(&self) -> &'static str {
        "dokploy_redirect"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Redirect ID")
            .with_attribute("application_id", Attribute::required_string().with_force_new())
            .with_attribute(
                "regex",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("replacement", Attribute::required_string())
            .with_attribute(
                "permanent",
                Attribute::optional_bool()
                    .with_default(Value::Bool(false))
                    .with_description("Answer with 308 instead of 307"),
            )
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: RedirectState,
    ) -> Result<RedirectState, ProviderError> {
        let body = Redirect {
            application_id: Some(required(&planned.application_id, "application_id")?.to_string()),
            regex: planned.regex.clone(),
            replacement: planned.replacement.clone(),
            permanent: planned.permanent,
            ..Default::default()
        };
        let created = client
            .create::<Redirect, _>(&body)
            .await?
            .ok_or_else(|| {
                ProviderError::Api("redirects.create returned no redirect".to_string())
            })?;
        let id = require_id(&created)?;

        let remote: Redirect = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: RedirectState,
    ) -> Result<Option<RedirectState>, ProviderError> {
        let remote: Redirect = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: RedirectState,
        planned: RedirectState,
    ) -> Result<RedirectState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Redirect {
            redirect_id: Some(id.to_string()),
            regex: planned.regex.clone(),
            replacement: planned.replacement.clone(),
            permanent: planned.permanent,
            ..Default::default()
        };
        client.update::<Redirect, _>(&body).await?;

        let remote: Redirect = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: RedirectState,
    ) -> Result<(), ProviderError> {
        client.remove::<Redirect>(state_id(&current.id)?).await?;
        Ok(())
    }
}
