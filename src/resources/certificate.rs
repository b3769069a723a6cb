//! `dokploy_certificate`
//!
//! Certificates cannot be edited in place: every configurable attribute
//! forces replacement, so update only carries the planned state over.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{keep_secret, non_empty, required, state_id, Resource};
use crate::client::models::Certificate;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateState {
    pub id: Option<String>,
    pub name: Option<String>,
    pub certificate_data: Option<String>,
    pub private_key: Option<String>,
    pub auto_renew: Option<bool>,
    pub server_id: Option<String>,
}

/// A custom TLS certificate served by Traefik.
pub struct CertificateResource;

fn from_remote(remote: Certificate, prior: &CertificateState) -> CertificateState {
    CertificateState {
        id: remote.certificate_id.or_else(|| prior.id.clone()),
        name: remote.name,
        certificate_data: remote.certificate_data,
        private_key: keep_secret(remote.private_key, &prior.private_key),
        auto_renew: remote.auto_renew.or(prior.auto_renew),
        server_id: non_empty(remote.server_id),
    }
}

#[async_trait]
impl Resource for CertificateResource {
    type State = CertificateState;

    fn type_name(&self) -> &'static str {
        "dokploy_certificate"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Certificate ID")
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_force_new()
                    .with_validator(Validator::NotEmpty),
            )
            .with_attribute(
                "certificate_data",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("PEM-encoded certificate chain"),
            )
            .with_attribute(
                "private_key",
                Attribute::required_string().sensitive().with_force_new(),
            )
            .with_attribute(
                "auto_renew",
                Attribute::optional_bool()
                    .with_default(Value::Bool(false))
                    .with_force_new(),
            )
            .with_attribute("server_id", Attribute::optional_string().with_force_new())
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: CertificateState,
    ) -> Result<CertificateState, ProviderError> {
        let name = required(&planned.name, "name")?;
        let body = Certificate {
            name: Some(name.to_string()),
            certificate_data: Some(
                required(&planned.certificate_data, "certificate_data")?.to_string(),
            ),
            private_key: Some(required(&planned.private_key, "private_key")?.to_string()),
            auto_renew: planned.auto_renew,
            server_id: planned.server_id.clone(),
            ..Default::default()
        };
        let created: Certificate = client.create_or_find(&body, "name", name).await?;
        let id = require_id(&created)?;

        let remote: Certificate = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: CertificateState,
    ) -> Result<Option<CertificateState>, ProviderError> {
        let remote: Certificate = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        _client: &DokployClient,
        prior: CertificateState,
        planned: CertificateState,
    ) -> Result<CertificateState, ProviderError> {
        Ok(CertificateState {
            id: prior.id,
            ..planned
        })
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: CertificateState,
    ) -> Result<(), ProviderError> {
        client.remove::<Certificate>(state_id(&current.id)?).await?;
        Ok(())
    }
}
