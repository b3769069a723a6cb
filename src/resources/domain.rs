//! `dokploy_domain`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{attribute_error, clearable, non_empty, required, state_id, Resource};
use crate::client::models::Domain;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainState {
    pub id: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub port: Option<i64>,
    pub https: Option<bool>,
    pub certificate_type: Option<String>,
    pub custom_cert_resolver: Option<String>,
    pub application_id: Option<String>,
    pub compose_id: Option<String>,
    pub service_name: Option<String>,
    pub strip_path: Option<bool>,
    pub internal_path: Option<String>,
    pub domain_type: Option<String>,
}

/// A host name routed to an application or a compose service.
pub struct DomainResource;

fn from_remote(remote: Domain, prior: &DomainState) -> DomainState {
    DomainState {
        id: remote.domain_id.or_else(|| prior.id.clone()),
        host: remote.host,
        path: remote.path,
        port: remote.port,
        https: remote.https,
        certificate_type: remote.certificate_type,
        custom_cert_resolver: non_empty(remote.custom_cert_resolver),
        application_id: non_empty(remote.application_id),
        compose_id: non_empty(remote.compose_id),
        service_name: non_empty(remote.service_name),
        strip_path: remote.strip_path,
        internal_path: non_empty(remote.internal_path),
        domain_type: remote.domain_type,
    }
}

fn domain_type(state: &DomainState) -> &'static str {
    if state.compose_id.is_some() {
        "compose"
    } else {
        "application"
    }
}

#[async_trait]
impl Resource for DomainResource {
    type State = DomainState;

    fn type_name(&self) -> &'static str {
        "dokploy_domain"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A domain routed by Traefik to a Dokploy service.")
            .with_id("Domain ID")
            .with_attribute(
                "host",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("path", Attribute::optional_string().with_default(Value::from("/")))
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_default(Value::from(3000))
                    .with_validator(Validator::Between { min: 1, max: 65535 })
                    .with_description("Container port traffic is forwarded to"),
            )
            .with_attribute("https", Attribute::optional_bool().with_default(Value::Bool(false)))
            .with_attribute(
                "certificate_type",
                Attribute::optional_string()
                    .with_default(Value::from("none"))
                    .one_of(&["none", "letsencrypt", "custom"]),
            )
            .with_attribute("custom_cert_resolver", Attribute::optional_string())
            .with_attribute("application_id", Attribute::optional_string().with_force_new())
            .with_attribute("compose_id", Attribute::optional_string().with_force_new())
            .with_attribute(
                "service_name",
                Attribute::optional_string()
                    .with_description("Compose service the domain points at"),
            )
            .with_attribute(
                "strip_path",
                Attribute::optional_bool().with_default(Value::Bool(false)),
            )
            .with_attribute("internal_path", Attribute::optional_string())
            .with_attribute("domain_type", Attribute::computed_string())
    }

    fn validate(&self, config: &DomainState) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        match (&config.application_id, &config.compose_id) {
            (Some(_), Some(_)) => diagnostics.push(attribute_error(
                "compose_id",
                "only one of application_id and compose_id can be set",
            )),
            (None, None) => diagnostics.push(attribute_error(
                "application_id",
                "one of application_id and compose_id must be set",
            )),
            _ => {},
        }
        if config.compose_id.is_some() && config.service_name.is_none() {
            diagnostics.push(attribute_error(
                "service_name",
                "service_name is required when compose_id is set",
            ));
        }
        if config.custom_cert_resolver.is_some()
            && config.certificate_type.as_deref() != Some("custom")
        {
            diagnostics.push(attribute_error(
                "custom_cert_resolver",
                "custom_cert_resolver requires certificate_type = \"custom\"",
            ));
        }
        diagnostics
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: DomainState,
    ) -> Result<DomainState, ProviderError> {
        let body = Domain {
            host: Some(required(&planned.host, "host")?.to_string()),
            path: planned.path.clone(),
            port: planned.port,
            https: planned.https,
            certificate_type: planned.certificate_type.clone(),
            custom_cert_resolver: planned.custom_cert_resolver.clone(),
            application_id: planned.application_id.clone(),
            compose_id: planned.compose_id.clone(),
            service_name: planned.service_name.clone(),
            domain_type: Some(domain_type(&planned).to_string()),
            strip_path: planned.strip_path,
            internal_path: planned.internal_path.clone(),
            ..Default::default()
        };
        let created = client
            .create::<Domain, _>(&body)
            .await?
            .ok_or_else(|| ProviderError::Api("domain.create returned no domain".to_string()))?;
        let id = require_id(&created)?;

        let remote: Domain = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: DomainState,
    ) -> Result<Option<DomainState>, ProviderError> {
        let remote: Domain = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: DomainState,
        planned: DomainState,
    ) -> Result<DomainState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Domain {
            domain_id: Some(id.to_string()),
            host: planned.host.clone(),
            path: planned.path.clone(),
            port: planned.port,
            https: planned.https,
            certificate_type: planned.certificate_type.clone(),
            custom_cert_resolver: clearable(&planned.custom_cert_resolver),
            service_name: planned.service_name.clone(),
            domain_type: Some(domain_type(&planned).to_string()),
            strip_path: planned.strip_path,
            internal_path: clearable(&planned.internal_path),
            ..Default::default()
        };
        client.update::<Domain, _>(&body).await?;

        let remote: Domain = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: DomainState,
    ) -> Result<(), ProviderError> {
        client.remove::<Domain>(state_id(&current.id)?).await?;
        Ok(())
    }
}
