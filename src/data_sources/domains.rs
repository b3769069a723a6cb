//! `dokploy_domains`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::Domain;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::resources::attribute_error;
use crate::schema::{Attribute, AttributeType, Diagnostic, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub id: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub port: Option<i64>,
    pub https: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainsData {
    pub application_id: Option<String>,
    pub compose_id: Option<String>,
    pub domains: Option<Vec<DomainSummary>>,
}

/// The domains routed to one application or compose service.
pub struct DomainsDataSource;

#[async_trait]
impl DataSource for DomainsDataSource {
    type State = DomainsData;

    fn type_name(&self) -> &'static str {
        "dokploy_domains"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute("application_id", Attribute::optional_string())
            .with_attribute("compose_id", Attribute::optional_string())
            .with_attribute(
                "domains",
                Attribute::computed_list(AttributeType::object([
                    ("id", AttributeType::String),
                    ("host", AttributeType::String),
                    ("path", AttributeType::String),
                    ("port", AttributeType::Int64),
                    ("https", AttributeType::Bool),
                ])),
            )
    }

    fn validate(&self, config: &DomainsData) -> Vec<Diagnostic> {
        match (&config.application_id, &config.compose_id) {
            (Some(_), None) | (None, Some(_)) => Vec::new(),
            _ => vec![attribute_error(
                "application_id",
                "exactly one of application_id and compose_id must be set",
            )],
        }
    }

    async fn read(
        &self,
        client: &DokployClient,
        config: DomainsData,
    ) -> Result<DomainsData, ProviderError> {
        let application_id = config.application_id.as_deref();
        let domains: Vec<Domain> = match (application_id, config.compose_id.as_deref()) {
            (Some(id), None) => {
                client.query("domain.byApplicationId", &[("applicationId", id)]).await?
            }
            (None, Some(id)) => client.query("domain.byComposeId", &[("composeId", id)]).await?,
            _ => {
                return Err(ProviderError::Validation(
                    "exactly one of application_id and compose_id must be set".to_string(),
                ))
            }
        };

        let domains = domains
            .into_iter()
            .map(|d| DomainSummary {
                id: d.domain_id,
                host: d.host,
                path: d.path,
                port: d.port,
                https: d.https,
            })
            .collect();
        Ok(DomainsData {
            domains: Some(domains),
            ..config
        })
    }
}
