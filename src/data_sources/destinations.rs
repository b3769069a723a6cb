//! `dokploy_destinations`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::Destination;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeType, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationSummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl From<Destination> for DestinationSummary {
    fn from(d: Destination) -> Self {
        Self {
            id: d.destination_id,
            name: d.name,
            provider: d.provider,
            bucket: d.bucket,
            region: d.region,
            endpoint: d.endpoint,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationsData {
    pub destinations: Option<Vec<DestinationSummary>>,
}

/// Every backup destination, without credentials.
pub struct DestinationsDataSource;

#[async_trait]
impl DataSource for DestinationsDataSource {
    type State = DestinationsData;

    fn type_name(&self) -> &'static str {
        "dokploy_destinations"
    }

    fn schema(&self) -> Schema {
        let fields = ["id", "name", "provider", "bucket", "region", "endpoint"];
        Schema::v0().with_attribute(
            "destinations",
            Attribute::computed_list(AttributeType::object(
                fields.into_iter().map(|f| (f, AttributeType::String)),
            )),
        )
    }

    async fn read(
        &self,
        client: &DokployClient,
        _config: DestinationsData,
    ) -> Result<DestinationsData, ProviderError> {
        let destinations: Vec<Destination> = client.list().await?;
        Ok(DestinationsData {
            destinations: Some(destinations.into_iter().map(DestinationSummary::from).collect()),
        })
    }
}
