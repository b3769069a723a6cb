//! `dokploy_ssh_keys`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::DataSource;
use crate::client::models::SshKey;
use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::resources::non_empty;
use crate::schema::{Attribute, AttributeType, Schema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshKeySummary {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SshKeysData {
    pub ssh_keys: Option<Vec<SshKeySummary>>,
}

/// Every SSH key; private halves are never exposed.
pub struct SshKeysDataSource;

#[async_trait]
impl DataSource for SshKeysDataSource {
    type State = SshKeysData;

    fn type_name(&self) -> &'static str {
        "dokploy_ssh_keys"
    }

    fn schema(&self) -> Schema {
        Schema::v0().with_attribute(
            "ssh_keys",
            Attribute::computed_list(AttributeType::object([
                ("id", AttributeType::String),
                ("name", AttributeType::String),
                ("description", AttributeType::String),
                ("public_key", AttributeType::String),
            ])),
        )
    }

    async fn read(
        &self,
        client: &DokployClient,
        _config: SshKeysData,
    ) -> Result<SshKeysData, ProviderError> {
        let keys: Vec<SshKey> = client.list().await?;
        let ssh_keys = keys
            .into_iter()
            .map(|k| SshKeySummary {
                id: k.ssh_key_id,
                name: k.name,
                description: non_empty(k.description),
                public_key: k.public_key,
            })
            .collect();
        Ok(SshKeysData {
            ssh_keys: Some(ssh_keys),
        })
    }
}
