//! `dokploy_mount`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{attribute_error, non_empty, required, state_id, Resource};
use crate::client::models::{DatabaseEngine, Mount};
use crate::client::{require_id, ClientError, DokployClient, Entity};
use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema, Validator};

const SERVICE_TYPES: &[&str] =
    &["application", "postgres", "mysql", "mariadb", "mongo", "redis", "compose"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountState {
    pub id: Option<String>,
    pub service_id: Option<String>,
    pub service_type: Option<String>,
    #[serde(rename = "type")]
    pub mount_type: Option<String>,
    pub mount_path: Option<String>,
    pub host_path: Option<String>,
    pub volume_name: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<String>,
}

/// A bind mount, named volume or generated file attached to a service.
pub struct MountResource;

/// The id key of a service type, e.g. `applicationId`.
fn service_id_key(service_type: &str) -> Option<&'static str> {
    match service_type {
        "application" => Some("applicationId"),
        "compose" => Some("composeId"),
        other => DatabaseEngine::from_namespace(other).map(DatabaseEngine::id_key),
    }
}

/// Only the fields the mount type uses are sent.
fn to_remote(state: &MountState) -> Mount {
    let kind = state.mount_type.as_deref();
    Mount {
        mount_type: state.mount_type.clone(),
        mount_path: state.mount_path.clone(),
        host_path: state.host_path.clone().filter(|_| kind == Some("bind")),
        volume_name: state.volume_name.clone().filter(|_| kind == Some("volume")),
        content: state.content.clone().filter(|_| kind == Some("file")),
        file_path: state.file_path.clone().filter(|_| kind == Some("file")),
        ..Default::default()
    }
}

fn from_remote(remote: Mount, prior: &MountState) -> MountState {
    MountState {
        id: remote.mount_id.clone().or_else(|| prior.id.clone()),
        service_id: remote
            .owner_id()
            .map(str::to_string)
            .or_else(|| prior.service_id.clone()),
        service_type: remote.service_type,
        mount_type: remote.mount_type,
        mount_path: remote.mount_path,
        host_path: non_empty(remote.host_path),
        volume_name: non_empty(remote.volume_name),
        content: non_empty(remote.content),
        file_path: non_empty(remote.file_path),
    }
}

impl MountResource {
    /// Find a mount that `mounts.create` did not echo back by listing the
    /// mounts of its service.
    async fn find_created(
        &self,
        client: &DokployClient,
        service_type: &str,
        service_id: &str,
        mount_path: &str,
    ) -> Result<Mount, ProviderError> {
        let key = service_id_key(service_type)
            .ok_or_else(|| {
                ProviderError::Validation(format!("unsupported service_type {:?}", service_type))
            })?;
        let procedure = format!("{}.one", service_type);
        let service: Value = client.query(&procedure, &[(key, service_id)]).await?;
        let found = service
            .get("mounts")
            .and_then(Value::as_array)
            .and_then(|mounts| {
                mounts
                    .iter()
                    .rev()
                    .find(|m| m.get("mountPath").and_then(Value::as_str) == Some(mount_path))
            })
            .cloned()
            .ok_or_else(|| ClientError::NoMatch {
                procedure,
                name: mount_path.to_string(),
            })?;
        Ok(serde_json::from_value(found)?)
    }
}

#[async_trait]
impl Resource for MountResource {
    type State = MountState;

    fn type_name(&self) -> &'static str {
        "dokploy_mount"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_id("Mount ID")
            .with_attribute(
                "service_id",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("ID of the owning service"),
            )
            .with_attribute(
                "service_type",
                Attribute::required_string().with_force_new().one_of(SERVICE_TYPES),
            )
            .with_attribute(
                "type",
                Attribute::required_string()
                    .with_force_new()
                    .one_of(&["bind", "volume", "file"]),
            )
            .with_attribute(
                "mount_path",
                Attribute::required_string()
                    .with_validator(Validator::NotEmpty)
                    .with_description("Path inside the container"),
            )
            .with_attribute("host_path", Attribute::optional_string())
            .with_attribute("volume_name", Attribute::optional_string())
            .with_attribute("content", Attribute::optional_string())
            .with_attribute("file_path", Attribute::optional_string())
    }

    fn validate(&self, config: &MountState) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut need = |attribute: &str, value: &Option<String>, kind: &str| {
            if value.is_none() {
                diagnostics.push(attribute_error(
                    attribute,
                    format!("{} is required for {} mounts", attribute, kind),
                ));
            }
        };
        match config.mount_type.as_deref() {
            Some("bind") => need("host_path", &config.host_path, "bind"),
            Some("volume") => need("volume_name", &config.volume_name, "volume"),
            Some("file") => {
                need("content", &config.content, "file");
                need("file_path", &config.file_path, "file");
            }
            _ => {},
        }
        diagnostics
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: MountState,
    ) -> Result<MountState, ProviderError> {
        let service_type = required(&planned.service_type, "service_type")?;
        let service_id = required(&planned.service_id, "service_id")?;
        let mount_path = required(&planned.mount_path, "mount_path")?;

        let body = Mount {
            service_type: Some(service_type.to_string()),
            service_id: Some(service_id.to_string()),
            ..to_remote(&planned)
        };
        let created = match client.create::<Mount, _>(&body).await? {
            Some(mount) if mount.id().is_some() => mount,
            _ => {
                debug!(
                    service_type,
                    "mounts.create returned no id, looking the mount up on its service"
                );
                self.find_created(client, service_type, service_id, mount_path).await?
            }
        };
        let id = require_id(&created)?;

        let remote: Mount = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: MountState,
    ) -> Result<Option<MountState>, ProviderError> {
        let remote: Mount = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: MountState,
        planned: MountState,
    ) -> Result<MountState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Mount {
            mount_id: Some(id.to_string()),
            ..to_remote(&planned)
        };
        client.update::<Mount, _>(&body).await?;

        let remote: Mount = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: MountState,
    ) -> Result<(), ProviderError> {
        client.remove::<Mount>(state_id(&current.id)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_id_key() {
        assert_eq!(service_id_key("application"), Some("applicationId"));
        assert_eq!(service_id_key("redis"), Some("redisId"));
        assert_eq!(service_id_key("worker"), None);
    }

    #[test]
    fn test_to_remote_sends_fields_for_mount_type() {
        let state = MountState {
            mount_type: Some("volume".to_string()),
            mount_path: Some("/data".to_string()),
            volume_name: Some("pgdata".to_string()),
            host_path: Some("/srv/ignored".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(to_remote(&state)).unwrap();
        assert_eq!(body, json!({"type": "volume", "volumeName": "pgdata", "mountPath": "/data"}));
    }

    #[test]
    fn test_validate_per_mount_type() {
        let config = MountState {
            mount_type: Some("file".to_string()),
            content: Some("key=value".to_string()),
            ..Default::default()
        };
        let diags = Resource::validate(&MountResource, &config);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].attribute.as_deref(), Some("file_path"));

        let config = MountState {
            mount_type: Some("bind".to_string()),
            host_path: Some("/srv/app".to_string()),
            ..Default::default()
        };
        assert!(Resource::validate(&MountResource, &config).is_empty());
    }

    #[test]
    fn test_from_remote_recovers_service_id() {
        let remote: Mount = serde_json::from_value(json!({
            "mountId": "m-1",
            "type": "bind",
            "hostPath": "/srv/app",
            "mountPath": "/app",
            "serviceType": "application",
            "applicationId": "a-1"
        }))
        .unwrap();
        let state = from_remote(remote, &MountState::default());
        assert_eq!(state.service_id.as_deref(), Some("a-1"));
        assert_eq!(state.mount_type.as_deref(), Some("bind"));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["type"], "bind");
    }
}
