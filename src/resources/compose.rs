//! `dokploy_compose`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{attribute_error, clearable, non_empty, required, state_id, Resource};
use crate::client::models::Compose;
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Diagnostic, Schema, Validator};

const DEFAULT_COMPOSE_PATH: &str = "./docker-compose.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeState {
    pub id: Option<String>,
    pub environment_id: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
    pub description: Option<String>,
    pub server_id: Option<String>,
    pub compose_type: Option<String>,
    pub source_type: Option<String>,
    pub compose_file: Option<String>,
    pub compose_path: Option<String>,
    pub custom_git_url: Option<String>,
    pub custom_git_branch: Option<String>,
    pub custom_git_ssh_key_id: Option<String>,
    pub watch_paths: Option<Vec<String>>,
    pub env: Option<String>,
    pub command: Option<String>,
    pub auto_deploy: Option<bool>,
    pub delete_volumes: Option<bool>,
    pub deploy_on_create: Option<bool>,
    pub compose_status: Option<String>,
}

/// A Docker Compose or Swarm stack.
pub struct ComposeResource;

fn from_remote(remote: Compose, prior: &ComposeState) -> ComposeState {
    ComposeState {
        id: remote.compose_id.or_else(|| prior.id.clone()),
        environment_id: remote.environment_id.or_else(|| prior.environment_id.clone()),
        name: remote.name,
        app_name: remote.app_name,
        description: non_empty(remote.description),
        server_id: non_empty(remote.server_id),
        compose_type: remote.compose_type,
        source_type: remote.source_type,
        compose_file: non_empty(remote.compose_file),
        compose_path: remote.compose_path,
        custom_git_url: non_empty(remote.custom_git_url),
        custom_git_branch: non_empty(remote.custom_git_branch),
        custom_git_ssh_key_id: non_empty(remote.custom_git_ssh_key_id),
        watch_paths: match remote.watch_paths {
            Some(paths) if paths.is_empty() && prior.watch_paths.is_none() => None,
            other => other,
        },
        env: non_empty(remote.env),
        command: non_empty(remote.command),
        auto_deploy: remote.auto_deploy,
        delete_volumes: prior.delete_volumes,
        deploy_on_create: prior.deploy_on_create,
        compose_status: remote.compose_status,
    }
}

fn update_body(id: &str, planned: &ComposeState) -> Compose {
    Compose {
        compose_id: Some(id.to_string()),
        name: planned.name.clone(),
        description: clearable(&planned.description),
        source_type: planned.source_type.clone(),
        compose_file: clearable(&planned.compose_file),
        compose_path: Some(
            planned
                .compose_path
                .clone()
                .unwrap_or_else(|| DEFAULT_COMPOSE_PATH.to_string()),
        ),
        custom_git_url: clearable(&planned.custom_git_url),
        custom_git_branch: clearable(&planned.custom_git_branch),
        custom_git_ssh_key_id: planned.custom_git_ssh_key_id.clone(),
        watch_paths: Some(planned.watch_paths.clone().unwrap_or_default()),
        env: clearable(&planned.env),
        command: clearable(&planned.command),
        auto_deploy: planned.auto_deploy,
        ..Default::default()
    }
}

#[async_trait]
impl Resource for ComposeResource {
    type State = ComposeState;

    fn type_name(&self) -> &'static str {
        "dokploy_compose"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A Dokploy compose service.")
            .with_id("Compose ID")
            .with_attribute("environment_id", Attribute::required_string().with_force_new())
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("app_name", Attribute::optional_computed_string().with_force_new())
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("server_id", Attribute::optional_string().with_force_new())
            .with_attribute(
                "compose_type",
                Attribute::optional_string()
                    .with_default(Value::from("docker-compose"))
                    .with_force_new()
                    .one_of(&["docker-compose", "stack"]),
            )
            .with_attribute(
                "source_type",
                Attribute::optional_string()
                    .with_default(Value::from("raw"))
                    .one_of(&["git", "github", "gitlab", "bitbucket", "gitea", "raw"]),
            )
            .with_attribute(
                "compose_file",
                Attribute::optional_string()
                    .with_description("Compose file contents for the raw source"),
            )
            .with_attribute(
                "compose_path",
                Attribute::optional_string().with_default(Value::from(DEFAULT_COMPOSE_PATH)),
            )
            .with_attribute("custom_git_url", Attribute::optional_string())
            .with_attribute("custom_git_branch", Attribute::optional_string())
            .with_attribute("custom_git_ssh_key_id", Attribute::optional_string())
            .with_attribute("watch_paths", Attribute::optional_string_list())
            .with_attribute("env", Attribute::optional_string().sensitive())
            .with_attribute("command", Attribute::optional_string())
            .with_attribute("auto_deploy", Attribute::optional_computed_bool())
            .with_attribute(
                "delete_volumes",
                Attribute::optional_bool()
                    .with_default(Value::Bool(false))
                    .with_description("Remove the stack's volumes when it is destroyed"),
            )
            .with_attribute(
                "deploy_on_create",
                Attribute::optional_bool().with_default(Value::Bool(false)),
            )
            .with_attribute("compose_status", Attribute::computed_string())
    }

    fn validate(&self, config: &ComposeState) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        if config.source_type.as_deref() == Some("git") && config.custom_git_url.is_none() {
            diagnostics.push(attribute_error(
                "custom_git_url",
                "custom_git_url is required when source_type is \"git\"",
            ));
        }
        diagnostics
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: ComposeState,
    ) -> Result<ComposeState, ProviderError> {
        let body = Compose {
            name: Some(required(&planned.name, "name")?.to_string()),
            app_name: planned.app_name.clone(),
            description: planned.description.clone(),
            environment_id: Some(required(&planned.environment_id, "environment_id")?.to_string()),
            compose_type: planned.compose_type.clone(),
            server_id: planned.server_id.clone(),
            ..Default::default()
        };
        let created = client
            .create::<Compose, _>(&body)
            .await?
            .ok_or_else(|| ProviderError::Api("compose.create returned no compose".to_string()))?;
        let id = require_id(&created)?;
        info!(compose_id = %id, "Compose created");

        client.update::<Compose, _>(&update_body(&id, &planned)).await?;

        if planned.deploy_on_create == Some(true) {
            info!(compose_id = %id, "Deploying compose");
            client.execute("compose.deploy", &json!({ "composeId": id })).await?;
        }

        let remote: Compose = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: ComposeState,
    ) -> Result<Option<ComposeState>, ProviderError> {
        let remote: Compose = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: ComposeState,
        planned: ComposeState,
    ) -> Result<ComposeState, ProviderError> {
        let id = state_id(&prior.id)?;
        client.update::<Compose, _>(&update_body(id, &planned)).await?;
        let remote: Compose = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: ComposeState,
    ) -> Result<(), ProviderError> {
        let body = json!({
            "composeId": state_id(&current.id)?,
            "deleteVolumes": current.delete_volumes.unwrap_or(false),
        });
        client.execute("compose.delete", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_clears_unset_strings() {
        let planned = ComposeState {
            name: Some("stack".to_string()),
            source_type: Some("raw".to_string()),
            compose_file: Some("services: {}".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(update_body("c-1", &planned)).unwrap();
        assert_eq!(body["composeId"], "c-1");
        assert_eq!(body["description"], "");
        assert_eq!(body["composeFile"], "services: {}");
        assert_eq!(body["composePath"], DEFAULT_COMPOSE_PATH);
        assert_eq!(body["watchPaths"], json!([]));
        assert!(body.get("customGitSSHKeyId").is_none());
    }

    #[test]
    fn test_from_remote_keeps_local_only_flags() {
        let remote: Compose = serde_json::from_value(json!({
            "composeId": "c-1",
            "name": "stack",
            "composeType": "docker-compose",
            "composeFile": "",
            "composeStatus": "done"
        }))
        .unwrap();
        let prior = ComposeState {
            delete_volumes: Some(true),
            deploy_on_create: Some(false),
            ..Default::default()
        };
        let state = from_remote(remote, &prior);
        assert_eq!(state.compose_file, None);
        assert_eq!(state.delete_volumes, Some(true));
        assert_eq!(state.deploy_on_create, Some(false));
        assert_eq!(state.compose_status.as_deref(), Some("done"));
    }
}
