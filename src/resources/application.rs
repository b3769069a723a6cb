//! `dokploy_application`
//!
//! An application is configured through several procedures: `create` only
//! takes the identity fields, and the rest is applied with
//! `application.update` (general settings, resources, Swarm), `saveBuildType`,
//! `saveEnvironment` and the source provider mutation for the configured
//! `source_type`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{
    attribute_error, clearable, keep_secret, non_empty, required, state_id, unless_default,
    Resource,
};
use crate::client::models::{Application, SwarmSettings};
use crate::client::{require_id, DokployClient};
use crate::error::ProviderError;
use crate::json_attr;
use crate::schema::{Attribute, Diagnostic, Schema, Validator};

pub(crate) const SOURCE_TYPES: &[&str] =
    &["github", "gitlab", "bitbucket", "gitea", "git", "docker", "drop"];

const BUILD_TYPES: &[&str] = &[
    "dockerfile",
    "heroku_buildpacks",
    "paketo_buildpacks",
    "nixpacks",
    "static",
    "railpack",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    pub id: Option<String>,
    pub environment_id: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
    pub description: Option<String>,
    pub server_id: Option<String>,

    pub source_type: Option<String>,
    pub docker_image: Option<String>,
    pub registry_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub custom_git_url: Option<String>,
    pub custom_git_branch: Option<String>,
    pub custom_git_build_path: Option<String>,
    pub custom_git_ssh_key_id: Option<String>,
    pub watch_paths: Option<Vec<String>>,
    pub enable_submodules: Option<bool>,

    pub build_type: Option<String>,
    pub dockerfile: Option<String>,
    pub docker_context_path: Option<String>,
    pub docker_build_stage: Option<String>,
    pub publish_directory: Option<String>,

    pub env: Option<String>,
    pub build_args: Option<String>,

    pub memory_reservation: Option<String>,
    pub memory_limit: Option<String>,
    pub cpu_reservation: Option<String>,
    pub cpu_limit: Option<String>,
    pub replicas: Option<i64>,
    pub command: Option<String>,
    pub auto_deploy: Option<bool>,

    #[serde(flatten)]
    pub swarm: SwarmState,

    pub deploy_on_create: Option<bool>,
    pub application_status: Option<String>,
}

/// Swarm settings as configured: JSON text per setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmState {
    pub health_check_swarm: Option<String>,
    pub restart_policy_swarm: Option<String>,
    pub placement_swarm: Option<String>,
    pub update_config_swarm: Option<String>,
    pub rollback_config_swarm: Option<String>,
    pub mode_swarm: Option<String>,
    pub labels_swarm: Option<String>,
    pub network_swarm: Option<String>,
}

const SWARM_ATTRIBUTES: [&str; 8] = [
    "health_check_swarm",
    "restart_policy_swarm",
    "placement_swarm",
    "update_config_swarm",
    "rollback_config_swarm",
    "mode_swarm",
    "labels_swarm",
    "network_swarm",
];

impl SwarmState {
    fn fields(&self) -> [&Option<String>; 8] {
        [
            &self.health_check_swarm,
            &self.restart_policy_swarm,
            &self.placement_swarm,
            &self.update_config_swarm,
            &self.rollback_config_swarm,
            &self.mode_swarm,
            &self.labels_swarm,
            &self.network_swarm,
        ]
    }

    /// Parse every setting for the API. A setting present in `prior` but
    /// unset now is sent as null so the platform clears it.
    fn to_api(&self, prior: Option<&SwarmState>) -> Result<SwarmSettings, ProviderError> {
        let mut parsed: Vec<Option<Value>> = Vec::with_capacity(SWARM_ATTRIBUTES.len());
        for (i, (name, text)) in SWARM_ATTRIBUTES.iter().zip(self.fields()).enumerate() {
            let value = json_attr::parse(name, text.as_deref())?;
            let was_set = prior.map(|p| p.fields()[i].is_some()).unwrap_or(false);
            parsed.push(match value {
                None if was_set => Some(Value::Null),
                other => other,
            });
        }

        let mut values = parsed.into_iter();
        let mut next = || values.next().flatten();
        Ok(SwarmSettings {
            health_check_swarm: next(),
            restart_policy_swarm: next(),
            placement_swarm: next(),
            update_config_swarm: next(),
            rollback_config_swarm: next(),
            mode_swarm: next(),
            labels_swarm: next(),
            network_swarm: next(),
        })
    }

    fn from_api(remote: &SwarmSettings, prior: &SwarmState) -> SwarmState {
        let render = |value: &Option<Value>, prior: &Option<String>| {
            json_attr::render(value.as_ref(), prior.as_deref())
        };
        SwarmState {
            health_check_swarm: render(&remote.health_check_swarm, &prior.health_check_swarm),
            restart_policy_swarm: render(&remote.restart_policy_swarm, &prior.restart_policy_swarm),
            placement_swarm: render(&remote.placement_swarm, &prior.placement_swarm),
            update_config_swarm: render(&remote.update_config_swarm, &prior.update_config_swarm),
            rollback_config_swarm: render(
                &remote.rollback_config_swarm,
                &prior.rollback_config_swarm,
            ),
            mode_swarm: render(&remote.mode_swarm, &prior.mode_swarm),
            labels_swarm: render(&remote.labels_swarm, &prior.labels_swarm),
            network_swarm: render(&remote.network_swarm, &prior.network_swarm),
        }
    }
}

/// A single-container application.
pub struct ApplicationResource;

fn from_remote(remote: Application, prior: &ApplicationState) -> ApplicationState {
    ApplicationState {
        id: remote.application_id.or_else(|| prior.id.clone()),
        environment_id: remote.environment_id.or_else(|| prior.environment_id.clone()),
        name: remote.name,
        app_name: remote.app_name,
        description: non_empty(remote.description),
        server_id: non_empty(remote.server_id),

        source_type: remote.source_type,
        docker_image: non_empty(remote.docker_image),
        registry_url: non_empty(remote.registry_url),
        username: non_empty(remote.username),
        password: keep_secret(remote.password, &prior.password),
        custom_git_url: non_empty(remote.custom_git_url),
        custom_git_branch: non_empty(remote.custom_git_branch),
        custom_git_build_path: non_empty(remote.custom_git_build_path),
        custom_git_ssh_key_id: non_empty(remote.custom_git_ssh_key_id),
        watch_paths: match remote.watch_paths {
            Some(paths) if paths.is_empty() && prior.watch_paths.is_none() => None,
            other => other,
        },
        enable_submodules: unless_default(
            remote.enable_submodules,
            &prior.enable_submodules,
            false,
        ),

        build_type: remote.build_type,
        dockerfile: non_empty(remote.dockerfile),
        docker_context_path: non_empty(remote.docker_context_path),
        docker_build_stage: non_empty(remote.docker_build_stage),
        publish_directory: non_empty(remote.publish_directory),

        env: non_empty(remote.env),
        build_args: non_empty(remote.build_args),

        memory_reservation: non_empty(remote.memory_reservation),
        memory_limit: non_empty(remote.memory_limit),
        cpu_reservation: non_empty(remote.cpu_reservation),
        cpu_limit: non_empty(remote.cpu_limit),
        replicas: remote.replicas,
        command: non_empty(remote.command),
        auto_deploy: remote.auto_deploy,

        swarm: SwarmState::from_api(&remote.swarm, &prior.swarm),

        deploy_on_create: prior.deploy_on_create,
        application_status: remote.application_status,
    }
}

impl ApplicationResource {
    /// Push everything but the identity fields. `prior` is `None` right
    /// after create, where nothing needs clearing.
    async fn configure(
        &self,
        client: &DokployClient,
        id: &str,
        planned: &ApplicationState,
        prior: Option<&ApplicationState>,
    ) -> Result<(), ProviderError> {
        let updating = prior.is_some();
        let text = |value: &Option<String>| {
            if updating {
                clearable(value)
            } else {
                value.clone()
            }
        };
        let application_id = Some(id.to_string());

        let general = Application {
            application_id: application_id.clone(),
            name: planned.name.clone(),
            description: text(&planned.description),
            memory_reservation: text(&planned.memory_reservation),
            memory_limit: text(&planned.memory_limit),
            cpu_reservation: text(&planned.cpu_reservation),
            cpu_limit: text(&planned.cpu_limit),
            replicas: planned.replicas,
            command: text(&planned.command),
            auto_deploy: planned.auto_deploy,
            swarm: planned.swarm.to_api(prior.map(|p| &p.swarm))?,
            ..Default::default()
        };
        client.update::<Application, _>(&general).await?;

        let build = Application {
            application_id: application_id.clone(),
            build_type: planned.build_type.clone(),
            dockerfile: text(&planned.dockerfile),
            docker_context_path: text(&planned.docker_context_path),
            docker_build_stage: text(&planned.docker_build_stage),
            publish_directory: text(&planned.publish_directory),
            ..Default::default()
        };
        client.execute("application.saveBuildType", &build).await?;

        if updating || planned.env.is_some() || planned.build_args.is_some() {
            let environment = Application {
                application_id: application_id.clone(),
                env: clearable(&planned.env),
                build_args: clearable(&planned.build_args),
                ..Default::default()
            };
            client.execute("application.saveEnvironment", &environment).await?;
        }

        match planned.source_type.as_deref() {
            Some("docker") => {
                let source = Application {
                    application_id: application_id.clone(),
                    docker_image: planned.docker_image.clone(),
                    registry_url: text(&planned.registry_url),
                    username: text(&planned.username),
                    password: text(&planned.password),
                    ..Default::default()
                };
                client.execute("application.saveDockerProvider", &source).await?;
            }
            Some("git") => {
                let source = Application {
                    application_id,
                    custom_git_url: planned.custom_git_url.clone(),
                    custom_git_branch: planned.custom_git_branch.clone(),
                    custom_git_build_path: text(&planned.custom_git_build_path),
                    custom_git_ssh_key_id: planned.custom_git_ssh_key_id.clone(),
                    watch_paths: Some(planned.watch_paths.clone().unwrap_or_default()),
                    enable_submodules: Some(planned.enable_submodules.unwrap_or(false)),
                    ..Default::default()
                };
                // The procedure name carries the platform's spelling.
                client.execute("application.saveGitProdiver", &source).await?;
            }
            other => debug!(source_type = ?other, "No source provider settings to save"),
        }
        Ok(())
    }

    async fn refresh(
        &self,
        client: &DokployClient,
        id: &str,
        prior: &ApplicationState,
    ) -> Result<ApplicationState, ProviderError> {
        let remote: Application = client.fetch(id).await?;
        Ok(from_remote(remote, prior))
    }
}

#[async_trait]
impl Resource for ApplicationResource {
    type State = ApplicationState;

    fn type_name(&self) -> &'static str {
        "dokploy_application"
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::v0()
            .with_description("A Dokploy application.")
            .with_id("Application ID")
            .with_attribute(
                "environment_id",
                Attribute::required_string().with_force_new(),
            )
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute(
                "app_name",
                Attribute::optional_computed_string()
                    .with_force_new()
                    .with_description("Docker service name; generated from name when unset"),
            )
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("server_id", Attribute::optional_string().with_force_new())
            .with_attribute(
                "source_type",
                Attribute::optional_computed_string().one_of(SOURCE_TYPES),
            )
            .with_attribute("docker_image", Attribute::optional_string())
            .with_attribute("registry_url", Attribute::optional_string())
            .with_attribute("username", Attribute::optional_string())
            .with_attribute("password", Attribute::optional_string().sensitive())
            .with_attribute("custom_git_url", Attribute::optional_string())
            .with_attribute("custom_git_branch", Attribute::optional_string())
            .with_attribute("custom_git_build_path", Attribute::optional_string())
            .with_attribute("custom_git_ssh_key_id", Attribute::optional_string())
            .with_attribute(
                "watch_paths",
                Attribute::optional_string_list()
                    .with_description("Paths whose changes trigger an automatic deploy"),
            )
            .with_attribute("enable_submodules", Attribute::optional_bool())
            .with_attribute(
                "build_type",
                Attribute::optional_string()
                    .with_default(Value::from("nixpacks"))
                    .one_of(BUILD_TYPES),
            )
            .with_attribute("dockerfile", Attribute::optional_string())
            .with_attribute("docker_context_path", Attribute::optional_string())
            .with_attribute("docker_build_stage", Attribute::optional_string())
            .with_attribute("publish_directory", Attribute::optional_string())
            .with_attribute("env", Attribute::optional_string().sensitive())
            .with_attribute("build_args", Attribute::optional_string().sensitive())
            .with_attribute("memory_reservation", Attribute::optional_string())
            .with_attribute("memory_limit", Attribute::optional_string())
            .with_attribute("cpu_reservation", Attribute::optional_string())
            .with_attribute("cpu_limit", Attribute::optional_string())
            .with_attribute(
                "replicas",
                Attribute::optional_int64()
                    .with_default(Value::from(1))
                    .with_validator(Validator::Between { min: 0, max: 1000 }),
            )
            .with_attribute("command", Attribute::optional_string())
            .with_attribute("auto_deploy", Attribute::optional_computed_bool())
            .with_attribute(
                "deploy_on_create",
                Attribute::optional_bool()
                    .with_default(Value::Bool(false))
                    .with_description("Trigger a deployment once the application is created"),
            )
            .with_attribute("application_status", Attribute::computed_string());

        for name in SWARM_ATTRIBUTES {
            schema = schema.with_attribute(
                name,
                Attribute::optional_json()
                    .with_description("Docker Swarm setting as a JSON document"),
            );
        }
        schema
    }

    fn validate(&self, config: &ApplicationState) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        match config.source_type.as_deref() {
            Some("docker") if config.docker_image.is_none() => diagnostics.push(attribute_error(
                "docker_image",
                "docker_image is required when source_type is \"docker\"",
            )),
            Some("git") if config.custom_git_url.is_none() => diagnostics.push(attribute_error(
                "custom_git_url",
                "custom_git_url is required when source_type is \"git\"",
            )),
            _ => {},
        }
        diagnostics
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: ApplicationState,
    ) -> Result<ApplicationState, ProviderError> {
        let body = Application {
            name: Some(required(&planned.name, "name")?.to_string()),
            app_name: planned.app_name.clone(),
            description: planned.description.clone(),
            environment_id: Some(required(&planned.environment_id, "environment_id")?.to_string()),
            server_id: planned.server_id.clone(),
            ..Default::default()
        };
        let created = client
            .create::<Application, _>(&body)
            .await?
            .ok_or_else(|| {
                ProviderError::Api("application.create returned no application".to_string())
            })?;
        let id = require_id(&created)?;
        info!(application_id = %id, "Application created");

        self.configure(client, &id, &planned, None).await?;

        if planned.deploy_on_create == Some(true) {
            info!(application_id = %id, "Deploying application");
            client
                .execute("application.deploy", &Application {
                    application_id: Some(id.clone()),
                    ..Default::default()
                })
                .await?;
        }

        self.refresh(client, &id, &planned).await
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: ApplicationState,
    ) -> Result<Option<ApplicationState>, ProviderError> {
        let id = state_id(&current.id)?;
        self.refresh(client, id, &current).await.map(Some)
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: ApplicationState,
        planned: ApplicationState,
    ) -> Result<ApplicationState, ProviderError> {
        let id = state_id(&prior.id)?;
        self.configure(client, id, &planned, Some(&prior)).await?;
        self.refresh(client, id, &planned).await
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: ApplicationState,
    ) -> Result<(), ProviderError> {
        client.remove::<Application>(state_id(&current.id)?).await?;
        Ok(())
    }
}
