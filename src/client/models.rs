//! Request/response bodies of the Dokploy API.
//!
//! Each struct doubles as request payload and response body: every field is
//! optional, absent fields are skipped when serialising, and unknown fields
//! are ignored when deserialising. Field names follow the API's camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Entity;

macro_rules! entity {
    ($ty:ty, $ns:literal, $key:literal, $field:ident) => {
        entity!($ty, $ns, $key, $field, "remove");
    };
    ($ty:ty, $ns:literal, $key:literal, $field:ident, $remove:literal) => {
        impl Entity for $ty {
            const NAMESPACE: &'static str = $ns;
            const ID_KEY: &'static str = $key;
            const REMOVE: &'static str = $remove;

            fn id(&self) -> Option<&str> {
                self.$field.as_deref()
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Projects and environments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing)]
    pub environments: Vec<Environment>,
}
entity!(Project, "project", "projectId", project_id);

/// Response of `project.create`. Newer Dokploy releases wrap the project
/// together with its default environment; older ones return the project.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProjectCreated {
    WithEnvironment {
        project: Project,
        environment: Option<Environment>,
    },
    Bare(Project),
}

impl ProjectCreated {
    pub fn into_parts(self) -> (Project, Option<Environment>) {
        match self {
            Self::WithEnvironment {
                project,
                environment,
            } => (project, environment),
            Self::Bare(project) => (project, None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Environment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing)]
    pub is_default: Option<bool>,
}
entity!(Environment, "environment", "environmentId", environment_id);

// ---------------------------------------------------------------------------
// Applications and compose stacks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_git_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_git_build_path: Option<String>,
    #[serde(rename = "customGitSSHKeyId", skip_serializing_if = "Option::is_none")]
    pub custom_git_ssh_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_submodules: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_context_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_build_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_args: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,

    #[serde(flatten)]
    pub swarm: SwarmSettings,

    #[serde(skip_serializing)]
    pub application_status: Option<String>,
}
entity!(Application, "application", "applicationId", application_id, "delete");

/// Docker Swarm settings shared by applications. The API stores each one as
/// a JSON document; `Some(Value::Null)` clears a setting on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwarmSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_policy_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_config_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rollback_config_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_swarm: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_swarm: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Compose {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_git_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_git_branch: Option<String>,
    #[serde(rename = "customGitSSHKeyId", skip_serializing_if = "Option::is_none")]
    pub custom_git_ssh_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_paths: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
    #[serde(skip_serializing)]
    pub compose_status: Option<String>,
}
entity!(Compose, "compose", "composeId", compose_id, "delete");

// ---------------------------------------------------------------------------
// Databases and backups
// ---------------------------------------------------------------------------

/// The database engines Dokploy manages. Each has its own procedure
/// namespace and id field but shares the same payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    Postgres,
    Mysql,
    Mariadb,
    Mongo,
    Redis,
}

impl DatabaseEngine {
    /// All engines, in registration order.
    pub const ALL: [DatabaseEngine; 5] = [
        Self::Postgres,
        Self::Mysql,
        Self::Mariadb,
        Self::Mongo,
        Self::Redis,
    ];

    /// Procedure namespace, also the value used in `databaseType`.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Mongo => "mongo",
            Self::Redis => "redis",
        }
    }

    /// Name of the id field, e.g. `postgresId`.
    pub fn id_key(self) -> &'static str {
        match self {
            Self::Postgres => "postgresId",
            Self::Mysql => "mysqlId",
            Self::Mariadb => "mariadbId",
            Self::Mongo => "mongoId",
            Self::Redis => "redisId",
        }
    }

    /// Image used when the configuration does not pick one.
    pub fn default_image(self) -> &'static str {
        match self {
            Self::Postgres => "postgres:15",
            Self::Mysql => "mysql:8",
            Self::Mariadb => "mariadb:11",
            Self::Mongo => "mongo:6",
            Self::Redis => "redis:7",
        }
    }

    /// Whether the engine takes a database name at creation.
    pub fn has_database_name(self) -> bool {
        matches!(self, Self::Postgres | Self::Mysql | Self::Mariadb)
    }

    /// Whether the engine takes a database user at creation.
    pub fn has_database_user(self) -> bool {
        !matches!(self, Self::Redis)
    }

    /// Whether the engine takes a separate root password.
    pub fn has_root_password(self) -> bool {
        matches!(self, Self::Mysql | Self::Mariadb)
    }

    /// Parse a `databaseType` value.
    pub fn from_namespace(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.namespace() == value)
    }
}

impl std::fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.namespace())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Database {
    /// The engine-specific id (`postgresId`, `mysqlId`, ...). Never sent;
    /// callers add the right key themselves.
    #[serde(
        skip_serializing,
        alias = "postgresId",
        alias = "mysqlId",
        alias = "mariadbId",
        alias = "mongoId",
        alias = "redisId"
    )]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_root_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_reservation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_limit: Option<String>,
    #[serde(skip_serializing)]
    pub application_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Backup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_latest_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mariadb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongo_id: Option<String>,
}
entity!(Backup, "backup", "backupId", backup_id);

impl Backup {
    /// The id of the backed-up database for the given engine.
    pub fn database_id(&self, engine: DatabaseEngine) -> Option<&str> {
        match engine {
            DatabaseEngine::Postgres => self.postgres_id.as_deref(),
            DatabaseEngine::Mysql => self.mysql_id.as_deref(),
            DatabaseEngine::Mariadb => self.mariadb_id.as_deref(),
            DatabaseEngine::Mongo => self.mongo_id.as_deref(),
            DatabaseEngine::Redis => None,
        }
    }

    /// Point the backup at a database of the given engine.
    pub fn set_database_id(&mut self, engine: DatabaseEngine, id: String) {
        match engine {
            DatabaseEngine::Postgres => self.postgres_id = Some(id),
            DatabaseEngine::Mysql => self.mysql_id = Some(id),
            DatabaseEngine::Mariadb => self.mariadb_id = Some(id),
            DatabaseEngine::Mongo => self.mongo_id = Some(id),
            DatabaseEngine::Redis => {},
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Destination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}
entity!(Destination, "destination", "destinationId", destination_id);

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SshKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}
entity!(SshKey, "sshKey", "sshKeyId", ssh_key_id);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Registry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}
entity!(Registry, "registry", "registryId", registry_id);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Certificate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}
entity!(Certificate, "certificates", "certificateId", certificate_id);

// ---------------------------------------------------------------------------
// Routing and runtime attachments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Domain {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_cert_resolver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_path: Option<String>,
}
entity!(Domain, "domain", "domainId", domain_id, "delete");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Port {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_mode: Option<String>,
}
entity!(Port, "port", "portId", port_id, "delete");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    /// Only sent on create; responses carry the owner under its own key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing)]
    pub application_id: Option<String>,
    #[serde(skip_serializing)]
    pub compose_id: Option<String>,
    #[serde(skip_serializing)]
    pub postgres_id: Option<String>,
    #[serde(skip_serializing)]
    pub mysql_id: Option<String>,
    #[serde(skip_serializing)]
    pub mariadb_id: Option<String>,
    #[serde(skip_serializing)]
    pub mongo_id: Option<String>,
    #[serde(skip_serializing)]
    pub redis_id: Option<String>,
}
entity!(Mount, "mounts", "mountId", mount_id);

impl Mount {
    /// The owning service's id, looked up by service type.
    pub fn owner_id(&self) -> Option<&str> {
        let owner = match self.service_type.as_deref()? {
            "application" => &self.application_id,
            "compose" => &self.compose_id,
            "postgres" => &self.postgres_id,
            "mysql" => &self.mysql_id,
            "mariadb" => &self.mariadb_id,
            "mongo" => &self.mongo_id,
            "redis" => &self.redis_id,
            _ => return None,
        };
        owner.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Redirect {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent: Option<bool>,
}
entity!(Redirect, "redirects", "redirectId", redirect_id, "delete");

/// HTTP basic-auth credentials guarding an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Security {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
entity!(Security, "security", "securityId", security_id, "delete");
