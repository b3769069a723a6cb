//! `dokploy_postgres`, `dokploy_mysql`, `dokploy_mariadb`, `dokploy_mongo`
//! and `dokploy_redis`.
//!
//! The five engines share one payload shape and differ only in their
//! procedure namespace, id key and which credentials they take, so a single
//! [`DatabaseResource`] is registered once per [`DatabaseEngine`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{clearable, keep_secret, non_empty, required, state_id, Resource};
use crate::client::models::{Database, DatabaseEngine};
use crate::client::{ClientError, DokployClient};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseState {
    pub id: Option<String>,
    pub environment_id: Option<String>,
    pub name: Option<String>,
    pub app_name: Option<String>,
    pub description: Option<String>,
    pub server_id: Option<String>,
    pub docker_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_user: Option<String>,
    pub database_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_root_password: Option<String>,
    pub external_port: Option<i64>,
    pub env: Option<String>,
    pub command: Option<String>,
    pub memory_reservation: Option<String>,
    pub memory_limit: Option<String>,
    pub cpu_reservation: Option<String>,
    pub cpu_limit: Option<String>,
    pub deploy_on_create: Option<bool>,
    pub application_status: Option<String>,
}

/// A managed database service of one engine.
pub struct DatabaseResource {
    engine: DatabaseEngine,
}

impl DatabaseResource {
    pub fn new(engine: DatabaseEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    fn procedure(&self, name: &str) -> String {
        format!("{}.{}", self.engine.namespace(), name)
    }

    /// `{ "<engine>Id": id }`
    fn id_body(&self, id: &str) -> serde_json::Map<String, Value> {
        let mut body = serde_json::Map::new();
        body.insert(self.engine.id_key().to_string(), Value::String(id.to_string()));
        body
    }

    /// A [`Database`] payload with the engine's id key added.
    fn body_with_id(&self, id: &str, database: &Database) -> Result<Value, ProviderError> {
        let mut body = self.id_body(id);
        if let Value::Object(fields) = serde_json::to_value(database)? {
            body.extend(fields);
        }
        Ok(Value::Object(body))
    }

    async fn fetch(&self, client: &DokployClient, id: &str) -> Result<Database, ProviderError> {
        let database = client
            .query(&self.procedure("one"), &[(self.engine.id_key(), id)])
            .await?;
        Ok(database)
    }

    async fn save_external_port(
        &self,
        client: &DokployClient,
        id: &str,
        port: Option<i64>,
    ) -> Result<(), ProviderError> {
        let mut body = self.id_body(id);
        body.insert("externalPort".to_string(), json!(port));
        client.execute(&self.procedure("saveExternalPort"), &body).await?;
        Ok(())
    }

    fn from_remote(&self, remote: Database, prior: &DatabaseState) -> DatabaseState {
        let engine = self.engine;
        DatabaseState {
            id: remote.id.or_else(|| prior.id.clone()),
            environment_id: remote.environment_id.or_else(|| prior.environment_id.clone()),
            name: remote.name,
            app_name: remote.app_name,
            description: non_empty(remote.description),
            server_id: non_empty(remote.server_id),
            docker_image: remote.docker_image,
            database_name: remote.database_name.filter(|_| engine.has_database_name()),
            database_user: remote.database_user.filter(|_| engine.has_database_user()),
            database_password: keep_secret(remote.database_password, &prior.database_password),
            database_root_password: if engine.has_root_password() {
                keep_secret(remote.database_root_password, &prior.database_root_password)
            } else {
                None
            },
            external_port: remote.external_port,
            env: non_empty(remote.env),
            command: non_empty(remote.command),
            memory_reservation: non_empty(remote.memory_reservation),
            memory_limit: non_empty(remote.memory_limit),
            cpu_reservation: non_empty(remote.cpu_reservation),
            cpu_limit: non_empty(remote.cpu_limit),
            deploy_on_create: prior.deploy_on_create,
            application_status: remote.application_status,
        }
    }
}

#[async_trait]
impl Resource for DatabaseResource {
    type State = DatabaseState;

    fn type_name(&self) -> &'static str {
        match self.engine {
            DatabaseEngine::Postgres => "dokploy_postgres",
            DatabaseEngine::Mysql => "dokploy_mysql",
            DatabaseEngine::Mariadb => "dokploy_mariadb",
            DatabaseEngine::Mongo => "dokploy_mongo",
            DatabaseEngine::Redis => "dokploy_redis",
        }
    }

    fn schema(&self) -> Schema {
        let engine = self.engine;
        let mut schema = Schema::v0()
            .with_description(format!("A Dokploy {} database.", engine))
            .with_id("Database ID")
            .with_attribute("environment_id", Attribute::required_string().with_force_new())
            .with_attribute(
                "name",
                Attribute::required_string().with_validator(Validator::NotEmpty),
            )
            .with_attribute("app_name", Attribute::optional_computed_string().with_force_new())
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("server_id", Attribute::optional_string().with_force_new())
            .with_attribute(
                "docker_image",
                Attribute::optional_string().with_default(Value::from(engine.default_image())),
            )
            .with_attribute(
                "database_password",
                Attribute::required_string().sensitive().with_force_new(),
            )
            .with_attribute(
                "external_port",
                Attribute::optional_int64()
                    .with_validator(Validator::Between { min: 1, max: 65535 })
                    .with_description("Host port to publish; unset keeps the database internal"),
            )
            .with_attribute("env", Attribute::optional_string().sensitive())
            .with_attribute("command", Attribute::optional_string())
            .with_attribute("memory_reservation", Attribute::optional_string())
            .with_attribute("memory_limit", Attribute::optional_string())
            .with_attribute("cpu_reservation", Attribute::optional_string())
            .with_attribute("cpu_limit", Attribute::optional_string())
            .with_attribute(
                "deploy_on_create",
                Attribute::optional_bool().with_default(Value::Bool(false)),
            )
            .with_attribute("application_status", Attribute::computed_string());

        if engine.has_database_name() {
            schema = schema.with_attribute(
                "database_name",
                Attribute::required_string().with_force_new(),
            );
        }
        if engine.has_database_user() {
            schema = schema.with_attribute(
                "database_user",
                Attribute::required_string().with_force_new(),
            );
        }
        if engine.has_root_password() {
            schema = schema.with_attribute(
                "database_root_password",
                Attribute::required_string().sensitive().with_force_new(),
            );
        }
        schema
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: DatabaseState,
    ) -> Result<DatabaseState, ProviderError> {
        let engine = self.engine;
        let body = Database {
            name: Some(required(&planned.name, "name")?.to_string()),
            app_name: planned.app_name.clone(),
            description: planned.description.clone(),
            environment_id: Some(required(&planned.environment_id, "environment_id")?.to_string()),
            server_id: planned.server_id.clone(),
            docker_image: planned.docker_image.clone(),
            database_name: planned.database_name.clone().filter(|_| engine.has_database_name()),
            database_user: planned.database_user.clone().filter(|_| engine.has_database_user()),
            database_password: Some(
                required(&planned.database_password, "database_password")?.to_string(),
            ),
            database_root_password: planned
                .database_root_password
                .clone()
                .filter(|_| engine.has_root_password()),
            ..Default::default()
        };

        let procedure = self.procedure("create");
        let created: Option<Database> = client.mutate(&procedure, &body).await?;
        let id = created
            .and_then(|db| db.id)
            .ok_or_else(|| ClientError::MissingField {
                procedure,
                field: engine.id_key().to_string(),
            })?;
        info!(engine = %engine, database_id = %id, "Database created");

        let settings = Database {
            env: planned.env.clone(),
            command: planned.command.clone(),
            memory_reservation: planned.memory_reservation.clone(),
            memory_limit: planned.memory_limit.clone(),
            cpu_reservation: planned.cpu_reservation.clone(),
            cpu_limit: planned.cpu_limit.clone(),
            ..Default::default()
        };
        if settings != Database::default() {
            client
                .execute(&self.procedure("update"), &self.body_with_id(&id, &settings)?)
                .await?;
        }

        if planned.external_port.is_some() {
            self.save_external_port(client, &id, planned.external_port).await?;
        }

        if planned.deploy_on_create == Some(true) {
            info!(engine = %engine, database_id = %id, "Deploying database");
            client.execute(&self.procedure("deploy"), &self.id_body(&id)).await?;
        }

        let remote = self.fetch(client, &id).await?;
        Ok(self.from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: DatabaseState,
    ) -> Result<Option<DatabaseState>, ProviderError> {
        let remote = self.fetch(client, state_id(&current.id)?).await?;
        Ok(Some(self.from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: DatabaseState,
        planned: DatabaseState,
    ) -> Result<DatabaseState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Database {
            name: planned.name.clone(),
            description: clearable(&planned.description),
            docker_image: planned.docker_image.clone(),
            env: clearable(&planned.env),
            command: clearable(&planned.command),
            memory_reservation: clearable(&planned.memory_reservation),
            memory_limit: clearable(&planned.memory_limit),
            cpu_reservation: clearable(&planned.cpu_reservation),
            cpu_limit: clearable(&planned.cpu_limit),
            ..Default::default()
        };
        client
            .execute(&self.procedure("update"), &self.body_with_id(id, &body)?)
            .await?;

        if planned.external_port != prior.external_port {
            self.save_external_port(client, id, planned.external_port).await?;
        }

        let remote = self.fetch(client, id).await?;
        Ok(self.from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: DatabaseState,
    ) -> Result<(), ProviderError> {
        let id = state_id(&current.id)?;
        client.execute(&self.procedure("remove"), &self.id_body(id)).await?;
        Ok(())
    }
}
