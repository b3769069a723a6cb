//! `dokploy_backup`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{required, state_id, Resource};
use crate::client::models::{Backup, DatabaseEngine};
use crate::client::{require_id, ClientError, DokployClient, Entity};
use crate::error::ProviderError;
use crate::schema::{Attribute, Schema, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupState {
    pub id: Option<String>,
    pub schedule: Option<String>,
    pub enabled: Option<bool>,
    pub prefix: Option<String>,
    pub destination_id: Option<String>,
    pub database: Option<String>,
    pub database_type: Option<String>,
    pub database_id: Option<String>,
    pub keep_latest_count: Option<i64>,
}

/// A scheduled database backup to an S3 destination.
pub struct BackupResource;

fn engine_of(database_type: &Option<String>) -> Result<DatabaseEngine, ProviderError> {
    let value = required(database_type, "database_type")?;
    DatabaseEngine::from_namespace(value)
        .filter(|engine| *engine != DatabaseEngine::Redis)
        .ok_or_else(|| ProviderError::Validation(format!("unsupported database_type {:?}", value)))
}

fn from_remote(remote: Backup, prior: &BackupState) -> BackupState {
    let database_type = remote.database_type.clone().or_else(|| prior.database_type.clone());
    let database_id = database_type
        .as_deref()
        .and_then(DatabaseEngine::from_namespace)
        .and_then(|engine| remote.database_id(engine).map(str::to_string))
        .or_else(|| prior.database_id.clone());

    BackupState {
        id: remote.backup_id.or_else(|| prior.id.clone()),
        schedule: remote.schedule,
        enabled: remote.enabled,
        prefix: remote.prefix,
        destination_id: remote.destination_id,
        database: remote.database,
        database_type,
        database_id,
        keep_latest_count: remote.keep_latest_count,
    }
}

impl BackupResource {
    /// Find a backup that `backup.create` did not echo back by listing the
    /// backups attached to its database.
    async fn find_created(
        &self,
        client: &DokployClient,
        engine: DatabaseEngine,
        database_id: &str,
        prefix: &str,
    ) -> Result<Backup, ProviderError> {
        let procedure = format!("{}.one", engine.namespace());
        let database: Value = client.query(&procedure, &[(engine.id_key(), database_id)]).await?;
        let backups = database
            .get("backups")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let found = backups
            .into_iter()
            .rev()
            .find(|b| b.get("prefix").and_then(Value::as_str) == Some(prefix))
            .ok_or_else(|| ClientError::NoMatch {
                procedure: procedure.clone(),
                name: prefix.to_string(),
            })?;
        Ok(serde_json::from_value(found)?)
    }
}

#[async_trait]
impl Resource for BackupResource {
    type State = BackupState;

    fn type_name(&self) -> &'static str {
        "dokploy_backup"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("A scheduled backup of a Dokploy database.")
            .with_id("Backup ID")
            .with_attribute(
                "schedule",
                Attribute::required_string()
                    .with_validator(Validator::NotEmpty)
                    .with_description("Cron expression"),
            )
            .with_attribute("enabled", Attribute::optional_bool().with_default(Value::Bool(true)))
            .with_attribute("prefix", Attribute::required_string())
            .with_attribute("destination_id", Attribute::required_string())
            .with_attribute(
                "database",
                Attribute::required_string().with_description("Name of the database to dump"),
            )
            .with_attribute(
                "database_type",
                Attribute::required_string()
                    .with_force_new()
                    .one_of(&["postgres", "mysql", "mariadb", "mongo"]),
            )
            .with_attribute(
                "database_id",
                Attribute::required_string()
                    .with_force_new()
                    .with_description("ID of the database service being backed up"),
            )
            .with_attribute(
                "keep_latest_count",
                Attribute::optional_int64()
                    .with_validator(Validator::Between { min: 1, max: 1000 }),
            )
    }

    async fn create(
        &self,
        client: &DokployClient,
        planned: BackupState,
    ) -> Result<BackupState, ProviderError> {
        let engine = engine_of(&planned.database_type)?;
        let database_id = required(&planned.database_id, "database_id")?.to_string();
        let prefix = required(&planned.prefix, "prefix")?.to_string();

        let mut body = Backup {
            schedule: planned.schedule.clone(),
            enabled: planned.enabled,
            prefix: Some(prefix.clone()),
            destination_id: planned.destination_id.clone(),
            database: planned.database.clone(),
            database_type: Some(engine.namespace().to_string()),
            keep_latest_count: planned.keep_latest_count,
            ..Default::default()
        };
        body.set_database_id(engine, database_id.clone());

        let created = match client.create::<Backup, _>(&body).await? {
            Some(backup) if backup.id().is_some() => backup,
            _ => {
                debug!("backup.create returned no id, looking the backup up on its database");
                self.find_created(client, engine, &database_id, &prefix).await?
            }
        };
        let id = require_id(&created)?;
        info!(backup_id = %id, database_type = %engine, "Backup created");

        let remote: Backup = client.fetch(&id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn read(
        &self,
        client: &DokployClient,
        current: BackupState,
    ) -> Result<Option<BackupState>, ProviderError> {
        let remote: Backup = client.fetch(state_id(&current.id)?).await?;
        Ok(Some(from_remote(remote, &current)))
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: BackupState,
        planned: BackupState,
    ) -> Result<BackupState, ProviderError> {
        let id = state_id(&prior.id)?;
        let body = Backup {
            backup_id: Some(id.to_string()),
            schedule: planned.schedule.clone(),
            enabled: planned.enabled,
            prefix: planned.prefix.clone(),
            destination_id: planned.destination_id.clone(),
            database: planned.database.clone(),
            database_type: planned.database_type.clone(),
            keep_latest_count: planned.keep_latest_count,
            ..Default::default()
        };
        client.update::<Backup, _>(&body).await?;

        let remote: Backup = client.fetch(id).await?;
        Ok(from_remote(remote, &planned))
    }

    async fn delete(
        &self,
        client: &DokployClient,
        current: BackupState,
    ) -> Result<(), ProviderError> {
        client.remove::<Backup>(state_id(&current.id)?).await?;
        Ok(())
    }
}
