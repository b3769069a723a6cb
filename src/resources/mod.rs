//! Managed resources.
//!
//! Each resource is a typed [`Resource`] implementation over its own state
//! struct. [`DynamicResource`] erases the state type to JSON so the provider
//! can keep every resource in one registry, and adds the behavior all
//! resources share: validation against the schema, schema-driven planning,
//! treating "not found" as removal on read and as success on delete, and
//! import by id.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::client::DokployClient;
use crate::error::ProviderError;
use crate::plan::{normalize_config, plan_resource};
use crate::schema::{Diagnostic, Schema};
use crate::types::PlanResult;
use crate::validation::validate;

mod application;
mod backup;
mod certificate;
mod compose;
mod database;
mod destination;
mod domain;
mod environment;
mod mount;
mod port;
mod project;
mod redirect;
mod registry;
mod security;
mod ssh_key;

pub use application::ApplicationResource;
pub use backup::BackupResource;
pub use certificate::CertificateResource;
pub use compose::ComposeResource;
pub use database::DatabaseResource;
pub use destination::DestinationResource;
pub use domain::DomainResource;
pub use environment::EnvironmentResource;
pub use mount::MountResource;
pub use port::PortResource;
pub use project::ProjectResource;
pub use redirect::RedirectResource;
pub use registry::RegistryResource;
pub use security::SecurityResource;
pub use ssh_key::SshKeyResource;

/// A resource type backed by Dokploy API calls.
///
/// `State` mirrors the schema: one field per attribute, named like the
/// attribute, with `id` holding the platform identifier.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    /// Typed state.
    type State: Serialize + DeserializeOwned + Send + Sync;

    /// Type name, e.g. `dokploy_project`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Checks that span more than one attribute.
    fn validate(&self, config: &Self::State) -> Vec<Diagnostic> {
        let _ = config;
        Vec::new()
    }

    /// Create the remote object and return the resulting state.
    async fn create(
        &self,
        client: &DokployClient,
        planned: Self::State,
    ) -> Result<Self::State, ProviderError>;

    /// Refresh state from the platform. `None` means the object is gone.
    async fn read(
        &self,
        client: &DokployClient,
        current: Self::State,
    ) -> Result<Option<Self::State>, ProviderError>;

    /// Apply an in-place change.
    async fn update(
        &self,
        client: &DokployClient,
        prior: Self::State,
        planned: Self::State,
    ) -> Result<Self::State, ProviderError>;

    /// Delete the remote object.
    async fn delete(
        &self,
        client: &DokployClient,
        current: Self::State,
    ) -> Result<(), ProviderError>;
}

/// A [`Resource`] with its state erased to JSON.
#[async_trait]
pub trait DynamicResource: Send + Sync {
    /// Type name.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Schema checks followed by the resource's own checks.
    fn validate(&self, config: &Value) -> Vec<Diagnostic>;

    /// Plan a change.
    fn plan(&self, prior: Option<&Value>, proposed: &Value, config: &Value) -> PlanResult;

    /// Create from a planned state.
    async fn create(&self, client: &DokployClient, planned: Value) -> Result<Value, ProviderError>;

    /// Refresh; a null result means the object is gone.
    async fn read(&self, client: &DokployClient, current: Value) -> Result<Value, ProviderError>;

    /// Apply an in-place change.
    async fn update(
        &self,
        client: &DokployClient,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete; an object that is already gone counts as deleted.
    async fn delete(&self, client: &DokployClient, current: Value) -> Result<(), ProviderError>;

    /// Build state for an existing object from its id.
    async fn import(&self, client: &DokployClient, id: &str) -> Result<Value, ProviderError>;
}

#[async_trait]
impl<R: Resource> DynamicResource for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let schema = Resource::schema(self);
        let mut diagnostics = validate(&schema, config);
        if !diagnostics.is_empty() {
            return diagnostics;
        }
        match from_value::<R::State>(normalize_config(&schema, config.clone())) {
            Ok(state) => diagnostics.extend(Resource::validate(self, &state)),
            Err(e) => diagnostics
                .push(Diagnostic::error("Invalid configuration").with_detail(e.to_string())),
        }
        diagnostics
    }

    fn plan(&self, prior: Option<&Value>, proposed: &Value, config: &Value) -> PlanResult {
        plan_resource(&Resource::schema(self), prior, proposed, config)
    }

    async fn create(&self, client: &DokployClient, planned: Value) -> Result<Value, ProviderError> {
        let state = Resource::create(self, client, from_value(planned)?).await?;
        to_value(&state)
    }

    async fn read(&self, client: &DokployClient, current: Value) -> Result<Value, ProviderError> {
        match Resource::read(self, client, from_value(current)?).await {
            Ok(Some(state)) => to_value(&state),
            Ok(None) => Ok(Value::Null),
            Err(e) if e.is_not_found() => {
                info!(
                    resource_type = Resource::type_name(self),
                    "Remote object is gone, removing from state"
                );
                Ok(Value::Null)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        client: &DokployClient,
        prior: Value,
        planned: Value,
    ) -> Result<Value, ProviderError> {
        let state = Resource::update(self, client, from_value(prior)?, from_value(planned)?).await?;
        to_value(&state)
    }

    async fn delete(&self, client: &DokployClient, current: Value) -> Result<(), ProviderError> {
        match Resource::delete(self, client, from_value(current)?).await {
            Err(e) if e.is_not_found() => {
                debug!(resource_type = Resource::type_name(self), "Already deleted");
                Ok(())
            }
            other => other,
        }
    }

    async fn import(&self, client: &DokployClient, id: &str) -> Result<Value, ProviderError> {
        let seed = from_value(json!({ "id": id }))?;
        let not_found = || {
            ProviderError::NotFound(format!(
                "{} with id {} does not exist",
                Resource::type_name(self),
                id
            ))
        };
        match Resource::read(self, client, seed).await {
            Ok(Some(state)) => to_value(&state),
            Ok(None) => Err(not_found()),
            Err(e) if e.is_not_found() => Err(not_found()),
            Err(e) => Err(e),
        }
    }
}

/// Every resource the provider serves.
pub fn all() -> Vec<Box<dyn DynamicResource>> {
    let mut resources: Vec<Box<dyn DynamicResource>> = vec![
        Box::new(ProjectResource),
        Box::new(EnvironmentResource),
        Box::new(ApplicationResource),
        Box::new(ComposeResource),
        Box::new(BackupResource),
        Box::new(DestinationResource),
        Box::new(SshKeyResource),
        Box::new(DomainResource),
        Box::new(RegistryResource),
        Box::new(PortResource),
        Box::new(MountResource),
        Box::new(RedirectResource),
        Box::new(SecurityResource),
        Box::new(CertificateResource),
    ];
    resources.extend(
        crate::client::models::DatabaseEngine::ALL
            .into_iter()
            .map(|engine| Box::new(DatabaseResource::new(engine)) as Box<dyn DynamicResource>),
    );
    resources
}

pub(crate) fn from_value<S: DeserializeOwned>(value: Value) -> Result<S, ProviderError> {
    // A null state deserialises like an empty object.
    let value = if value.is_null() { json!({}) } else { value };
    serde_json::from_value(value).map_err(ProviderError::from)
}

pub(crate) fn to_value<S: Serialize>(state: &S) -> Result<Value, ProviderError> {
    serde_json::to_value(state).map_err(ProviderError::from)
}

/// The value of a required attribute.
pub(crate) fn required<'a>(
    value: &'a Option<String>,
    attribute: &str,
) -> Result<&'a str, ProviderError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::Validation(format!("{} must be set", attribute)))
}

/// The platform id held in state.
pub(crate) fn state_id(id: &Option<String>) -> Result<&str, ProviderError> {
    id.as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ProviderError::Sdk("state has no id".to_string()))
}

/// A string sent on update: unset becomes `""` so the platform clears it.
pub(crate) fn clearable(value: &Option<String>) -> Option<String> {
    Some(value.clone().unwrap_or_default())
}

/// A string read back from the platform: `""` reads as unset.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A secret the platform may not echo back keeps its prior value.
pub(crate) fn keep_secret(remote: Option<String>, prior: &Option<String>) -> Option<String> {
    non_empty(remote).or_else(|| prior.clone())
}

/// An optional attribute the platform fills with its own default reads as
/// unset while the configuration leaves it unset.
pub(crate) fn unless_default<T: PartialEq>(
    remote: Option<T>,
    prior: &Option<T>,
    default: T,
) -> Option<T> {
    match remote {
        Some(value) if prior.is_none() && value == default => None,
        other => other,
    }
}

/// An error diagnostic tied to an attribute.
pub(crate) fn attribute_error(attribute: &str, summary: impl Into<String>) -> Diagnostic {
    Diagnostic::error(summary).with_attribute(attribute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde::Deserialize;
    use std::sync::Mutex;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct NoteState {
        id: Option<String>,
        text: Option<String>,
    }

    /// A resource kept in memory, ignoring the client.
    #[derive(Default)]
    struct NoteResource {
        notes: Mutex<Vec<NoteState>>,
        delete_error: Option<fn() -> ProviderError>,
    }

    #[async_trait]
    impl Resource for NoteResource {
        type State = NoteState;

        fn type_name(&self) -> &'static str {
            "dokploy_note"
        }

        fn schema(&self) -> Schema {
            Schema::v0()
                .with_id("Note ID")
                .with_attribute("text", Attribute::required_string())
        }

        fn validate(&self, config: &NoteState) -> Vec<Diagnostic> {
            match config.text.as_deref() {
                Some("forbidden") => vec![attribute_error("text", "text is forbidden")],
                _ => vec![],
            }
        }

        async fn create(
            &self,
            _: &DokployClient,
            mut planned: NoteState,
        ) -> Result<NoteState, ProviderError> {
            let mut notes = self.notes.lock().unwrap();
            planned.id = Some(format!("n-{}", notes.len() + 1));
            notes.push(planned.clone());
            Ok(planned)
        }

        async fn read(
            &self,
            _: &DokployClient,
            current: NoteState,
        ) -> Result<Option<NoteState>, ProviderError> {
            let notes = self.notes.lock().unwrap();
            Ok(notes.iter().find(|n| n.id == current.id).cloned())
        }

        async fn update(
            &self,
            _: &DokployClient,
            _: NoteState,
            planned: NoteState,
        ) -> Result<NoteState, ProviderError> {
            Ok(planned)
        }

        async fn delete(&self, _: &DokployClient, current: NoteState) -> Result<(), ProviderError> {
            if let Some(err) = self.delete_error {
                return Err(err());
            }
            self.notes.lock().unwrap().retain(|n| n.id != current.id);
            Ok(())
        }
    }

    fn offline_client() -> DokployClient {
        let config = crate::config::ProviderConfig {
            host: Some("http://127.0.0.1:9".to_string()),
            api_key: Some("k".to_string()),
            ..Default::default()
        }
        .resolve_with(|_| None)
        .unwrap();
        DokployClient::new(&config).unwrap()
    }

    #[test]
    fn test_validate_runs_schema_then_resource_checks() {
        let resource = NoteResource::default();
        assert!(DynamicResource::validate(&resource, &json!({"text": "hi"})).is_empty());

        let diags = DynamicResource::validate(&resource, &json!({}));
        assert!(diags[0].summary.contains("Missing required"));

        let diags = DynamicResource::validate(&resource, &json!({"text": "forbidden"}));
        assert_eq!(diags[0].attribute.as_deref(), Some("text"));
    }

    #[tokio::test]
    async fn test_read_of_missing_object_is_null() {
        let client = offline_client();
        let resource = NoteResource::default();

        let state = DynamicResource::create(&resource, &client, json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(state["id"], "n-1");

        let read = DynamicResource::read(&resource, &client, json!({"id": "n-1"})).await.unwrap();
        assert_eq!(read["text"], "hi");

        let read = DynamicResource::read(&resource, &client, json!({"id": "n-9"})).await.unwrap();
        assert!(read.is_null());
    }

    #[tokio::test]
    async fn test_delete_ignores_not_found() {
        let client = offline_client();
        let resource = NoteResource {
            delete_error: Some(|| ProviderError::NotFound("Note not found".to_string())),
            ..Default::default()
        };
        DynamicResource::delete(&resource, &client, json!({"id": "n-1"})).await.unwrap();

        let resource = NoteResource {
            delete_error: Some(|| ProviderError::Unavailable("down".to_string())),
            ..Default::default()
        };
        assert!(DynamicResource::delete(&resource, &client, json!({"id": "n-1"})).await.is_err());
    }

    #[tokio::test]
    async fn test_import() {
        let client = offline_client();
        let resource = NoteResource::default();
        DynamicResource::create(&resource, &client, json!({"text": "hi"})).await.unwrap();

        let state = DynamicResource::import(&resource, &client, "n-1").await.unwrap();
        assert_eq!(state, json!({"id": "n-1", "text": "hi"}));

        let err = DynamicResource::import(&resource, &client, "n-2").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let resources = all();
        let mut names: Vec<_> = resources.iter().map(|r| r.type_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), resources.len());
        assert_eq!(resources.len(), 19);
        assert!(names.iter().all(|n| n.starts_with("dokploy_")));
    }

    #[test]
    fn test_every_schema_has_computed_id() {
        for resource in all() {
            let schema = resource.schema();
            let id = schema
                .attribute("id")
                .unwrap_or_else(|| panic!("{} has no id", resource.type_name()));
            assert!(id.flags.is_computed_only(), "{}", resource.type_name());
        }
    }

    #[test]
    fn test_string_helpers() {
        assert_eq!(clearable(&None), Some(String::new()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(
            keep_secret(None, &Some("s3cret".to_string())),
            Some("s3cret".to_string())
        );
        assert_eq!(
            keep_secret(Some("new".to_string()), &Some("old".to_string())),
            Some("new".to_string())
        );
        assert!(required(&Some(String::new()), "name").is_err());
        assert_eq!(unless_default(Some(false), &None, false), None);
        assert_eq!(unless_default(Some(false), &Some(false), false), Some(false));
        assert_eq!(unless_default(Some(true), &None, false), Some(true));
        assert_eq!(state_id(&Some("p-1".to_string())).unwrap(), "p-1");
    }
}
