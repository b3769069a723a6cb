//! Shared HTTP client for the Dokploy API.
//!
//! Dokploy exposes its procedures as `GET /api/<procedure>?<params>` for
//! queries and `POST /api/<procedure>` with a JSON body for mutations,
//! authenticated with the `x-api-key` header. One [`DokployClient`] is built
//! at Configure time and shared by every resource and data source.
//!
//! Most entities follow the same `<ns>.create`, `<ns>.one`, `<ns>.update`,
//! `<ns>.remove` naming; the [`Entity`] trait captures that table so the
//! resources can use [`DokployClient::fetch`], [`DokployClient::create`]
//! and friends instead of spelling out procedure names.

mod error;
#[allow(missing_docs)]
pub mod models;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;

pub use error::ClientError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// A Dokploy object addressable through the standard procedure names.
pub trait Entity: DeserializeOwned + Send + 'static {
    /// Procedure namespace, e.g. `project`.
    const NAMESPACE: &'static str;
    /// Name of the identifier field, e.g. `projectId`.
    const ID_KEY: &'static str;
    /// Name of the delete procedure within the namespace.
    const REMOVE: &'static str = "remove";

    /// The object's identifier, if the response carried one.
    fn id(&self) -> Option<&str>;
}

/// Client for a single Dokploy instance.
#[derive(Debug, Clone)]
pub struct DokployClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DokployClient {
    /// Build a client from resolved provider configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ClientError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .user_agent(concat!("dokploy-provider/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        let base_url = config
            .host
            .join("api/")
            .map_err(|_| ClientError::InvalidHost(config.host.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// The base URL procedures are resolved against (ends in `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, procedure: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(procedure)
            .map_err(|_| ClientError::InvalidHost(format!("{}{}", self.base_url, procedure)))
    }

    /// Run a query procedure.
    #[instrument(skip(self, params), level = "debug")]
    pub async fn query<T: DeserializeOwned>(
        &self,
        procedure: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(procedure)?;
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                procedure: procedure.to_string(),
                source,
            })?;
        decode_response(procedure, response).await
    }

    /// Run a mutation procedure and decode its response.
    #[instrument(skip(self, body), level = "debug")]
    pub async fn mutate<B, T>(&self, procedure: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(procedure)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                procedure: procedure.to_string(),
                source,
            })?;
        decode_response(procedure, response).await
    }

    /// Run a mutation procedure, discarding whatever it returns.
    pub async fn execute<B>(&self, procedure: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let _: Value = self.mutate(procedure, body).await?;
        Ok(())
    }

    /// Fetch one entity by id through `<ns>.one`.
    pub async fn fetch<E: Entity>(&self, id: &str) -> Result<E, ClientError> {
        let procedure = format!("{}.one", E::NAMESPACE);
        self.query(&procedure, &[(E::ID_KEY, id)]).await
    }

    /// List every entity through `<ns>.all`.
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, ClientError> {
        let procedure = format!("{}.all", E::NAMESPACE);
        let items: Option<Vec<E>> = self.query(&procedure, &[]).await?;
        Ok(items.unwrap_or_default())
    }

    /// Create an entity through `<ns>.create`.
    ///
    /// Some create procedures answer with `true` or an empty body, in which
    /// case `None` is returned and the caller must look the object up.
    pub async fn create<E, B>(&self, body: &B) -> Result<Option<E>, ClientError>
    where
        E: Entity,
        B: Serialize + ?Sized + Sync,
    {
        let procedure = format!("{}.create", E::NAMESPACE);
        let value: Value = self.mutate(&procedure, body).await?;
        entity_from_value(&procedure, value)
    }

    /// Update an entity through `<ns>.update`. The body must carry the id.
    pub async fn update<E, B>(&self, body: &B) -> Result<(), ClientError>
    where
        E: Entity,
        B: Serialize + ?Sized + Sync,
    {
        let procedure = format!("{}.update", E::NAMESPACE);
        self.execute(&procedure, body).await
    }

    /// Delete an entity through `<ns>.<REMOVE>`.
    pub async fn remove<E: Entity>(&self, id: &str) -> Result<(), ClientError> {
        let procedure = format!("{}.{}", E::NAMESPACE, E::REMOVE);
        let mut body = serde_json::Map::new();
        body.insert(E::ID_KEY.to_string(), Value::String(id.to_string()));
        self.execute(&procedure, &body).await
    }

    /// Find the most recently listed entity whose `name_key` equals `name`.
    ///
    /// Used after create procedures that do not return the new object.
    pub async fn find_by_name<E: Entity>(
        &self,
        name_key: &str,
        name: &str,
    ) -> Result<E, ClientError> {
        let procedure = format!("{}.all", E::NAMESPACE);
        let items: Option<Vec<Value>> = self.query(&procedure, &[]).await?;
        let found = items
            .unwrap_or_default()
            .into_iter()
            .rev()
            .find(|item| item.get(name_key).and_then(Value::as_str) == Some(name))
            .ok_or_else(|| ClientError::NoMatch {
                procedure: procedure.clone(),
                name: name.to_string(),
            })?;
        serde_json::from_value(found).map_err(|source| ClientError::Decode { procedure, source })
    }

    /// Create an entity, falling back to a lookup by name when the create
    /// procedure does not echo the new object.
    pub async fn create_or_find<E, B>(
        &self,
        body: &B,
        name_key: &str,
        name: &str,
    ) -> Result<E, ClientError>
    where
        E: Entity,
        B: Serialize + ?Sized + Sync,
    {
        match self.create::<E, B>(body).await? {
            Some(created) if created.id().is_some() => Ok(created),
            _ => {
                debug!(
                    namespace = E::NAMESPACE,
                    name, "create returned no id, looking the entity up by name"
                );
                self.find_by_name(name_key, name).await
            }
        }
    }
}

/// Require the id on an entity returned by the API.
pub fn require_id<E: Entity>(entity: &E) -> Result<String, ClientError> {
    entity
        .id()
        .map(str::to_string)
        .ok_or_else(|| ClientError::MissingField {
            procedure: format!("{}.create", E::NAMESPACE),
            field: E::ID_KEY.to_string(),
        })
}

fn entity_from_value<E: Entity>(procedure: &str, value: Value) -> Result<Option<E>, ClientError> {
    match value {
        Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ClientError::Decode {
                procedure: procedure.to_string(),
                source,
            }),
        _ => Ok(None),
    }
}

async fn decode_response<T: DeserializeOwned>(
    procedure: &str,
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ClientError::Http {
        procedure: procedure.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(ClientError::Api {
            procedure: procedure.to_string(),
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }

    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(body).map_err(|source| ClientError::Decode {
        procedure: procedure.to_string(),
        source,
    })
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .get("message")
            .or_else(|| value.pointer("/error/message"))
            .or_else(|| value.pointer("/error/json/message"))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
