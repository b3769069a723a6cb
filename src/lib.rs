//! Dokploy provider
//!
//! Manages the objects of a [Dokploy](https://dokploy.com) instance as
//! infrastructure-as-code resources: projects, environments, applications,
//! compose stacks, databases and everything attached to them (domains, ports,
//! mounts, redirects, basic-auth entries, certificates, backups, registries,
//! destinations and SSH keys). Each resource maps onto the Dokploy REST API,
//! and the whole provider is served to the host over the gRPC provider
//! protocol.
//!
//! # Running
//!
//! The binary is started by the host as a subprocess. Once it is listening it
//! prints a single handshake line to stdout:
//!
//! ```text
//! HEMMER_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `HEMMER_PROVIDER|<protocol_version>|<address>`. Logs go to stderr.
//!
//! # Embedding
//!
//! ```ignore
//! use dokploy_provider::{init_logging, serve, DokployProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(DokployProvider::new()).await
//! }
//! ```
//!
//! # Configuration
//!
//! The provider block takes `host`, `api_key`, `timeout_seconds` and
//! `insecure`. `host` and `api_key` fall back to `DOKPLOY_HOST` and
//! `DOKPLOY_API_KEY`.
//!
//! # Protocol
//!
//! - **GetMetadata** / **GetSchema**: resource and data source names and schemas
//! - **ValidateProviderConfig** / **Configure** / **Stop**
//! - **ValidateResourceConfig** / **UpgradeResourceState** / **Plan**
//! - **Create** / **Read** / **Update** / **Delete**
//! - **ImportResourceState**: adopt an existing Dokploy object by id
//! - **ValidateDataSourceConfig** / **ReadDataSource**

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
#[allow(missing_docs)]
pub mod data_sources;
pub mod error;
pub mod json_attr;
pub mod logging;
pub mod plan;
pub mod provider;
#[allow(missing_docs)]
pub mod resources;
pub mod schema;
pub mod server;
#[allow(missing_docs)]
pub mod testing;
pub mod types;
pub mod validation;

/// Protocol types generated from `proto/provider.proto`.
#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated {
    tonic::include_proto!("hemmer.provider.v1");
}

pub use client::DokployClient;
pub use error::ProviderError;
pub use logging::{init_logging, try_init_logging};
pub use provider::DokployProvider;
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_until, serve_with_options, ProviderService,
    ServeOptions,
};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ServerCapabilities,
    HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};
pub use validation::{validate, validate_result};

pub use async_trait::async_trait;
pub use serde_json;
