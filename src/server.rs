//! gRPC server for the provider protocol.
//!
//! [`ProviderService`] is the JSON-level interface the provider implements;
//! this module adapts it to the generated `Provider` gRPC service, prints the
//! handshake line and handles shutdown.
//!
//! On SIGTERM or SIGINT the server stops accepting connections, gives
//! in-flight requests up to [`ServeOptions::shutdown_timeout`] to finish,
//! then calls [`ProviderService::stop`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::net::TcpListener;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ProviderError;
use crate::generated as pb;
use crate::schema::{has_errors, Block, Diagnostic, DiagnosticSeverity, ProviderSchema, Schema};
use crate::types::{
    ImportedResource, PlanResult, ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION,
};

/// The operations a provider answers, over JSON values.
///
/// A `Value::Null` state returned from [`read`](Self::read) means the remote
/// object is gone.
#[async_trait::async_trait]
pub trait ProviderService: Send + Sync + 'static {
    /// Schemas of the provider block, every resource and every data source.
    fn schema(&self) -> ProviderSchema;

    /// Resource and data source names, derived from the schema by default.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        ProviderMetadata {
            resources: schema.resources.keys().cloned().collect(),
            data_sources: schema.data_sources.keys().cloned().collect(),
            capabilities: Default::default(),
        }
    }

    /// Check the provider block without configuring anything.
    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider from its block.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Release anything held by the provider before exit.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Check a resource configuration.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Migrate state written by an older schema version.
    async fn upgrade_resource_state(
        &self,
        resource_type: &str,
        version: i64,
        state: Value,
    ) -> Result<Value, ProviderError> {
        let _ = (resource_type, version);
        Ok(state)
    }

    /// Compute the planned state for a resource.
    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError>;

    /// Create a resource from its planned state.
    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Refresh a resource's state.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Value, ProviderError>;

    /// Apply a planned change to an existing resource.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Bring an existing remote object under management.
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let _ = id;
        Err(ProviderError::Unimplemented(format!(
            "import is not supported for {}",
            resource_type
        )))
    }

    /// Check a data source configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (data_source_type, config);
        Ok(vec![])
    }

    /// Read a data source.
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let _ = config;
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

/// Decode a JSON payload. Empty bytes mean null.
fn decode(bytes: &[u8], field: &str) -> Result<Value, ProviderError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ProviderError::InvalidRequest(format!("{} is not valid JSON: {}", field, e)))
}

/// Encode a JSON payload. Null encodes as empty bytes.
fn encode(value: &Value) -> Vec<u8> {
    if value.is_null() {
        Vec::new()
    } else {
        serde_json::to_vec(value).unwrap_or_default()
    }
}

fn diagnostic_to_proto(d: Diagnostic) -> pb::Diagnostic {
    let severity = match d.severity {
        DiagnosticSeverity::Error => pb::diagnostic::Severity::Error,
        DiagnosticSeverity::Warning => pb::diagnostic::Severity::Warning,
    };
    pb::Diagnostic {
        severity: severity as i32,
        summary: d.summary,
        detail: d.detail.unwrap_or_default(),
        attribute: d.attribute.unwrap_or_default(),
    }
}

fn error_to_proto(err: &ProviderError) -> Vec<pb::Diagnostic> {
    vec![pb::Diagnostic {
        severity: pb::diagnostic::Severity::Error as i32,
        summary: err.to_string(),
        detail: String::new(),
        attribute: String::new(),
    }]
}

/// Turn a diagnostics-producing result into protocol diagnostics, logging the
/// outcome.
fn diagnostics_outcome(
    op: &str,
    subject: &str,
    result: Result<Vec<Diagnostic>, ProviderError>,
) -> Vec<pb::Diagnostic> {
    match result {
        Ok(diagnostics) => {
            if has_errors(&diagnostics) {
                warn!(op, subject, diagnostics = diagnostics.len(), "completed with errors");
            } else {
                debug!(op, subject, "completed");
            }
            diagnostics.into_iter().map(diagnostic_to_proto).collect()
        }
        Err(e) => {
            error!(op, subject, error = %e, "failed");
            error_to_proto(&e)
        }
    }
}

/// Turn a state-producing result into `(state bytes, diagnostics)`.
fn state_outcome(
    op: &str,
    subject: &str,
    result: Result<Value, ProviderError>,
) -> (Vec<u8>, Vec<pb::Diagnostic>) {
    match result {
        Ok(state) => {
            info!(op, subject, removed = state.is_null(), "completed");
            (encode(&state), vec![])
        }
        Err(e) => {
            error!(op, subject, error = %e, "failed");
            (vec![], error_to_proto(&e))
        }
    }
}

fn schema_to_proto(schema: &Schema) -> pb::Schema {
    pb::Schema {
        version: schema.version as i64,
        block: Some(block_to_proto(&schema.block)),
    }
}

fn block_to_proto(block: &Block) -> pb::Block {
    pb::Block {
        attributes: block
            .attributes
            .iter()
            .map(|(name, attr)| pb::Attribute {
                name: name.clone(),
                r#type: serde_json::to_vec(&attr.attr_type).unwrap_or_default(),
                required: attr.flags.required,
                optional: attr.flags.optional,
                computed: attr.flags.computed,
                sensitive: attr.flags.sensitive,
                description: attr.description.clone().unwrap_or_default(),
                force_new: attr.force_new,
                default_value: attr.default.as_ref().map(encode).unwrap_or_default(),
            })
            .collect(),
        description: block.description.clone().unwrap_or_default(),
    }
}

/// Adapts a [`ProviderService`] to the generated gRPC trait.
struct GrpcAdapter<P: ProviderService> {
    provider: Arc<P>,
}

#[tonic::async_trait]
impl<P: ProviderService> pb::provider_server::Provider for GrpcAdapter<P> {
    #[instrument(skip_all, name = "grpc.get_metadata")]
    async fn get_metadata(
        &self,
        _request: Request<pb::GetMetadataRequest>,
    ) -> Result<Response<pb::GetMetadataResponse>, Status> {
        let metadata = self.provider.metadata();
        debug!(
            resources = metadata.resources.len(),
            data_sources = metadata.data_sources.len(),
            "GetMetadata"
        );
        Ok(Response::new(pb::GetMetadataResponse {
            server_capabilities: Some(pb::ServerCapabilities {
                plan_destroy: metadata.capabilities.plan_destroy,
            }),
            resources: metadata.resources,
            data_sources: metadata.data_sources,
            diagnostics: vec![],
        }))
    }

    #[instrument(skip_all, name = "grpc.get_schema")]
    async fn get_schema(
        &self,
        _request: Request<pb::GetSchemaRequest>,
    ) -> Result<Response<pb::GetSchemaResponse>, Status> {
        let schema = self.provider.schema();
        Ok(Response::new(pb::GetSchemaResponse {
            provider: Some(schema_to_proto(&schema.provider)),
            resources: schema
                .resources
                .iter()
                .map(|(k, v)| (k.clone(), schema_to_proto(v)))
                .collect(),
            data_sources: schema
                .data_sources
                .iter()
                .map(|(k, v)| (k.clone(), schema_to_proto(v)))
                .collect(),
            diagnostics: vec![],
        }))
    }

    #[instrument(skip_all, name = "grpc.validate_provider_config")]
    async fn validate_provider_config(
        &self,
        request: Request<pb::ValidateProviderConfigRequest>,
    ) -> Result<Response<pb::ValidateProviderConfigResponse>, Status> {
        let req = request.into_inner();
        let result = match decode(&req.config, "config") {
            Ok(config) => self.provider.validate_provider_config(config).await,
            Err(e) => Err(e),
        };
        Ok(Response::new(pb::ValidateProviderConfigResponse {
            diagnostics: diagnostics_outcome("validate_provider_config", "provider", result),
        }))
    }

    #[instrument(skip_all, name = "grpc.configure")]
    async fn configure(
        &self,
        request: Request<pb::ConfigureRequest>,
    ) -> Result<Response<pb::ConfigureResponse>, Status> {
        let req = request.into_inner();
        let result = match decode(&req.config, "config") {
            Ok(config) => self.provider.configure(config).await,
            Err(e) => Err(e),
        };
        Ok(Response::new(pb::ConfigureResponse {
            diagnostics: diagnostics_outcome("configure", "provider", result),
        }))
    }

    #[instrument(skip_all, name = "grpc.stop")]
    async fn stop(
        &self,
        _request: Request<pb::StopRequest>,
    ) -> Result<Response<pb::StopResponse>, Status> {
        info!("Stop requested");
        let error = match self.provider.stop().await {
            Ok(()) => String::new(),
            Err(e) => {
                error!(error = %e, "Stop failed");
                e.to_string()
            }
        };
        Ok(Response::new(pb::StopResponse { error }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.validate_resource_config",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn validate_resource_config(
        &self,
        request: Request<pb::ValidateResourceConfigRequest>,
    ) -> Result<Response<pb::ValidateResourceConfigResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.config, "config") {
            Ok(config) => {
                self.provider
                    .validate_resource_config(&req.resource_type, config)
                    .await
            }
            Err(e) => Err(e),
        };
        Ok(Response::new(pb::ValidateResourceConfigResponse {
            diagnostics: diagnostics_outcome(
                "validate_resource_config",
                &req.resource_type,
                result,
            ),
        }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.upgrade_resource_state",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn upgrade_resource_state(
        &self,
        request: Request<pb::UpgradeResourceStateRequest>,
    ) -> Result<Response<pb::UpgradeResourceStateResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.raw_state, "raw_state") {
            Ok(state) => {
                self.provider
                    .upgrade_resource_state(&req.resource_type, req.version, state)
                    .await
            }
            Err(e) => Err(e),
        };
        let (upgraded_state, diagnostics) =
            state_outcome("upgrade_resource_state", &req.resource_type, result);
        Ok(Response::new(pb::UpgradeResourceStateResponse {
            upgraded_state,
            diagnostics,
        }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.plan",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn plan(
        &self,
        request: Request<pb::PlanRequest>,
    ) -> Result<Response<pb::PlanResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());

        let inputs = (|| {
            let prior = decode(&req.prior_state, "prior_state")?;
            let proposed = decode(&req.proposed_state, "proposed_state")?;
            let config = decode(&req.config, "config")?;
            Ok::<_, ProviderError>(((!prior.is_null()).then_some(prior), proposed, config))
        })();
        let result = match inputs {
            Ok((prior, proposed, config)) => {
                self.provider
                    .plan(&req.resource_type, prior, proposed, config)
                    .await
            }
            Err(e) => Err(e),
        };

        let response = match result {
            Ok(plan) => {
                info!(
                    changes = plan.changes.len(),
                    requires_replace = plan.requires_replace,
                    "Plan completed"
                );
                pb::PlanResponse {
                    planned_state: encode(&plan.planned_state),
                    changes: plan.changes.into_iter().map(Into::into).collect(),
                    requires_replace: plan.requires_replace,
                    diagnostics: vec![],
                }
            }
            Err(e) => {
                error!(error = %e, "Plan failed");
                pb::PlanResponse {
                    planned_state: vec![],
                    changes: vec![],
                    requires_replace: false,
                    diagnostics: error_to_proto(&e),
                }
            }
        };
        Ok(Response::new(response))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.create",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn create(
        &self,
        request: Request<pb::CreateRequest>,
    ) -> Result<Response<pb::CreateResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.planned_state, "planned_state") {
            Ok(planned) => self.provider.create(&req.resource_type, planned).await,
            Err(e) => Err(e),
        };
        let (state, diagnostics) = state_outcome("create", &req.resource_type, result);
        Ok(Response::new(pb::CreateResponse { state, diagnostics }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.read",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn read(
        &self,
        request: Request<pb::ReadRequest>,
    ) -> Result<Response<pb::ReadResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.current_state, "current_state") {
            Ok(current) => self.provider.read(&req.resource_type, current).await,
            Err(e) => Err(e),
        };
        let (state, diagnostics) = state_outcome("read", &req.resource_type, result);
        Ok(Response::new(pb::ReadResponse { state, diagnostics }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.update",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn update(
        &self,
        request: Request<pb::UpdateRequest>,
    ) -> Result<Response<pb::UpdateResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let inputs = decode(&req.prior_state, "prior_state")
            .and_then(|prior| Ok((prior, decode(&req.planned_state, "planned_state")?)));
        let result = match inputs {
            Ok((prior, planned)) => self.provider.update(&req.resource_type, prior, planned).await,
            Err(e) => Err(e),
        };
        let (state, diagnostics) = state_outcome("update", &req.resource_type, result);
        Ok(Response::new(pb::UpdateResponse { state, diagnostics }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.delete",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn delete(
        &self,
        request: Request<pb::DeleteRequest>,
    ) -> Result<Response<pb::DeleteResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let result = match decode(&req.current_state, "current_state") {
            Ok(current) => self
                .provider
                .delete(&req.resource_type, current)
                .await
                .map(|()| Vec::new()),
            Err(e) => Err(e),
        };
        Ok(Response::new(pb::DeleteResponse {
            diagnostics: diagnostics_outcome("delete", &req.resource_type, result),
        }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.import_resource_state",
        fields(resource_type = tracing::field::Empty)
    )]
    async fn import_resource_state(
        &self,
        request: Request<pb::ImportResourceStateRequest>,
    ) -> Result<Response<pb::ImportResourceStateResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("resource_type", req.resource_type.as_str());
        let response = match self.provider.import_resource(&req.resource_type, &req.id).await {
            Ok(imported) => {
                info!(id = %req.id, count = imported.len(), "Import completed");
                pb::ImportResourceStateResponse {
                    imported: imported.into_iter().map(Into::into).collect(),
                    diagnostics: vec![],
                }
            }
            Err(e) => {
                error!(id = %req.id, error = %e, "Import failed");
                pb::ImportResourceStateResponse {
                    imported: vec![],
                    diagnostics: error_to_proto(&e),
                }
            }
        };
        Ok(Response::new(response))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.validate_data_source_config",
        fields(data_source_type = tracing::field::Empty)
    )]
    async fn validate_data_source_config(
        &self,
        request: Request<pb::ValidateDataSourceConfigRequest>,
    ) -> Result<Response<pb::ValidateDataSourceConfigResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("data_source_type", req.data_source_type.as_str());
        let result = match decode(&req.config, "config") {
            Ok(config) => {
                self.provider
                    .validate_data_source_config(&req.data_source_type, config)
                    .await
            }
            Err(e) => Err(e),
        };
        Ok(Response::new(pb::ValidateDataSourceConfigResponse {
            diagnostics: diagnostics_outcome(
                "validate_data_source_config",
                &req.data_source_type,
                result,
            ),
        }))
    }

    #[instrument(
        skip(self, request),
        name = "grpc.read_data_source",
        fields(data_source_type = tracing::field::Empty)
    )]
    async fn read_data_source(
        &self,
        request: Request<pb::ReadDataSourceRequest>,
    ) -> Result<Response<pb::ReadDataSourceResponse>, Status> {
        let req = request.into_inner();
        tracing::Span::current().record("data_source_type", req.data_source_type.as_str());
        let result = match decode(&req.config, "config") {
            Ok(config) => self.provider.read_data_source(&req.data_source_type, config).await,
            Err(e) => Err(e),
        };
        let (state, diagnostics) = state_outcome("read_data_source", &req.data_source_type, result);
        Ok(Response::new(pb::ReadDataSourceResponse { state, diagnostics }))
    }
}

/// Options for running the provider server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// How long in-flight requests may run after a shutdown signal.
    /// Default: 30 seconds.
    pub shutdown_timeout: Duration,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServeOptions {
    /// Options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown timeout.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

/// Resolve on SIGTERM or SIGINT (CTRL+C elsewhere).
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Could not install signal handlers, waiting for CTRL+C");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for CTRL+C, serving until killed");
        std::future::pending::<()>().await;
    }
}

/// Serve on an ephemeral port on `127.0.0.1`.
///
/// Prints `HEMMER_PROVIDER|<version>|<address>` to stdout once listening.
pub async fn serve<P: ProviderService>(provider: P) -> Result<(), Box<dyn std::error::Error>> {
    serve_with_options(provider, ServeOptions::default()).await
}

/// [`serve`] with custom options.
pub async fn serve_with_options<P: ProviderService>(
    provider: P,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    serve_on_listener(provider, listener, options).await
}

/// Serve on a specific address.
pub async fn serve_on<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    serve_on_with_options(provider, addr, ServeOptions::default()).await
}

/// [`serve_on`] with custom options.
pub async fn serve_on_with_options<P: ProviderService>(
    provider: P,
    addr: SocketAddr,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    serve_on_listener(provider, listener, options).await
}

async fn serve_on_listener<P: ProviderService>(
    provider: P,
    listener: TcpListener,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = listener.local_addr()?;
    println!("{}|{}|{}", HANDSHAKE_PREFIX, PROTOCOL_VERSION, addr);
    info!(address = %addr, "Provider server starting");

    serve_until(provider, listener, options, wait_for_shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// No handshake line is printed. Once `shutdown` resolves, in-flight requests
/// get `options.shutdown_timeout` to complete before the server is dropped.
pub async fn serve_until<P, F>(
    provider: P,
    listener: TcpListener,
    options: ServeOptions,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: ProviderService,
    F: Future<Output = ()> + Send + 'static,
{
    let provider = Arc::new(provider);
    let service = pb::provider_server::ProviderServer::new(GrpcAdapter {
        provider: Arc::clone(&provider),
    });

    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = Server::builder().add_service(service).serve_with_incoming_shutdown(
        tokio_stream::wrappers::TcpListenerStream::new(listener),
        async move {
            shutdown.await;
            let _ = signalled_tx.send(());
        },
    );
    tokio::pin!(server);

    // The drain deadline starts at the signal, not at startup.
    tokio::select! {
        result = &mut server => result?,
        _ = signalled_rx => {
            match tokio::time::timeout(options.shutdown_timeout, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    timeout = ?options.shutdown_timeout,
                    "In-flight requests did not finish in time, forcing shutdown"
                ),
            }
        }
    }

    if let Err(e) = provider.stop().await {
        warn!(error = %e, "Provider stop returned an error");
    }
    info!("Provider shutdown complete");
    Ok(())
}
