//! Test harness for driving a provider without a gRPC server.
//!
//! [`ProviderTester`] calls a [`ProviderService`] the way the host would:
//! validate, plan, then apply the planned state. Point a
//! [`DokployProvider`] at a mock Dokploy API with
//! [`ProviderTester::configured`] and run whole resource lifecycles against
//! it.
//!
//! ```ignore
//! use dokploy_provider::testing::{assert_plan_creates, ProviderTester};
//! use serde_json::json;
//!
//! let tester = ProviderTester::configured(&server.base_url()).await?;
//! let (plan, state) = tester
//!     .apply_create("dokploy_project", json!({"name": "web"}))
//!     .await?;
//! assert_plan_creates(&plan);
//! assert_eq!(state["name"], "web");
//! ```

use serde_json::{json, Value};
use thiserror::Error;

use crate::error::ProviderError;
use crate::provider::DokployProvider;
use crate::schema::{Diagnostic, DiagnosticSeverity, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult};

/// Why a tester call failed.
#[derive(Debug, Error)]
pub enum TestError {
    /// The provider answered with error diagnostics.
    #[error("{}", render_diagnostics(.0))]
    Diagnostics(Vec<Diagnostic>),
    /// The operation itself failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let lines: Vec<String> = diagnostics
        .iter()
        .map(|d| {
            let mut line = d.summary.clone();
            if let Some(attribute) = &d.attribute {
                line.push_str(&format!(" [{}]", attribute));
            }
            if let Some(detail) = &d.detail {
                line.push_str(&format!(": {}", detail));
            }
            line
        })
        .collect();
    format!("{} error diagnostic(s): {}", diagnostics.len(), lines.join("; "))
}

/// Only the error diagnostics, as a `TestError` when there are any.
fn errors_only(diagnostics: Vec<Diagnostic>) -> Result<(), TestError> {
    let errors: Vec<Diagnostic> = diagnostics
        .into_iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

/// Drives a [`ProviderService`] through host-style call sequences.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl ProviderTester<DokployProvider> {
    /// A Dokploy provider configured against `host` with a dummy API key.
    pub async fn configured(host: &str) -> Result<Self, TestError> {
        let tester = Self::new(DokployProvider::new());
        tester
            .configure(json!({"host": host, "api_key": "test-api-key", "timeout_seconds": 5}))
            .await?;
        Ok(tester)
    }
}

impl<P: ProviderService> ProviderTester<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Configure the provider, failing on error diagnostics.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        errors_only(self.provider.configure(config).await?)
    }

    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        errors_only(self.provider.validate_provider_config(config).await?)
    }

    /// All diagnostics for a resource configuration, warnings included.
    pub async fn resource_diagnostics(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, TestError> {
        Ok(self.provider.validate_resource_config(resource_type, config).await?)
    }

    pub async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(), TestError> {
        errors_only(self.resource_diagnostics(resource_type, config).await?)
    }

    pub async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        config: Value,
    ) -> Result<PlanResult, TestError> {
        Ok(self
            .provider
            .plan(resource_type, prior_state, config.clone(), config)
            .await?)
    }

    /// Validate, plan from nothing and create.
    pub async fn apply_create(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<(PlanResult, Value), TestError> {
        self.validate_resource_config(resource_type, config.clone()).await?;
        let plan = self.plan(resource_type, None, config).await?;
        let state = self.provider.create(resource_type, plan.planned_state.clone()).await?;
        Ok((plan, state))
    }

    /// Validate, plan against `prior` and update in place. A plan without
    /// changes returns the prior state untouched; a replacing plan is
    /// returned without applying anything.
    pub async fn apply_update(
        &self,
        resource_type: &str,
        prior: Value,
        config: Value,
    ) -> Result<(PlanResult, Value), TestError> {
        self.validate_resource_config(resource_type, config.clone()).await?;
        let plan = self.plan(resource_type, Some(prior.clone()), config).await?;
        if !plan.has_changes() || plan.requires_replace {
            return Ok((plan, prior));
        }
        let state = self
            .provider
            .update(resource_type, prior, plan.planned_state.clone())
            .await?;
        Ok((plan, state))
    }

    /// Plan a destroy and delete.
    pub async fn apply_destroy(
        &self,
        resource_type: &str,
        state: Value,
    ) -> Result<PlanResult, TestError> {
        let plan = self
            .provider
            .plan(resource_type, Some(state.clone()), Value::Null, Value::Null)
            .await?;
        self.provider.delete(resource_type, state).await?;
        Ok(plan)
    }

    /// Refresh a resource; `Value::Null` means it is gone.
    pub async fn refresh(&self, resource_type: &str, state: Value) -> Result<Value, TestError> {
        Ok(self.provider.read(resource_type, state).await?)
    }

    pub async fn import(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, TestError> {
        Ok(self.provider.import_resource(resource_type, id).await?)
    }

    /// Validate and read a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, TestError> {
        errors_only(
            self.provider
                .validate_data_source_config(data_source_type, config.clone())
                .await?,
        )?;
        Ok(self.provider.read_data_source(data_source_type, config).await?)
    }
}

/// The plan creates a new object.
pub fn assert_plan_creates(plan: &PlanResult) {
    assert!(plan.has_changes(), "expected a create plan, got no changes");
    assert!(
        plan.changes.iter().all(|c| c.before.is_none()),
        "expected only added attributes, got {:?}",
        plan.changes
    );
}

/// The plan leaves the object as it is.
pub fn assert_plan_unchanged(plan: &PlanResult) {
    assert!(
        !plan.has_changes(),
        "expected no changes, got {:?}",
        changed_paths(plan)
    );
}

/// The plan destroys and re-creates the object.
pub fn assert_plan_replaces(plan: &PlanResult) {
    assert!(plan.requires_replace, "expected replacement, changes: {:?}", changed_paths(plan));
}

/// The plan changes exactly `paths`, in place.
pub fn assert_plan_changes(plan: &PlanResult, paths: &[&str]) {
    assert!(!plan.requires_replace, "expected an in-place update, got a replacement");
    let mut expected: Vec<&str> = paths.to_vec();
    expected.sort_unstable();
    assert_eq!(changed_paths(plan), expected);
}

/// Some error diagnostic points at `attribute`.
pub fn assert_error_on(diagnostics: &[Diagnostic], attribute: &str) {
    assert!(
        diagnostics
            .iter()
            .any(|d| d.is_error() && d.attribute.as_deref() == Some(attribute)),
        "expected an error on '{}', got {:?}",
        attribute,
        diagnostics
    );
}

fn changed_paths(plan: &PlanResult) -> Vec<&str> {
    plan.changes.iter().map(|c| c.path.as_str()).collect()
}
