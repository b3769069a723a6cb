//! Plan, import and metadata types exchanged with the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generated as pb;

/// A change to one top-level attribute in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name.
    pub path: String,
    /// Value before the change; `None` when the attribute is being set.
    pub before: Option<Value>,
    /// Value after the change; `None` when the attribute is being cleared.
    pub after: Option<Value>,
}

impl AttributeChange {
    /// Create a change from optional before/after values.
    pub fn new(path: impl Into<String>, before: Option<Value>, after: Option<Value>) -> Self {
        Self {
            path: path.into(),
            before,
            after,
        }
    }

    /// An attribute that goes from unset to `value`.
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, None, Some(value))
    }

    /// An attribute that goes from `value` to unset.
    pub fn removed(path: impl Into<String>, value: Value) -> Self {
        Self::new(path, Some(value), None)
    }

    /// An attribute whose value changes.
    pub fn modified(path: impl Into<String>, before: Value, after: Value) -> Self {
        Self::new(path, Some(before), Some(after))
    }
}

impl From<AttributeChange> for pb::AttributeChange {
    fn from(change: AttributeChange) -> Self {
        let encode = |v: Option<Value>| {
            v.map(|v| serde_json::to_vec(&v).unwrap_or_default())
                .unwrap_or_default()
        };
        Self {
            path: change.path,
            before: encode(change.before),
            after: encode(change.after),
        }
    }
}

/// The outcome of planning one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// State the resource will have after apply. Null for a destroy plan.
    pub planned_state: Value,
    /// Attribute-level differences from the prior state.
    pub changes: Vec<AttributeChange>,
    /// Whether the resource must be destroyed and re-created.
    pub requires_replace: bool,
}

impl PlanResult {
    /// A plan that leaves the resource as it is.
    pub fn no_change(state: Value) -> Self {
        Self {
            planned_state: state,
            changes: Vec::new(),
            requires_replace: false,
        }
    }

    /// A plan with changes.
    pub fn with_changes(
        planned_state: Value,
        changes: Vec<AttributeChange>,
        requires_replace: bool,
    ) -> Self {
        Self {
            planned_state,
            changes,
            requires_replace,
        }
    }

    /// Whether applying this plan would do anything.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Whether this plan destroys the resource.
    pub fn is_destroy(&self) -> bool {
        self.planned_state.is_null()
    }
}

/// A resource brought under management by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// Resource type name.
    pub resource_type: String,
    /// State read from the platform.
    pub state: Value,
}

impl ImportedResource {
    /// Create an imported resource.
    pub fn new(resource_type: impl Into<String>, state: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

impl From<ImportedResource> for pb::ImportedResource {
    fn from(imported: ImportedResource) -> Self {
        Self {
            resource_type: imported.resource_type,
            state: serde_json::to_vec(&imported.state).unwrap_or_default(),
        }
    }
}

/// Names returned by GetMetadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// Resource type names.
    pub resources: Vec<String>,
    /// Data source type names.
    pub data_sources: Vec<String>,
    /// Optional protocol features the provider supports.
    pub capabilities: ServerCapabilities,
}

/// Optional protocol features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// The provider plans destroys through Plan with a null proposed state.
    pub plan_destroy: bool,
}

/// Handshake protocol version.
pub const PROTOCOL_VERSION: u32 = 1;

/// First field of the handshake line.
pub const HANDSHAKE_PREFIX: &str = "HEMMER_PROVIDER";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_change_constructors() {
        let added = AttributeChange::added("name", json!("web"));
        assert!(added.before.is_none());
        assert_eq!(added.after, Some(json!("web")));

        let removed = AttributeChange::removed("description", json!("old"));
        assert!(removed.after.is_none());

        let modified = AttributeChange::modified("replicas", json!(1), json!(3));
        assert_eq!(modified.before, Some(json!(1)));
        assert_eq!(modified.after, Some(json!(3)));
    }

    #[test]
    fn test_attribute_change_to_proto() {
        let proto: pb::AttributeChange = AttributeChange::added("port", json!(8080)).into();
        assert_eq!(proto.path, "port");
        assert!(proto.before.is_empty());
        assert_eq!(proto.after, b"8080".to_vec());
    }

    #[test]
    fn test_plan_result() {
        let plan = PlanResult::no_change(json!({"id": "p-1"}));
        assert!(!plan.has_changes());
        assert!(!plan.is_destroy());

        let plan = PlanResult::with_changes(
            Value::Null,
            vec![AttributeChange::removed("name", json!("web"))],
            false,
        );
        assert!(plan.has_changes());
        assert!(plan.is_destroy());
    }

    #[test]
    fn test_imported_resource_to_proto() {
        let proto: pb::ImportedResource =
            ImportedResource::new("dokploy_project", json!({"id": "p-1"})).into();
        assert_eq!(proto.resource_type, "dokploy_project");
        assert_eq!(proto.state, br#"{"id":"p-1"}"#.to_vec());
    }
}
