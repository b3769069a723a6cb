//! Schema-driven planning.
//!
//! Every resource plans the same way, so the rules live here rather than in
//! each resource:
//!
//! * a null proposed state plans a destroy,
//! * null attributes with a default take the default,
//! * null computed attributes keep their prior value,
//! * a change to a `force_new` attribute requires replacement, and the
//!   computed attributes without a default that the configuration leaves
//!   unset become unknown (null) again.

use serde_json::{Map, Value};

use crate::schema::{AttributeType, Schema};
use crate::types::{AttributeChange, PlanResult};
use crate::validation::as_int64;

/// Plan a resource from its prior state, proposed state and configuration.
pub fn plan_resource(
    schema: &Schema,
    prior: Option<&Value>,
    proposed: &Value,
    config: &Value,
) -> PlanResult {
    let prior = prior.filter(|p| !p.is_null());

    if proposed.is_null() {
        let changes = match prior {
            Some(prior) => schema
                .block
                .attributes
                .keys()
                .filter_map(|name| {
                    attr(prior, name).map(|v| AttributeChange::removed(name.as_str(), v.clone()))
                })
                .collect(),
            None => Vec::new(),
        };
        return PlanResult::with_changes(Value::Null, changes, false);
    }

    let mut planned = Map::new();
    for (name, attribute) in &schema.block.attributes {
        let mut value = attr(proposed, name).cloned();

        if value.is_none() {
            value = attribute.default.clone();
        }
        if value.is_none() && attribute.flags.computed {
            value = prior.and_then(|p| attr(p, name)).cloned();
        }

        let value = value
            .map(|v| normalize(&attribute.attr_type, v))
            .unwrap_or(Value::Null);
        planned.insert(name.clone(), value);
    }

    let Some(prior) = prior else {
        let changes = planned
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(name, v)| AttributeChange::added(name.as_str(), v.clone()))
            .collect();
        return PlanResult::with_changes(Value::Object(planned), changes, false);
    };

    let requires_replace = schema.block.attributes.iter().any(|(name, attribute)| {
        attribute.force_new && differs(attr(prior, name), planned.get(name))
    });

    if requires_replace {
        for (name, attribute) in &schema.block.attributes {
            if attribute.flags.computed
                && attribute.default.is_none()
                && attr(config, name).is_none()
            {
                planned.insert(name.clone(), Value::Null);
            }
        }
    }

    let changes = schema
        .block
        .attributes
        .keys()
        .filter_map(|name| {
            let before = attr(prior, name);
            let after = planned.get(name).filter(|v| !v.is_null());
            differs(before, after)
                .then(|| AttributeChange::new(name.as_str(), before.cloned(), after.cloned()))
        })
        .collect();

    PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
}

/// A non-null attribute of an object value.
fn attr<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value.get(name).filter(|v| !v.is_null())
}

fn differs(before: Option<&Value>, after: Option<&Value>) -> bool {
    let after = after.filter(|v| !v.is_null());
    before != after
}

/// Normalise every attribute of an object value against its schema.
///
/// Integral floats in int64 attributes become integers so `3000` and
/// `3000.0` compare equal and decode into integer fields. Values of the
/// wrong shape are left for validation to report.
pub fn normalize_config(schema: &Schema, config: Value) -> Value {
    match config {
        Value::Object(mut obj) => {
            for (name, attribute) in &schema.block.attributes {
                if let Some(value) = obj.remove(name) {
                    obj.insert(name.clone(), normalize(&attribute.attr_type, value));
                }
            }
            Value::Object(obj)
        }
        other => other,
    }
}

fn normalize(attr_type: &AttributeType, value: Value) -> Value {
    match (attr_type, value) {
        (AttributeType::Int64, value) => match as_int64(&value) {
            Some(i) => Value::from(i),
            None => value,
        },
        (AttributeType::List(element_type), Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize(element_type, item))
                .collect(),
        ),
        (AttributeType::Object(fields), Value::Object(mut obj)) => {
            for (name, field_type) in fields {
                if let Some(value) = obj.remove(name) {
                    obj.insert(name.clone(), normalize(field_type, value));
                }
            }
            Value::Object(obj)
        }
        (_, value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;

    fn domain_schema() -> Schema {
        Schema::v0()
            .with_id("Domain ID")
            .with_attribute("host", Attribute::required_string())
            .with_attribute("path", Attribute::optional_string().with_default(json!("/")))
            .with_attribute("port", Attribute::optional_int64().with_default(json!(3000)))
            .with_attribute("application_id", Attribute::optional_string().with_force_new())
            .with_attribute("domain_type", Attribute::computed_string())
    }

    #[test]
    fn test_create_applies_defaults() {
        let config = json!({"host": "app.example.com", "application_id": "a-1"});
        let plan = plan_resource(&domain_schema(), None, &config, &config);

        assert_eq!(plan.planned_state["path"], "/");
        assert_eq!(plan.planned_state["port"], 3000);
        assert!(plan.planned_state["id"].is_null());
        assert!(!plan.requires_replace);

        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["application_id", "host", "path", "port"]);
    }

    #[test]
    fn test_unchanged_resource_has_no_changes() {
        let prior = json!({
            "id": "d-1", "host": "app.example.com", "path": "/", "port": 3000,
            "application_id": "a-1", "domain_type": "application"
        });
        let config = json!({"host": "app.example.com", "application_id": "a-1"});
        let plan = plan_resource(&domain_schema(), Some(&prior), &config, &config);

        assert!(!plan.has_changes());
        assert_eq!(plan.planned_state, prior);
    }

    #[test]
    fn test_in_place_update_keeps_computed() {
        let prior = json!({
            "id": "d-1", "host": "old.example.com", "path": "/", "port": 3000,
            "application_id": "a-1", "domain_type": "application"
        });
        let config = json!({"host": "new.example.com", "application_id": "a-1", "port": 8080.0});
        let plan = plan_resource(&domain_schema(), Some(&prior), &config, &config);

        assert!(!plan.requires_replace);
        assert_eq!(plan.planned_state["id"], "d-1");
        assert_eq!(plan.planned_state["port"], json!(8080));

        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["host", "port"]);
    }

    #[test]
    fn test_force_new_change_requires_replace() {
        let prior = json!({
            "id": "d-1", "host": "app.example.com", "path": "/", "port": 3000,
            "application_id": "a-1", "domain_type": "application"
        });
        let config = json!({"host": "app.example.com", "application_id": "a-2"});
        let plan = plan_resource(&domain_schema(), Some(&prior), &config, &config);

        assert!(plan.requires_replace);
        assert!(plan.planned_state["id"].is_null());
        assert!(plan.planned_state["domain_type"].is_null());
        // Defaults are configuration-level, so they survive replacement.
        assert_eq!(plan.planned_state["path"], "/");

        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["application_id", "domain_type", "id"]);
    }

    #[test]
    fn test_destroy_plan() {
        let prior = json!({"id": "d-1", "host": "app.example.com", "path": null});
        let plan = plan_resource(&domain_schema(), Some(&prior), &Value::Null, &Value::Null);

        assert!(plan.is_destroy());
        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["host", "id"]);
        assert!(plan.changes.iter().all(|c| c.after.is_none()));
    }

    #[test]
    fn test_clearing_optional_attribute() {
        let schema = Schema::v0()
            .with_id("ID")
            .with_attribute("description", Attribute::optional_string());
        let prior = json!({"id": "p-1", "description": "old"});
        let config = json!({"description": null});
        let plan = plan_resource(&schema, Some(&prior), &config, &config);

        assert!(plan.planned_state["description"].is_null());
        assert_eq!(plan.changes, vec![AttributeChange::removed("description", json!("old"))]);
    }

    #[test]
    fn test_normalize_config_turns_integral_floats_into_integers() {
        let schema = Schema::v0()
            .with_attribute("port", Attribute::optional_int64())
            .with_attribute("host", Attribute::required_string());
        let config = json!({"host": "app.example.com", "port": 8080.0, "extra": 1.0});

        assert_eq!(
            normalize_config(&schema, config),
            json!({"host": "app.example.com", "port": 8080, "extra": 1.0})
        );
        // Non-integral values are left for validation to reject.
        assert_eq!(
            normalize_config(&schema, json!({"port": 80.5})),
            json!({"port": 80.5})
        );
    }
}
