//! Configuration validation against a [`Schema`].
//!
//! Checks run in order per attribute: presence, type, then the attribute's
//! [`Validator`](crate::schema::Validator)s. Validators only see non-null
//! values of the right type.
//!
//! ```
//! use dokploy_provider::schema::{Attribute, Schema};
//! use dokploy_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("protocol", Attribute::optional_string().one_of(&["tcp", "udp"]))
//!     .with_attribute("published_port", Attribute::required_int64());
//!
//! assert!(validate(&schema, &json!({"published_port": 8080})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"published_port": 8080, "protocol": "sctp"}));
//! assert_eq!(diagnostics[0].attribute.as_deref(), Some("protocol"));
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::{Attribute, AttributeType, Diagnostic, Schema};

/// Validate a configuration object against a schema.
///
/// An empty result means the configuration is valid. Unknown attributes and
/// values set on computed-only attributes are reported as errors.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        other => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(other))),
            );
            return diagnostics;
        }
    };

    for (name, attr) in &schema.block.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }

    for (name, value) in obj {
        if !value.is_null() && !schema.block.attributes.contains_key(name) {
            diagnostics.push(
                Diagnostic::error(format!("Unsupported attribute '{}'", name))
                    .with_detail("This attribute is not defined by the schema")
                    .with_attribute(name.as_str()),
            );
        }
    }

    diagnostics
}

/// Like [`validate`], but returns `Err` when any diagnostic was produced.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let value = match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
            return;
        }
        Some(v) => v,
    };

    if attr.flags.is_computed_only() {
        diagnostics.push(
            Diagnostic::error(format!("Attribute '{}' is read-only", path))
                .with_detail("This value is set by the provider and cannot be configured")
                .with_attribute(path),
        );
        return;
    }

    let before = diagnostics.len();
    validate_type(&attr.attr_type, value, path, diagnostics);
    if diagnostics.len() > before {
        return;
    }

    for validator in &attr.validators {
        if let Some(detail) = validator.check(value) {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(detail)
                    .with_attribute(path),
            );
        }
    }
}

fn validate_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String if !value.is_string() => {
            diagnostics.push(type_error(path, "string", value));
        }
        AttributeType::Int64 if !is_int64(value) => {
            diagnostics.push(type_error(path, "int64", value));
        }
        AttributeType::Bool if !value.is_boolean() => {
            diagnostics.push(type_error(path, "bool", value));
        }
        AttributeType::List(element_type) => match value.as_array() {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    validate_type(element_type, item, &format!("{}.{}", path, i), diagnostics);
                }
            }
            None => diagnostics.push(type_error(path, "list", value)),
        },
        AttributeType::Object(fields) => match value.as_object() {
            Some(obj) => validate_object(fields, obj, path, diagnostics),
            None => diagnostics.push(type_error(path, "object", value)),
        },
        _ => {},
    }
}

fn validate_object(
    fields: &BTreeMap<String, AttributeType>,
    obj: &Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Object fields carry no presence flags; only check what is there.
    for (name, field_type) in fields {
        if let Some(value) = obj.get(name).filter(|v| !v.is_null()) {
            validate_type(field_type, value, &format!("{}.{}", path, name), diagnostics);
        }
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    as_int64(value).is_some()
}

/// The integer held by a JSON number, accepting integral floats such as
/// `8080.0`.
pub(crate) fn as_int64(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Some(f as i64)
        }
        _ => None,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, AttributeFlags, Validator};
    use serde_json::json;

    #[test]
    fn test_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate(&schema, &json!({"name": "web"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("name"));

        assert_eq!(validate(&schema, &json!({"name": null})).len(), 1);

        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_optional_attribute() {
        let schema = Schema::v0().with_attribute("replicas", Attribute::optional_int64());

        assert!(validate(&schema, &json!({"replicas": 2})).is_empty());
        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"replicas": null})).is_empty());
        assert_eq!(validate(&schema, &json!({"replicas": "two"})).len(), 1);
    }

    #[test]
    fn test_computed_only_attribute_rejected_when_set() {
        let schema = Schema::v0().with_id("ID");

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"id": null})).is_empty());

        let diagnostics = validate(&schema, &json!({"id": "abc"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("read-only"));
    }

    #[test]
    fn test_unknown_attribute() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());
        let diagnostics = validate(&schema, &json!({"name": "x", "nmae": "y"}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("nmae"));
    }

    #[test]
    fn test_int64_accepts_integral_floats() {
        let schema = Schema::v0().with_attribute("port", Attribute::required_int64());

        assert!(validate(&schema, &json!({"port": 80})).is_empty());
        assert!(validate(&schema, &json!({"port": 80.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"port": 80.5})).len(), 1);
        assert_eq!(validate(&schema, &json!({"port": "80"})).len(), 1);
    }

    #[test]
    fn test_list_elements() {
        let schema = Schema::v0().with_attribute("watch_paths", Attribute::optional_string_list());

        assert!(validate(&schema, &json!({"watch_paths": ["src/**", "Dockerfile"]})).is_empty());
        assert!(validate(&schema, &json!({"watch_paths": []})).is_empty());

        let diagnostics = validate(&schema, &json!({"watch_paths": ["a", 1]}));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("watch_paths.1"));

        assert_eq!(validate(&schema, &json!({"watch_paths": "src"})).len(), 1);
    }

    #[test]
    fn test_object_fields() {
        let endpoint = AttributeType::object([
            ("host", AttributeType::String),
            ("port", AttributeType::Int64),
        ]);
        let schema = Schema::v0().with_attribute(
            "endpoint",
            Attribute::new(endpoint, AttributeFlags::optional()),
        );

        assert!(validate(&schema, &json!({"endpoint": {"host": "db", "port": 5432}})).is_empty());
        assert!(validate(&schema, &json!({"endpoint": {"port": 5432.0}})).is_empty());

        let diagnostics = validate(&schema, &json!({"endpoint": {"port": "5432"}}));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("endpoint.port"));
    }

    #[test]
    fn test_validators_run_after_type_check() {
        let schema = Schema::v0()
            .with_attribute("protocol", Attribute::optional_string().one_of(&["tcp", "udp"]))
            .with_attribute(
                "port",
                Attribute::optional_int64()
                    .with_validator(Validator::Between { min: 1, max: 65535 }),
            );

        assert!(validate(&schema, &json!({"protocol": "udp", "port": 53})).is_empty());

        let diagnostics = validate(&schema, &json!({"protocol": "sctp"}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].detail.as_deref().unwrap().contains("tcp, udp"));

        // A type error suppresses the validator diagnostic.
        assert_eq!(validate(&schema, &json!({"port": "http"})).len(), 1);
        assert_eq!(validate(&schema, &json!({"port": 0})).len(), 1);
    }

    #[test]
    fn test_range_accepts_integral_floats() {
        let schema = Schema::v0().with_attribute(
            "port",
            Attribute::optional_int64().with_validator(Validator::Between { min: 1, max: 65535 }),
        );

        assert!(validate(&schema, &json!({"port": 8080.0})).is_empty());

        let diagnostics = validate(&schema, &json!({"port": 70000.0}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid value"));
    }

    #[test]
    fn test_json_string_attribute() {
        let schema = Schema::v0().with_attribute("health_check_swarm", Attribute::optional_json());

        assert!(validate(&schema, &json!({"health_check_swarm": "{\"Interval\": 10}"})).is_empty());
        assert_eq!(validate(&schema, &json!({"health_check_swarm": "{"})).len(), 1);
    }

    #[test]
    fn test_multiple_errors() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("replicas", Attribute::required_int64())
            .with_attribute("https", Attribute::optional_bool());

        let diagnostics = validate(&schema, &json!({"name": 1, "replicas": "x", "https": "yes"}));
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_root_not_object() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());
        let diagnostics = validate(&schema, &json!("not an object"));
        assert!(diagnostics[0].summary.contains("Expected object"));
    }

    #[test]
    fn test_validate_result() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());
        assert!(validate_result(&schema, &json!({"name": "x"})).is_ok());
        assert_eq!(validate_result(&schema, &json!({})).unwrap_err().len(), 1);
    }
}
