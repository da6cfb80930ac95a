// ABOUTME: Field schema data structures and deserialization
// ABOUTME: Defines fields, validators, options, and attribute pass-throughs

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// The full declarative schema: field key to field definition.
///
/// Keys double as schema lookup keys and HTML-attribute-safe identifiers.
pub type FieldSchema = HashMap<String, Field>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub validate: Vec<Validator>,
    pub required: Option<bool>,
    #[serde(rename = "className")]
    pub class_name: Option<ClassList>,
    #[serde(rename = "labelClassName")]
    pub label_class_name: Option<ClassList>,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub legend: Option<String>,
    pub options: Vec<FieldOption>,
    pub toggle: Option<String>,
    pub child: Option<String>,
    pub attributes: Vec<Attribute>,
    pub inexact: bool,
}

/// A validator entry: either a bare name or a name with arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Validator {
    Name(String),
    WithArguments {
        #[serde(rename = "type")]
        name: String,
        #[serde(default)]
        arguments: JsonValue,
    },
}

impl Validator {
    pub fn name(&self) -> &str {
        match self {
            Validator::Name(name) => name,
            Validator::WithArguments { name, .. } => name,
        }
    }

    /// The first argument when arguments are a sequence, else the scalar
    /// argument itself. `None` for bare-name validators.
    pub fn first_argument(&self) -> Option<&JsonValue> {
        match self {
            Validator::Name(_) => None,
            Validator::WithArguments { arguments, .. } => match arguments {
                JsonValue::Array(items) => items.first(),
                JsonValue::Null => None,
                other => Some(other),
            },
        }
    }
}

/// Class names may be declared as a single string or a list of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassList {
    One(String),
    Many(Vec<String>),
}

impl ClassList {
    /// Lists are joined with single spaces; a bare string passes through.
    pub fn joined(&self) -> String {
        match self {
            ClassList::One(value) => value.clone(),
            ClassList::Many(values) => values.join(" "),
        }
    }
}

/// An option descriptor for radio groups and selects. A bare string is both
/// its own label and value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Value(String),
    Full {
        value: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        toggle: Option<String>,
        #[serde(default)]
        child: Option<String>,
    },
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Value(value) => value,
            FieldOption::Full { value, .. } => value,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            FieldOption::Value(_) => None,
            FieldOption::Full { label, .. } => label.as_deref(),
        }
    }

    pub fn toggle(&self) -> Option<&str> {
        match self {
            FieldOption::Value(_) => None,
            FieldOption::Full { toggle, .. } => toggle.as_deref(),
        }
    }

    pub fn child(&self) -> Option<&str> {
        match self {
            FieldOption::Value(_) => None,
            FieldOption::Full { child, .. } => child.as_deref(),
        }
    }
}

/// Arbitrary HTML attribute pass-through for text inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_deserializes_bare_name_and_arguments() {
        let field: Field = serde_json::from_str(
            r#"{
                "validate": ["required", {"type": "maxlength", "arguments": [9]}]
            }"#,
        )
        .unwrap();

        assert_eq!(field.validate.len(), 2);
        assert_eq!(field.validate[0].name(), "required");
        assert_eq!(field.validate[1].name(), "maxlength");
        assert_eq!(
            field.validate[1].first_argument().and_then(|v| v.as_u64()),
            Some(9)
        );
    }

    #[test]
    fn test_validator_scalar_argument() {
        let validator: Validator =
            serde_json::from_str(r#"{"type": "exactlength", "arguments": 6}"#).unwrap();
        assert_eq!(validator.first_argument().and_then(|v| v.as_u64()), Some(6));
    }

    #[test]
    fn test_class_list_forms() {
        let one: ClassList = serde_json::from_str(r#""form-control""#).unwrap();
        let many: ClassList = serde_json::from_str(r#"["inline", "form-group"]"#).unwrap();
        assert_eq!(one.joined(), "form-control");
        assert_eq!(many.joined(), "inline form-group");
    }

    #[test]
    fn test_option_forms() {
        let bare: FieldOption = serde_json::from_str(r#""yes""#).unwrap();
        let full: FieldOption = serde_json::from_str(
            r#"{"value": "other", "label": "Something else", "toggle": "other-detail", "child": "partials/input-text"}"#,
        )
        .unwrap();

        assert_eq!(bare.value(), "yes");
        assert!(bare.label().is_none());
        assert_eq!(full.value(), "other");
        assert_eq!(full.label(), Some("Something else"));
        assert_eq!(full.toggle(), Some("other-detail"));
        assert_eq!(full.child(), Some("partials/input-text"));
    }
}
