// ABOUTME: Read-side accessors over the field schema
// ABOUTME: Derives per-field metadata with safe defaults for missing keys

use serde_json::Value as JsonValue;

use super::field::{Attribute, Field, FieldOption, FieldSchema};

/// Read-only view over a [`FieldSchema`]. Every accessor is total: a key
/// absent from the schema degrades to a safe default rather than failing,
/// because templates must render even for ad hoc keys.
pub struct FieldLookup<'a> {
    fields: &'a FieldSchema,
}

impl<'a> FieldLookup<'a> {
    pub fn new(fields: &'a FieldSchema) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&'a Field> {
        self.fields.get(key)
    }

    /// The declared type tag, defaulting to `"text"`.
    pub fn field_type(&self, key: &str) -> &'a str {
        self.get(key)
            .and_then(|f| f.field_type.as_deref())
            .unwrap_or("text")
    }

    /// Maximum input length derived from the validator sequence. A
    /// `maxlength` validator takes priority over `exactlength`; the first
    /// argument is used when arguments are a sequence.
    pub fn maxlength(&self, key: &str) -> Option<u64> {
        let field = self.get(key)?;
        let validator = field
            .validate
            .iter()
            .find(|v| v.name() == "maxlength")
            .or_else(|| field.validate.iter().find(|v| v.name() == "exactlength"))?;
        argument_as_u64(validator.first_argument()?)
    }

    /// Declared `className` joined with spaces; empty string when absent.
    pub fn class_names(&self, key: &str) -> String {
        self.get(key)
            .and_then(|f| f.class_name.as_ref())
            .map(|c| c.joined())
            .unwrap_or_default()
    }

    /// Declared `labelClassName` joined with spaces; empty string when absent.
    pub fn label_class_names(&self, key: &str) -> String {
        self.get(key)
            .and_then(|f| f.label_class_name.as_ref())
            .map(|c| c.joined())
            .unwrap_or_default()
    }

    /// The explicit `required` flag when set, ignoring validators; else true
    /// iff the validator sequence contains the literal name `"required"`.
    pub fn required(&self, key: &str) -> bool {
        match self.get(key) {
            Some(field) => match field.required {
                Some(explicit) => explicit,
                None => field.validate.iter().any(|v| v.name() == "required"),
            },
            None => false,
        }
    }

    pub fn options(&self, key: &str) -> &'a [FieldOption] {
        self.get(key).map(|f| f.options.as_slice()).unwrap_or(&[])
    }

    pub fn attributes(&self, key: &str) -> &'a [Attribute] {
        self.get(key).map(|f| f.attributes.as_slice()).unwrap_or(&[])
    }

    pub fn toggle(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(|f| f.toggle.as_deref())
    }

    pub fn inexact(&self, key: &str) -> bool {
        self.get(key).map(|f| f.inexact).unwrap_or(false)
    }
}

fn argument_as_u64(argument: &JsonValue) -> Option<u64> {
    match argument {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> FieldSchema {
        serde_json::from_value(json!({
            "name": {
                "validate": ["required", {"type": "maxlength", "arguments": [30]}]
            },
            "code": {
                "validate": [
                    {"type": "exactlength", "arguments": 6},
                    {"type": "maxlength", "arguments": [9]}
                ]
            },
            "reference": {
                "validate": [{"type": "exactlength", "arguments": 8}]
            },
            "optional": {
                "required": false,
                "validate": ["required"]
            },
            "styled": {
                "type": "tel",
                "className": ["inline", "form-group"],
                "labelClassName": "visuallyhidden"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_maxlength_prefers_maxlength_over_exactlength() {
        let schema = schema();
        let lookup = FieldLookup::new(&schema);
        assert_eq!(lookup.maxlength("code"), Some(9));
        assert_eq!(lookup.maxlength("reference"), Some(8));
        assert_eq!(lookup.maxlength("name"), Some(30));
    }

    #[test]
    fn test_maxlength_missing() {
        let schema = schema();
        let lookup = FieldLookup::new(&schema);
        assert_eq!(lookup.maxlength("optional"), None);
        assert_eq!(lookup.maxlength("absent"), None);
    }

    #[test]
    fn test_required_explicit_flag_wins_over_validators() {
        let schema = schema();
        let lookup = FieldLookup::new(&schema);
        assert!(lookup.required("name"));
        assert!(!lookup.required("optional"));
        assert!(!lookup.required("absent"));
    }

    #[test]
    fn test_type_defaults_to_text() {
        let schema = schema();
        let lookup = FieldLookup::new(&schema);
        assert_eq!(lookup.field_type("styled"), "tel");
        assert_eq!(lookup.field_type("name"), "text");
        assert_eq!(lookup.field_type("absent"), "text");
    }

    #[test]
    fn test_class_names_joined_or_empty() {
        let schema = schema();
        let lookup = FieldLookup::new(&schema);
        assert_eq!(lookup.class_names("styled"), "inline form-group");
        assert_eq!(lookup.label_class_names("styled"), "visuallyhidden");
        assert_eq!(lookup.class_names("absent"), "");
    }
}
