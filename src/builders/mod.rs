// ABOUTME: View-model builders for field macros
// ABOUTME: Shared request state, macro options, and builder inputs

pub mod checkbox;
pub mod options;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::schema::FieldSchema;
use crate::translate::TranslationResolver;

pub use checkbox::build_checkbox;
pub use options::build_option_group;
pub use text::build_text;

/// Request-scoped overlay on the schema: submitted values and validation
/// error markers. Absent keys mean "no value" / "no error".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderState {
    pub values: JsonMap<String, JsonValue>,
    pub errors: JsonMap<String, JsonValue>,
}

impl RenderState {
    pub fn new(values: JsonMap<String, JsonValue>, errors: JsonMap<String, JsonValue>) -> Self {
        Self { values, errors }
    }

    /// Extract state from a render-context root carrying `values` and
    /// `errors` objects. Missing or non-object entries yield empty maps.
    pub fn from_scope(scope: &JsonValue) -> Self {
        let pick = |name: &str| {
            scope
                .get(name)
                .and_then(JsonValue::as_object)
                .cloned()
                .unwrap_or_default()
        };
        Self {
            values: pick("values"),
            errors: pick("errors"),
        }
    }

    pub fn value(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// The submitted value rendered as a string, as templates compare it.
    pub fn value_string(&self, key: &str) -> Option<String> {
        self.values.get(key).map(value_to_string)
    }

    pub fn has_error(&self, key: &str) -> bool {
        self.errors.get(key).map(is_truthy).unwrap_or(false)
    }
}

/// Static or caller-supplied overrides for a macro's builder. Overrides win
/// only for the keys they explicitly set; anything under `extra` is merged
/// verbatim into the built context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MacroOptions {
    pub pattern: Option<String>,
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    pub class_name: Option<String>,
    pub id_suffix: Option<String>,
    pub hint_id: Option<String>,
    pub maxlength: Option<u64>,
    pub required: Option<bool>,
    pub date: bool,
    #[serde(flatten)]
    pub extra: JsonMap<String, JsonValue>,
}

/// Everything a builder needs: the schema, the request state, and a bound
/// translation resolver. Builders are pure and total over their inputs.
pub struct BuildContext<'a> {
    pub fields: &'a FieldSchema,
    pub state: &'a RenderState,
    pub resolver: &'a TranslationResolver<'a>,
}

/// String rendering used for value comparison and key substitution.
pub(crate) fn value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Overlay `extra` onto a built context without discarding computed fields.
pub(crate) fn merge_overrides(context: &mut JsonMap<String, JsonValue>, extra: &JsonMap<String, JsonValue>) {
    for (key, value) in extra {
        context.insert(key.clone(), value.clone());
    }
}
