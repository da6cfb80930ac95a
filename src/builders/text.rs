// ABOUTME: View-model builder for text-like inputs
// ABOUTME: Covers plain text, compound, code, number, phone, textarea, and date components

use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::schema::FieldLookup;
use crate::translate::translation_key;

use super::{merge_overrides, BuildContext, MacroOptions};

/// Build the render context for a text-like input. Total over missing schema
/// keys; caller overrides win only for the keys they set.
pub fn build_text(ctx: &BuildContext, key: &str, opts: &MacroOptions) -> JsonValue {
    let lookup = FieldLookup::new(ctx.fields);

    let id = match &opts.id_suffix {
        Some(suffix) => format!("{}{}", key, suffix),
        None => key.to_string(),
    };

    let label = ctx.resolver.resolve(&translation_key(ctx.fields, key, "label"));
    let hint = ctx.resolver.resolve_soft(&translation_key(ctx.fields, key, "hint"));
    let hint_id = opts
        .hint_id
        .clone()
        .unwrap_or_else(|| format!("{}-hint", id));

    let maxlength = opts.maxlength.or_else(|| lookup.maxlength(key));
    let required = opts.required.unwrap_or_else(|| lookup.required(key));
    let input_type = opts
        .input_type
        .clone()
        .unwrap_or_else(|| lookup.field_type(key).to_string());
    let class_name = opts
        .class_name
        .clone()
        .unwrap_or_else(|| lookup.class_names(key));

    let mut context = JsonMap::new();
    context.insert("id".into(), json!(id));
    context.insert("key".into(), json!(key));
    context.insert("label".into(), json!(label));
    context.insert("labelClassName".into(), json!(lookup.label_class_names(key)));
    context.insert("hint".into(), json!(hint));
    context.insert("hintId".into(), json!(hint_id));
    context.insert("value".into(), json!(ctx.state.value_string(key)));
    context.insert("error".into(), json!(ctx.state.has_error(key)));
    context.insert("maxlength".into(), json!(maxlength));
    context.insert("required".into(), json!(required));
    context.insert("pattern".into(), json!(opts.pattern));
    context.insert("type".into(), json!(input_type));
    context.insert("className".into(), json!(class_name));
    context.insert("date".into(), json!(opts.date));
    context.insert(
        "attributes".into(),
        serde_json::to_value(lookup.attributes(key)).unwrap_or(JsonValue::Null),
    );

    merge_overrides(&mut context, &opts.extra);
    JsonValue::Object(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::RenderState;
    use crate::schema::FieldSchema;
    use crate::translate::{MapTranslator, TranslationResolver};
    use serde_json::json;

    fn fields() -> FieldSchema {
        serde_json::from_value(json!({
            "name": {
                "validate": ["required", {"type": "maxlength", "arguments": [30]}],
                "attributes": [{"attribute": "autocomplete", "value": "off"}]
            }
        }))
        .unwrap()
    }

    fn translator() -> MapTranslator {
        MapTranslator::from_json(&json!({
            "fields.name.label": "Full name",
            "fields.name.hint": "As shown on your passport"
        }))
    }

    #[test]
    fn test_text_context_from_schema_and_state() {
        let fields = fields();
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "");
        let state = RenderState::from_scope(&json!({
            "values": {"name": "Jo Bloggs"},
            "errors": {"name": true}
        }));
        let ctx = BuildContext { fields: &fields, state: &state, resolver: &resolver };

        let built = build_text(&ctx, "name", &MacroOptions::default());
        assert_eq!(built["id"], "name");
        assert_eq!(built["label"], "Full name");
        assert_eq!(built["hint"], "As shown on your passport");
        assert_eq!(built["hintId"], "name-hint");
        assert_eq!(built["value"], "Jo Bloggs");
        assert_eq!(built["error"], true);
        assert_eq!(built["maxlength"], 30);
        assert_eq!(built["required"], true);
        assert_eq!(built["type"], "text");
        assert_eq!(built["attributes"][0]["attribute"], "autocomplete");
    }

    #[test]
    fn test_missing_key_degrades_to_defaults() {
        let fields = fields();
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "");
        let state = RenderState::default();
        let ctx = BuildContext { fields: &fields, state: &state, resolver: &resolver };

        let built = build_text(&ctx, "nowhere", &MacroOptions::default());
        assert_eq!(built["error"], false);
        assert_eq!(built["value"], JsonValue::Null);
        assert_eq!(built["required"], false);
        assert_eq!(built["maxlength"], JsonValue::Null);
        // Label falls back to the synthesized key.
        assert_eq!(built["label"], "fields.nowhere.label");
    }

    #[test]
    fn test_overrides_win_without_discarding_computed_fields() {
        let fields = fields();
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "");
        let state = RenderState::default();
        let ctx = BuildContext { fields: &fields, state: &state, resolver: &resolver };

        let opts: MacroOptions = serde_json::from_value(json!({
            "pattern": "[0-9]*",
            "type": "tel",
            "maxlength": 18,
            "autofocus": true
        }))
        .unwrap();

        let built = build_text(&ctx, "name", &opts);
        assert_eq!(built["pattern"], "[0-9]*");
        assert_eq!(built["type"], "tel");
        assert_eq!(built["maxlength"], 18);
        assert_eq!(built["autofocus"], true);
        // Computed fields not named by the override survive.
        assert_eq!(built["label"], "Full name");
        assert_eq!(built["required"], true);
    }

    #[test]
    fn test_id_suffix_and_hint_id() {
        let fields = fields();
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "");
        let state = RenderState::default();
        let ctx = BuildContext { fields: &fields, state: &state, resolver: &resolver };

        let opts = MacroOptions {
            id_suffix: Some("-day".to_string()),
            hint_id: Some("dob-hint".to_string()),
            ..Default::default()
        };
        let built = build_text(&ctx, "dob", &opts);
        assert_eq!(built["id"], "dob-day");
        assert_eq!(built["hintId"], "dob-hint");
    }
}
