// ABOUTME: View-model builder for checkboxes
// ABOUTME: Derives selected/invalid flags and label with a default class token

use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::schema::FieldLookup;
use crate::translate::translation_key;

use super::{merge_overrides, BuildContext, MacroOptions};

const DEFAULT_CLASS: &str = "block-label";

/// Build the render context for a checkbox. Required defaults to false
/// unless the caller overrides it; `invalid` is set only when an error is
/// present and the checkbox is marked required.
pub fn build_checkbox(ctx: &BuildContext, key: &str, opts: &MacroOptions) -> JsonValue {
    let lookup = FieldLookup::new(ctx.fields);

    let selected = ctx.state.value_string(key).as_deref() == Some("true");
    let required = opts.required.unwrap_or(false);
    let error = ctx.state.has_error(key);

    let class_name = opts.class_name.clone().unwrap_or_else(|| {
        let declared = lookup.class_names(key);
        if declared.is_empty() {
            DEFAULT_CLASS.to_string()
        } else {
            declared
        }
    });

    let mut context = JsonMap::new();
    context.insert("id".into(), json!(key));
    context.insert("key".into(), json!(key));
    context.insert(
        "label".into(),
        json!(ctx.resolver.resolve(&translation_key(ctx.fields, key, "label"))),
    );
    context.insert("toggle".into(), json!(lookup.toggle(key)));
    context.insert("selected".into(), json!(selected));
    context.insert("error".into(), json!(error));
    context.insert("required".into(), json!(required));
    context.insert("invalid".into(), json!(error && required));
    context.insert("className".into(), json!(class_name));

    merge_overrides(&mut context, &opts.extra);
    JsonValue::Object(context)
}
