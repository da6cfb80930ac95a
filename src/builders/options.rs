// ABOUTME: View-model builder for option groups (radio groups and selects)
// ABOUTME: Normalizes option descriptors and carries recursion state for child templates

use serde_json::{json, Map as JsonMap, Value as JsonValue};

use crate::schema::FieldLookup;
use crate::translate::translation_key;

use super::{merge_overrides, BuildContext, MacroOptions};

/// Build the render context for a radio group or select. The context root
/// carries the request's `values`/`errors` maps and a `__depth` counter so
/// the `error-class`, `render-child`, and `render-mixin` helpers can reach
/// them from template scope.
pub fn build_option_group(ctx: &BuildContext, key: &str, opts: &MacroOptions) -> JsonValue {
    let lookup = FieldLookup::new(ctx.fields);

    let legend = lookup
        .get(key)
        .and_then(|f| f.legend.clone())
        .unwrap_or_else(|| ctx.resolver.resolve(&format!("fields.{}.legend", key)));
    let hint = ctx.resolver.resolve_soft(&translation_key(ctx.fields, key, "hint"));

    let current = ctx.state.value_string(key);
    let options: Vec<JsonValue> = lookup
        .options(key)
        .iter()
        .map(|option| {
            let value = option.value().to_string();
            let label = match option.label() {
                Some(label) => ctx.resolver.resolve(label),
                // A bare string option is both its own label and value.
                None => value.clone(),
            };
            let selected = current.as_deref() == Some(value.as_str());
            json!({
                "label": label,
                "value": value,
                "selected": selected,
                "toggle": option.toggle(),
                "child": option.child(),
            })
        })
        .collect();

    let class_name = opts
        .class_name
        .clone()
        .unwrap_or_else(|| lookup.class_names(key));

    let mut context = JsonMap::new();
    context.insert("id".into(), json!(key));
    context.insert("key".into(), json!(key));
    context.insert("legend".into(), json!(legend));
    context.insert("legendClassName".into(), json!(lookup.label_class_names(key)));
    context.insert("hint".into(), json!(hint));
    context.insert("hintId".into(), json!(format!("{}-hint", key)));
    context.insert("error".into(), json!(ctx.state.has_error(key)));
    context.insert("className".into(), json!(class_name));
    context.insert(
        "required".into(),
        json!(opts.required.unwrap_or_else(|| lookup.required(key))),
    );
    context.insert("options".into(), JsonValue::Array(options));

    // Recursion helpers resolve state from the context root.
    context.insert("values".into(), JsonValue::Object(ctx.state.values.clone()));
    context.insert("errors".into(), JsonValue::Object(ctx.state.errors.clone()));
    context.insert("__depth".into(), json!(0));

    merge_overrides(&mut context, &opts.extra);
    JsonValue::Object(context)
}
