// ABOUTME: Macro invocation protocol
// ABOUTME: Placeholder key extraction, builder dispatch, partial rendering, and recursion depth

use handlebars::Handlebars;
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::sync::OnceLock;
use tracing::debug;

use crate::builders::{
    build_checkbox, build_option_group, build_text, value_to_string, BuildContext, MacroOptions,
    RenderState,
};
use crate::schema::FieldLookup;

use super::error::{unwrap_render_error, MixinError, Result};
use super::macros::{partial_name, BuilderKind, MacroKind};
use super::{MixinCore, MixinRegistry};

/// Upper bound on nested child-template expansion. A cyclic child reference
/// fails with [`MixinError::RecursionLimit`] instead of exhausting the stack.
pub const MAX_CHILD_DEPTH: usize = 10;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{\{\s*([^{}]+?)\s*\}\}$").expect("placeholder regex"))
}

/// Extract the effective field key from the literal placeholder text a macro
/// receives. A `{{x}}` form is unwrapped and, when the enclosing scope has a
/// property `x`, its rendered value is used; otherwise the unwrapped name
/// stands as the key.
///
/// A field key that happens to equal another field's brace-wrapped name is
/// indistinguishable from a placeholder reference; scope lookup wins. Schema
/// authors should avoid brace characters in keys.
pub(crate) fn extract_key(raw: &str, scope: &JsonValue) -> String {
    let raw = raw.trim();
    if let Some(captures) = placeholder_re().captures(raw) {
        let name = captures[1].trim();
        if let Some(value) = scope.get(name) {
            if !value.is_null() {
                return value_to_string(value);
            }
        }
        return name.to_string();
    }
    raw.to_string()
}

impl MixinCore {
    /// Invoke a macro by name with the literal placeholder text it received.
    /// `scope` is the enclosing rendering scope used for key substitution;
    /// `state` the request-scoped values and errors; `depth` the current
    /// child-template nesting level.
    pub(crate) fn invoke(
        &self,
        engine: &Handlebars,
        name: &str,
        raw: &str,
        scope: &JsonValue,
        state: &RenderState,
        depth: usize,
    ) -> Result<String> {
        if depth > MAX_CHILD_DEPTH {
            return Err(MixinError::RecursionLimit(depth));
        }
        let def = self
            .macros
            .get(name)
            .ok_or_else(|| MixinError::UnknownMixin(name.to_string()))?;

        match &def.kind {
            MacroKind::Submit => self.render_submit(engine, raw),
            MacroKind::Date => {
                let key = extract_key(raw, scope);
                self.render_date(engine, &key, state, depth)
            }
            MacroKind::Field { partial, builder, options } => {
                let key = extract_key(raw, scope);
                let opts = options.resolve(&key);
                debug!(mixin = name, key = %key, depth, "invoking mixin");
                let context = self.build(*builder, &key, state, &opts, depth);
                engine
                    .render(&partial_name(partial), &context)
                    .map_err(unwrap_render_error)
            }
        }
    }

    fn build(
        &self,
        builder: BuilderKind,
        key: &str,
        state: &RenderState,
        opts: &MacroOptions,
        depth: usize,
    ) -> JsonValue {
        let resolver = self.resolver();
        let ctx = BuildContext { fields: &self.fields, state, resolver: &resolver };
        let mut built = match builder {
            BuilderKind::Text => build_text(&ctx, key, opts),
            BuilderKind::OptionGroup => build_option_group(&ctx, key, opts),
            BuilderKind::Checkbox => build_checkbox(&ctx, key, opts),
        };
        if let JsonValue::Object(map) = &mut built {
            map.insert("__depth".into(), json!(depth));
            if let Some(base_url) = &self.base_url {
                map.entry("baseUrl".to_string())
                    .or_insert_with(|| json!(base_url));
            }
        }
        built
    }

    /// The submit macro takes a whitespace-separated literal argument:
    /// `[translation suffix, element id]`, suffix defaulting to `"next"`.
    fn render_submit(&self, engine: &Handlebars, raw: &str) -> Result<String> {
        let mut parts = raw.split_whitespace();
        let suffix = parts.next().filter(|s| !s.is_empty()).unwrap_or("next");
        let id = parts.next();

        let value = self.resolver().resolve(&format!("buttons.{}", suffix));
        let context = json!({"value": value, "id": id});
        engine
            .render(&partial_name("input-submit"), &context)
            .map_err(unwrap_render_error)
    }

    /// The compound date macro renders up to three sibling text inputs
    /// suffixed `-day`, `-month`, `-year` onto the base key, sharing one
    /// hint id, joined by newlines. The day segment is omitted when the
    /// field is marked inexact. A fixed decomposition, not data-driven.
    fn render_date(
        &self,
        engine: &Handlebars,
        key: &str,
        state: &RenderState,
        depth: usize,
    ) -> Result<String> {
        let lookup = FieldLookup::new(&self.fields);
        let inexact = lookup.inexact(key);
        let resolver = self.resolver();
        let hint = resolver.resolve_soft(&crate::translate::translation_key(
            &self.fields,
            key,
            "hint",
        ));

        let components: &[(&str, u64)] = if inexact {
            &[("month", 2), ("year", 4)]
        } else {
            &[("day", 2), ("month", 2), ("year", 4)]
        };

        let mut parts = Vec::with_capacity(components.len());
        for (index, (component, maxlength)) in components.iter().enumerate() {
            let component_key = format!("{}-{}", key, component);
            let mut opts = MacroOptions {
                pattern: Some("[0-9]*".to_string()),
                hint_id: Some(format!("{}-hint", key)),
                class_name: Some(format!("form-group-{}", component)),
                maxlength: Some(*maxlength),
                date: true,
                ..Default::default()
            };
            // The shared hint renders once, on the first segment.
            if index == 0 {
                opts.extra.insert("hint".into(), json!(hint.clone()));
            } else {
                opts.extra.insert("hint".into(), JsonValue::Null);
            }

            let context = self.build(BuilderKind::Text, &component_key, state, &opts, depth);
            let html = engine
                .render(&partial_name("input-text"), &context)
                .map_err(unwrap_render_error)?;
            parts.push(html);
        }
        Ok(parts.join("\n"))
    }
}

/// Per-request handle over a [`MixinRegistry`]: the registry bound to one
/// request's values and errors. Constructed fresh for every request and
/// discarded after rendering.
pub struct BoundMixins<'a> {
    registry: &'a MixinRegistry,
    state: &'a RenderState,
}

impl<'a> BoundMixins<'a> {
    pub(crate) fn new(registry: &'a MixinRegistry, state: &'a RenderState) -> Self {
        Self { registry, state }
    }

    /// Invoke a macro with the literal placeholder text, with no enclosing
    /// scope for key substitution.
    pub fn call(&self, name: &str, placeholder: &str) -> Result<String> {
        self.call_in_scope(name, placeholder, &JsonValue::Null)
    }

    /// Invoke a macro with an explicit enclosing scope. A `{{x}}` placeholder
    /// resolves `x` against the scope before dispatch.
    pub fn call_in_scope(&self, name: &str, placeholder: &str, scope: &JsonValue) -> Result<String> {
        self.registry.core().invoke(
            self.registry.engine(),
            name,
            placeholder,
            scope,
            self.state,
            0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_key_literal() {
        assert_eq!(extract_key("name", &JsonValue::Null), "name");
        assert_eq!(extract_key("  name  ", &JsonValue::Null), "name");
    }

    #[test]
    fn test_extract_key_unwraps_placeholder() {
        let scope = json!({"other": "resolved-key"});
        assert_eq!(extract_key("{{other}}", &scope), "resolved-key");
        assert_eq!(extract_key("{{ other }}", &scope), "resolved-key");
    }

    #[test]
    fn test_extract_key_falls_back_to_unwrapped_name() {
        assert_eq!(extract_key("{{missing}}", &json!({})), "missing");
        assert_eq!(extract_key("{{missing}}", &JsonValue::Null), "missing");
    }

    #[test]
    fn test_extract_key_prefers_scope_value() {
        let scope = json!({"field": 7});
        assert_eq!(extract_key("{{field}}", &scope), "7");
    }
}
