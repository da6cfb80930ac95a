// ABOUTME: Registry-bound helpers: translation, error marking, and child-template recursion
// ABOUTME: Implements render-child, render-mixin, error-class, t, and per-macro helpers

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::sync::Arc;

use crate::builders::{value_to_string, RenderState};
use crate::registry::invoke::MAX_CHILD_DEPTH;
use crate::registry::{MixinCore, MixinError};

use super::error_marker;

/// The current template scope as JSON, falling back to the context root.
fn current_scope<'reg, 'rc>(ctx: &'rc Context, rc: &mut RenderContext<'reg, 'rc>) -> JsonValue {
    rc.evaluate(ctx, "this")
        .map(|scoped| scoped.as_json().clone())
        .unwrap_or_else(|_| ctx.data().clone())
}

/// Resolve a helper parameter that may itself be a literal `{{x}}`
/// placeholder, evaluating `x` against the current scope.
fn resolve_param<'reg, 'rc>(
    h: &Helper<'reg, 'rc>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
    index: usize,
) -> Option<String> {
    let raw = h.param(index).map(|p| value_to_string(p.value()))?;
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("{{")
        .and_then(|s| s.strip_suffix("}}"))
    {
        let name = inner.trim();
        if let Ok(scoped) = rc.evaluate(ctx, name) {
            let value = scoped.as_json();
            if !value.is_null() {
                return Some(value_to_string(value));
            }
        }
        return Some(name.to_string());
    }
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn depth_of(root: &JsonValue) -> usize {
    root.get("__depth")
        .and_then(JsonValue::as_u64)
        .unwrap_or(0) as usize
}

/// Merge the context root and the local option scope into one child
/// rendering scope, threading the incremented depth counter through.
fn merged_scope(root: &JsonValue, scope: &JsonValue, depth: usize) -> JsonValue {
    let mut merged: JsonMap<String, JsonValue> = root.as_object().cloned().unwrap_or_default();
    if let Some(local) = scope.as_object() {
        for (key, value) in local {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged.insert("__depth".into(), json!(depth));
    JsonValue::Object(merged)
}

/// `error-class` - given a field reference (a path or a literal `{{x}}`
/// placeholder), emits a fixed error class token when that field currently
/// has an error. Lets a template mark a different field's error state from
/// within an option's rendering scope.
pub struct ErrorClassHelper;

impl HelperDef for ErrorClassHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        if let Some(field) = resolve_param(h, ctx, rc, 0) {
            out.write(error_marker(ctx.data().get("errors"), &field))?;
        }
        Ok(())
    }
}

/// `render-child` - resolves the current option's `child` reference to a
/// known partial, another macro, or literal template text, and renders it in
/// a scope merged from the context root and the option's own fields. Absence
/// of a child renders nothing.
pub struct RenderChildHelper {
    core: Arc<MixinCore>,
}

impl HelperDef for RenderChildHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let scope = current_scope(ctx, rc);
        let child = h
            .param(0)
            .map(|p| value_to_string(p.value()))
            .filter(|s| !s.is_empty())
            .or_else(|| {
                scope
                    .get("child")
                    .filter(|v| !v.is_null())
                    .map(value_to_string)
            });
        let Some(child) = child else {
            return Ok(());
        };

        let root = ctx.data();
        let depth = depth_of(root) + 1;
        if depth > MAX_CHILD_DEPTH {
            return Err(RenderError::from_error(
                "render-child",
                MixinError::RecursionLimit(depth),
            ));
        }
        let merged = merged_scope(root, &scope, depth);

        let html = if self.core.macros.contains_key(child.as_str()) {
            // Second-order lookup: the child names another macro, invoked
            // with the option's toggle as its field key.
            let key = scope
                .get("toggle")
                .filter(|v| !v.is_null())
                .or_else(|| scope.get("value"))
                .map(value_to_string)
                .unwrap_or_default();
            let state = RenderState::from_scope(&merged);
            self.core
                .invoke(r, &child, &key, &merged, &state, depth)
                .map_err(|e| RenderError::from_error("render-child", e))?
        } else if let Some(name) = child.strip_prefix("partials/") {
            let template = format!("partials/{}", name);
            if r.get_template(&template).is_some() {
                r.render(&template, &merged)?
            } else {
                r.render_template(&child, &merged)?
            }
        } else {
            // Unrecognized references are treated as literal template text.
            r.render_template(&child, &merged)?
        };
        out.write(&html)?;
        Ok(())
    }
}

/// `render-mixin` - looks up and re-invokes a nested macro by name from
/// within a child template. Unknown names render nothing.
pub struct RenderMixinHelper {
    core: Arc<MixinCore>,
}

impl HelperDef for RenderMixinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let Some(name) = resolve_param(h, ctx, rc, 0) else {
            return Ok(());
        };
        if !self.core.macros.contains_key(&name) {
            return Ok(());
        }
        let scope = current_scope(ctx, rc);
        let key = resolve_param(h, ctx, rc, 1)
            .or_else(|| {
                scope
                    .get("toggle")
                    .filter(|v| !v.is_null())
                    .map(value_to_string)
            })
            .unwrap_or_default();

        let root = ctx.data();
        let depth = depth_of(root) + 1;
        if depth > MAX_CHILD_DEPTH {
            return Err(RenderError::from_error(
                "render-mixin",
                MixinError::RecursionLimit(depth),
            ));
        }
        let state = RenderState::from_scope(root);
        let html = self
            .core
            .invoke(r, &name, &key, &scope, &state, depth)
            .map_err(|e| RenderError::from_error("render-mixin", e))?;
        out.write(&html)?;
        Ok(())
    }
}

/// `t` - translates literal text through the registry's bound translation
/// function, with the shared prefix applied.
pub struct TranslateHelper {
    core: Arc<MixinCore>,
}

impl HelperDef for TranslateHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        if let Some(key) = resolve_param(h, ctx, rc, 0) {
            out.write(&self.core.resolver().resolve(&key))?;
        }
        Ok(())
    }
}

/// One helper per installed macro name. Receives the literal placeholder
/// text as its sole argument and dispatches through the invocation protocol,
/// reading request state from the context root.
pub struct MixinHelper {
    name: String,
    core: Arc<MixinCore>,
}

impl HelperDef for MixinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let raw = h.param(0).map(|p| value_to_string(p.value())).unwrap_or_default();
        let scope = current_scope(ctx, rc);
        let state = RenderState::from_scope(ctx.data());
        let depth = depth_of(ctx.data());
        let html = self
            .core
            .invoke(r, &self.name, &raw, &scope, &state, depth)
            .map_err(|e| RenderError::from_error("mixin", e))?;
        out.write(&html)?;
        Ok(())
    }
}

pub(crate) fn register(handlebars: &mut Handlebars, core: Arc<MixinCore>) {
    handlebars.register_helper("error-class", Box::new(ErrorClassHelper));
    handlebars.register_helper(
        "render-child",
        Box::new(RenderChildHelper { core: Arc::clone(&core) }),
    );
    handlebars.register_helper(
        "render-mixin",
        Box::new(RenderMixinHelper { core: Arc::clone(&core) }),
    );
    handlebars.register_helper("t", Box::new(TranslateHelper { core: Arc::clone(&core) }));

    let names: Vec<String> = core.macros.keys().cloned().collect();
    for name in names {
        let helper = MixinHelper { name: name.clone(), core: Arc::clone(&core) };
        handlebars.register_helper(&name, Box::new(helper));
    }
}
