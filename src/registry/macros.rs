// ABOUTME: Built-in macro table mapping macro names to partials and builders
// ABOUTME: Carries static or dynamic option overrides per macro

use serde_json::json;

use crate::builders::MacroOptions;

/// Which view-model builder a macro dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Text,
    OptionGroup,
    Checkbox,
}

/// Options supplied to a macro's builder: fixed at registration, or computed
/// per invocation from the resolved field key.
#[derive(Clone)]
pub enum OptionsSource {
    Static(MacroOptions),
    Dynamic(fn(&str) -> MacroOptions),
}

impl OptionsSource {
    pub fn resolve(&self, key: &str) -> MacroOptions {
        match self {
            OptionsSource::Static(opts) => opts.clone(),
            OptionsSource::Dynamic(build) => build(key),
        }
    }
}

/// How a macro is rendered. Most macros map a field key to one backing
/// partial; submit and compound date have their own handlers.
#[derive(Clone)]
pub enum MacroKind {
    Field {
        partial: String,
        builder: BuilderKind,
        options: OptionsSource,
    },
    Submit,
    Date,
}

#[derive(Clone)]
pub struct MacroDef {
    pub name: String,
    pub kind: MacroKind,
}

impl MacroDef {
    pub fn field(name: &str, partial: &str, builder: BuilderKind, options: MacroOptions) -> Self {
        Self {
            name: name.to_string(),
            kind: MacroKind::Field {
                partial: partial.to_string(),
                builder,
                options: OptionsSource::Static(options),
            },
        }
    }

    pub fn dynamic(
        name: &str,
        partial: &str,
        builder: BuilderKind,
        options: fn(&str) -> MacroOptions,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind: MacroKind::Field {
                partial: partial.to_string(),
                builder,
                options: OptionsSource::Dynamic(options),
            },
        }
    }

    /// Partial ids this macro renders, for construction-time resolution.
    pub fn partial_ids(&self) -> Vec<&str> {
        match &self.kind {
            MacroKind::Field { partial, .. } => vec![partial.as_str()],
            MacroKind::Submit => vec!["input-submit"],
            MacroKind::Date => vec!["input-text"],
        }
    }
}

fn static_opts(value: serde_json::Value) -> MacroOptions {
    serde_json::from_value(value).unwrap_or_default()
}

/// The standard macro surface installed into every registry.
pub fn builtin_macros() -> Vec<MacroDef> {
    vec![
        MacroDef::field("input-text", "input-text", BuilderKind::Text, MacroOptions::default()),
        MacroDef::field(
            "input-text-compound",
            "input-text",
            BuilderKind::Text,
            static_opts(json!({"className": "form-group-compound"})),
        ),
        MacroDef::field(
            "input-text-code",
            "input-text",
            BuilderKind::Text,
            static_opts(json!({"className": "input-code"})),
        ),
        MacroDef::field(
            "input-number",
            "input-text",
            BuilderKind::Text,
            static_opts(json!({"pattern": "[0-9]*"})),
        ),
        MacroDef::field(
            "input-phone",
            "input-text",
            BuilderKind::Text,
            static_opts(json!({"type": "tel", "maxlength": 18})),
        ),
        MacroDef::field("textarea", "textarea", BuilderKind::Text, MacroOptions::default()),
        MacroDef::field(
            "radio-group",
            "radio-group",
            BuilderKind::OptionGroup,
            MacroOptions::default(),
        ),
        MacroDef::field("select", "select", BuilderKind::OptionGroup, MacroOptions::default()),
        MacroDef::field("checkbox", "checkbox", BuilderKind::Checkbox, MacroOptions::default()),
        MacroDef::field(
            "checkbox-compound",
            "checkbox",
            BuilderKind::Checkbox,
            static_opts(json!({"className": "checkbox-compound"})),
        ),
        MacroDef::field(
            "checkbox-required",
            "checkbox",
            BuilderKind::Checkbox,
            static_opts(json!({"required": true})),
        ),
        MacroDef {
            name: "input-submit".to_string(),
            kind: MacroKind::Submit,
        },
        MacroDef {
            name: "input-date".to_string(),
            kind: MacroKind::Date,
        },
    ]
}

/// Built-in partial sources shipped with the crate, used when neither an
/// inline source nor a views-directory file provides one.
pub fn builtin_partial(id: &str) -> Option<&'static str> {
    match id {
        "input-text" => Some(include_str!("../../templates/partials/input-text.html")),
        "textarea" => Some(include_str!("../../templates/partials/textarea.html")),
        "radio-group" => Some(include_str!("../../templates/partials/radio-group.html")),
        "select" => Some(include_str!("../../templates/partials/select.html")),
        "checkbox" => Some(include_str!("../../templates/partials/checkbox.html")),
        "input-submit" => Some(include_str!("../../templates/partials/input-submit.html")),
        _ => None,
    }
}

/// Registered template name for a partial id.
pub fn partial_name(id: &str) -> String {
    format!("partials/{}", id)
}
