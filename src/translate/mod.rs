// ABOUTME: Translation lookup with shared-prefix handling and fallback rules
// ABOUTME: Provides hard and soft resolution plus translation-key synthesis

use std::collections::HashMap;

use crate::schema::FieldSchema;

/// Supplier of translated strings. `None` signals "no translation
/// registered"; callers decide whether to fall back to the key (hard) or to
/// nothing (soft).
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> Option<String>;
}

/// Translator with no registered strings; hard lookups fall back to the key.
#[derive(Debug, Clone, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Translator backed by a flat key-to-string map.
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    entries: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Build from a JSON object of string values; non-string values are
    /// ignored.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let entries = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Resolves translation keys against a [`Translator`], prepending a shared
/// prefix to every lookup.
pub struct TranslationResolver<'a> {
    translator: &'a dyn Translator,
    prefix: String,
}

impl<'a> TranslationResolver<'a> {
    /// The shared key is auto-terminated with `.` when it lacks one.
    pub fn new(translator: &'a dyn Translator, shared_key: &str) -> Self {
        let mut prefix = shared_key.to_string();
        if !prefix.is_empty() && !prefix.ends_with('.') {
            prefix.push('.');
        }
        Self { translator, prefix }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Hard lookup: always returns a string, falling back to the prefixed
    /// key itself when no translation is registered.
    pub fn resolve(&self, key: &str) -> String {
        let full = self.prefixed(key);
        self.translator.translate(&full).unwrap_or(full)
    }

    /// Soft lookup: `None` when the translated string is identical to the
    /// looked-up key, signalling "no translation found".
    pub fn resolve_soft(&self, key: &str) -> Option<String> {
        let full = self.prefixed(key);
        match self.translator.translate(&full) {
            Some(translated) if translated != full => Some(translated),
            _ => None,
        }
    }
}

/// Translation-key precedence for a field property: an explicit override on
/// the field schema wins, else the conventional `fields.<key>.<property>`
/// key is synthesized. The rest of the system relies on this convention.
pub fn translation_key(fields: &FieldSchema, field_key: &str, property: &str) -> String {
    let explicit = fields.get(field_key).and_then(|field| match property {
        "label" => field.label.clone(),
        "hint" => field.hint.clone(),
        "legend" => field.legend.clone(),
        _ => None,
    });
    explicit.unwrap_or_else(|| format!("fields.{}.{}", field_key, property))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn translator() -> MapTranslator {
        MapTranslator::from_json(&json!({
            "app.fields.name.label": "Full name",
            "app.custom.hint": "Custom hint text",
            "app.echo": "app.echo"
        }))
    }

    #[test]
    fn test_hard_resolve_falls_back_to_key() {
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "app");
        assert_eq!(resolver.resolve("fields.name.label"), "Full name");
        assert_eq!(resolver.resolve("fields.missing.label"), "app.fields.missing.label");
    }

    #[test]
    fn test_soft_resolve_null_on_identity() {
        let translator = translator();
        let resolver = TranslationResolver::new(&translator, "app");
        assert_eq!(
            resolver.resolve_soft("custom.hint"),
            Some("Custom hint text".to_string())
        );
        // Registered but identical to the key: still treated as absent.
        assert_eq!(resolver.resolve_soft("echo"), None);
        assert_eq!(resolver.resolve_soft("fields.missing.hint"), None);
    }

    #[test]
    fn test_prefix_separator_added_once() {
        let translator = translator();
        let with_dot = TranslationResolver::new(&translator, "app.");
        let without = TranslationResolver::new(&translator, "app");
        assert_eq!(with_dot.resolve("fields.name.label"), "Full name");
        assert_eq!(without.resolve("fields.name.label"), "Full name");

        let empty = TranslationResolver::new(&translator, "");
        assert_eq!(empty.resolve("anything"), "anything");
    }

    #[test]
    fn test_translation_key_precedence() {
        let fields: FieldSchema = serde_json::from_value(json!({
            "name": {"label": "labels.special.name"}
        }))
        .unwrap();

        assert_eq!(translation_key(&fields, "name", "label"), "labels.special.name");
        assert_eq!(translation_key(&fields, "name", "hint"), "fields.name.hint");
        assert_eq!(translation_key(&fields, "absent", "label"), "fields.absent.label");
    }
}
