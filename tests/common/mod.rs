// ABOUTME: Shared fixtures for formkit integration tests
// ABOUTME: Builds a representative field schema, translations, and registry

use std::sync::Arc;

use formkit::{MapTranslator, MixinRegistry, RegistryConfig, RenderState};
use serde_json::json;

pub fn fields() -> formkit::FieldSchema {
    serde_json::from_value(json!({
        "name": {
            "validate": ["required", {"type": "maxlength", "arguments": [30]}]
        },
        "phone": {
            "validate": [{"type": "maxlength", "arguments": 20}]
        },
        "contact": {
            "validate": ["required"],
            "options": [
                "email",
                {"value": "phone", "label": "fields.contact.options.phone"},
                {
                    "value": "other",
                    "toggle": "contact-detail",
                    "child": "partials/input-text"
                }
            ]
        },
        "contact-detail": {},
        "extras": {
            "options": [
                {"value": "more", "toggle": "contact-detail", "child": "input-text"}
            ]
        },
        "loop": {
            "options": [
                {"value": "again", "toggle": "loop", "child": "radio-group"}
            ]
        },
        "declaration": {
            "validate": ["required"]
        },
        "dob": {},
        "arrival": {
            "inexact": true
        }
    }))
    .unwrap()
}

pub fn translator() -> MapTranslator {
    MapTranslator::from_json(&json!({
        "fields.name.label": "Full name",
        "fields.name.hint": "As shown on your passport",
        "fields.contact.legend": "How should we contact you?",
        "fields.contact.options.phone": "By telephone",
        "fields.contact-detail.label": "Contact details",
        "fields.declaration.label": "I agree",
        "fields.dob.hint": "For example, 31 3 1980",
        "buttons.next": "Continue",
        "buttons.send": "Send application"
    }))
}

pub fn registry() -> MixinRegistry {
    let config = RegistryConfig {
        translator: Arc::new(translator()),
        ..Default::default()
    };
    MixinRegistry::new(fields(), config).unwrap()
}

pub fn state(values: serde_json::Value, errors: serde_json::Value) -> RenderState {
    RenderState::new(
        values.as_object().cloned().unwrap_or_default(),
        errors.as_object().cloned().unwrap_or_default(),
    )
}
