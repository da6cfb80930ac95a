// ABOUTME: Command implementations for the formkit CLI
// ABOUTME: Renders page templates and validates schemas against the registry

use anyhow::{Context as _, Result};
use serde_json::{Map as JsonMap, Value as JsonValue};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::builders::RenderState;
use crate::registry::{MixinRegistry, RegistryConfig};
use crate::schema::FieldSchema;
use crate::translate::{IdentityTranslator, MapTranslator, Translator};

fn read_json(path: &Path) -> Result<JsonValue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_object(path: Option<&Path>) -> Result<JsonMap<String, JsonValue>> {
    match path {
        Some(path) => Ok(read_json(path)?.as_object().cloned().unwrap_or_default()),
        None => Ok(JsonMap::new()),
    }
}

fn load_fields(path: &Path) -> Result<FieldSchema> {
    let json = read_json(path)?;
    serde_json::from_value(json)
        .with_context(|| format!("Invalid field schema in {}", path.display()))
}

#[allow(clippy::too_many_arguments)]
pub fn render(
    fields_path: &Path,
    template_path: &Path,
    values: Option<&Path>,
    errors: Option<&Path>,
    views: Option<PathBuf>,
    translations: Option<&Path>,
    shared_key: String,
    base_url: Option<String>,
) -> Result<()> {
    let fields = load_fields(fields_path)?;
    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read {}", template_path.display()))?;

    let translator: Arc<dyn Translator> = match translations {
        Some(path) => Arc::new(MapTranslator::from_json(&read_json(path)?)),
        None => Arc::new(IdentityTranslator),
    };

    let config = RegistryConfig {
        views_directory: views,
        shared_translations_key: shared_key,
        translator,
        base_url,
        ..Default::default()
    };
    let registry = MixinRegistry::new(fields, config)?;

    let state = RenderState::new(read_object(values)?, read_object(errors)?);
    let output = registry.render_page(&template, &state, &JsonMap::new())?;
    println!("{}", output);
    Ok(())
}

pub fn check(fields_path: &Path, views: Option<PathBuf>) -> Result<()> {
    let fields = load_fields(fields_path)?;
    let field_count = fields.len();

    let config = RegistryConfig {
        views_directory: views,
        ..Default::default()
    };
    let registry = MixinRegistry::new(fields, config)?;

    let mut names = registry.names();
    names.sort_unstable();
    info!(
        "Schema valid: {} fields, {} mixins installed",
        field_count,
        names.len()
    );
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
