// ABOUTME: Mixin registry construction and partial resolution
// ABOUTME: Builds an immutable Handlebars engine plus macro table shared across requests

pub mod error;
pub mod invoke;
pub mod macros;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use handlebars::Handlebars;
use tracing::debug;

use crate::builders::RenderState;
use crate::helpers;
use crate::schema::FieldSchema;
use crate::translate::{IdentityTranslator, TranslationResolver, Translator};

pub use error::{MixinError, Result};
pub use invoke::{BoundMixins, MAX_CHILD_DEPTH};
pub use macros::{builtin_macros, BuilderKind, MacroDef, MacroKind, OptionsSource};

use macros::{builtin_partial, partial_name};

/// Construction-time configuration for a [`MixinRegistry`].
#[derive(Clone)]
pub struct RegistryConfig {
    /// Base path for partial lookup; partials live at
    /// `<views_directory>/partials/<id>.<view_engine>`.
    pub views_directory: Option<PathBuf>,
    /// File extension tag for partial files.
    pub view_engine: String,
    /// Prefix prepended to every translation lookup.
    pub shared_translations_key: String,
    /// Translation function bound to every builder and the `t` helper.
    pub translator: Arc<dyn Translator>,
    /// Inline partial sources, keyed by partial id. These win over files and
    /// built-in defaults.
    pub partials: HashMap<String, String>,
    /// Base path the `url` helper resolves relative links against.
    pub base_url: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            views_directory: None,
            view_engine: "html".to_string(),
            shared_translations_key: String::new(),
            translator: Arc::new(IdentityTranslator),
            partials: HashMap::new(),
            base_url: None,
        }
    }
}

/// Immutable shared state behind the registry: schema, macro table, and
/// translation configuration. Helpers hold an `Arc` to this so recursive
/// invocations can dispatch without touching the engine's registration.
pub(crate) struct MixinCore {
    pub fields: FieldSchema,
    pub macros: HashMap<String, MacroDef>,
    pub shared_translations_key: String,
    pub translator: Arc<dyn Translator>,
    pub base_url: Option<String>,
}

impl MixinCore {
    pub fn resolver(&self) -> TranslationResolver<'_> {
        TranslationResolver::new(self.translator.as_ref(), &self.shared_translations_key)
    }
}

/// Process-wide registry of template mixins: one compiled Handlebars engine
/// with all backing partials and helpers registered, reused across requests
/// without per-request mutation.
pub struct MixinRegistry {
    engine: Handlebars<'static>,
    core: Arc<MixinCore>,
}

impl std::fmt::Debug for MixinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.core.macros.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("MixinRegistry")
            .field("macros", &names)
            .field("shared_translations_key", &self.core.shared_translations_key)
            .field("base_url", &self.core.base_url)
            .finish_non_exhaustive()
    }
}

impl MixinRegistry {
    /// Build a registry over the standard macro surface. Fails with
    /// [`MixinError::MissingPartial`] if any macro's backing partial cannot
    /// be resolved.
    pub fn new(fields: FieldSchema, config: RegistryConfig) -> Result<Self> {
        Self::with_macros(fields, config, Vec::new())
    }

    /// Build a registry with additional or replacement macro definitions.
    /// Extra definitions override built-ins of the same name.
    pub fn with_macros(
        fields: FieldSchema,
        config: RegistryConfig,
        extra: Vec<MacroDef>,
    ) -> Result<Self> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(false);

        let mut table: HashMap<String, MacroDef> = HashMap::new();
        for def in builtin_macros().into_iter().chain(extra) {
            table.insert(def.name.clone(), def);
        }

        for def in table.values() {
            for id in def.partial_ids() {
                let name = partial_name(id);
                if engine.get_template(&name).is_some() {
                    continue;
                }
                let source = resolve_partial_source(id, &config)?;
                engine.register_template_string(&name, source)?;
                debug!(partial = %name, "registered backing partial");
            }
        }

        let core = Arc::new(MixinCore {
            fields,
            macros: table,
            shared_translations_key: config.shared_translations_key,
            translator: config.translator,
            base_url: config.base_url,
        });

        helpers::register_helpers(&mut engine);
        helpers::register_mixin_helpers(&mut engine, Arc::clone(&core));

        debug!(macros = core.macros.len(), "mixin registry constructed");
        Ok(Self { engine, core })
    }

    /// Bind the registry to request-scoped state. The returned handle borrows
    /// the registry; the registry itself is never mutated per request.
    pub fn bind<'a>(&'a self, state: &'a RenderState) -> BoundMixins<'a> {
        BoundMixins::new(self, state)
    }

    /// Render a host page template. The render context root carries the
    /// request's `values`/`errors` maps so macro helpers invoked from the
    /// page can reach them.
    pub fn render_page(
        &self,
        template: &str,
        state: &RenderState,
        extra: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String> {
        let mut root = serde_json::Map::new();
        root.insert("values".into(), serde_json::Value::Object(state.values.clone()));
        root.insert("errors".into(), serde_json::Value::Object(state.errors.clone()));
        root.insert("__depth".into(), serde_json::json!(0));
        if let Some(base_url) = &self.core.base_url {
            root.insert("baseUrl".into(), serde_json::json!(base_url));
        }
        for (key, value) in extra {
            root.insert(key.clone(), value.clone());
        }
        self.engine
            .render_template(template, &serde_json::Value::Object(root))
            .map_err(error::unwrap_render_error)
    }

    /// Installed macro names.
    pub fn names(&self) -> Vec<&str> {
        self.core.macros.keys().map(String::as_str).collect()
    }

    pub fn engine(&self) -> &Handlebars<'static> {
        &self.engine
    }

    pub(crate) fn core(&self) -> &Arc<MixinCore> {
        &self.core
    }
}

fn resolve_partial_source(id: &str, config: &RegistryConfig) -> Result<String> {
    if let Some(source) = config.partials.get(id) {
        return Ok(source.clone());
    }
    if let Some(dir) = &config.views_directory {
        let path = dir
            .join("partials")
            .join(format!("{}.{}", id, config.view_engine));
        if path.exists() {
            return Ok(std::fs::read_to_string(&path)?);
        }
    }
    builtin_partial(id)
        .map(str::to_string)
        .ok_or_else(|| MixinError::MissingPartial(id.to_string()))
}
