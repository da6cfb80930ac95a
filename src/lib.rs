// ABOUTME: Main library module for formkit
// ABOUTME: Exports the schema, translation, builder, registry, and helper modules

pub mod builders;
pub mod cli;
pub mod helpers;
pub mod registry;
pub mod schema;
pub mod translate;

// Re-export commonly used types
pub use builders::{MacroOptions, RenderState};
pub use registry::{
    BoundMixins, BuilderKind, MacroDef, MixinError, MixinRegistry, RegistryConfig,
    MAX_CHILD_DEPTH,
};
pub use schema::{Field, FieldLookup, FieldSchema};
pub use translate::{IdentityTranslator, MapTranslator, TranslationResolver, Translator};

// Error handling
pub type Result<T> = std::result::Result<T, MixinError>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
