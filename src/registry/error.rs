// ABOUTME: Error types for registry construction and macro invocation
// ABOUTME: Distinguishes fatal construction errors from render-time failures

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixinError {
    #[error("Missing backing partial: {0}")]
    MissingPartial(String),

    #[error("Unknown mixin: {0}")]
    UnknownMixin(String),

    #[error("Child template recursion limit exceeded at depth {0}")]
    RecursionLimit(usize),

    #[error("Template compile error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MixinError>;

/// Recover a `MixinError` raised inside a helper from the Handlebars error
/// source chain, so callers see `RecursionLimit`/`UnknownMixin` rather than
/// an opaque render error.
pub(crate) fn unwrap_render_error(err: handlebars::RenderError) -> MixinError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(&err);
    let mut recovered = None;
    while let Some(current) = source {
        if let Some(mixin) = current.downcast_ref::<MixinError>() {
            recovered = match mixin {
                MixinError::RecursionLimit(depth) => Some(MixinError::RecursionLimit(*depth)),
                MixinError::UnknownMixin(name) => Some(MixinError::UnknownMixin(name.clone())),
                MixinError::MissingPartial(name) => Some(MixinError::MissingPartial(name.clone())),
                _ => None,
            };
            break;
        }
        source = current.source();
    }
    recovered.unwrap_or(MixinError::Render(err))
}
