use labelpress_render_lopdf::RenderError;
use labelpress_traits::FontError;
use thiserror::Error;

/// Everything that can make an export fail outright.
///
/// Degraded results (missing fonts, skipped nodes, ...) are not errors; they
/// come back as warnings next to the output.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Font configuration error: {0}")]
    Font(#[from] FontError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not finalize output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Configuration error: {0}")]
    Config(String),
}
