use thiserror::Error;
use verso_layout::LayoutError;
use verso_traits::FontError;

/// Every failure the book pipeline can report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Layout of '{title}' failed: {source}")]
    Chapter {
        title: String,
        #[source]
        source: LayoutError,
    },

    #[error("Font error: {0}")]
    Font(#[from] FontError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// The layout error underneath, whether or not it names a chapter.
    pub fn layout_error(&self) -> Option<&LayoutError> {
        match self {
            PipelineError::Layout(e) | PipelineError::Chapter { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
