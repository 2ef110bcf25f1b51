use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("rendering unavailable: {0}")]
    RenderingUnavailable(String),
    #[error("image encoding failed: {0}")]
    EncodingFailed(String),
}
