use reducer::ValidationError;
use renderer::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("canvas state is invalid: {}", join(.0))]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error("could not serialize snapshot metadata: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("a snapshot run is already in progress on this service")]
    ConcurrencyViolation,
    #[error("batch contains no snapshots")]
    EmptyBatch,
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("upload of {name} failed: {reason}")]
    Failed { name: String, reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    #[error("not authorized to commit snapshot {0}")]
    Unauthorized(u64),
    #[error("commit of snapshot {snapshot_id} rejected: {reason}")]
    Rejected { snapshot_id: u64, reason: String },
}
