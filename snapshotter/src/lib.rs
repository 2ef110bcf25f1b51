#[macro_use]
extern crate serde_derive;

mod config;
mod errors;
mod publisher;
mod service;
mod status_hub;

pub use crate::config::ServiceConfig;
pub use crate::errors::{CommitError, SnapshotError, UploadError};
pub use crate::publisher::{
    ContentUploader, NftMetadata, PublishedSnapshot, PublisherConfig, SnapshotCommitter,
    SnapshotPublisher, UploadReceipt,
};
pub use crate::service::{BatchFailure, BatchItem, BatchReport, GeneratedSnapshot, SnapshotService};
pub use crate::status_hub::{StatusCallback, Subscription};
