use async_trait::async_trait;
use renderer::{ImageBlob, RenderConfig};
use structures::{Attribute, GenerationStage, PixelChange};

use crate::{
    errors::{CommitError, SnapshotError, UploadError},
    service::{GeneratedSnapshot, SnapshotService},
};

const IMAGE_NAME: &str = "snapshot.png";
const METADATA_NAME: &str = "metadata.json";
const METADATA_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Content identifier assigned by the storage backend.
    pub cid: String,
    /// Where the content can be fetched from.
    pub url: String,
}

/// Content storage for snapshot images and their metadata documents.
#[async_trait]
pub trait ContentUploader: Send + Sync {
    async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, UploadError>;
}

/// Records a snapshot's metadata cid on chain, making it claimable.
#[async_trait]
pub trait SnapshotCommitter: Send + Sync {
    async fn commit(&self, snapshot_id: u64, metadata_cid: &str) -> Result<(), CommitError>;
}

/// The document minted as the collectible's token URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    pub name_prefix: String,
    /// Base of the per-snapshot page, e.g. `https://pixelcanvas.app`.
    pub external_url_base: Option<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            name_prefix: "PixelCanvas Snapshot".to_string(),
            external_url_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSnapshot {
    pub snapshot_id: u64,
    pub image: UploadReceipt,
    pub metadata: UploadReceipt,
}

/// Uploads generated snapshots and commits them, reporting on the service's status channel.
pub struct SnapshotPublisher<U, C> {
    uploader: U,
    committer: C,
    config: PublisherConfig,
}

impl<U: ContentUploader, C: SnapshotCommitter> SnapshotPublisher<U, C> {
    pub fn new(uploader: U, committer: C, config: PublisherConfig) -> Self {
        Self {
            uploader,
            committer,
            config,
        }
    }

    pub async fn generate_and_publish(
        &self,
        service: &SnapshotService,
        snapshot_id: u64,
        changes: &[PixelChange],
        render: &RenderConfig,
    ) -> Result<PublishedSnapshot, SnapshotError> {
        let snapshot = service.generate(snapshot_id, changes, render)?;
        self.publish(service, &snapshot).await
    }

    /// Uploads image and metadata, then commits. Failures are published and returned,
    /// never retried.
    pub async fn publish(
        &self,
        service: &SnapshotService,
        snapshot: &GeneratedSnapshot,
    ) -> Result<PublishedSnapshot, SnapshotError> {
        let snapshot_id = snapshot.metadata.id;

        match self.upload_and_commit(service, snapshot).await {
            Ok(published) => {
                service.publish(|status| {
                    status.status = GenerationStage::Completed;
                    status.progress = 100;
                    status.message = "Snapshot published and ready to claim".to_string();
                    status.snapshot_id = Some(snapshot_id);
                    status.ipfs_hash = Some(published.metadata.cid.clone());
                    status.error = None;
                });
                log::info!(
                    "snapshot {} published as {}",
                    snapshot_id,
                    published.metadata.cid
                );
                Ok(published)
            }
            Err(err) => {
                service.publish(|status| {
                    status.status = GenerationStage::Error;
                    status.message = format!("Snapshot publishing failed: {}", err);
                    status.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    async fn upload_and_commit(
        &self,
        service: &SnapshotService,
        snapshot: &GeneratedSnapshot,
    ) -> Result<PublishedSnapshot, SnapshotError> {
        let snapshot_id = snapshot.metadata.id;
        report(service, snapshot_id, 10, "Uploading snapshot image...");

        let image = self
            .uploader
            .upload(IMAGE_NAME, ImageBlob::CONTENT_TYPE, snapshot.image.bytes.clone())
            .await?;

        report(service, snapshot_id, 55, "Creating metadata...");
        let document = self.nft_metadata(snapshot, &image);
        let json = serde_json::to_vec_pretty(&document)?;

        report(service, snapshot_id, 65, "Uploading metadata...");
        let metadata = self
            .uploader
            .upload(METADATA_NAME, METADATA_CONTENT_TYPE, json)
            .await?;

        report(service, snapshot_id, 90, "Committing snapshot on chain...");
        self.committer.commit(snapshot_id, &metadata.cid).await?;

        Ok(PublishedSnapshot {
            snapshot_id,
            image,
            metadata,
        })
    }

    fn nft_metadata(&self, snapshot: &GeneratedSnapshot, image: &UploadReceipt) -> NftMetadata {
        let id = snapshot.metadata.id;

        NftMetadata {
            name: format!("{} #{}", self.config.name_prefix, id),
            description: snapshot.metadata.description.clone(),
            image: format!("ipfs://{}", image.cid),
            attributes: snapshot.metadata.attributes.clone(),
            external_url: self
                .config
                .external_url_base
                .as_ref()
                .map(|base| format!("{}/snapshot/{}", base.trim_end_matches('/'), id)),
        }
    }
}

fn report(service: &SnapshotService, snapshot_id: u64, progress: u8, message: &str) {
    service.publish(|status| {
        status.status = GenerationStage::Uploading;
        status.progress = progress;
        status.message = message.to_string();
        status.snapshot_id = Some(snapshot_id);
    });
}
