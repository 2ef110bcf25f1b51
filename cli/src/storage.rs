use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use async_trait::async_trait;
use snapshotter::{CommitError, ContentUploader, SnapshotCommitter, UploadError, UploadReceipt};
use xxhash_rust::xxh3::xxh3_64;

/// Stores uploads as files named after the digest of their content.
pub struct DirectoryUploader {
    dir: PathBuf,
}

impl DirectoryUploader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ContentUploader for DirectoryUploader {
    async fn upload(
        &self,
        name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt, UploadError> {
        let cid = format!("{:016x}", xxh3_64(&bytes));
        let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");
        let path = self.dir.join(format!("{}.{}", cid, extension));

        fs::create_dir_all(&self.dir).map_err(|err| {
            UploadError::Unavailable(format!("{}: {}", self.dir.display(), err))
        })?;
        fs::write(&path, &bytes).map_err(|err| UploadError::Failed {
                name: name.to_string(),
                reason: err.to_string(),
            })?;

        log::debug!("stored {} ({} bytes) at {}", name, bytes.len(), path.display());

        Ok(UploadReceipt {
            cid,
            url: path.display().to_string(),
        })
    }
}

/// Appends `snapshot_id,metadata_cid` rows to a CSV manifest.
pub struct ManifestCommitter {
    path: PathBuf,
}

impl ManifestCommitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotCommitter for ManifestCommitter {
    async fn commit(&self, snapshot_id: u64, metadata_cid: &str) -> Result<(), CommitError> {
        let rejected = |reason: String| CommitError::Rejected {
            snapshot_id,
            reason,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| rejected(err.to_string()))?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record([snapshot_id.to_string().as_str(), metadata_cid])
            .and_then(|_| writer.flush().map_err(csv::Error::from))
            .map_err(|err| rejected(err.to_string()))?;

        Ok(())
    }
}
