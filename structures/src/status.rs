#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStage {
    Idle,
    Calculating,
    Rendering,
    Uploading,
    Completed,
    Error,
}

/// What subscribers of a snapshot service see after every step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotGenerationStatus {
    pub status: GenerationStage,
    /// 0 to 100.
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SnapshotGenerationStatus {
    pub fn idle() -> Self {
        Self {
            status: GenerationStage::Idle,
            progress: 0,
            message: "Ready".to_string(),
            snapshot_id: None,
            ipfs_hash: None,
            error: None,
        }
    }
}

impl Default for SnapshotGenerationStatus {
    fn default() -> Self {
        Self::idle()
    }
}
