use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reducer::{reconstruct, validate};
use renderer::{build_metadata, ImageBlob, PngRasterizer, Rasterizer, RenderConfig};
use structures::{
    CanvasState, GenerationStage, PaletteError, PixelChange, SnapshotGenerationStatus,
    SnapshotMetadata,
};

use crate::{
    config::ServiceConfig,
    errors::SnapshotError,
    status_hub::{StatusHub, Subscription},
};

/// Everything a successful run hands over to the uploader.
#[derive(Debug, Clone)]
pub struct GeneratedSnapshot {
    pub image: ImageBlob,
    pub metadata: SnapshotMetadata,
    pub canvas_state: CanvasState,
}

#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: u64,
    pub changes: Vec<PixelChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub snapshot_id: u64,
    pub error: String,
}

#[derive(Debug)]
pub struct BatchReport {
    pub snapshots: Vec<GeneratedSnapshot>,
    pub failures: Vec<BatchFailure>,
    pub total: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.snapshots.len()
    }
}

/// Held for the duration of a run; a second run on the same service is refused.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SnapshotError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| RunGuard(flag))
            .map_err(|_| SnapshotError::ConcurrencyViolation)
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Turns change logs into snapshot images and metadata, broadcasting progress.
///
/// One run at a time per instance. Status updates go to subscribers synchronously,
/// in subscription order, and a new subscriber is handed the current status at once.
pub struct SnapshotService {
    config: ServiceConfig,
    rasterizer: Box<dyn Rasterizer>,
    hub: Arc<StatusHub>,
    running: AtomicBool,
}

impl SnapshotService {
    pub fn new(config: ServiceConfig) -> Result<Self, PaletteError> {
        let rasterizer = PngRasterizer::new(&config.palette)?;
        Ok(Self::with_rasterizer(config, Box::new(rasterizer)))
    }

    pub fn with_rasterizer(config: ServiceConfig, rasterizer: Box<dyn Rasterizer>) -> Self {
        Self {
            config,
            rasterizer,
            hub: StatusHub::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> SnapshotGenerationStatus {
        self.hub.current()
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&SnapshotGenerationStatus) + Send + Sync + 'static,
    ) -> Subscription {
        self.hub.subscribe(Arc::new(callback))
    }

    /// Applies `update` to the current status and broadcasts it.
    ///
    /// Used by the upload phase to report on the same channel as generation.
    pub fn publish(&self, update: impl FnOnce(&mut SnapshotGenerationStatus)) {
        self.hub.update(update);
    }

    pub fn reset(&self) {
        self.hub.update(|status| *status = SnapshotGenerationStatus::idle());
    }

    pub fn generate(
        &self,
        snapshot_id: u64,
        changes: &[PixelChange],
        config: &RenderConfig,
    ) -> Result<GeneratedSnapshot, SnapshotError> {
        let _guard = RunGuard::acquire(&self.running)?;
        self.run(snapshot_id, |size| reconstruct(changes, size), config)
    }

    /// Like `generate`, starting from an already reconstructed (or imported) state.
    pub fn generate_from_state(
        &self,
        snapshot_id: u64,
        state: CanvasState,
        config: &RenderConfig,
    ) -> Result<GeneratedSnapshot, SnapshotError> {
        let _guard = RunGuard::acquire(&self.running)?;
        self.run(snapshot_id, move |_| state, config)
    }

    /// Generates each item in turn. A failing item is logged and skipped.
    pub fn batch_generate(
        &self,
        items: &[BatchItem],
        config: &RenderConfig,
    ) -> Result<BatchReport, SnapshotError> {
        if items.is_empty() {
            return Err(SnapshotError::EmptyBatch);
        }
        let _guard = RunGuard::acquire(&self.running)?;

        let total = items.len();
        let mut snapshots = Vec::new();
        let mut failures = Vec::new();

        for (i, item) in items.iter().enumerate() {
            self.hub.update(|status| {
                status.status = GenerationStage::Rendering;
                status.progress = (i * 100 / total) as u8;
                status.message = format!("Processing snapshot {}/{}...", i + 1, total);
                status.snapshot_id = Some(item.id);
            });

            match self.run(item.id, |size| reconstruct(&item.changes, size), config) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(err) => {
                    log::warn!("snapshot {} failed, skipping: {}", item.id, err);
                    failures.push(BatchFailure {
                        snapshot_id: item.id,
                        error: err.to_string(),
                    });
                }
            }
        }

        let succeeded = snapshots.len();
        self.hub.update(|status| {
            status.status = GenerationStage::Completed;
            status.progress = 100;
            status.message = format!(
                "Batch complete: generated {}/{} snapshots",
                succeeded, total
            );
            status.error = None;
        });
        log::info!("batch generated {}/{} snapshots", succeeded, total);

        Ok(BatchReport {
            snapshots,
            failures,
            total,
        })
    }

    /// Small grid-less render for quick looks. Publishes no status.
    pub fn preview(
        &self,
        changes: &[PixelChange],
        preview_size: u32,
    ) -> Result<ImageBlob, SnapshotError> {
        let state = reconstruct(changes, self.config.canvas_size);
        Ok(self.rasterizer.preview(&state, preview_size)?)
    }

    fn run(
        &self,
        snapshot_id: u64,
        source: impl FnOnce(u32) -> CanvasState,
        config: &RenderConfig,
    ) -> Result<GeneratedSnapshot, SnapshotError> {
        self.hub.update(|status| {
            *status = SnapshotGenerationStatus {
                status: GenerationStage::Calculating,
                progress: 10,
                message: "Calculating canvas state...".to_string(),
                snapshot_id: Some(snapshot_id),
                ipfs_hash: None,
                error: None,
            };
        });

        let result = self.produce(snapshot_id, source, config);

        match &result {
            Ok(snapshot) => log::info!(
                "snapshot {} generated from {} changes ({} bytes)",
                snapshot_id,
                snapshot.canvas_state.changes.len(),
                snapshot.image.len()
            ),
            Err(err) => {
                log::debug!("snapshot {} failed: {}", snapshot_id, err);
                self.hub.update(|status| {
                    status.status = GenerationStage::Error;
                    status.message = format!("Snapshot generation failed: {}", err);
                    status.error = Some(err.to_string());
                });
            }
        }

        result
    }

    fn produce(
        &self,
        snapshot_id: u64,
        source: impl FnOnce(u32) -> CanvasState,
        config: &RenderConfig,
    ) -> Result<GeneratedSnapshot, SnapshotError> {
        let canvas_state = source(self.config.canvas_size);

        let validation = validate(&canvas_state, self.config.bounds());
        if !validation.is_valid() {
            return Err(SnapshotError::Validation(validation.errors));
        }

        self.hub.update(|status| {
            status.status = GenerationStage::Rendering;
            status.progress = 40;
            status.message = "Rendering snapshot image and metadata...".to_string();
        });

        let image = self.rasterizer.render(&canvas_state, config)?;
        // the content id only exists once the uploader has run
        let metadata = build_metadata(snapshot_id, &canvas_state, "", &self.config.palette);

        self.hub.update(|status| {
            status.status = GenerationStage::Completed;
            status.progress = 100;
            status.message = "Snapshot generated".to_string();
        });

        Ok(GeneratedSnapshot {
            image,
            metadata,
            canvas_state,
        })
    }
}
