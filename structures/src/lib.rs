#[macro_use]
extern crate serde_derive;

mod change_log;
mod metadata;
mod palette;
mod status;

pub use crate::change_log::{decode_changes, encode_changes};
pub use crate::metadata::{Attribute, AttributeValue, SnapshotMetadata};
pub use crate::palette::{Palette, PaletteError, BACKGROUND_INDEX};
pub use crate::status::{GenerationStage, SnapshotGenerationStatus};

/// One attributed edit of a single cell, as recorded in the chain log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PixelChange {
    pub artist: String,
    pub x: u32,
    pub y: u32,
    pub color: u8,
    pub timestamp: u64,
}

impl PixelChange {
    pub fn new(artist: impl Into<String>, x: u32, y: u32, color: u8, timestamp: u64) -> Self {
        Self {
            artist: artist.into(),
            x,
            y,
            color,
            timestamp,
        }
    }

    pub fn is_within(&self, canvas_size: u32) -> bool {
        self.x < canvas_size && self.y < canvas_size
    }
}

/// A grid rebuilt from a change log, together with the (sorted) log itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    /// Palette indices, addressed as `grid[y][x]`.
    pub grid: Vec<Vec<u8>>,
    pub changes: Vec<PixelChange>,
    pub last_update: u64,
}

impl CanvasState {
    pub fn canvas_size(&self) -> usize {
        self.grid.len()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.grid.get(y)?.get(x).copied()
    }

    pub fn cells(&self) -> impl Iterator<Item = u8> + '_ {
        self.grid.iter().flatten().copied()
    }
}
