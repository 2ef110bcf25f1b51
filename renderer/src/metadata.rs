use chrono::{DateTime, Utc};
use reducer::{color_histogram, coverage, dominant_colors, participants};
use structures::{Attribute, CanvasState, Palette, SnapshotMetadata};

const DOMINANT_COLORS: usize = 3;

/// Summarizes `state` for snapshot `id`, stamped with the current time.
///
/// `content_ref` is the content identifier of the uploaded image; pass an empty
/// string while the image has not been uploaded yet.
pub fn build_metadata(
    id: u64,
    state: &CanvasState,
    content_ref: &str,
    palette: &Palette,
) -> SnapshotMetadata {
    build_metadata_at(id, state, content_ref, palette, Utc::now())
}

pub fn build_metadata_at(
    id: u64,
    state: &CanvasState,
    content_ref: &str,
    palette: &Palette,
    created_at: DateTime<Utc>,
) -> SnapshotMetadata {
    let artists = participants(&state.changes);
    let histogram = color_histogram(&state.grid);
    let dominant = dominant_colors(&histogram, DOMINANT_COLORS)
        .into_iter()
        .map(|index| palette.color_or_background(index))
        .collect::<Vec<_>>()
        .join(", ");
    let coverage = coverage(state);

    let size = state.canvas_size();
    let width = state.grid.first().map(Vec::len).unwrap_or(0);
    let total_changes = state.changes.len();

    let attributes = vec![
        Attribute::new("Snapshot ID", id),
        Attribute::new("Total Changes", total_changes),
        Attribute::new("Participants", artists.len()),
        Attribute::new("Pixel Coverage", coverage.label()),
        Attribute::new("Dominant Colors", dominant),
        Attribute::new("Canvas Size", format!("{}x{}", size, width)),
        Attribute::new("Creation Date", created_at.format("%Y-%m-%d").to_string()),
    ];

    SnapshotMetadata {
        id,
        timestamp: created_at.timestamp_millis(),
        total_changes,
        participant_count: artists.len(),
        description: format!(
            "PixelCanvas collaborative snapshot #{}, created by {} artists with {} pixel changes.",
            id,
            artists.len(),
            total_changes
        ),
        participants: artists,
        canvas_size: size,
        color_palette: palette.colors().to_vec(),
        image: (!content_ref.is_empty()).then(|| format!("ipfs://{}", content_ref)),
        attributes,
    }
}
