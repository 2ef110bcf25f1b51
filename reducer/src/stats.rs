use std::collections::{BTreeMap, HashMap, HashSet};

use structures::{CanvasState, PixelChange};

const TOP_CONTRIBUTORS: usize = 5;

/// Distinct artists in order of first appearance.
pub fn participants(changes: &[PixelChange]) -> Vec<String> {
    let mut seen = HashSet::new();

    changes
        .iter()
        .filter(|change| seen.insert(change.artist.as_str()))
        .map(|change| change.artist.clone())
        .collect()
}

/// Number of cells holding each palette index.
pub fn color_histogram(grid: &[Vec<u8>]) -> BTreeMap<u8, usize> {
    let mut histogram = BTreeMap::new();
    for &color in grid.iter().flatten() {
        *histogram.entry(color).or_insert(0) += 1;
    }
    histogram
}

/// The `count` most used indices; equal counts are ordered by palette index.
pub fn dominant_colors(histogram: &BTreeMap<u8, usize>, count: usize) -> Vec<u8> {
    // BTreeMap iterates by ascending index and sort_by is stable
    let mut entries: Vec<(u8, usize)> = histogram.iter().map(|(c, n)| (*c, *n)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    entries.into_iter().take(count).map(|(color, _)| color).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub changed: usize,
    pub total: usize,
}

impl Coverage {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.changed as f64 / self.total as f64
    }

    /// Percentage with one decimal place and a `%` suffix, e.g. `50.0%`.
    pub fn label(&self) -> String {
        format!("{:.1}%", self.ratio() * 100.0)
    }
}

/// Distinct in-bounds cells touched by at least one change.
pub fn coverage(state: &CanvasState) -> Coverage {
    let size = state.canvas_size();
    let changed = state
        .changes
        .iter()
        .filter(|change| change.is_within(size as u32))
        .map(|change| (change.x, change.y))
        .collect::<HashSet<_>>()
        .len();

    Coverage {
        changed,
        total: size * size,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub address: String,
    pub count: usize,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasStats {
    pub total_changes: usize,
    pub participant_count: usize,
    pub top_contributors: Vec<Contributor>,
    pub color_usage: BTreeMap<u8, usize>,
    pub pixel_coverage: Coverage,
    pub coverage_percentage: String,
}

pub fn stats(state: &CanvasState) -> CanvasStats {
    let artists = participants(&state.changes);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for change in &state.changes {
        *counts.entry(change.artist.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = artists
        .iter()
        .map(|artist| (artist.as_str(), counts[artist.as_str()]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total = state.changes.len();
    let top_contributors = ranked
        .into_iter()
        .take(TOP_CONTRIBUTORS)
        .map(|(address, count)| Contributor {
            address: address.to_string(),
            count,
            percentage: format!("{:.1}", count as f64 / total as f64 * 100.0),
        })
        .collect();

    let pixel_coverage = coverage(state);

    CanvasStats {
        total_changes: total,
        participant_count: artists.len(),
        top_contributors,
        color_usage: color_histogram(&state.grid),
        pixel_coverage,
        coverage_percentage: pixel_coverage.label(),
    }
}
