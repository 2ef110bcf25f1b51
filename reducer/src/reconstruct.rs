use structures::{CanvasState, PixelChange, BACKGROUND_INDEX};
use xxhash_rust::xxh3::xxh3_64;

/// Replays `changes` onto a blank `canvas_size` square grid.
///
/// Changes are applied in timestamp order. The sort is stable, so changes sharing a
/// timestamp keep their relative input order and the later one wins. Changes outside
/// the canvas are kept in the returned log but never touch the grid.
pub fn reconstruct(changes: &[PixelChange], canvas_size: u32) -> CanvasState {
    let size = canvas_size as usize;
    let mut grid = vec![vec![BACKGROUND_INDEX; size]; size];

    let mut sorted = changes.to_vec();
    sorted.sort_by_key(|change| change.timestamp);

    let mut skipped = 0;
    for change in &sorted {
        if !change.is_within(canvas_size) {
            skipped += 1;
            continue;
        }

        grid[change.y as usize][change.x as usize] = change.color;
    }

    if skipped > 0 {
        log::debug!(
            "skipped {} of {} changes outside the {}x{} canvas",
            skipped,
            sorted.len(),
            canvas_size,
            canvas_size
        );
    }

    let last_update = sorted.last().map(|change| change.timestamp).unwrap_or(0);

    CanvasState {
        grid,
        changes: sorted,
        last_update,
    }
}

/// True when the two states hold a different number of changes or any cell differs.
pub fn differs(a: &CanvasState, b: &CanvasState) -> bool {
    if a.changes.len() != b.changes.len() || a.grid.len() != b.grid.len() {
        return true;
    }

    a.grid.iter().zip(&b.grid).any(|(row_a, row_b)| row_a != row_b)
}

/// Short stable digest of the grid and change count, usable as a cache key.
pub fn state_hash(state: &CanvasState) -> String {
    let mut bytes: Vec<u8> = Vec::with_capacity(state.canvas_size() * state.canvas_size() + 16);
    for row in &state.grid {
        bytes.extend_from_slice(&(row.len() as u32).to_le_bytes());
        bytes.extend_from_slice(row);
    }
    bytes.extend_from_slice(&(state.changes.len() as u64).to_le_bytes());

    format!("{:016x}", xxh3_64(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    fn change(artist: &str, x: u32, y: u32, color: u8, timestamp: u64) -> PixelChange {
        PixelChange::new(artist, x, y, color, timestamp)
    }

    #[test]
    fn last_change_per_cell_wins() {
        let changes = vec![
            change("A", 0, 0, 1, 1),
            change("B", 0, 0, 2, 2),
            change("A", 1, 1, 3, 3),
        ];

        let state = reconstruct(&changes, 2);

        assert_eq!(state.grid, vec![vec![2, 0], vec![0, 3]]);
        assert_eq!(state.last_update, 3);
    }

    #[test]
    fn applies_changes_by_timestamp_not_input_order() {
        let changes = vec![change("B", 0, 0, 2, 20), change("A", 0, 0, 1, 10)];

        let state = reconstruct(&changes, 4);

        assert_eq!(state.get(0, 0), Some(2));
        assert_eq!(state.changes[0].timestamp, 10);
        assert_eq!(state.changes[1].timestamp, 20);
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let changes = vec![change("A", 2, 1, 4, 5), change("B", 2, 1, 6, 5)];

        let state = reconstruct(&changes, 4);

        assert_eq!(state.get(2, 1), Some(6));
        assert_eq!(state.changes[0].artist, "A");
    }

    #[test]
    fn out_of_range_changes_are_skipped_but_retained() {
        let changes = vec![
            change("A", 1, 1, 3, 1),
            change("B", 4, 0, 5, 2),
            change("C", 0, 4, 5, 3),
        ];

        let state = reconstruct(&changes, 4);

        assert_eq!(state.changes.len(), 3);
        assert_eq!(state.get(1, 1), Some(3));
        assert_eq!(state.cells().filter(|c| *c != 0).count(), 1);
        assert_eq!(state.last_update, 3);
    }

    #[test]
    fn empty_log_gives_blank_canvas() {
        let state = reconstruct(&[], 16);

        assert_eq!(state.canvas_size(), 16);
        assert!(state.grid.iter().all(|row| row.len() == 16));
        assert!(state.cells().all(|c| c == 0));
        assert_eq!(state.last_update, 0);
    }

    #[test]
    fn input_is_not_mutated() {
        let changes = vec![change("B", 0, 0, 2, 20), change("A", 0, 0, 1, 10)];
        let before = changes.clone();

        reconstruct(&changes, 4);

        assert_eq!(changes, before);
    }

    #[test]
    fn shuffled_input_gives_identical_grid() {
        // distinct timestamps, so any permutation must land on the same grid
        let changes: Vec<PixelChange> = (0..200u64)
            .map(|i| change("A", (i * 7 % 16) as u32, (i * 3 % 16) as u32, (i % 8) as u8, i))
            .collect();
        let reference = reconstruct(&changes, 16);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let mut shuffled = changes.clone();
            shuffled.shuffle(&mut rng);

            let state = reconstruct(&shuffled, 16);

            assert_eq!(state.grid, reference.grid);
            assert!(!differs(&state, &reference));
        }
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let changes = vec![change("A", 3, 3, 1, 1), change("B", 5, 2, 6, 2)];

        assert!(!differs(&reconstruct(&changes, 8), &reconstruct(&changes, 8)));
    }

    #[test]
    fn differs_on_cell_or_change_count() {
        let base = reconstruct(&[change("A", 0, 0, 1, 1)], 4);
        let other_cell = reconstruct(&[change("A", 0, 0, 2, 1)], 4);
        let more_changes = reconstruct(&[change("A", 0, 0, 1, 1), change("A", 0, 0, 1, 2)], 4);

        assert!(differs(&base, &other_cell));
        assert!(differs(&base, &more_changes));
    }

    #[test]
    fn hash_follows_grid_and_change_count() {
        let a = reconstruct(&[change("A", 0, 0, 1, 1)], 4);
        let b = reconstruct(&[change("Z", 0, 0, 1, 9)], 4);
        let c = reconstruct(&[change("A", 0, 0, 2, 1)], 4);

        assert_eq!(state_hash(&a).len(), 16);
        assert_eq!(state_hash(&a), state_hash(&b));
        assert_ne!(state_hash(&a), state_hash(&c));
    }
}
