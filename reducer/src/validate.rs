use structures::CanvasState;

use crate::errors::ValidationError;

/// Shape a canvas state is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasBounds {
    pub canvas_size: u32,
    pub palette_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<ValidationError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(state: &CanvasState, bounds: CanvasBounds) -> Validation {
    let mut errors = Vec::new();
    let size = bounds.canvas_size as usize;

    if state.grid.is_empty() {
        errors.push(ValidationError::EmptyGrid);
    } else if state.grid.len() != size {
        errors.push(ValidationError::RowCount {
            expected: size,
            actual: state.grid.len(),
        });
    }

    for (y, row) in state.grid.iter().enumerate() {
        if row.len() != size {
            errors.push(ValidationError::RowLength {
                row: y,
                expected: size,
                actual: row.len(),
            });
        }

        for (x, &color) in row.iter().enumerate() {
            if color as usize >= bounds.palette_size {
                errors.push(ValidationError::CellColor { x, y, color });
            }
        }
    }

    for change in &state.changes {
        if !change.is_within(bounds.canvas_size) {
            errors.push(ValidationError::ChangeOutOfBounds {
                x: change.x,
                y: change.y,
            });
        }
        if change.color as usize >= bounds.palette_size {
            errors.push(ValidationError::ChangeColor {
                x: change.x,
                y: change.y,
                color: change.color,
            });
        }
    }

    Validation { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconstruct;
    use structures::PixelChange;

    const BOUNDS: CanvasBounds = CanvasBounds {
        canvas_size: 4,
        palette_size: 8,
    };

    #[test]
    fn in_bounds_log_is_valid() {
        let changes: Vec<PixelChange> = (0..16u32)
            .map(|i| PixelChange::new("A", i % 4, i / 4, (i % 8) as u8, i as u64))
            .collect();

        let validation = validate(&reconstruct(&changes, 4), BOUNDS);

        assert!(validation.is_valid(), "{:?}", validation.errors);
    }

    #[test]
    fn blank_canvas_is_valid() {
        assert!(validate(&reconstruct(&[], 4), BOUNDS).is_valid());
    }

    #[test]
    fn ragged_row_is_reported() {
        let mut state = reconstruct(&[], 4);
        state.grid[2].pop();

        let validation = validate(&state, BOUNDS);

        assert_eq!(
            validation.errors,
            vec![ValidationError::RowLength {
                row: 2,
                expected: 4,
                actual: 3
            }]
        );
    }

    #[test]
    fn wrong_size_and_empty_grids_are_reported() {
        let smaller = reconstruct(&[], 3);
        let empty = CanvasState {
            grid: vec![],
            changes: vec![],
            last_update: 0,
        };

        assert!(validate(&smaller, BOUNDS)
            .errors
            .contains(&ValidationError::RowCount {
                expected: 4,
                actual: 3
            }));
        assert_eq!(
            validate(&empty, BOUNDS).errors,
            vec![ValidationError::EmptyGrid]
        );
    }

    #[test]
    fn colors_outside_palette_are_reported() {
        let state = reconstruct(&[PixelChange::new("A", 1, 2, 9, 1)], 4);

        let validation = validate(&state, BOUNDS);

        assert_eq!(
            validation.errors,
            vec![
                ValidationError::CellColor {
                    x: 1,
                    y: 2,
                    color: 9
                },
                ValidationError::ChangeColor {
                    x: 1,
                    y: 2,
                    color: 9
                },
            ]
        );
    }

    #[test]
    fn retained_out_of_bounds_change_is_reported() {
        let state = reconstruct(&[PixelChange::new("A", 4, 0, 1, 1)], 4);

        let validation = validate(&state, BOUNDS);

        assert_eq!(
            validation.errors,
            vec![ValidationError::ChangeOutOfBounds { x: 4, y: 0 }]
        );
        assert_eq!(
            validation.errors[0].to_string(),
            "change at (4,0) is outside the canvas"
        );
    }
}
