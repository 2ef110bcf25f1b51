use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("canvas grid is empty")]
    EmptyGrid,
    #[error("canvas has {actual} rows, expected {expected}")]
    RowCount { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("pixel ({x},{y}) holds color {color} outside the palette")]
    CellColor { x: usize, y: usize, color: u8 },
    #[error("change at ({x},{y}) is outside the canvas")]
    ChangeOutOfBounds { x: u32, y: u32 },
    #[error("change at ({x},{y}) uses color {color} outside the palette")]
    ChangeColor { x: u32, y: u32, color: u8 },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not parse canvas state: {0}")]
    Malformed(#[from] serde_json::Error),
}
