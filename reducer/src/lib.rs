#[macro_use]
extern crate serde_derive;

mod errors;
mod export;
mod reconstruct;
mod stats;
mod validate;

pub use crate::errors::{ImportError, ValidationError};
pub use crate::export::{export_state, import_state, EXPORT_VERSION};
pub use crate::reconstruct::{differs, reconstruct, state_hash};
pub use crate::stats::{
    color_histogram, coverage, dominant_colors, participants, stats, CanvasStats, Contributor,
    Coverage,
};
pub use crate::validate::{validate, CanvasBounds, Validation};
