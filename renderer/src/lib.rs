mod color_table;
mod config;
mod errors;
mod metadata;
mod raster;

pub use crate::color_table::ColorTable;
pub use crate::config::{RenderConfig, PREVIEW_QUALITY};
pub use crate::errors::RenderError;
pub use crate::metadata::{build_metadata, build_metadata_at};
pub use crate::raster::{ImageBlob, PngRasterizer, Rasterizer, MAX_SIDE};
