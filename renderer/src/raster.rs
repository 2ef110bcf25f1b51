use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use structures::{CanvasState, Palette, PaletteError, BACKGROUND_INDEX};

use crate::{color_table::ColorTable, config::RenderConfig, errors::RenderError};

/// Largest raster side we are willing to allocate.
pub const MAX_SIDE: u32 = 16_384;

const GRID_COLOR: Rgba<u8> = Rgba([0xe5, 0xe7, 0xeb, 0xff]);

/// An encoded snapshot image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageBlob {
    pub const CONTENT_TYPE: &'static str = "image/png";

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub trait Rasterizer: Send + Sync {
    fn render(&self, state: &CanvasState, config: &RenderConfig) -> Result<ImageBlob, RenderError>;

    /// Cheap grid-less render whose side is at most `preview_size` pixels.
    fn preview(&self, state: &CanvasState, preview_size: u32) -> Result<ImageBlob, RenderError> {
        let config = RenderConfig::preview(preview_size, state.canvas_size() as u32);
        self.render(state, &config)
    }
}

pub struct PngRasterizer {
    colors: ColorTable,
}

impl PngRasterizer {
    pub fn new(palette: &Palette) -> Result<Self, PaletteError> {
        Ok(Self {
            colors: ColorTable::from_palette(palette)?,
        })
    }

    pub fn rasterize(
        &self,
        state: &CanvasState,
        config: &RenderConfig,
    ) -> Result<RgbaImage, RenderError> {
        let canvas_size = state.canvas_size() as u32;
        let side = canvas_size
            .checked_mul(config.pixel_size)
            .filter(|side| *side > 0 && *side <= MAX_SIDE)
            .ok_or_else(|| {
                RenderError::RenderingUnavailable(format!(
                    "cannot allocate a raster for {} cells of {}px",
                    canvas_size, config.pixel_size
                ))
            })?;

        let mut image = if config.is_opaque() {
            RgbaImage::from_pixel(side, side, self.colors.background())
        } else {
            RgbaImage::new(side, side)
        };

        for (y, row) in state.grid.iter().enumerate() {
            // rows longer than the canvas would fall off the raster
            for (x, &color) in row.iter().enumerate().take(canvas_size as usize) {
                // background is either already filled or meant to stay transparent
                if color == BACKGROUND_INDEX {
                    continue;
                }

                fill_block(
                    &mut image,
                    x as u32 * config.pixel_size,
                    y as u32 * config.pixel_size,
                    config.pixel_size,
                    self.colors.get(color),
                );
            }
        }

        if config.include_grid {
            draw_grid(&mut image, canvas_size, config.pixel_size);
        }

        Ok(image)
    }
}

impl Rasterizer for PngRasterizer {
    fn render(&self, state: &CanvasState, config: &RenderConfig) -> Result<ImageBlob, RenderError> {
        let image = self.rasterize(state, config)?;
        let bytes = encode_png(&image, config.quality)?;

        log::debug!(
            "rendered {}x{} snapshot into {} bytes",
            image.width(),
            image.height(),
            bytes.len()
        );

        Ok(ImageBlob {
            bytes,
            width: image.width(),
            height: image.height(),
        })
    }
}

fn fill_block(image: &mut RgbaImage, left: u32, top: u32, size: u32, color: Rgba<u8>) {
    for y in top..top + size {
        for x in left..left + size {
            image.put_pixel(x, y, color);
        }
    }
}

/// Strokes `canvas_size + 1` lines each way. Line `i` sits on pixel `i * pixel_size`,
/// with the closing line moved onto the last pixel.
fn draw_grid(image: &mut RgbaImage, canvas_size: u32, pixel_size: u32) {
    let last = image.width() - 1;

    for i in 0..=canvas_size {
        let offset = (i * pixel_size).min(last);

        for along in 0..=last {
            image.put_pixel(offset, along, GRID_COLOR);
            image.put_pixel(along, offset, GRID_COLOR);
        }
    }
}

fn compression_for(quality: f32) -> CompressionType {
    if quality >= 0.9 {
        CompressionType::Best
    } else if quality >= 0.5 {
        CompressionType::Default
    } else {
        CompressionType::Fast
    }
}

fn encode_png(image: &RgbaImage, quality: f32) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();

    PngEncoder::new_with_quality(&mut bytes, compression_for(quality), FilterType::Adaptive)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .map_err(|err| RenderError::EncodingFailed(err.to_string()))?;

    if bytes.is_empty() {
        return Err(RenderError::EncodingFailed(
            "encoder produced no data".to_string(),
        ));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reducer::reconstruct;
    use structures::PixelChange;

    fn rasterizer() -> PngRasterizer {
        PngRasterizer::new(&Palette::default()).unwrap()
    }

    fn decode(blob: &ImageBlob) -> RgbaImage {
        image::load_from_memory(&blob.bytes).unwrap().to_rgba8()
    }

    fn sample_state() -> CanvasState {
        reconstruct(
            &[
                PixelChange::new("A", 0, 0, 1, 1),
                PixelChange::new("B", 2, 1, 2, 2),
                PixelChange::new("C", 3, 3, 7, 3),
                PixelChange::new("A", 1, 2, 4, 4),
            ],
            4,
        )
    }

    fn assert_block_centers_match(image: &RgbaImage, state: &CanvasState, pixel_size: u32) {
        let table = ColorTable::from_palette(&Palette::default()).unwrap();

        for (y, row) in state.grid.iter().enumerate() {
            for (x, &color) in row.iter().enumerate() {
                let center_x = x as u32 * pixel_size + pixel_size / 2;
                let center_y = y as u32 * pixel_size + pixel_size / 2;

                assert_eq!(
                    image.get_pixel(center_x, center_y),
                    &table.get(color),
                    "cell ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn decoded_render_matches_grid_without_overlay() {
        env_logger::try_init().ok();
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 8,
            include_grid: false,
            ..RenderConfig::default()
        };

        let blob = rasterizer().render(&state, &config).unwrap();
        let image = decode(&blob);

        assert_eq!((blob.width, blob.height), (32, 32));
        assert_eq!(image.dimensions(), (32, 32));
        assert_block_centers_match(&image, &state, 8);
    }

    #[test]
    fn decoded_render_matches_grid_with_overlay() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 8,
            ..RenderConfig::default()
        };

        let image = decode(&rasterizer().render(&state, &config).unwrap());

        assert_block_centers_match(&image, &state, 8);
    }

    #[test]
    fn grid_lines_cover_cell_edges() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 8,
            ..RenderConfig::default()
        };

        let image = rasterizer().rasterize(&state, &config).unwrap();

        for i in 0..4 {
            assert_eq!(image.get_pixel(i * 8, 5), &GRID_COLOR);
            assert_eq!(image.get_pixel(5, i * 8), &GRID_COLOR);
        }
        assert_eq!(image.get_pixel(31, 20), &GRID_COLOR);
        assert_eq!(image.get_pixel(20, 31), &GRID_COLOR);
        assert_eq!(image.get_pixel(3, 3), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn transparent_background_leaves_blank_cells_clear() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 4,
            include_grid: false,
            background_transparent: true,
            ..RenderConfig::default()
        };

        let image = rasterizer().rasterize(&state, &config).unwrap();

        assert_eq!(image.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
        assert_eq!(image.get_pixel(6, 1), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(10, 6), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn grid_overlay_ignores_transparency() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 4,
            include_grid: true,
            background_transparent: true,
            ..RenderConfig::default()
        };

        let image = rasterizer().rasterize(&state, &config).unwrap();

        assert_eq!(image.get_pixel(6, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn opaque_background_without_grid_is_white() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 4,
            include_grid: false,
            background_transparent: false,
            ..RenderConfig::default()
        };

        let image = rasterizer().rasterize(&state, &config).unwrap();

        assert_eq!(image.get_pixel(6, 1), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn low_quality_still_decodes_identically() {
        let state = sample_state();
        let config = RenderConfig {
            pixel_size: 6,
            quality: 0.1,
            include_grid: false,
            ..RenderConfig::default()
        };

        let image = decode(&rasterizer().render(&state, &config).unwrap());

        assert_block_centers_match(&image, &state, 6);
    }

    #[test]
    fn preview_uses_floor_of_preview_size() {
        let state = reconstruct(&[PixelChange::new("A", 15, 15, 3, 1)], 16);

        let blob = rasterizer().preview(&state, 100).unwrap();
        let image = decode(&blob);

        assert_eq!(image.dimensions(), (96, 96));
        assert_eq!(image.get_pixel(93, 93), &Rgba([0, 255, 0, 255]));
        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn zero_pixel_size_is_unavailable() {
        let state = reconstruct(&[], 16);

        let err = rasterizer().preview(&state, 8).unwrap_err();

        assert!(matches!(err, RenderError::RenderingUnavailable(_)));
    }

    #[test]
    fn oversized_raster_is_unavailable() {
        let state = reconstruct(&[], 16);
        let config = RenderConfig {
            pixel_size: MAX_SIDE,
            ..RenderConfig::default()
        };

        assert!(matches!(
            rasterizer().render(&state, &config),
            Err(RenderError::RenderingUnavailable(_))
        ));
    }

    #[test]
    fn unknown_color_paints_background() {
        let mut state = reconstruct(&[], 2);
        state.grid[0][0] = 99;
        let config = RenderConfig {
            pixel_size: 2,
            include_grid: false,
            ..RenderConfig::default()
        };

        let image = rasterizer().rasterize(&state, &config).unwrap();

        assert_eq!(image.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }
}
