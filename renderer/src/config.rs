/// Quality used for reduced-size previews.
pub const PREVIEW_QUALITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Side length in pixels of one canvas cell.
    pub pixel_size: u32,
    /// 0.0 to 1.0, handed to the encoder.
    pub quality: f32,
    /// Draw 1px separator lines between cells.
    pub include_grid: bool,
    /// Leave background cells unpainted. Ignored when `include_grid` is set.
    pub background_transparent: bool,
}

impl RenderConfig {
    /// Reduced-size, grid-less settings fitting a canvas into `preview_size` pixels.
    pub fn preview(preview_size: u32, canvas_size: u32) -> Self {
        Self {
            pixel_size: preview_size.checked_div(canvas_size).unwrap_or(0),
            quality: PREVIEW_QUALITY,
            include_grid: false,
            background_transparent: false,
        }
    }

    pub(crate) fn is_opaque(&self) -> bool {
        self.include_grid || !self.background_transparent
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            pixel_size: 32,
            quality: 1.0,
            include_grid: true,
            background_transparent: false,
        }
    }
}
