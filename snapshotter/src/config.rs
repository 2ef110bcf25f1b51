use reducer::CanvasBounds;
use structures::Palette;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub canvas_size: u32,
    pub palette: Palette,
}

impl ServiceConfig {
    pub fn bounds(&self) -> CanvasBounds {
        CanvasBounds {
            canvas_size: self.canvas_size,
            palette_size: self.palette.len(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            canvas_size: 16,
            palette: Palette::default(),
        }
    }
}
