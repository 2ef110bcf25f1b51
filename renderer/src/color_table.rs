use colors_transform::Color;
use image::Rgba;
use structures::{Palette, PaletteError, BACKGROUND_INDEX};

/// Palette resolved to RGBA once, looked up by index while painting.
#[derive(Debug, Clone)]
pub struct ColorTable {
    colors: Vec<Rgba<u8>>,
}

impl ColorTable {
    pub fn from_palette(palette: &Palette) -> Result<Self, PaletteError> {
        let colors = palette
            .colors()
            .iter()
            .enumerate()
            .map(|(index, hex)| {
                parse_hex(hex).ok_or_else(|| PaletteError::InvalidColor {
                    index,
                    value: hex.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        Ok(Self { colors })
    }

    pub fn background(&self) -> Rgba<u8> {
        self.colors[BACKGROUND_INDEX as usize]
    }

    /// Unknown indices resolve to the background color.
    pub fn get(&self, index: u8) -> Rgba<u8> {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or_else(|| self.background())
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    let color = colors_transform::Rgb::from_hex_str(hex).ok()?;

    Some(Rgba([
        color.get_red() as u8,
        color.get_green() as u8,
        color.get_blue() as u8,
        0xff,
    ]))
}
