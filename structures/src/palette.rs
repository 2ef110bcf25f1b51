use thiserror::Error;

/// Palette index every untouched cell holds.
pub const BACKGROUND_INDEX: u8 = 0;

const DEFAULT_COLORS: [&str; 8] = [
    "#FFFFFF", "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette has no colors")]
    Empty,
    #[error("palette has {0} colors, at most 256 fit a color index")]
    TooLarge(usize),
    #[error("palette color {index} ({value}) is not a hex color")]
    InvalidColor { index: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() > 256 {
            return Err(PaletteError::TooLarge(colors.len()));
        }

        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: u8) -> Option<&str> {
        self.colors.get(index as usize).map(String::as_str)
    }

    /// Color for `index`, falling back to the background for unknown indices.
    pub fn color_or_background(&self, index: u8) -> &str {
        self.get(index).unwrap_or(&self.colors[BACKGROUND_INDEX as usize])
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = PaletteError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_starts_with_white_background() {
        let palette = Palette::default();

        assert_eq!(palette.len(), 8);
        assert_eq!(palette.get(BACKGROUND_INDEX), Some("#FFFFFF"));
        assert_eq!(palette.color_or_background(200), "#FFFFFF");
    }

    #[test]
    fn rejects_empty_palette() {
        assert_eq!(Palette::new(vec![]), Err(PaletteError::Empty));
    }

    #[test]
    fn deserializing_goes_through_the_same_checks() {
        assert!(serde_json::from_str::<Palette>("[]").is_err());

        let oversized = serde_json::to_string(&vec!["#000000"; 257]).unwrap();
        assert!(serde_json::from_str::<Palette>(&oversized).is_err());

        let palette: Palette = serde_json::from_str(r##"["#FFFFFF","#000000"]"##).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(serde_json::to_string(&palette).unwrap(), r##"["#FFFFFF","#000000"]"##);
    }
}
