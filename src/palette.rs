use plotters::style::RGBColor;

/// Categorical colour cycle used when a layer has no explicit colour
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                RGBColor(31, 119, 180),
                RGBColor(255, 127, 14),
                RGBColor(44, 160, 44),
                RGBColor(214, 39, 40),
                RGBColor(148, 103, 189),
                RGBColor(140, 86, 75),
                RGBColor(227, 119, 194),
                RGBColor(127, 127, 127),
                RGBColor(188, 189, 34),
                RGBColor(23, 190, 207),
            ],
        }
    }
}

impl ColorPalette {
    /// Colour for the n-th series, wrapping around
    pub fn get(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }
}

/// Parse a colour name or `#rrggbb` hex string
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let lower = color_str.trim().to_ascii_lowercase();
    match lower.as_str() {
        "red" => Some(RGBColor(255, 0, 0)),
        "green" => Some(RGBColor(0, 128, 0)),
        "blue" => Some(RGBColor(0, 0, 255)),
        "darkblue" => Some(RGBColor(0, 0, 139)),
        "black" => Some(RGBColor(0, 0, 0)),
        "white" => Some(RGBColor(255, 255, 255)),
        "yellow" => Some(RGBColor(255, 255, 0)),
        "cyan" => Some(RGBColor(0, 255, 255)),
        "magenta" => Some(RGBColor(255, 0, 255)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "orange" => Some(RGBColor(255, 165, 0)),
        hex if hex.starts_with('#') && hex.len() == 7 && hex.is_ascii() => {
            let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
            Some(RGBColor(channel(1..3)?, channel(3..5)?, channel(5..7)?))
        }
        _ => None,
    }
}

/// Resolve an optional colour, falling back to the palette slot
pub fn resolve_color(color: Option<&str>, palette: &ColorPalette, slot: usize) -> RGBColor {
    match color.and_then(parse_color) {
        Some(c) => c,
        None => {
            if let Some(name) = color {
                log::warn!("unknown colour '{}', using palette", name);
            }
            palette.get(slot)
        }
    }
}
