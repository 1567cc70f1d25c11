//! HTML color → RGB565 conversion

use std::fmt;

/// A 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Rgb565 = Rgb565(0x0000);

    /// Pack 8-bit channels. Scaling truncates.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r5 = u16::from(r) * 31 / 255;
        let g6 = u16::from(g) * 63 / 255;
        let b5 = u16::from(b) * 31 / 255;
        Self((r5 << 11) | (g6 << 5) | b5)
    }

    /// Parse `#rrggbb` or `#rgb`. Anything else is black.
    pub fn from_html(html: &str) -> Self {
        parse_html(html).unwrap_or(Self::BLACK)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Rgb565 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Convenience wrapper returning the raw packed value
pub fn html_to_565(html: &str) -> u16 {
    Rgb565::from_html(html).value()
}

fn parse_html(html: &str) -> Option<Rgb565> {
    let hex = html.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb565::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
