//! Drawing primitives an element can be compiled to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ForgeError;

/// The TFT drawing call an element compiles to.
///
/// Wire tags are the TFT_eSPI method names (`fillRect`, `drawCentreString`,
/// ...). Parsing ignores case, so `"FILLRECT"` and `"fillrect"` are both
/// accepted; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKind {
    FillRect,
    DrawRect,
    FillRoundRect,
    DrawRoundRect,
    FillCircle,
    DrawCircle,
    FillEllipse,
    DrawEllipse,
    FillTriangle,
    DrawTriangle,
    DrawLine,
    DrawFastHLine,
    DrawFastVLine,
    DrawPixel,
    DrawString,
    DrawCentreString,
    FillScreen,
    PushImage,
}

impl ElementKind {
    pub const ALL: [ElementKind; 18] = [
        Self::FillRect,
        Self::DrawRect,
        Self::FillRoundRect,
        Self::DrawRoundRect,
        Self::FillCircle,
        Self::DrawCircle,
        Self::FillEllipse,
        Self::DrawEllipse,
        Self::FillTriangle,
        Self::DrawTriangle,
        Self::DrawLine,
        Self::DrawFastHLine,
        Self::DrawFastVLine,
        Self::DrawPixel,
        Self::DrawString,
        Self::DrawCentreString,
        Self::FillScreen,
        Self::PushImage,
    ];

    /// TFT_eSPI method name, also used as the JSON tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FillRect => "fillRect",
            Self::DrawRect => "drawRect",
            Self::FillRoundRect => "fillRoundRect",
            Self::DrawRoundRect => "drawRoundRect",
            Self::FillCircle => "fillCircle",
            Self::DrawCircle => "drawCircle",
            Self::FillEllipse => "fillEllipse",
            Self::DrawEllipse => "drawEllipse",
            Self::FillTriangle => "fillTriangle",
            Self::DrawTriangle => "drawTriangle",
            Self::DrawLine => "drawLine",
            Self::DrawFastHLine => "drawFastHLine",
            Self::DrawFastVLine => "drawFastVLine",
            Self::DrawPixel => "drawPixel",
            Self::DrawString => "drawString",
            Self::DrawCentreString => "drawCentreString",
            Self::FillScreen => "fillScreen",
            Self::PushImage => "pushImage",
        }
    }

    /// Circles get a square default footprint
    pub fn is_circle(&self) -> bool {
        self.as_str().to_ascii_lowercase().contains("circle")
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::DrawString | Self::DrawCentreString)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ForgeError::UnknownElementKind(s.to_string()))
    }
}

impl TryFrom<String> for ElementKind {
    type Error = ForgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}
