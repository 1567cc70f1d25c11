//! Project data model
//!
//! This is the persisted, JSON-shaped form of a prototype: a project owns an
//! ordered list of screens and a flat list of assets, and every screen owns
//! its elements in paint order (back to front). Field names serialize in
//! camelCase so payloads round-trip verbatim with the editor.
//!
//! Mutation does not happen on these types directly; see
//! [`PrototypeAggregate`](crate::aggregate::PrototypeAggregate).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kind::ElementKind;

/// Screen identifier (`screen_<seq>`)
pub type ScreenId = String;

/// Element identifier (`el_<seq>`), unique across the whole project
pub type ElementId = String;

/// Default fill for freshly created elements (sky blue)
pub const DEFAULT_ELEMENT_COLOR: &str = "#38bdf8";

/// Root of a prototype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    /// Screens in display order. Never empty once loaded into an aggregate.
    pub screens: Vec<Screen>,

    /// Screen currently being edited
    pub active_screen_id: ScreenId,

    /// Element currently selected in the editor
    pub selected_element_id: Option<ElementId>,

    /// Images available to screens and elements
    pub assets: Vec<Asset>,

    /// Next element sequence number
    pub element_seq: u32,

    /// Next screen sequence number
    pub screen_seq: u32,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            screens: vec![Screen::new("screen_1", "Home")],
            active_screen_id: "screen_1".to_string(),
            selected_element_id: None,
            assets: Vec::new(),
            element_seq: 1,
            screen_seq: 2,
        }
    }
}

impl Project {
    /// Parse a project from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find an asset by its (sanitized) name
    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Total number of elements across all screens
    pub fn element_count(&self) -> usize {
        self.screens.iter().map(|s| s.elements.len()).sum()
    }
}

/// A single display screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Screen {
    pub id: ScreenId,
    pub name: String,

    /// Free-form bitmap reference (usually a data URL) shown in the editor
    pub background: Option<String>,

    /// Name of an [`Asset`] drawn as the screen background
    pub background_asset: Option<String>,

    /// Fallback fill when no background asset is set
    pub background_color: Option<String>,

    /// Elements in paint order, back to front
    pub elements: Vec<Element>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            background: None,
            background_asset: None,
            background_color: Some("#000000".to_string()),
            elements: Vec::new(),
        }
    }
}

impl Screen {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A drawing primitive placed on a screen.
///
/// Geometry is always a bounding box; the code generator derives centers,
/// radii and vertices from it per [`ElementKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Element {
    pub id: ElementId,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    /// Structural label. Text elements also render this as their content.
    pub name: String,

    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,

    /// `#rrggbb` or `#rgb`
    pub color: String,

    /// Asset drawn by image elements
    pub asset: Option<String>,

    /// Screen to navigate to when the element is tapped
    pub target_screen_id: Option<ScreenId>,

    #[serde(flatten)]
    pub bindings: Bindings,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: ElementKind::FillRect,
            name: String::new(),
            x: 10,
            y: 10,
            w: 50,
            h: 50,
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            asset: None,
            target_screen_id: None,
            bindings: Bindings::default(),
        }
    }
}

/// Opaque tokens naming externally resolved values. Passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w_bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_bind: Option<String>,
}

/// Where an asset lives on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Compiled into program memory (`PROGMEM` array in the asset header)
    #[default]
    Flash,
    /// Shipped as a file under `data/` and read from LittleFS at runtime
    #[serde(rename = "littlefs")]
    LittleFs,
}

/// An image asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    /// Identifier-safe name, unique within the project
    pub name: String,

    /// `data:<mime>;base64,<payload>`
    pub data_url: String,

    pub width: u32,
    pub height: u32,
    pub kind: String,
    pub storage_type: StorageKind,
}

impl Default for Asset {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_url: String::new(),
            width: 240,
            height: 240,
            kind: "image".to_string(),
            storage_type: StorageKind::Flash,
        }
    }
}

impl Asset {
    pub fn new(name: impl Into<String>, data_url: impl Into<String>, storage_type: StorageKind) -> Self {
        Self {
            name: name.into(),
            data_url: data_url.into(),
            storage_type,
            ..Default::default()
        }
    }
}
