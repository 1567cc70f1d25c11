//! Editing facade over a [`PrototypeAggregate`]
//!
//! `PrototypeService` is a plain value owned by its caller. Every editing
//! call takes `&mut self`, so a single service is its own write lock; hosts
//! that share one across threads wrap it in a `Mutex`.
//!
//! Patches arrive as loosely typed JSON objects. Keys are matched
//! case-insensitively, values may be strings or numbers, and anything that
//! does not parse is skipped rather than rejected.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::aggregate::PrototypeAggregate;
use crate::codegen::{self, GeneratedOutput};
use crate::config::ForgeConfig;
use crate::error::Result;
use crate::kind::ElementKind;
use crate::model::{Asset, Element, Project, Screen};
use crate::package::{AssetPackager, PackagedArchive};
use crate::template::ScreenTemplate;

pub struct PrototypeService {
    aggregate: PrototypeAggregate,
    config: ForgeConfig,
}

impl PrototypeService {
    /// Service over a fresh single-screen project
    pub fn new(config: ForgeConfig) -> Self {
        Self::with_project(Project::default(), config)
    }

    pub fn with_project(project: Project, config: ForgeConfig) -> Self {
        Self {
            aggregate: PrototypeAggregate::new(project),
            config,
        }
    }

    pub fn aggregate(&self) -> &PrototypeAggregate {
        &self.aggregate
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn into_aggregate(self) -> PrototypeAggregate {
        self.aggregate
    }

    /// Snapshot of the current project
    pub fn project(&self) -> Project {
        self.aggregate.project()
    }

    // -------------------------------------------------------------------------
    // Screens
    // -------------------------------------------------------------------------

    /// Create a screen, optionally seeded from a named template.
    ///
    /// Unknown template names still create the (empty) screen.
    pub fn add_screen(&mut self, name: Option<&str>, template: Option<&str>) -> Screen {
        let id = self.aggregate.add_screen(name).id.clone();
        if let Some(template) = template {
            self.apply_template(&id, template);
        }
        self.snapshot(&id)
    }

    /// Seed an existing screen from a named template.
    ///
    /// Returns false for unknown screens or template names.
    pub fn apply_template(&mut self, screen_id: &str, template: &str) -> bool {
        if template.trim().is_empty() || self.aggregate.get_screen(screen_id).is_none() {
            return false;
        }
        match template.parse::<ScreenTemplate>() {
            Ok(template) => {
                template.apply(&mut self.aggregate, screen_id);
                true
            }
            Err(reason) => {
                debug!(screen = %screen_id, %reason, "Template ignored");
                false
            }
        }
    }

    pub fn delete_screen(&mut self, id: &str) -> bool {
        self.aggregate.remove_screen(id)
    }

    pub fn select_screen(&mut self, id: &str) -> bool {
        self.aggregate.select_screen(id)
    }

    pub fn move_screen(&mut self, id: &str, new_index: usize) -> bool {
        self.aggregate.reorder_screen(id, new_index)
    }

    /// Set or clear a screen's background image
    pub fn update_screen_background(
        &mut self,
        screen_id: &str,
        asset_name: Option<&str>,
        data_url: Option<&str>,
    ) -> bool {
        self.aggregate.edit_screen(screen_id, |screen| {
            screen.background_asset = asset_name.map(str::to_string);
            screen.background = data_url.map(str::to_string);
        })
    }

    /// Apply a screen patch (`name`, `backgroundColor`)
    pub fn update_screen(&mut self, screen_id: &str, patch: &Map<String, Value>) -> bool {
        self.aggregate.edit_screen(screen_id, |screen| {
            for (key, value) in patch {
                let text = patch_text(value);
                match key.to_ascii_lowercase().as_str() {
                    "name" => {
                        if let Some(name) = text.filter(|s| !s.is_empty()) {
                            screen.name = name;
                        }
                    }
                    "backgroundcolor" => screen.background_color = text,
                    _ => debug!(%key, "Ignoring unknown screen patch key"),
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    /// Add an element by its drawing-call name (`"fillRect"`, `"drawString"`, ...).
    ///
    /// Returns `Ok(None)` when the screen does not exist.
    pub fn add_element(&mut self, screen_id: &str, kind: &str, asset: Option<&str>) -> Result<Option<Element>> {
        let kind: ElementKind = kind.parse()?;
        Ok(self.add_element_of(screen_id, kind, asset))
    }

    pub fn add_element_of(&mut self, screen_id: &str, kind: ElementKind, asset: Option<&str>) -> Option<Element> {
        self.aggregate
            .add_element(screen_id, kind, asset.map(str::to_string))
            .cloned()
    }

    pub fn delete_element(&mut self, id: &str) -> bool {
        self.aggregate.remove_element(id)
    }

    /// Apply an element patch.
    ///
    /// Recognized keys: `name`, `color` (ignored when empty), `asset`,
    /// `targetScreenId` (`null` clears), `x`, `y`, `w`, `h` (integers; sizes
    /// must be positive).
    pub fn patch_element(&mut self, id: &str, patch: &Map<String, Value>) -> bool {
        self.aggregate.edit_element(id, |el| {
            for (key, value) in patch {
                let text = patch_text(value);
                match key.to_ascii_lowercase().as_str() {
                    "name" => {
                        if let Some(name) = text.filter(|s| !s.is_empty()) {
                            el.name = name;
                        }
                    }
                    "color" => {
                        if let Some(color) = text.filter(|s| !s.is_empty()) {
                            el.color = color;
                        }
                    }
                    "asset" => el.asset = text.filter(|s| !s.is_empty()),
                    "targetscreenid" => el.target_screen_id = text,
                    "x" => {
                        if let Some(x) = parse_int(text) {
                            el.x = x;
                        }
                    }
                    "y" => {
                        if let Some(y) = parse_int(text) {
                            el.y = y;
                        }
                    }
                    "w" => {
                        if let Some(w) = parse_int(text).filter(|w| *w > 0) {
                            el.w = w;
                        }
                    }
                    "h" => {
                        if let Some(h) = parse_int(text).filter(|h| *h > 0) {
                            el.h = h;
                        }
                    }
                    _ => debug!(%key, "Ignoring unknown element patch key"),
                }
            }
        })
    }

    /// Change an element's paint order within `screen_id`
    pub fn move_element(&mut self, screen_id: &str, element_id: &str, new_index: usize) -> bool {
        self.aggregate.reorder_element(screen_id, element_id, new_index)
    }

    pub fn move_element_to_screen(&mut self, element_id: &str, target_screen_id: &str) -> bool {
        self.aggregate.move_element(element_id, target_screen_id)
    }

    // -------------------------------------------------------------------------
    // Assets
    // -------------------------------------------------------------------------

    /// Register an asset; returns the name it was stored under
    pub fn add_asset(&mut self, asset: Asset) -> String {
        self.aggregate.add_asset(asset).name.clone()
    }

    pub fn delete_asset(&mut self, name: &str) -> bool {
        self.aggregate.remove_asset(name)
    }

    // -------------------------------------------------------------------------
    // Bulk replace and export
    // -------------------------------------------------------------------------

    /// Swap in a whole new project, returning the aggregate it replaces
    pub fn replace_project(&mut self, project: Project) -> PrototypeAggregate {
        let incoming = PrototypeAggregate::new(project);
        info!(
            screens = incoming.screen_count(),
            elements = incoming.element_count(),
            "Project replaced"
        );
        std::mem::replace(&mut self.aggregate, incoming)
    }

    pub fn generate_source(&self) -> GeneratedOutput {
        codegen::generate_firmware(&self.project(), &self.config)
    }

    pub fn generate_header(&self) -> GeneratedOutput {
        codegen::generate_header(&self.project(), &self.config)
    }

    pub fn export_archive(&self) -> Result<PackagedArchive> {
        AssetPackager::new(&self.config).package(&self.project())
    }

    fn snapshot(&self, screen_id: &str) -> Screen {
        self.aggregate.screen_snapshot(screen_id).unwrap_or_default()
    }
}

/// Patch value as text: strings as-is, numbers and booleans in JSON form
fn patch_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_int(text: Option<String>) -> Option<i32> {
    text.and_then(|s| s.trim().parse().ok())
}
