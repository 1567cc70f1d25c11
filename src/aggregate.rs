//! Prototype Aggregate
//!
//! The single mutation authority over a project. Elements are stored in a
//! flat arena keyed by id; screens keep ordered lists of element ids, and a
//! [`GraphIndex`] answers "which screen owns this element" and "where is this
//! screen" in O(1).
//!
//! Not-found conditions are reported with `Option`/`bool`, never errors.
//! Mutating methods take `&mut self`, so one aggregate has exactly one writer
//! at a time; a bulk replace builds a fresh aggregate instead of rewriting
//! this one.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::codegen::names::{sanitize_identifier, unique_name};
use crate::index::GraphIndex;
use crate::kind::ElementKind;
use crate::model::{Asset, Element, ElementId, Project, Screen, ScreenId, DEFAULT_ELEMENT_COLOR};
use crate::sequence::SequenceAllocator;

/// A screen as held by the aggregate: metadata plus element ids in paint order
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenRecord {
    pub id: ScreenId,
    pub name: String,
    pub background: Option<String>,
    pub background_asset: Option<String>,
    pub background_color: Option<String>,
    element_ids: Vec<ElementId>,
}

impl ScreenRecord {
    fn from_screen(screen: Screen) -> (Self, Vec<Element>) {
        let record = Self {
            id: screen.id,
            name: screen.name,
            background: screen.background,
            background_asset: screen.background_asset,
            background_color: screen.background_color,
            element_ids: Vec::with_capacity(screen.elements.len()),
        };
        (record, screen.elements)
    }

    /// Element ids back to front
    pub fn element_ids(&self) -> &[ElementId] {
        &self.element_ids
    }
}

/// Aggregate root for a prototype project
#[derive(Debug, Clone)]
pub struct PrototypeAggregate {
    screens: Vec<ScreenRecord>,
    elements: HashMap<ElementId, Element>,
    assets: Vec<Asset>,
    active_screen_id: ScreenId,
    selected_element_id: Option<ElementId>,
    sequence: SequenceAllocator,
    index: GraphIndex,
}

impl Default for PrototypeAggregate {
    fn default() -> Self {
        Self::new(Project::default())
    }
}

impl PrototypeAggregate {
    /// Take ownership of a project and index it.
    ///
    /// The project is normalized on the way in: an empty screen list gets a
    /// `Home` screen, a dangling active screen falls back to the first one,
    /// a dangling selection is cleared, duplicate or empty ids are
    /// re-issued so the arena stays consistent, and asset names are
    /// sanitized and made unique with references following the rename.
    pub fn new(project: Project) -> Self {
        let mut sequence = SequenceAllocator::new(project.element_seq, project.screen_seq);
        for screen in &project.screens {
            sequence.observe_screen_id(&screen.id);
            for el in &screen.elements {
                sequence.observe_element_id(&el.id);
            }
        }

        let loaded_screen_ids: HashSet<ScreenId> = project.screens.iter().map(|s| s.id.clone()).collect();
        let loaded_element_ids: HashSet<ElementId> = project
            .screens
            .iter()
            .flat_map(|s| s.elements.iter().map(|e| e.id.clone()))
            .collect();

        let (assets, renamed) = normalize_assets(project.assets);

        let mut screens: Vec<ScreenRecord> = Vec::with_capacity(project.screens.len());
        let mut elements: HashMap<ElementId, Element> = HashMap::new();

        for screen in project.screens {
            let (mut record, screen_elements) = ScreenRecord::from_screen(screen);

            if record.id.is_empty() || screens.iter().any(|s| s.id == record.id) {
                let fresh = sequence
                    .next_screen_id(|c| loaded_screen_ids.contains(c) || screens.iter().any(|s| s.id == c));
                warn!(old = %record.id, new = %fresh, "Re-issuing duplicate screen id");
                record.id = fresh;
            }
            follow_rename(&mut record.background_asset, &renamed);

            for mut el in screen_elements {
                if el.id.is_empty() || elements.contains_key(&el.id) {
                    let fresh = sequence
                        .next_element_id(|c| loaded_element_ids.contains(c) || elements.contains_key(c));
                    warn!(old = %el.id, new = %fresh, "Re-issuing duplicate element id");
                    el.id = fresh;
                }
                follow_rename(&mut el.asset, &renamed);
                record.element_ids.push(el.id.clone());
                elements.insert(el.id.clone(), el);
            }

            screens.push(record);
        }

        if screens.is_empty() {
            let id = sequence.next_screen_id(|_| false);
            warn!(screen = %id, "Project had no screens; adding Home");
            let (record, _) = ScreenRecord::from_screen(Screen::new(id, "Home"));
            screens.push(record);
        }

        let active_screen_id = if screens.iter().any(|s| s.id == project.active_screen_id) {
            project.active_screen_id
        } else {
            screens[0].id.clone()
        };

        let selected_element_id = project
            .selected_element_id
            .filter(|id| elements.contains_key(id));

        let mut aggregate = Self {
            screens,
            elements,
            assets,
            active_screen_id,
            selected_element_id,
            sequence,
            index: GraphIndex::new(),
        };
        aggregate.rebuild_indexes();
        aggregate
    }

    /// Recompute the index from the screen lists. Idempotent.
    pub fn rebuild_indexes(&mut self) {
        self.index.rebuild(
            self.screens
                .iter()
                .map(|s| (&s.id, s.element_ids.iter())),
        );
    }

    /// Reassemble the nested, persistable project
    pub fn project(&self) -> Project {
        let screens = self.screens.iter().map(|record| self.assemble(record)).collect();

        Project {
            screens,
            active_screen_id: self.active_screen_id.clone(),
            selected_element_id: self.selected_element_id.clone(),
            assets: self.assets.clone(),
            element_seq: self.sequence.element_seq(),
            screen_seq: self.sequence.screen_seq(),
        }
    }

    /// Nested copy of a single screen with its elements
    pub fn screen_snapshot(&self, id: &str) -> Option<Screen> {
        self.get_screen(id).map(|record| self.assemble(record))
    }

    fn assemble(&self, record: &ScreenRecord) -> Screen {
        Screen {
            id: record.id.clone(),
            name: record.name.clone(),
            background: record.background.clone(),
            background_asset: record.background_asset.clone(),
            background_color: record.background_color.clone(),
            elements: record
                .element_ids
                .iter()
                .filter_map(|id| self.elements.get(id).cloned())
                .collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn screens(&self) -> &[ScreenRecord] {
        &self.screens
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    pub fn active_screen_id(&self) -> &str {
        &self.active_screen_id
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected_element_id.as_deref()
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn get_screen(&self, id: &str) -> Option<&ScreenRecord> {
        self.index.screen_position(id).map(|pos| &self.screens[pos])
    }

    /// O(1) lookup by element id
    pub fn find_element(&self, id: &str) -> Option<&Element> {
        if id.is_empty() {
            return None;
        }
        self.elements.get(id)
    }

    /// Elements of a screen, back to front
    pub fn screen_elements(&self, screen_id: &str) -> Option<Vec<&Element>> {
        let screen = self.get_screen(screen_id)?;
        Some(
            screen
                .element_ids
                .iter()
                .filter_map(|id| self.elements.get(id))
                .collect(),
        )
    }

    /// Screen that currently owns `element_id`
    pub fn owner_of(&self, element_id: &str) -> Option<&ScreenId> {
        self.index.owner_of(element_id)
    }

    // -------------------------------------------------------------------------
    // Screens
    // -------------------------------------------------------------------------

    /// Append a screen and make it active
    pub fn add_screen(&mut self, name: Option<&str>) -> &ScreenRecord {
        let id = self.sequence.next_screen_id(|c| self.index.contains_screen(c));
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Tela_{}", self.screens.len() + 1),
        };
        debug!(screen = %id, %name, "Adding screen");

        let (record, _) = ScreenRecord::from_screen(Screen::new(id.clone(), name));
        self.screens.push(record);
        self.index.reposition(self.screens.iter().map(|s| &s.id));
        self.active_screen_id = id;

        let last = self.screens.len() - 1;
        &self.screens[last]
    }

    /// Remove a screen and all its elements.
    ///
    /// Refuses to remove the last remaining screen.
    pub fn remove_screen(&mut self, id: &str) -> bool {
        if self.screens.len() <= 1 {
            return false;
        }
        let Some(pos) = self.index.screen_position(id) else {
            return false;
        };

        let record = self.screens.remove(pos);
        for element_id in &record.element_ids {
            self.elements.remove(element_id);
            self.index.remove_element(element_id);
            if self.selected_element_id.as_deref() == Some(element_id.as_str()) {
                self.selected_element_id = None;
            }
        }
        self.index.reposition(self.screens.iter().map(|s| &s.id));

        if self.active_screen_id == id {
            self.active_screen_id = self.screens[0].id.clone();
        }

        debug!(screen = %id, elements = record.element_ids.len(), "Removed screen");
        true
    }

    /// Make a screen active and clear the element selection
    pub fn select_screen(&mut self, id: &str) -> bool {
        if !self.index.contains_screen(id) {
            return false;
        }
        self.active_screen_id = id.to_string();
        self.selected_element_id = None;
        true
    }

    /// Move a screen to `new_index` (clamped to the list bounds)
    pub fn reorder_screen(&mut self, id: &str, new_index: usize) -> bool {
        let Some(pos) = self.index.screen_position(id) else {
            return false;
        };
        let record = self.screens.remove(pos);
        let target = new_index.min(self.screens.len());
        self.screens.insert(target, record);
        self.index.reposition(self.screens.iter().map(|s| &s.id));
        true
    }

    /// Edit screen metadata in place. The screen id cannot be changed.
    pub fn edit_screen(&mut self, id: &str, edit: impl FnOnce(&mut ScreenRecord)) -> bool {
        let Some(pos) = self.index.screen_position(id) else {
            return false;
        };
        let record = &mut self.screens[pos];
        edit(record);
        if record.id != id {
            warn!(screen = %id, attempted = %record.id, "Ignoring screen id change");
            record.id = id.to_string();
        }
        true
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    /// Append a new element to a screen and select it.
    ///
    /// New elements cascade by 5px per existing element so they don't stack
    /// exactly on top of each other.
    pub fn add_element(&mut self, screen_id: &str, kind: ElementKind, asset: Option<String>) -> Option<&Element> {
        let pos = self.index.screen_position(screen_id)?;
        let count = self.screens[pos].element_ids.len();
        let offset = cascade_offset(count);
        let (w, h) = if kind.is_circle() { (60, 60) } else { (80, 40) };

        let id = self.sequence.next_element_id(|c| self.elements.contains_key(c));
        let element = Element {
            id: id.clone(),
            kind,
            name: format!("{}_{}", kind, count + 1),
            x: offset,
            y: offset,
            w,
            h,
            color: DEFAULT_ELEMENT_COLOR.to_string(),
            asset,
            ..Default::default()
        };
        debug!(element = %id, %kind, screen = %screen_id, "Adding element");

        self.screens[pos].element_ids.push(id.clone());
        self.index.insert_element(id.clone(), screen_id.to_string());
        self.elements.insert(id.clone(), element);
        self.selected_element_id = Some(id.clone());

        self.elements.get(&id)
    }

    pub fn remove_element(&mut self, id: &str) -> bool {
        let Some(owner) = self.index.owner_of(id).cloned() else {
            return false;
        };
        let Some(pos) = self.index.screen_position(&owner) else {
            return false;
        };

        self.screens[pos].element_ids.retain(|e| e != id);
        self.elements.remove(id);
        self.index.remove_element(id);

        if self.selected_element_id.as_deref() == Some(id) {
            self.selected_element_id = None;
        }
        debug!(element = %id, screen = %owner, "Removed element");
        true
    }

    /// Move an element to the top of another screen, keeping its id.
    ///
    /// No-op (returns false) when either side is missing or the element is
    /// already on `target_screen_id`.
    pub fn move_element(&mut self, id: &str, target_screen_id: &str) -> bool {
        let Some(source) = self.index.owner_of(id).cloned() else {
            return false;
        };
        let (Some(source_pos), Some(target_pos)) = (
            self.index.screen_position(&source),
            self.index.screen_position(target_screen_id),
        ) else {
            return false;
        };
        if source_pos == target_pos {
            return false;
        }

        self.screens[source_pos].element_ids.retain(|e| e != id);
        self.screens[target_pos].element_ids.push(id.to_string());
        self.index.insert_element(id.to_string(), target_screen_id.to_string());
        debug!(element = %id, from = %source, to = %target_screen_id, "Moved element");
        true
    }

    /// Change an element's paint position within its own screen (clamped)
    pub fn reorder_element(&mut self, screen_id: &str, id: &str, new_index: usize) -> bool {
        if self.index.owner_of(id).map(String::as_str) != Some(screen_id) {
            return false;
        }
        let Some(pos) = self.index.screen_position(screen_id) else {
            return false;
        };

        let ids = &mut self.screens[pos].element_ids;
        ids.retain(|e| e != id);
        let target = new_index.min(ids.len());
        ids.insert(target, id.to_string());
        true
    }

    /// Edit an element in place. The element id cannot be changed.
    pub fn edit_element(&mut self, id: &str, edit: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        edit(element);
        if element.id != id {
            warn!(element = %id, attempted = %element.id, "Ignoring element id change");
            element.id = id.to_string();
        }
        true
    }

    // -------------------------------------------------------------------------
    // Assets
    // -------------------------------------------------------------------------

    /// Add an asset under a sanitized, unique name
    pub fn add_asset(&mut self, mut asset: Asset) -> &Asset {
        let base = sanitize_identifier(&asset.name, "asset");
        let name = unique_name(&base, |candidate| self.assets.iter().any(|a| a.name == candidate));
        if name != asset.name {
            debug!(requested = %asset.name, %name, "Renamed asset");
        }
        asset.name = name;
        self.assets.push(asset);

        let last = self.assets.len() - 1;
        &self.assets[last]
    }

    /// Remove an asset and clear every reference to it
    pub fn remove_asset(&mut self, name: &str) -> bool {
        let Some(pos) = self.assets.iter().position(|a| a.name == name) else {
            return false;
        };
        self.assets.remove(pos);

        for screen in &mut self.screens {
            if screen.background_asset.as_deref() == Some(name) {
                screen.background_asset = None;
                screen.background = None;
            }
        }
        for element in self.elements.values_mut() {
            if element.asset.as_deref() == Some(name) {
                element.asset = None;
            }
        }
        true
    }
}

/// Position of the `count`-th element added to a screen: 10, 15, 20, ...
fn cascade_offset(count: usize) -> i32 {
    i32::try_from(count)
        .unwrap_or(i32::MAX)
        .saturating_mul(5)
        .saturating_add(10)
}

/// Sanitize and de-duplicate loaded asset names.
///
/// Returns the assets plus a map from each original name to its new name,
/// taken from the first asset that carried it.
fn normalize_assets(loaded: Vec<Asset>) -> (Vec<Asset>, HashMap<String, String>) {
    let mut assets: Vec<Asset> = Vec::with_capacity(loaded.len());
    let mut renamed = HashMap::new();
    let mut seen = HashSet::new();

    for mut asset in loaded {
        let base = sanitize_identifier(&asset.name, "asset");
        let name = unique_name(&base, |candidate| assets.iter().any(|a| a.name == candidate));
        let first = seen.insert(asset.name.clone());
        if name != asset.name {
            warn!(old = %asset.name, new = %name, "Renaming loaded asset");
            if first {
                renamed.insert(asset.name.clone(), name.clone());
            }
        }
        asset.name = name;
        assets.push(asset);
    }

    (assets, renamed)
}

fn follow_rename(reference: &mut Option<String>, renamed: &HashMap<String, String>) {
    let Some(name) = reference.as_deref().and_then(|r| renamed.get(r)).cloned() else {
        return;
    };
    *reference = Some(name);
}
