//! Code Generation
//!
//! Compiles a [`Project`] snapshot into Arduino/TFT_eSPI source text.
//!
//! Architecture:
//! - EmitContext: borrowed, read-only view of the project plus resolved symbols
//! - AssetSymbols: one C identifier per asset, computed once in asset order
//! - Emitters: `firmware` (sketch with one draw routine per screen) and
//!   `header` (PROGMEM asset declarations)
//!
//! Generation is a pure function of the project and config: no clocks, no
//! randomness, and iteration only in list order, so the same input always
//! yields byte-identical text.

pub mod firmware;
pub mod header;
pub mod names;

use std::collections::HashMap;

use crate::checksum::Checksum;
use crate::config::ForgeConfig;
use crate::model::{Asset, Project};

use names::IdentifierPool;

// =============================================================================
// Asset Symbols
// =============================================================================

/// Identifier for every asset, in asset order.
///
/// Names added through the aggregate are already identifier-safe and map to
/// themselves. Every asset claims its own identifier, so two assets sharing a
/// name in a hand-edited project still get distinct symbols; lookups by name
/// resolve to the first of them.
#[derive(Debug, Clone, Default)]
pub struct AssetSymbols {
    symbols: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl AssetSymbols {
    pub fn build(assets: &[Asset]) -> Self {
        let mut pool = IdentifierPool::new("asset");
        let mut symbols = Vec::with_capacity(assets.len());
        let mut by_name = HashMap::new();
        for (position, asset) in assets.iter().enumerate() {
            symbols.push(pool.claim(&asset.name));
            by_name.entry(asset.name.clone()).or_insert(position);
        }
        Self { symbols, by_name }
    }

    /// Symbol of the first asset called `asset_name`
    pub fn get(&self, asset_name: &str) -> Option<&str> {
        self.by_name.get(asset_name).and_then(|&position| self.at(position))
    }

    /// Symbol of the asset at `position` in the project's asset list
    pub fn at(&self, position: usize) -> Option<&str> {
        self.symbols.get(position).map(String::as_str)
    }
}

// =============================================================================
// EmitContext
// =============================================================================

/// Everything an emitter may read. Emitters never mutate the project.
pub struct EmitContext<'a> {
    pub project: &'a Project,
    pub config: &'a ForgeConfig,
    pub symbols: AssetSymbols,
}

impl<'a> EmitContext<'a> {
    pub fn new(project: &'a Project, config: &'a ForgeConfig) -> Self {
        Self {
            project,
            config,
            symbols: AssetSymbols::build(&project.assets),
        }
    }

    /// Resolve an asset reference to the asset and its emitted identifier
    pub fn resolve_asset(&self, name: &str) -> Option<(&'a Asset, &str)> {
        let asset = self.project.asset(name)?;
        let symbol = self.symbols.get(name)?;
        Some((asset, symbol))
    }
}

// =============================================================================
// Generated Output
// =============================================================================

/// Output from code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Generated code as a string
    pub code: String,
    /// Number of draw routines (sketch) or arrays (header) emitted
    pub item_count: usize,
}

impl GeneratedOutput {
    pub fn checksum(&self) -> Checksum {
        Checksum::from_str(&self.code)
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Generate the main sketch
pub fn generate_firmware(project: &Project, config: &ForgeConfig) -> GeneratedOutput {
    let ctx = EmitContext::new(project, config);
    firmware::emit_sketch(&ctx)
}

/// Generate the PROGMEM asset header
pub fn generate_header(project: &Project, config: &ForgeConfig) -> GeneratedOutput {
    let ctx = EmitContext::new(project, config);
    header::emit_header(&ctx)
}
