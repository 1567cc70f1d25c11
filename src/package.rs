//! Export bundle packaging
//!
//! Produces a zip the Arduino IDE can open directly:
//!
//! ```text
//! <sketch_name>.ino      generated draw routines + setup/loop
//! images.h               PROGMEM declarations for flash assets
//! data/<asset>.jpg       one file per LittleFS asset
//! ```
//!
//! Entries are written in a fixed order with a fixed timestamp, so an
//! unchanged project always packages to the same bytes.

use std::io::{Cursor, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::checksum::Checksum;
use crate::codegen::{firmware, header, EmitContext};
use crate::config::ForgeConfig;
use crate::error::Result;
use crate::model::{Project, StorageKind};

/// Extension used for every LittleFS asset, whatever its source encoding
pub const DATA_EXTENSION: &str = "jpg";

/// A finished export archive
#[derive(Debug, Clone)]
pub struct PackagedArchive {
    /// Zip bytes
    pub bytes: Vec<u8>,
    /// Entry names in write order
    pub entries: Vec<String>,
    /// LittleFS assets left out because their payload was empty or invalid
    pub skipped_assets: Vec<String>,
}

impl PackagedArchive {
    pub fn checksum(&self) -> Checksum {
        Checksum::from_bytes(&self.bytes)
    }

    /// Write the archive to disk
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Bundles generated source and LittleFS payloads into one archive
pub struct AssetPackager<'a> {
    config: &'a ForgeConfig,
}

impl<'a> AssetPackager<'a> {
    pub fn new(config: &'a ForgeConfig) -> Self {
        Self { config }
    }

    /// Build the archive. Only archive/IO failures are errors.
    pub fn package(&self, project: &Project) -> Result<PackagedArchive> {
        let ctx = EmitContext::new(project, self.config);
        let sketch = firmware::emit_sketch(&ctx);
        let images = header::emit_header(&ctx);

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = Vec::new();
        let mut skipped_assets = Vec::new();

        let sketch_file = self.config.export.sketch_file();
        zip.start_file(sketch_file.as_str(), options)?;
        zip.write_all(sketch.code.as_bytes())?;
        entries.push(sketch_file);

        let header_file = self.config.export.header_name.clone();
        zip.start_file(header_file.as_str(), options)?;
        zip.write_all(images.code.as_bytes())?;
        entries.push(header_file);

        for (position, asset) in project.assets.iter().enumerate() {
            if asset.storage_type != StorageKind::LittleFs {
                continue;
            }
            let Some(symbol) = ctx.symbols.at(position) else {
                continue;
            };
            let Some(bytes) = decode_data_url(&asset.data_url) else {
                warn!(asset = %asset.name, "Skipping asset with empty or invalid payload");
                skipped_assets.push(asset.name.clone());
                continue;
            };

            let entry = format!("{}/{}.{}", self.config.export.data_dir, symbol, DATA_EXTENSION);
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&bytes)?;
            entries.push(entry);
        }

        let bytes = zip.finish()?.into_inner();
        info!(
            entries = entries.len(),
            skipped = skipped_assets.len(),
            size = bytes.len(),
            "Packaged project"
        );

        Ok(PackagedArchive {
            bytes,
            entries,
            skipped_assets,
        })
    }
}

/// Decode the payload of a data URL (`data:<mime>;base64,<payload>`).
///
/// Everything up to the first comma is dropped; input without a comma is
/// treated as bare base64. Returns `None` for empty or undecodable input.
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let payload = match data_url.split_once(',') {
        Some((_, rest)) => rest,
        None => data_url,
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }

    STANDARD.decode(payload).ok().filter(|bytes| !bytes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Asset;

    #[test]
    fn test_decode_data_url() {
        assert_eq!(decode_data_url("data:image/png;base64,QUJD"), Some(b"ABC".to_vec()));
        assert_eq!(decode_data_url("QUJD"), Some(b"ABC".to_vec()));
        assert_eq!(decode_data_url(""), None);
        assert_eq!(decode_data_url("data:image/png;base64,"), None);
        assert_eq!(decode_data_url("data:image/png;base64,!!not base64!!"), None);
    }

    #[test]
    fn test_duplicate_asset_names_package() {
        let mut project = Project::default();
        project.assets.push(Asset::new("Bg", "data:image/png;base64,QUJD", StorageKind::LittleFs));
        project.assets.push(Asset::new("Bg", "data:image/png;base64,REVG", StorageKind::LittleFs));

        let config = ForgeConfig::default();
        let archive = AssetPackager::new(&config).package(&project).unwrap();
        assert_eq!(
            archive.entries,
            vec!["ScreenForge_Project.ino", "images.h", "data/Bg.jpg", "data/Bg_1.jpg"]
        );
    }
}
