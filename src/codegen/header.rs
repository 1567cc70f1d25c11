//! Asset Header Emitter
//!
//! Declares one `PROGMEM` array per flash-resident asset. Pixel data is a
//! single-entry placeholder until an image encoder exists; the array still
//! compiles and keeps the symbol referenced by the sketch.

use crate::model::StorageKind;

use super::names::sanitize_identifier;
use super::{EmitContext, GeneratedOutput};

pub fn emit_header(ctx: &EmitContext<'_>) -> GeneratedOutput {
    let guard = include_guard(&ctx.config.export.header_name);
    let mut output = String::new();
    let mut array_count = 0;

    output.push_str(&format!("#ifndef {}\n", guard));
    output.push_str(&format!("#define {}\n", guard));
    output.push_str("#include <pgmspace.h>\n");
    output.push('\n');

    for (position, asset) in ctx.project.assets.iter().enumerate() {
        if asset.storage_type != StorageKind::Flash {
            continue;
        }
        let Some(symbol) = ctx.symbols.at(position) else {
            continue;
        };
        output.push_str(&format!("// Image: {} ({}x{})\n", symbol, asset.width, asset.height));
        output.push_str(&format!("const uint16_t {}[] PROGMEM = {{\n", symbol));
        output.push_str("    // RGB565 data placeholder\n");
        output.push_str("    0x0000\n");
        output.push_str("};\n");
        output.push('\n');
        array_count += 1;
    }

    output.push_str("#endif\n");

    GeneratedOutput {
        code: output,
        item_count: array_count,
    }
}

/// `images.h` -> `IMAGES_H`
fn include_guard(header_name: &str) -> String {
    sanitize_identifier(header_name, "images_h").to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;
    use crate::model::{Asset, Project};

    #[test]
    fn test_only_flash_assets_declared() {
        let mut project = Project::default();
        project.assets.push(Asset {
            width: 32,
            height: 16,
            ..Asset::new("icon", "", StorageKind::Flash)
        });
        project.assets.push(Asset::new("photo", "", StorageKind::LittleFs));

        let config = ForgeConfig::default();
        let output = emit_header(&EmitContext::new(&project, &config));

        assert_eq!(output.item_count, 1);
        assert_eq!(
            output.code,
            "#ifndef IMAGES_H\n#define IMAGES_H\n#include <pgmspace.h>\n\n\
             // Image: icon (32x16)\n\
             const uint16_t icon[] PROGMEM = {\n    // RGB565 data placeholder\n    0x0000\n};\n\n\
             #endif\n"
        );
    }

    #[test]
    fn test_empty_header_is_valid() {
        let project = Project::default();
        let config = ForgeConfig::default();
        let output = emit_header(&EmitContext::new(&project, &config));
        assert_eq!(output.item_count, 0);
        assert!(output.code.starts_with("#ifndef IMAGES_H\n"));
        assert!(output.code.ends_with("#endif\n"));
    }

    #[test]
    fn test_duplicate_names_declare_distinct_arrays() {
        let mut project = Project::default();
        project.assets.push(Asset::new("Logo", "", StorageKind::Flash));
        project.assets.push(Asset::new("Logo", "", StorageKind::Flash));

        let config = ForgeConfig::default();
        let output = emit_header(&EmitContext::new(&project, &config));

        assert_eq!(output.item_count, 2);
        assert_eq!(output.code.matches("const uint16_t Logo[] PROGMEM").count(), 1);
        assert_eq!(output.code.matches("const uint16_t Logo_1[] PROGMEM").count(), 1);
    }

    #[test]
    fn test_include_guard() {
        assert_eq!(include_guard("images.h"), "IMAGES_H");
        assert_eq!(include_guard("my-assets.hpp"), "MY_ASSETS_HPP");
    }
}
