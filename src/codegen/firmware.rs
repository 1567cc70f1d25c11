//! Sketch Emitter
//!
//! Emits the `.ino` file: fixed preamble, one `draw_<screen>()` routine per
//! screen in list order, then `setup()` and an empty `loop()`.
//!
//! Key constraints:
//! - Geometry math is integer and truncating, matching what the editor shows
//! - Every element kind has exactly one emission rule (exhaustive match)
//! - Text elements render their `name` as the on-screen label

use tracing::warn;

use crate::color::Rgb565;
use crate::kind::ElementKind;
use crate::model::{Element, Screen, StorageKind};

use super::names::{c_string_literal, IdentifierPool};
use super::{EmitContext, GeneratedOutput};

const INDENT: &str = "    ";

/// Font index passed to `drawCentreString`
const CENTRE_STRING_FONT: u8 = 2;

// =============================================================================
// Public API
// =============================================================================

pub fn emit_sketch(ctx: &EmitContext<'_>) -> GeneratedOutput {
    let mut output = String::new();
    emit_preamble(&mut output, ctx);

    let mut routines = IdentifierPool::new("screen");
    let mut routine_count = 0;
    for screen in &ctx.project.screens {
        let ident = routines.claim(&screen.name);
        emit_screen(&mut output, ctx, screen, &ident);
        routine_count += 1;
    }

    emit_setup(&mut output, ctx);

    GeneratedOutput {
        code: output,
        item_count: routine_count,
    }
}

/// Name of the draw routine for a sanitized screen identifier
pub fn routine_name(screen_ident: &str) -> String {
    format!("draw_{}", screen_ident)
}

// =============================================================================
// Preamble / Setup
// =============================================================================

fn emit_preamble(output: &mut String, ctx: &EmitContext<'_>) {
    output.push_str("#include <TFT_eSPI.h>\n");
    output.push_str("#include <LittleFS.h>\n");
    output.push_str("#include <TJpg_Decoder.h>\n");
    output.push_str(&format!("#include \"{}\"\n", ctx.config.export.header_name));
    output.push('\n');
    output.push_str("TFT_eSPI tft = TFT_eSPI();\n");
    output.push('\n');
    output.push_str("bool tft_output(int16_t x, int16_t y, uint16_t w, uint16_t h, uint16_t* bitmap) {\n");
    output.push_str("    if (y >= tft.height()) return false;\n");
    output.push_str("    tft.pushImage(x, y, w, h, bitmap);\n");
    output.push_str("    return true;\n");
    output.push_str("}\n");
    output.push('\n');
}

fn emit_setup(output: &mut String, ctx: &EmitContext<'_>) {
    output.push_str("void setup() {\n");
    output.push_str("    Serial.begin(115200);\n");
    output.push_str("    tft.init();\n");
    output.push_str(&format!("    tft.setRotation({});\n", ctx.config.display.rotation));
    output.push_str("    if(!LittleFS.begin()) { Serial.println(\"LittleFS Mount Failed\"); }\n");
    output.push_str("    TJpgDec.setJpgScale(1);\n");
    output.push_str("    TJpgDec.setCallback(tft_output);\n");
    output.push_str("}\n");
    output.push('\n');
    output.push_str("void loop() { /* Logic here */ }\n");
}

// =============================================================================
// Screens
// =============================================================================

fn emit_screen(output: &mut String, ctx: &EmitContext<'_>, screen: &Screen, ident: &str) {
    output.push_str(&format!("void {}() {{\n", routine_name(ident)));

    emit_background(output, ctx, screen);

    for element in &screen.elements {
        output.push_str(&format!("{}// Element: {}\n", INDENT, element.name));
        emit_element(output, ctx, element);
    }

    output.push_str("}\n");
    output.push('\n');
}

/// Asset background first, then background color, then nothing
fn emit_background(output: &mut String, ctx: &EmitContext<'_>, screen: &Screen) {
    if let Some(asset_name) = screen.background_asset.as_deref().filter(|n| !n.is_empty()) {
        match ctx.resolve_asset(asset_name) {
            Some((asset, symbol)) => {
                let display = &ctx.config.display;
                let line = match asset.storage_type {
                    StorageKind::LittleFs => jpg_from_fs(symbol, 0, 0),
                    StorageKind::Flash => format!(
                        "tft.pushImage(0, 0, {}, {}, {});",
                        display.width, display.height, symbol
                    ),
                };
                output.push_str(&format!("{}{}\n", INDENT, line));
                return;
            }
            None => {
                warn!(screen = %screen.id, asset = %asset_name, "Background asset not found; using background color");
            }
        }
    }

    if let Some(color) = screen.background_color.as_deref().filter(|c| !c.is_empty()) {
        output.push_str(&format!("{}tft.fillScreen({});\n", INDENT, Rgb565::from_html(color)));
    }
}

// =============================================================================
// Elements
// =============================================================================

fn emit_element(output: &mut String, ctx: &EmitContext<'_>, el: &Element) {
    let color = Rgb565::from_html(&el.color);
    // Widened so derived coordinates (x + w, y + h / 2, ...) cannot overflow
    let (x, y, w, h) = (i64::from(el.x), i64::from(el.y), i64::from(el.w), i64::from(el.h));
    let radius = ctx.config.display.corner_radius;

    let line = match el.kind {
        ElementKind::FillRect | ElementKind::DrawRect => {
            format!("tft.{}({}, {}, {}, {}, {});", el.kind, x, y, w, h, color)
        }
        ElementKind::FillRoundRect | ElementKind::DrawRoundRect => {
            format!("tft.{}({}, {}, {}, {}, {}, {});", el.kind, x, y, w, h, radius, color)
        }
        ElementKind::FillCircle | ElementKind::DrawCircle => {
            let r = w.min(h) / 2;
            format!("tft.{}({}, {}, {}, {});", el.kind, x + w / 2, y + h / 2, r, color)
        }
        ElementKind::FillEllipse | ElementKind::DrawEllipse => {
            format!(
                "tft.{}({}, {}, {}, {}, {});",
                el.kind,
                x + w / 2,
                y + h / 2,
                w / 2,
                h / 2,
                color
            )
        }
        ElementKind::FillTriangle | ElementKind::DrawTriangle => {
            // Apex at top-center, base along the bottom edge
            format!(
                "tft.{}({}, {}, {}, {}, {}, {}, {});",
                el.kind,
                x + w / 2,
                y,
                x,
                y + h,
                x + w,
                y + h,
                color
            )
        }
        ElementKind::DrawLine => {
            format!("tft.drawLine({}, {}, {}, {}, {});", x, y, x + w, y + h, color)
        }
        ElementKind::DrawFastHLine => format!("tft.drawFastHLine({}, {}, {}, {});", x, y, w, color),
        ElementKind::DrawFastVLine => format!("tft.drawFastVLine({}, {}, {}, {});", x, y, h, color),
        ElementKind::DrawPixel => format!("tft.drawPixel({}, {}, {});", x, y, color),
        ElementKind::FillScreen => format!("tft.fillScreen({});", color),
        ElementKind::DrawString | ElementKind::DrawCentreString => {
            output.push_str(&format!(
                "{}tft.setTextColor({}); tft.setTextSize({});\n",
                INDENT,
                color,
                (h / 8).max(1)
            ));
            let text = c_string_literal(&el.name);
            if el.kind == ElementKind::DrawCentreString {
                format!(
                    "tft.drawCentreString(\"{}\", {}, {}, {});",
                    text,
                    x + w / 2,
                    y,
                    CENTRE_STRING_FONT
                )
            } else {
                format!("tft.drawString(\"{}\", {}, {});", text, x, y)
            }
        }
        ElementKind::PushImage => image_blit(ctx, el),
    };

    output.push_str(&format!("{}{}\n", INDENT, line));
}

fn image_blit(ctx: &EmitContext<'_>, el: &Element) -> String {
    let Some(asset_name) = el.asset.as_deref().filter(|n| !n.is_empty()) else {
        return "// pushImage skipped: no asset".to_string();
    };
    match ctx.resolve_asset(asset_name) {
        Some((asset, symbol)) => match asset.storage_type {
            StorageKind::Flash => format!("tft.pushImage({}, {}, {}, {}, {});", el.x, el.y, el.w, el.h, symbol),
            StorageKind::LittleFs => jpg_from_fs(symbol, el.x, el.y),
        },
        None => {
            warn!(element = %el.id, asset = %asset_name, "Image asset not found");
            format!("// pushImage skipped: asset '{}' not found", c_string_literal(asset_name))
        }
    }
}

fn jpg_from_fs(symbol: &str, x: i32, y: i32) -> String {
    format!("TJpgDec.drawFsJpg({}, {}, \"/{}.jpg\", LittleFS);", x, y, symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;
    use crate::model::{Asset, Project};

    fn element(kind: ElementKind, x: i32, y: i32, w: i32, h: i32) -> Element {
        Element {
            id: "el_1".to_string(),
            kind,
            name: format!("{}_1", kind),
            x,
            y,
            w,
            h,
            color: "#ff0000".to_string(),
            ..Default::default()
        }
    }

    fn emit_one(project: &Project, el: &Element) -> String {
        let config = ForgeConfig::default();
        let ctx = EmitContext::new(project, &config);
        let mut out = String::new();
        emit_element(&mut out, &ctx, el);
        out
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let project = Project::default();
        assert_eq!(
            emit_one(&project, &element(ElementKind::FillCircle, i32::MAX, 0, 10, 10)),
            "    tft.fillCircle(2147483652, 5, 5, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawTriangle, i32::MAX, i32::MAX, i32::MAX, i32::MAX)),
            "    tft.drawTriangle(3221225470, 2147483647, 2147483647, 4294967294, 4294967294, 4294967294, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawLine, i32::MIN, 0, i32::MIN, 0)),
            "    tft.drawLine(-2147483648, 0, -4294967296, 0, 0xF800);\n"
        );
    }

    #[test]
    fn test_rect_rules() {
        let project = Project::default();
        assert_eq!(
            emit_one(&project, &element(ElementKind::FillRect, 10, 10, 80, 40)),
            "    tft.fillRect(10, 10, 80, 40, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::FillRoundRect, 1, 2, 3, 4)),
            "    tft.fillRoundRect(1, 2, 3, 4, 8, 0xF800);\n"
        );
    }

    #[test]
    fn test_circle_uses_bounding_box() {
        let project = Project::default();
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawCircle, 10, 20, 60, 41)),
            "    tft.drawCircle(40, 40, 20, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::FillEllipse, 0, 0, 80, 40)),
            "    tft.fillEllipse(40, 20, 40, 20, 0xF800);\n"
        );
    }

    #[test]
    fn test_triangle_points_up() {
        let project = Project::default();
        assert_eq!(
            emit_one(&project, &element(ElementKind::FillTriangle, 10, 10, 80, 40)),
            "    tft.fillTriangle(50, 10, 10, 50, 90, 50, 0xF800);\n"
        );
    }

    #[test]
    fn test_lines_and_pixels() {
        let project = Project::default();
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawLine, 0, 0, 10, 5)),
            "    tft.drawLine(0, 0, 10, 5, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawFastVLine, 3, 4, 10, 50)),
            "    tft.drawFastVLine(3, 4, 50, 0xF800);\n"
        );
        assert_eq!(
            emit_one(&project, &element(ElementKind::DrawPixel, 3, 4, 10, 50)),
            "    tft.drawPixel(3, 4, 0xF800);\n"
        );
    }

    #[test]
    fn test_text_uses_name_and_size() {
        let project = Project::default();
        let mut el = element(ElementKind::DrawCentreString, 20, 30, 100, 40);
        el.name = "Say \"hi\"".to_string();
        assert_eq!(
            emit_one(&project, &el),
            "    tft.setTextColor(0xF800); tft.setTextSize(5);\n    tft.drawCentreString(\"Say \\\"hi\\\"\", 70, 30, 2);\n"
        );

        let small = element(ElementKind::DrawString, 1, 2, 10, 4);
        assert_eq!(
            emit_one(&project, &small),
            "    tft.setTextColor(0xF800); tft.setTextSize(1);\n    tft.drawString(\"drawString_1\", 1, 2);\n"
        );
    }

    #[test]
    fn test_push_image_resolves_storage() {
        let mut project = Project::default();
        project.assets.push(Asset::new("icon", "", StorageKind::Flash));
        project.assets.push(Asset::new("photo", "", StorageKind::LittleFs));

        let mut el = element(ElementKind::PushImage, 5, 6, 32, 32);
        el.asset = Some("icon".to_string());
        assert_eq!(emit_one(&project, &el), "    tft.pushImage(5, 6, 32, 32, icon);\n");

        el.asset = Some("photo".to_string());
        assert_eq!(
            emit_one(&project, &el),
            "    TJpgDec.drawFsJpg(5, 6, \"/photo.jpg\", LittleFS);\n"
        );

        el.asset = None;
        assert_eq!(emit_one(&project, &el), "    // pushImage skipped: no asset\n");
    }

    #[test]
    fn test_background_precedence() {
        let config = ForgeConfig::default();
        let mut project = Project::default();
        project.assets.push(Asset::new("wall", "", StorageKind::Flash));

        let mut screen = Screen::new("screen_1", "Home");
        screen.background_color = Some("#0000ff".to_string());
        screen.background_asset = Some("wall".to_string());

        let ctx = EmitContext::new(&project, &config);
        let mut out = String::new();
        emit_background(&mut out, &ctx, &screen);
        assert_eq!(out, "    tft.pushImage(0, 0, 240, 240, wall);\n");

        screen.background_asset = Some("gone".to_string());
        let mut out = String::new();
        emit_background(&mut out, &ctx, &screen);
        assert_eq!(out, "    tft.fillScreen(0x001F);\n");

        screen.background_asset = None;
        screen.background_color = None;
        let mut out = String::new();
        emit_background(&mut out, &ctx, &screen);
        assert!(out.is_empty());
    }

    #[test]
    fn test_duplicate_screen_names_get_distinct_routines() {
        let mut project = Project::default();
        project.screens.push(Screen::new("screen_2", "Home"));
        project.screens.push(Screen::new("screen_3", "2nd page"));

        let config = ForgeConfig::default();
        let output = emit_sketch(&EmitContext::new(&project, &config));
        assert_eq!(output.item_count, 3);
        assert!(output.code.contains("void draw_Home() {"));
        assert!(output.code.contains("void draw_Home_1() {"));
        assert!(output.code.contains("void draw_a2nd_page() {"));
    }

    #[test]
    fn test_setup_uses_configured_rotation() {
        let project = Project::default();
        let mut config = ForgeConfig::default();
        config.display.rotation = 3;
        let output = emit_sketch(&EmitContext::new(&project, &config));
        assert!(output.code.contains("    tft.setRotation(3);\n"));
        assert!(output.code.ends_with("void loop() { /* Logic here */ }\n"));
    }
}
