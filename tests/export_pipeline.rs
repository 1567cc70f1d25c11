//! End-to-end export tests
//!
//! Loads a saved project, generates the sketch and header, and reads the
//! packaged zip back to check its layout and payloads.

use std::io::{Cursor, Read};

use screenforge::{
    generate_firmware, generate_header, AssetPackager, DriftReport, ElementKind, ForgeConfig, Project,
    PrototypeService,
};
use zip::ZipArchive;

fn two_screens() -> Project {
    Project::from_json(include_str!("fixtures/two_screens.json")).unwrap()
}

fn read_entry(bytes: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).unwrap();
    contents
}

// =============================================================================
// Sketch generation
// =============================================================================

#[test]
fn test_single_fill_rect_screen() {
    let mut service = PrototypeService::new(ForgeConfig::default());
    let id = service
        .add_element_of("screen_1", ElementKind::FillRect, None)
        .unwrap()
        .id;
    service.patch_element(
        &id,
        serde_json::json!({ "x": 10, "y": 10, "w": 80, "h": 40, "color": "#38bdf8" })
            .as_object()
            .unwrap(),
    );

    let sketch = service.generate_source();
    assert_eq!(sketch.item_count, 1);
    assert!(sketch.code.contains("void draw_Home() {\n"));
    assert!(sketch.code.contains("    tft.fillRect(10, 10, 80, 40, 0x35DE);\n"));
}

#[test]
fn test_fixture_sketch() {
    let project = two_screens();
    let sketch = generate_firmware(&project, &ForgeConfig::default());

    assert_eq!(sketch.item_count, 2);
    let code = &sketch.code;

    assert!(code.starts_with("#include <TFT_eSPI.h>\n"));
    assert!(code.contains("#include \"images.h\"\n"));

    // Home: color background, then elements in list order
    let home = code.find("void draw_Home() {").unwrap();
    let page = code.find("void draw_a2nd_page() {").unwrap();
    assert!(home < page);

    let home_body = &code[home..page];
    let fill = home_body.find("tft.fillScreen(0x0000);").unwrap();
    let header = home_body.find("tft.fillRect(10, 10, 80, 40, 0x35DE);").unwrap();
    let label = home_body.find("tft.drawCentreString(\"Welcome\", 120, 100, 2);").unwrap();
    let logo = home_body.find("tft.pushImage(88, 150, 64, 64, Logo);").unwrap();
    assert!(fill < header && header < label && label < logo);
    assert!(home_body.contains("tft.setTextColor(0xFFFF); tft.setTextSize(2);"));

    // Asset background wins over the color
    let page_body = &code[page..];
    assert!(page_body.contains("    TJpgDec.drawFsJpg(0, 0, \"/Bg.jpg\", LittleFS);\n"));
    assert!(!page_body.contains("tft.fillScreen(0xF800);"));
    assert!(page_body.contains("    tft.fillCircle(120, 120, 30, 0x07E0);\n"));

    assert!(code.contains("    tft.setRotation(0);\n"));
    assert!(code.ends_with("void loop() { /* Logic here */ }\n"));
}

#[test]
fn test_generation_is_deterministic() {
    let project = two_screens();
    let config = ForgeConfig::default();

    let first = generate_firmware(&project, &config);
    let second = generate_firmware(&project, &config);
    assert_eq!(first.code, second.code);
    assert_eq!(first.checksum(), second.checksum());

    assert_eq!(generate_header(&project, &config).code, generate_header(&project, &config).code);
}

#[test]
fn test_generation_does_not_mutate_project() {
    let project = two_screens();
    let before = project.clone();
    let _ = generate_firmware(&project, &ForgeConfig::default());
    let _ = AssetPackager::new(&ForgeConfig::default()).package(&project).unwrap();
    assert_eq!(project, before);
}

#[test]
fn test_config_changes_sketch() {
    let project = two_screens();
    let mut config = ForgeConfig::default();
    config.display.rotation = 2;
    config.export.header_name = "assets.h".to_string();

    let sketch = generate_firmware(&project, &config);
    assert!(sketch.code.contains("    tft.setRotation(2);\n"));
    assert!(sketch.code.contains("#include \"assets.h\"\n"));

    let header = generate_header(&project, &config);
    assert!(header.code.starts_with("#ifndef ASSETS_H\n"));
}

// =============================================================================
// Header
// =============================================================================

#[test]
fn test_fixture_header() {
    let header = generate_header(&two_screens(), &ForgeConfig::default());
    assert_eq!(header.item_count, 1);
    assert!(header.code.contains("// Image: Logo (64x64)\n"));
    assert!(header.code.contains("const uint16_t Logo[] PROGMEM = {\n"));
    assert!(!header.code.contains("Bg[]"));
}

// =============================================================================
// Packaging
// =============================================================================

#[test]
fn test_package_layout() {
    let config = ForgeConfig::default();
    let archive = AssetPackager::new(&config).package(&two_screens()).unwrap();

    assert_eq!(
        archive.entries,
        vec!["ScreenForge_Project.ino", "images.h", "data/Bg.jpg"]
    );
    assert_eq!(archive.skipped_assets, vec!["Broken"]);

    let zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice())).unwrap();
    assert_eq!(zip.len(), 3);

    assert_eq!(read_entry(&archive.bytes, "data/Bg.jpg"), b"ABC");

    let sketch = read_entry(&archive.bytes, "ScreenForge_Project.ino");
    let expected = generate_firmware(&two_screens(), &config);
    assert_eq!(String::from_utf8(sketch).unwrap(), expected.code);
}

#[test]
fn test_package_is_byte_identical() {
    let service = PrototypeService::with_project(two_screens(), ForgeConfig::default());
    let first = service.export_archive().unwrap();
    let second = service.export_archive().unwrap();
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.checksum(), second.checksum());
}

#[test]
fn test_package_writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.zip");

    let service = PrototypeService::with_project(two_screens(), ForgeConfig::default());
    let archive = service.export_archive().unwrap();
    archive.write_to(&path).unwrap();

    let on_disk = std::fs::read(&path).unwrap();
    assert!(archive.checksum().matches(&on_disk));
}

#[test]
fn test_package_custom_data_dir() {
    let mut config = ForgeConfig::default();
    config.export.sketch_name = "Watch".to_string();
    config.export.data_dir = "fs".to_string();

    let archive = AssetPackager::new(&config).package(&two_screens()).unwrap();
    assert_eq!(archive.entries, vec!["Watch.ino", "images.h", "fs/Bg.jpg"]);
}

#[test]
fn test_duplicate_asset_names_package_cleanly() {
    let project = Project::from_json(include_str!("fixtures/duplicate_assets.json")).unwrap();

    // Raw snapshot: symbols are still distinct
    let raw = AssetPackager::new(&ForgeConfig::default()).package(&project).unwrap();
    assert_eq!(raw.entries[2..], ["data/Bg.jpg", "data/Bg_1.jpg"]);

    // Through the service: names are normalized on load, references kept
    let service = PrototypeService::with_project(project, ForgeConfig::default());
    let names: Vec<_> = service.project().assets.iter().map(|a| a.name.clone()).collect();
    assert_eq!(names, vec!["Bg", "Bg_1", "Logo", "Logo_1"]);

    let archive = service.export_archive().unwrap();
    assert_eq!(read_entry(&archive.bytes, "data/Bg.jpg"), b"ABC");
    assert_eq!(read_entry(&archive.bytes, "data/Bg_1.jpg"), b"DEF");

    let header = service.generate_header().code;
    assert_eq!(header.matches("const uint16_t Logo[] PROGMEM").count(), 1);
    assert_eq!(header.matches("const uint16_t Logo_1[] PROGMEM").count(), 1);

    let sketch = service.generate_source().code;
    assert!(sketch.contains("    TJpgDec.drawFsJpg(0, 0, \"/Bg.jpg\", LittleFS);\n"));
    assert!(sketch.contains("    tft.pushImage(0, 0, 32, 32, Logo);\n"));
}

// =============================================================================
// Drift
// =============================================================================

#[test]
fn test_drift_after_edit() {
    let mut service = PrototypeService::with_project(two_screens(), ForgeConfig::default());
    let checked_in = service.generate_source().code;

    assert!(DriftReport::compare(&checked_in, &service.generate_source().code, "sketch").is_clean());

    service.patch_element("el_1", serde_json::json!({ "x": "12" }).as_object().unwrap());
    let report = DriftReport::compare(&checked_in, &service.generate_source().code, "sketch");
    assert!(!report.is_clean());
    assert_eq!(report.lines_added, 1);
    assert_eq!(report.lines_removed, 1);
    assert!(report.unified_diff.contains("+    tft.fillRect(12, 10, 80, 40, 0x35DE);"));
}
