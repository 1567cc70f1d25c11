//! ScreenForge
//!
//! Designs UI screens for small TFT displays (240x240 by default) and
//! compiles them into a ready-to-build Arduino sketch using TFT_eSPI.
//!
//! ## Features
//!
//! - **Prototype Aggregate**: Screens, elements and assets with indexed lookup
//! - **Code Generation**: One `draw_<Screen>()` routine per screen, RGB565 colors
//! - **Asset Packaging**: Zip bundle with sketch, `images.h` and LittleFS data
//! - **Drift Checks**: Diff a checked-in sketch against a fresh export
//!
//! ## Export Layout
//!
//! ```text
//! ScreenForge_Project.ino
//! images.h
//! data/
//! ├── Splash.jpg
//! └── Icons.jpg
//! ```

pub mod aggregate;
pub mod checksum;
pub mod codegen;
pub mod color;
pub mod config;
pub mod drift;
pub mod error;
pub mod index;
pub mod kind;
pub mod model;
pub mod package;
pub mod sequence;
pub mod service;
pub mod template;

pub use aggregate::{PrototypeAggregate, ScreenRecord};
pub use checksum::Checksum;
pub use codegen::{generate_firmware, generate_header, GeneratedOutput};
pub use color::{html_to_565, Rgb565};
pub use config::ForgeConfig;
pub use drift::DriftReport;
pub use error::{ForgeError, Result};
pub use kind::ElementKind;
pub use model::{Asset, Element, Project, Screen, StorageKind};
pub use package::{AssetPackager, PackagedArchive};
pub use service::PrototypeService;
pub use template::ScreenTemplate;
