//! ScreenForge CLI
//!
//! Compiles a saved project (JSON) into TFT_eSPI firmware artifacts.
//!
//! Usage:
//!   screenforge new project.json --template loading
//!   screenforge generate project.json --output sketch.ino
//!   screenforge package project.json --output export.zip
//!   screenforge check project.json --sketch ScreenForge_Project.ino

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use screenforge::{DriftReport, ForgeConfig, Project, PrototypeService};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "screenforge")]
#[command(about = "Compile TFT display prototypes into Arduino sketches")]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new single-screen project file
    New {
        /// Output path
        #[arg(default_value = "project.json")]
        output: PathBuf,

        /// Seed the first screen from a template (loading, menu)
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Generate the sketch (.ino)
    Generate {
        /// Project file
        project: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the PROGMEM asset header
    Header {
        /// Project file
        project: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Package sketch, header and LittleFS data into a zip
    Package {
        /// Project file
        project: PathBuf,

        /// Output archive
        #[arg(short, long, default_value = "export.zip")]
        output: PathBuf,
    },

    /// Compare an existing sketch against a fresh export
    Check {
        /// Project file
        project: PathBuf,

        /// Sketch on disk
        #[arg(short, long)]
        sketch: PathBuf,

        /// Print the unified diff on drift
        #[arg(long)]
        diff: bool,
    },

    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Write a default config file
    Init {
        #[arg(short, long, default_value = "screenforge.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ForgeConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::New { output, template } => {
            let mut service = PrototypeService::new(config);
            if let Some(template) = template.as_deref() {
                let home = service.aggregate().active_screen_id().to_string();
                if !service.apply_template(&home, template) {
                    eprintln!("Unknown template '{}', project left empty", template);
                }
            }
            let json = service.project().to_json_pretty()?;
            fs::write(&output, json).with_context(|| format!("writing {}", output.display()))?;
            println!("Created project: {}", output.display());
        }

        Commands::Generate { project, output } => {
            let service = open_project(&project, config)?;
            let sketch = service.generate_source();
            emit(&sketch.code, output.as_deref())?;
            eprintln!("{} screens, checksum {}", sketch.item_count, sketch.checksum().short());
        }

        Commands::Header { project, output } => {
            let service = open_project(&project, config)?;
            let header = service.generate_header();
            emit(&header.code, output.as_deref())?;
            eprintln!("{} flash assets, checksum {}", header.item_count, header.checksum().short());
        }

        Commands::Package { project, output } => {
            let service = open_project(&project, config)?;
            let archive = service.export_archive()?;
            archive.write_to(&output)?;

            println!("Packaged {}", output.display());
            for entry in &archive.entries {
                println!("  {}", entry);
            }
            for skipped in &archive.skipped_assets {
                println!("  skipped asset '{}' (empty or invalid payload)", skipped);
            }
            println!("Checksum: {}", archive.checksum());
        }

        Commands::Check { project, sketch, diff } => {
            let service = open_project(&project, config)?;
            let existing = fs::read_to_string(&sketch).with_context(|| format!("reading {}", sketch.display()))?;
            let generated = service.generate_source();

            let label = sketch.display().to_string();
            let report = DriftReport::compare(&existing, &generated.code, &label);
            if report.is_clean() {
                println!("No drift ({})", report.expected.short());
            } else {
                println!(
                    "Drift detected: +{} -{} lines (on disk {}, generated {})",
                    report.lines_added,
                    report.lines_removed,
                    report.actual.short(),
                    report.expected.short()
                );
                if diff {
                    print!("{}", report.unified_diff);
                }
                std::process::exit(2);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { toml } => {
                if toml {
                    println!("{}", ::toml::to_string_pretty(&config)?);
                } else {
                    println!("Display:");
                    println!("  Size: {}x{}", config.display.width, config.display.height);
                    println!("  Rotation: {}", config.display.rotation);
                    println!("  Corner radius: {}", config.display.corner_radius);
                    println!("\nExport:");
                    println!("  Sketch: {}", config.export.sketch_file());
                    println!("  Header: {}", config.export.header_name);
                    println!("  Data dir: {}", config.export.data_dir);
                }
            }
            ConfigAction::Init { output } => {
                ForgeConfig::default().save(&output)?;
                println!("Created config file: {}", output);
            }
        },
    }

    Ok(())
}

fn open_project(path: &Path, config: ForgeConfig) -> Result<PrototypeService> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let project = Project::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    Ok(PrototypeService::with_project(project, config))
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text).with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", text),
    }
    Ok(())
}
