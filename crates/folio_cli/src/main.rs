//! Folio CLI
//!
//! Scaffold, validate, preview, and watch animated portfolio pages.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod dev;
mod preview;
mod project;

use config::{OutputFormat, CONFIG_FILE};
use folio_site::Placement;
use preview::PreviewOptions;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio animated portfolio CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a Folio project with sample content
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate configuration and content, then compose the page
    Check {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the composed sections and their slots
    Sections {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Play the page with a scripted scroll and print every frame
    Preview {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Scroll speed in pixels per second
        #[arg(long)]
        scroll_speed: Option<f32>,

        /// Preview length in milliseconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Frames per second
        #[arg(long)]
        fps: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Pace frames in wall-clock time instead of stepping
        #[arg(long)]
        realtime: bool,
    },

    /// Watch the project and re-validate on every change
    Dev {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so preview output can be piped
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { path, name } => cmd_init(&path, name),
        Commands::Check { path } => cmd_check(&path),
        Commands::Sections { path } => cmd_sections(&path),
        Commands::Preview {
            path,
            scroll_speed,
            duration,
            fps,
            format,
            realtime,
        } => {
            let project = config::FolioConfig::load_from_dir(&path)?;
            let defaults = &project.config.preview;
            let options = PreviewOptions {
                scroll_speed: scroll_speed.unwrap_or(defaults.scroll_speed),
                duration_ms: duration.unwrap_or(defaults.duration_ms),
                fps: fps.unwrap_or(defaults.fps),
                format: format.unwrap_or(defaults.format),
                realtime,
            };
            cmd_preview(&path, &options)
        }
        Commands::Dev { path } => dev::run(&path),
    }
}

fn cmd_init(path: &Path, name: Option<String>) -> Result<()> {
    if path.join(CONFIG_FILE).exists() {
        anyhow::bail!(
            "{} already exists in {}",
            CONFIG_FILE,
            path.display()
        );
    }

    let name = match name {
        Some(name) => name,
        None => project_name(path)?,
    };

    project::create_project(path, &name)?;
    info!("Created Folio project '{}' in {}", name, path.display());
    info!("Edit portfolio.toml, then run `folio preview`");
    Ok(())
}

fn project_name(path: &Path) -> Result<String> {
    let absolute = if path.exists() {
        path.canonicalize()?
    } else {
        path.to_path_buf()
    };
    Ok(absolute
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("portfolio")
        .to_string())
}

fn cmd_check(path: &Path) -> Result<()> {
    let (project, page) = dev::build_page(path)?;

    info!("Project: {}", project.config.project.name);
    info!(
        "{} sections, {} slots, page height {:.0}px",
        page.sections.len(),
        page.slot_count(),
        page.height
    );
    info!(
        "Viewport {:.0}x{:.0}",
        page.viewport.width, page.viewport.height
    );
    info!("Check passed");
    Ok(())
}

fn cmd_sections(path: &Path) -> Result<()> {
    let (_, page) = dev::build_page(path)?;

    if !page.nav.is_empty() {
        let nav: Vec<String> = page
            .nav
            .iter()
            .map(|(label, id)| format!("{label} -> #{id}"))
            .collect();
        println!("nav: {}", nav.join(", "));
    }

    for section in &page.sections {
        println!(
            "#{:<12} {:<8} y={:>7.0} h={:>6.0}",
            section.id,
            section.kind.name(),
            section.rect.y,
            section.rect.height
        );
        for slot in &section.slots {
            let placement = match slot.placement {
                Placement::Flow => "",
                Placement::Fill => " fill",
                Placement::Anchor { .. } => " anchor",
            };
            println!(
                "  {:<28} {:<12} y={:>7.0} h={:>5.0}{}",
                slot.id,
                slot.motion.kind(),
                slot.rect.y,
                slot.rect.height,
                placement
            );
        }
    }

    for slot in &page.overlay {
        println!(
            "overlay {:<20} {:<12} y={:>4.0}",
            slot.id,
            slot.motion.kind(),
            slot.rect.y
        );
    }
    Ok(())
}

fn cmd_preview(path: &Path, options: &PreviewOptions) -> Result<()> {
    let (_, page) = dev::build_page(path)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = preview::run(page, options, &mut out)?;
    info!(
        frames = summary.frames,
        reveals = summary.reveals,
        "Preview finished"
    );
    Ok(())
}
