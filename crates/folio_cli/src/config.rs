//! Folio configuration file handling

use anyhow::{Context, Result};
use folio_site::{LayoutConfig, Portfolio};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "folio.toml";

/// Top-level Folio configuration (folio.toml)
#[derive(Debug, Deserialize, Serialize)]
pub struct FolioConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub dev: DevConfig,
}

/// Project metadata
#[derive(Debug, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub name: String,
    /// Content file (relative to the project root)
    #[serde(default = "default_content")]
    pub content: String,
}

fn default_content() -> String {
    "portfolio.toml".to_string()
}

/// Output format for `folio preview`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Scripted preview defaults
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    /// Scroll speed in pixels per second
    #[serde(default = "default_scroll_speed")]
    pub scroll_speed: f32,
    /// Total preview length
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_scroll_speed() -> f32 {
    400.0
}

fn default_duration_ms() -> u64 {
    8_000
}

fn default_fps() -> u32 {
    30
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            scroll_speed: default_scroll_speed(),
            duration_ms: default_duration_ms(),
            fps: default_fps(),
            format: OutputFormat::Text,
        }
    }
}

/// Watch configuration for `folio dev`
#[derive(Debug, Deserialize, Serialize)]
pub struct DevConfig {
    /// Quiet period before re-validating after a change
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Additional files or directories to watch
    #[serde(default)]
    pub watch: Vec<String>,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            watch: Vec::new(),
        }
    }
}

/// A loaded project: configuration plus where it lives
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub config: FolioConfig,
}

impl Project {
    pub fn content_path(&self) -> PathBuf {
        self.root.join(&self.config.project.content)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Read and validate the content file
    pub fn load_content(&self) -> Result<Portfolio> {
        let path = self.content_path();
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Portfolio::from_toml_str(&text)
            .with_context(|| format!("Invalid content in {}", path.display()))
    }

    /// Every path `folio dev` should watch
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.config_path(), self.content_path()];
        paths.extend(self.config.dev.watch.iter().map(|p| self.root.join(p)));
        paths
    }
}

impl FolioConfig {
    /// Load a project from a directory (looks for folio.toml)
    pub fn load_from_dir(path: &Path) -> Result<Project> {
        let (root, config_path) = if path.is_file() {
            let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (root, path.to_path_buf())
        } else {
            (path.to_path_buf(), path.join(CONFIG_FILE))
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found in {}. Run `folio init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Project { root, config })
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: FolioConfig = toml::from_str(text)?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Create a new configuration with the given project name
    pub fn new(name: &str) -> Self {
        Self {
            project: ProjectConfig {
                name: name.to_string(),
                content: default_content(),
            },
            layout: LayoutConfig::default(),
            preview: PreviewConfig::default(),
            dev: DevConfig::default(),
        }
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
