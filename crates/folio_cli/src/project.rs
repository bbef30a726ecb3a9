//! Project scaffolding
//!
//! `folio init` writes:
//! - folio.toml      - Project, layout, preview, and dev settings
//! - portfolio.toml  - Page content, seeded from the built-in sample

use anyhow::Result;
use folio_site::content::SAMPLE_TOML;
use std::fs;
use std::path::Path;

use crate::config::{FolioConfig, CONFIG_FILE};

/// Create a new Folio project in `path`
pub fn create_project(path: &Path, name: &str) -> Result<()> {
    fs::create_dir_all(path)?;

    let config = FolioConfig::new(name);
    fs::write(path.join(CONFIG_FILE), config.to_toml()?)?;
    fs::write(path.join(&config.project.content), SAMPLE_TOML)?;

    fs::write(
        path.join(".gitignore"),
        "# Preview captures\n*.jsonl\n",
    )?;

    tracing::debug!(path = %path.display(), "Project files written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_loads_back() {
        let dir = std::env::temp_dir().join(format!("folio-init-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        create_project(&dir, "demo").unwrap();
        let project = FolioConfig::load_from_dir(&dir).unwrap();
        assert_eq!(project.config.project.name, "demo");

        let portfolio = project.load_content().unwrap();
        assert_eq!(portfolio.owner.name, "Alex Chen");

        fs::remove_dir_all(&dir).unwrap();
    }
}
