//! `folio dev`: re-validate the project whenever its files change

use anyhow::{Context, Result};
use folio_site::{Page, SectionComposer};
use notify::{EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use crate::config::{FolioConfig, Project};

/// Load config and content, then compose the page
pub fn build_page(root: &Path) -> Result<(Project, Page)> {
    let project = FolioConfig::load_from_dir(root)?;
    let portfolio = project.load_content()?;
    let page = SectionComposer::new(project.config.layout)
        .compose(&portfolio)
        .with_context(|| format!("Failed to compose {}", project.content_path().display()))?;
    Ok((project, page))
}

/// Watch the project until the process is interrupted
pub fn run(root: &Path) -> Result<()> {
    // Watchers report absolute paths
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    let (project, page) = build_page(&root)?;
    report(&page);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to start file watcher")?;

    let watched = watch_targets(&project.watch_paths());
    for path in &watched {
        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", path.display()))?;
    }
    let relevant: BTreeSet<PathBuf> = project.watch_paths().into_iter().collect();
    let debounce = Duration::from_millis(project.config.dev.debounce_ms);
    tracing::info!(paths = watched.len(), "Watching for changes (Ctrl+C to stop)");

    loop {
        let first = rx.recv().context("File watcher stopped")?;
        let mut changed = is_relevant(first, &relevant);

        // Drain the burst an editor save produces
        loop {
            match rx.recv_timeout(debounce) {
                Ok(event) => changed |= is_relevant(event, &relevant),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("File watcher stopped")
                }
            }
        }

        if !changed {
            continue;
        }
        match build_page(&root) {
            Ok((_, page)) => report(&page),
            Err(e) => tracing::warn!("{:#}", e),
        }
    }
}

fn report(page: &Page) {
    tracing::info!(
        sections = page.sections.len(),
        slots = page.slot_count(),
        height = page.height,
        "Page ok"
    );
}

/// Directories to register with the watcher
///
/// Files are watched through their parent directory so that editors which
/// replace the file on save keep being noticed.
fn watch_targets(paths: &[PathBuf]) -> Vec<PathBuf> {
    let dirs: BTreeSet<PathBuf> = paths
        .iter()
        .map(|path| {
            if path.is_dir() {
                path.clone()
            } else {
                path.parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            }
        })
        .collect();
    dirs.into_iter().collect()
}

fn is_relevant(event: notify::Result<notify::Event>, relevant: &BTreeSet<PathBuf>) -> bool {
    match event {
        Ok(event) => {
            matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) && event.paths.iter().any(|path| {
                relevant.contains(path)
                    || relevant
                        .iter()
                        .any(|watched| watched.is_dir() && path.starts_with(watched))
            })
        }
        Err(e) => {
            tracing::warn!("Watch error: {}", e);
            false
        }
    }
}
