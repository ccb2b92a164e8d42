use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A candidate release folder: one immediate child directory of a scan root.
///
/// Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub path: PathBuf,
    pub name: String,
}

impl Folder {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Folders found under the scan roots, plus warnings for entries that
/// could not be read. Warned entries never reach the grouper.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub folders: Vec<Folder>,
    pub warnings: Vec<String>,
}

/// Collect candidate release folders from every root.
///
/// All roots are validated up front: a missing or non-directory root aborts
/// the run before any grouping or scoring happens, so no destructive action
/// can ever follow from a mistyped path. Unreadable entries inside a root
/// only produce warnings.
pub fn scan_roots(roots: &[PathBuf]) -> Result<ScanOutcome> {
    for root in roots {
        if !root.is_dir() {
            bail!(
                "scan root {} does not exist or is not a directory",
                root.display()
            );
        }
    }

    let mut outcome = ScanOutcome::default();
    for root in roots {
        collect_folders(root, &mut outcome);
    }

    // Deterministic processing order regardless of readdir order
    outcome.folders.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(outcome)
}

fn collect_folders(root: &Path, outcome: &mut ScanOutcome) {
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                outcome.warnings.push(format!(
                    "skipping unreadable entry under {}: {}",
                    root.display(),
                    err
                ));
                continue;
            }
        };

        // Loose files at the root are not release folders
        if entry.file_type().is_dir() {
            outcome.folders.push(Folder::new(entry.into_path()));
        }
    }
}
