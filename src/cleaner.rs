//! Deletion of duplicate folders from a computed resolution plan.
//!
//! This is the only module that touches the filesystem destructively, and
//! it runs strictly after resolution: the full plan for every group exists
//! before the first folder is removed, never interleaved with scanning or
//! scoring.

use crate::output::OutputMode;
use crate::resolver::ResolutionPlan;
use crate::utils;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// What a clean pass did, or would have done under dry-run.
#[derive(Debug, Default, Clone, Copy)]
pub struct CleanSummary {
    pub deleted: usize,
    pub failed: usize,
    pub bytes_freed: u64,
}

/// Delete every duplicate in the plan, keeping each group's keeper.
///
/// A failed deletion is reported and counted; the rest of the plan still
/// runs. Under `dry_run` nothing is touched and the summary reports what
/// would have been reclaimed.
pub fn clean(
    plans: &[ResolutionPlan],
    dry_run: bool,
    permanent: bool,
    mode: OutputMode,
) -> CleanSummary {
    let mut summary = CleanSummary::default();

    for plan in plans {
        for duplicate in &plan.duplicates {
            let path = &duplicate.folder.path;
            let size = utils::dir_size(path);

            if dry_run {
                if mode != OutputMode::Quiet {
                    println!(
                        "{}",
                        format!(
                            "[DRY RUN] Would delete {} (score {}, {})",
                            path.display(),
                            duplicate.score,
                            bytesize::to_string(size, false)
                        )
                        .yellow()
                    );
                }
                summary.deleted += 1;
                summary.bytes_freed = summary.bytes_freed.saturating_add(size);
                continue;
            }

            match delete_folder(path, permanent) {
                Ok(()) => {
                    if mode != OutputMode::Quiet {
                        println!(
                            "{}",
                            format!(
                                "Deleted {} (score {}, {})",
                                path.display(),
                                duplicate.score,
                                bytesize::to_string(size, false)
                            )
                            .red()
                        );
                    }
                    summary.deleted += 1;
                    summary.bytes_freed = summary.bytes_freed.saturating_add(size);
                }
                Err(err) => {
                    eprintln!("{}", format!("error: {:#}", err).red());
                    summary.failed += 1;
                }
            }
        }
    }

    summary
}

/// Recycle bin by default; `permanent` removes the tree outright.
fn delete_folder(path: &Path, permanent: bool) -> Result<()> {
    if permanent {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("failed to delete {}", path.display()))
    } else {
        trash::delete(path)
            .with_context(|| format!("failed to move {} to the recycle bin", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ScoredFolder;
    use crate::scanner::Folder;
    use std::fs;

    fn plan_for(keeper: &Path, duplicates: &[&Path]) -> ResolutionPlan {
        ResolutionPlan {
            group_key: "test".to_string(),
            keeper: ScoredFolder {
                folder: Folder::new(keeper.to_path_buf()),
                score: 100,
            },
            duplicates: duplicates
                .iter()
                .map(|p| ScoredFolder {
                    folder: Folder::new(p.to_path_buf()),
                    score: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let keeper = dir.path().join("Movie.2014.BluRay");
        let dupe = dir.path().join("Movie.2014.DVDRip");
        fs::create_dir(&keeper).unwrap();
        fs::create_dir(&dupe).unwrap();
        fs::write(dupe.join("movie.avi"), vec![0u8; 64]).unwrap();

        let plans = vec![plan_for(&keeper, &[dupe.as_path()])];
        let summary = clean(&plans, true, true, OutputMode::Quiet);

        assert!(dupe.exists());
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.bytes_freed, 64);
    }

    #[test]
    fn permanent_clean_removes_duplicates_and_keeps_keeper() {
        let dir = tempfile::tempdir().unwrap();
        let keeper = dir.path().join("Movie.2014.BluRay");
        let dupe = dir.path().join("Movie.2014.DVDRip");
        fs::create_dir(&keeper).unwrap();
        fs::create_dir(&dupe).unwrap();
        fs::write(dupe.join("movie.avi"), vec![0u8; 32]).unwrap();

        let plans = vec![plan_for(&keeper, &[dupe.as_path()])];
        let summary = clean(&plans, false, true, OutputMode::Quiet);

        assert!(keeper.exists());
        assert!(!dupe.exists());
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.bytes_freed, 32);
    }

    #[test]
    fn failed_deletion_is_counted_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let keeper = dir.path().join("Movie.2014.BluRay");
        let missing = dir.path().join("Already.Gone.2014");
        let dupe = dir.path().join("Movie.2014.DVDRip");
        fs::create_dir(&keeper).unwrap();
        fs::create_dir(&dupe).unwrap();

        let plans = vec![plan_for(&keeper, &[missing.as_path(), dupe.as_path()])];
        let summary = clean(&plans, false, true, OutputMode::Quiet);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.deleted, 1);
        assert!(!dupe.exists());
    }
}
