//! Shared filesystem helpers.

use std::path::{Path, PathBuf};

/// Total size of a directory tree in bytes.
///
/// Iterative walk with an explicit stack to stay safe on deep trees.
/// Permission errors and entries that vanish mid-walk are skipped rather
/// than failing the whole accounting, and symlinks are not followed.
pub fn dir_size(path: &Path) -> u64 {
    let mut total = 0u64;
    let mut stack: Vec<PathBuf> = vec![path.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };
            if file_type.is_dir() {
                stack.push(entry.path());
            } else if file_type.is_file() {
                if let Ok(metadata) = entry.metadata() {
                    total = total.saturating_add(metadata.len());
                }
            }
        }
    }
    total
}
