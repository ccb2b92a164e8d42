//! Report rendering for duplicate scan results.
//!
//! The pipeline itself never prints; everything user-visible about groups
//! and resolution plans goes through here, as colored text or as JSON for
//! scripting.

use crate::grouper::Group;
use crate::resolver::ResolutionPlan;
use crate::scorer::PatternTable;
use crate::utils;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Only errors
    Quiet,
    /// Duplicate groups and summary
    Normal,
    /// Also singleton groups and their scores
    Verbose,
}

impl OutputMode {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose > 0 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Print scan warnings (unreadable entries etc.) to stderr.
pub fn print_warnings(warnings: &[String], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }
    for warning in warnings {
        eprintln!("{}", format!("warning: {}", warning).yellow());
    }
}

/// Print the keep/duplicate report for a completed run.
pub fn print_report(
    groups: &[Group],
    plans: &[ResolutionPlan],
    table: &PatternTable,
    mode: OutputMode,
) {
    if mode == OutputMode::Quiet {
        return;
    }

    let by_key: HashMap<&str, &ResolutionPlan> =
        plans.iter().map(|p| (p.group_key.as_str(), p)).collect();

    let mut duplicate_folders = 0usize;
    let mut reclaimable = 0u64;

    for group in groups {
        match by_key.get(group.key.as_str()) {
            Some(plan) => {
                println!("\n{} {}", "Group:".bold(), group.key);
                for duplicate in &plan.duplicates {
                    let size = utils::dir_size(&duplicate.folder.path);
                    duplicate_folders += 1;
                    reclaimable = reclaimable.saturating_add(size);
                    println!(
                        "  {}",
                        format!(
                            "duplicate  {}  (score {}, {})",
                            duplicate.folder.path.display(),
                            duplicate.score,
                            bytesize::to_string(size, false)
                        )
                        .red()
                    );
                }
                println!(
                    "  {}",
                    format!(
                        "keep       {}  (score {})",
                        plan.keeper.folder.path.display(),
                        plan.keeper.score
                    )
                    .green()
                );
            }
            None if mode == OutputMode::Verbose => {
                // Singletons only show up when asked for
                if let Some(only) = group.members.first() {
                    println!(
                        "\n{} {}\n  {}",
                        "Group:".bold(),
                        group.key,
                        format!(
                            "single     {}  (score {})",
                            only.folder.path.display(),
                            table.score(&only.folder.name)
                        )
                        .dimmed()
                    );
                }
            }
            None => {}
        }
    }

    if plans.is_empty() {
        println!("{}", "No duplicate folders found.".green());
    } else {
        println!(
            "\n{} group(s) scanned, {} duplicate set(s), {} duplicate folder(s), ~{} reclaimable",
            groups.len(),
            plans.len(),
            duplicate_folders,
            bytesize::to_string(reclaimable, false)
        );
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    timestamp: String,
    warnings: &'a [String],
    groups: Vec<JsonGroup>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonGroup {
    key: String,
    members: Vec<JsonMember>,
}

#[derive(Serialize)]
struct JsonMember {
    path: String,
    name: String,
    score: i64,
    size_bytes: u64,
    keep: bool,
}

#[derive(Serialize)]
struct JsonSummary {
    groups: usize,
    duplicate_sets: usize,
    duplicate_folders: usize,
    reclaimable_bytes: u64,
}

/// Print the whole run as pretty JSON for scripting.
pub fn print_json_report(
    groups: &[Group],
    plans: &[ResolutionPlan],
    table: &PatternTable,
    warnings: &[String],
) -> Result<()> {
    let by_key: HashMap<&str, &ResolutionPlan> =
        plans.iter().map(|p| (p.group_key.as_str(), p)).collect();

    let mut duplicate_folders = 0usize;
    let mut reclaimable = 0u64;
    let mut json_groups = Vec::with_capacity(groups.len());

    for group in groups {
        let members = match by_key.get(group.key.as_str()) {
            Some(plan) => {
                let mut members = vec![json_member(&plan.keeper.folder, plan.keeper.score, true)];
                for duplicate in &plan.duplicates {
                    let member = json_member(&duplicate.folder, duplicate.score, false);
                    duplicate_folders += 1;
                    reclaimable = reclaimable.saturating_add(member.size_bytes);
                    members.push(member);
                }
                members
            }
            None => group
                .members
                .iter()
                .map(|m| json_member(&m.folder, table.score(&m.folder.name), true))
                .collect(),
        };
        json_groups.push(JsonGroup {
            key: group.key.clone(),
            members,
        });
    }

    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Local::now().to_rfc3339(),
        warnings,
        groups: json_groups,
        summary: JsonSummary {
            groups: groups.len(),
            duplicate_sets: plans.len(),
            duplicate_folders,
            reclaimable_bytes: reclaimable,
        },
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn json_member(folder: &crate::scanner::Folder, score: i64, keep: bool) -> JsonMember {
    JsonMember {
        path: folder.path.display().to_string(),
        name: folder.name.clone(),
        score,
        size_bytes: utils::dir_size(&folder.path),
        keep,
    }
}
