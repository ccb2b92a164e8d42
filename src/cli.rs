use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::cleaner;
use crate::config::Config;
use crate::grouper::{self, Group};
use crate::identity;
use crate::output::{self, OutputMode};
use crate::resolver::{self, ResolutionPlan};
use crate::scanner;
use crate::scorer::PatternTable;

#[derive(Parser)]
#[command(name = "reeldupe")]
#[command(version)]
#[command(about = "Find duplicate movie release folders and keep only the best copy")]
#[command(
    long_about = "Reeldupe scans the immediate child directories of your movie \
    library roots, groups folders that hold the same movie (via the IMDB id in \
    an .nfo sidecar, or a normalized title/year from the folder name), scores \
    each copy against the weighted regex patterns from the config file, and \
    keeps the highest-scoring copy of each group.\n\n\
    Examples:\n  \
    reeldupe scan                        # Report duplicate groups\n  \
    reeldupe scan -v /srv/movies         # Include singletons, override paths\n  \
    reeldupe scan --json                 # Machine-readable report\n  \
    reeldupe clean --dry-run             # Show what would be deleted\n  \
    reeldupe clean -y --permanent        # Delete without prompt or recycle bin"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the TOML config file (scan paths and score patterns)
    #[arg(short = 'c', long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Increase output verbosity (shows singleton groups and their scores)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report duplicate groups and keep/duplicate decisions (never deletes)
    #[command(visible_alias = "s")]
    Scan {
        /// Emit a machine-readable JSON report instead of text
        #[arg(long)]
        json: bool,

        /// Scan roots (overrides the `paths` from the config file)
        paths: Vec<PathBuf>,
    },

    /// Delete duplicate folders, keeping the best copy of each group
    #[command(visible_alias = "c")]
    Clean {
        /// Show what would be deleted without touching the filesystem
        #[arg(long)]
        dry_run: bool,

        /// Permanently remove folders instead of using the recycle bin
        #[arg(long)]
        permanent: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Scan roots (overrides the `paths` from the config file)
        paths: Vec<PathBuf>,
    },
}

/// Everything a single run computes before any reporting or deletion.
struct RunArtifacts {
    warnings: Vec<String>,
    groups: Vec<Group>,
    plans: Vec<ResolutionPlan>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mode = OutputMode::from_flags(self.verbose, self.quiet);

        // Config problems (including malformed score patterns) surface
        // here, before any scanning
        let config = Config::load(&self.config)
            .with_context(|| format!("cannot load configuration from {}", self.config.display()))?;
        let table = PatternTable::compile(&config.score_patterns, config.case_insensitive)?;

        match self.command {
            Commands::Scan { json, paths } => run_scan(&config, &table, paths, json, mode),
            Commands::Clean {
                dry_run,
                permanent,
                yes,
                paths,
            } => run_clean(&config, &table, paths, dry_run, permanent, yes, mode),
        }
    }
}

/// scan -> identify -> group -> resolve, with no side effects.
fn run_pipeline(config: &Config, table: &PatternTable, cli_paths: Vec<PathBuf>) -> Result<RunArtifacts> {
    let roots = if cli_paths.is_empty() {
        config.paths.clone()
    } else {
        cli_paths
    };
    if roots.is_empty() {
        bail!("no scan paths given; set `paths` in the config file or pass them on the command line");
    }

    let outcome = scanner::scan_roots(&roots)?;
    let identified = identity::identify_all(outcome.folders);
    let groups = grouper::group(identified);
    let plans = resolver::resolve_all(&groups, table);

    Ok(RunArtifacts {
        warnings: outcome.warnings,
        groups,
        plans,
    })
}

fn run_scan(
    config: &Config,
    table: &PatternTable,
    paths: Vec<PathBuf>,
    json: bool,
    mode: OutputMode,
) -> Result<()> {
    let run = run_pipeline(config, table, paths)?;

    if json {
        output::print_json_report(&run.groups, &run.plans, table, &run.warnings)?;
    } else {
        output::print_warnings(&run.warnings, mode);
        output::print_report(&run.groups, &run.plans, table, mode);
    }
    Ok(())
}

fn run_clean(
    config: &Config,
    table: &PatternTable,
    paths: Vec<PathBuf>,
    dry_run: bool,
    permanent: bool,
    yes: bool,
    mode: OutputMode,
) -> Result<()> {
    let run = run_pipeline(config, table, paths)?;

    output::print_warnings(&run.warnings, mode);
    output::print_report(&run.groups, &run.plans, table, mode);

    if run.plans.is_empty() {
        return Ok(());
    }

    let duplicate_count: usize = run.plans.iter().map(|p| p.duplicates.len()).sum();
    if !dry_run && !yes {
        let target = if permanent {
            "permanently delete"
        } else {
            "move to the recycle bin"
        };
        let prompt = format!("\n{} {} duplicate folder(s)?", target, duplicate_count);
        if !confirm(&prompt)? {
            println!("Aborted; nothing was deleted.");
            return Ok(());
        }
    }

    if mode != OutputMode::Quiet {
        println!();
    }
    let summary = cleaner::clean(&run.plans, dry_run, permanent, mode);

    if mode != OutputMode::Quiet {
        let freed = bytesize::to_string(summary.bytes_freed, false);
        if dry_run {
            println!(
                "{}",
                format!(
                    "[DRY RUN] Would delete {} folder(s), reclaiming ~{}",
                    summary.deleted, freed
                )
                .yellow()
            );
        } else {
            println!(
                "{}",
                format!("Deleted {} folder(s), reclaimed ~{}", summary.deleted, freed).green()
            );
        }
    }
    if summary.failed > 0 {
        eprintln!(
            "{}",
            format!("{} folder(s) could not be deleted", summary.failed).red()
        );
    }
    Ok(())
}

/// Ask for a yes/no confirmation on stdin. Anything but y/yes aborts.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
