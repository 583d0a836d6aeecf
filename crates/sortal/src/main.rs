//! Command-line driver: discovers Java files, runs the import sorter over
//! them in parallel, and either verifies (`check`) or rewrites (`sort`).

mod cache;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use walkdir::WalkDir;

use sortal_engine::{Grouper, LanguageLevel, LineEnding, Sorter, SourceEncoding};

use crate::cache::HashCache;

#[derive(Debug, Parser)]
#[command(name = "sortal", version, about = "Sorts the import section of Java source files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify that import sections are already canonical
    Check(RunArgs),
    /// Rewrite files in place
    Sort(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Java files or directories to process (directories are searched
    /// recursively for *.java)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Comma-separated group prefixes for non-static imports,
    /// e.g. "java.,javax.,org.,com."
    #[arg(long, default_value = "")]
    groups: String,

    /// Comma-separated group prefixes for static imports
    #[arg(long, default_value = "")]
    static_groups: String,

    /// Emit static imports after non-static imports
    #[arg(long)]
    static_after: bool,

    /// Omit the blank line between the static and non-static sections
    #[arg(long)]
    join_static_with_non_static: bool,

    /// Remove imports never referenced in the file
    #[arg(long)]
    remove_unused: bool,

    /// With --remove-unused, keep imports from the file's own package
    #[arg(long)]
    keep_same_package: bool,

    /// Sort within groups depth-first (plain lexicographic) instead of
    /// the default breadth-first ordering
    #[arg(long)]
    depth_first: bool,

    /// Line ending for the rewritten section: AUTO, KEEP, LF, CRLF, or CR
    #[arg(long, default_value = "AUTO")]
    line_ending: LineEnding,

    /// Source file encoding: UTF-8 or ISO-8859-1
    #[arg(long, default_value = "UTF-8")]
    encoding: SourceEncoding,

    /// Java source compliance level, e.g. 1.8, 11, 17
    #[arg(long)]
    compliance: Option<String>,

    /// Content-hash cache file; unchanged files are skipped
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Report every file, not just the ones needing changes
    #[arg(long, short)]
    verbose: bool,
}

enum Outcome {
    AlreadySorted,
    NeededSorting,
    Failed(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (write, args) = match &cli.command {
        Command::Check(args) => (false, args),
        Command::Sort(args) => (true, args),
    };

    match run(write, args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(write: bool, args: &RunArgs) -> anyhow::Result<bool> {
    let grouper = Grouper::new(
        &args.groups,
        &args.static_groups,
        args.static_after,
        args.join_static_with_non_static,
        !args.depth_first,
    )?;

    let sorter = Sorter::new(
        args.encoding,
        grouper,
        args.remove_unused,
        args.remove_unused && !args.keep_same_package,
        args.line_ending,
        LanguageLevel::from_compliance(args.compliance.as_deref()),
    );

    let files = discover_files(&args.paths);
    let mut hash_cache = args
        .cache_file
        .as_deref()
        .map(HashCache::load)
        .unwrap_or_default();

    let start_time = Instant::now();
    let outcomes: Vec<(PathBuf, Outcome)> = files
        .par_iter()
        .map(|path| {
            let outcome = process_file(&sorter, path, write, &hash_cache);
            (path.clone(), outcome)
        })
        .collect();

    let mut already_sorted = 0u64;
    let mut needed_sorting = 0u64;
    let mut failures = 0u64;
    for (path, outcome) in &outcomes {
        match outcome {
            Outcome::AlreadySorted => {
                already_sorted += 1;
                if args.verbose {
                    println!("{} {}", "sorted:".green(), path.display());
                }
            }
            Outcome::NeededSorting => {
                needed_sorting += 1;
                let label = if write { "rewrote:" } else { "unsorted:" };
                println!("{} {}", label.yellow(), path.display());
            }
            Outcome::Failed(message) => {
                failures += 1;
                eprintln!("{} {message}", "error:".red().bold());
            }
        }
    }

    // cache updates only after the run, and only for clean files
    if let Some(cache_path) = &args.cache_file {
        for (path, outcome) in &outcomes {
            if matches!(outcome, Outcome::Failed(_)) {
                continue;
            }
            if !write && matches!(outcome, Outcome::NeededSorting) {
                continue;
            }
            if let Ok(content) = fs::read(path) {
                hash_cache.update(path, &content);
            }
        }
        hash_cache.store(cache_path)?;
    }

    print_summary(already_sorted, needed_sorting, start_time);
    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed");
    }
    // check mode fails when anything needs sorting
    Ok(write || needed_sorting == 0)
}

fn process_file(sorter: &Sorter, path: &Path, write: bool, cache: &HashCache) -> Outcome {
    let result = (|| -> anyhow::Result<Outcome> {
        let bytes =
            fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        if cache.is_unchanged(path, &bytes) {
            return Ok(Outcome::AlreadySorted);
        }
        let result = sorter.parse_file(path, &bytes)?;
        if result.is_sorted() {
            return Ok(Outcome::AlreadySorted);
        }
        if write {
            fs::write(path, result.sorted_bytes())
                .with_context(|| format!("writing {}", path.display()))?;
        }
        Ok(Outcome::NeededSorting)
    })();

    result.unwrap_or_else(|e| Outcome::Failed(format!("{e:#}")))
}

/// Expand the given paths into the list of Java files to process.
fn discover_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = vec![];
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(Result::ok)
            {
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "java")
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn print_summary(already_sorted: u64, needed_sorting: u64, start_time: Instant) {
    let total = already_sorted + needed_sorting;
    let elapsed = start_time.elapsed();
    let minutes = elapsed.as_secs() / 60;
    let seconds = elapsed.as_secs() % 60;
    let millis = elapsed.subsec_millis();
    let width = total.to_string().len();
    println!(
        "{:>22}: {:width$} in {:02}:{:02}.{:03}",
        "Total Files Processed", total, minutes, seconds, millis
    );
    println!("{:>22}: {:width$}", "Already Sorted", already_sorted);
    println!("{:>22}: {:width$}", "Needed Sorting", needed_sorting);
}
