// src/cli/mod.rs
//
// Command-line interface module

mod analysis;
mod args;
mod output;

pub use analysis::{analyze_file, analyze_files, FileReport, MeanAccumulator};
pub use args::{Cli, Command};
pub use output::{format_json, format_vector, ClassifyReport};

use anyhow::{bail, Result};
use colorful::Colorful;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::classify::{Classifier, NearestNeighbors};
use crate::config::PipelineConfig;
use crate::core::decoder::has_audio_extension;
use crate::storage::{Snapshot, SnapshotStore};

/// Run the parsed command
pub fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Analyze { input, mel } => cmd_analyze(&cli, input, *mel),
        Command::Snapshot { input, vowel } => cmd_snapshot(&cli, input, *vowel),
        Command::Classify { input, k } => cmd_classify(&cli, input, *k),
        Command::List { vowel } => {
            let store = SnapshotStore::open(cli.store_path());
            let snapshots: Vec<&Snapshot> = match vowel {
                Some(v) => store.with_vowel(*v).collect(),
                None => store.snapshots().iter().collect(),
            };
            if cli.json {
                println!("{}", format_json(&snapshots)?);
            } else {
                output::print_snapshots(&snapshots, cli.verbose);
            }
            Ok(())
        }
        Command::Remove { id } => {
            let mut store = SnapshotStore::open(cli.store_path());
            if !store.remove(id)? {
                bail!("No snapshot with id '{}'", id);
            }
            if !cli.json {
                println!("{} Removed {}", "✓".green(), id);
            }
            Ok(())
        }
        Command::Clear => {
            let mut store = SnapshotStore::open(cli.store_path());
            let count = store.len();
            store.remove_all()?;
            if !cli.json {
                println!("{} Removed {} snapshot(s)", "✓".green(), count);
            }
            Ok(())
        }
        Command::PrintConfig => {
            print!("{}", cli.pipeline_config()?.to_toml_string()?);
            Ok(())
        }
    }
}

/// Audio files under `path`, or `path` itself when it is one
pub fn collect_audio_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if has_audio_extension(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && has_audio_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        bail!("Input does not exist: {}", path.display());
    }

    Ok(files)
}

/// Decode and analyze every audio file under `input`
fn analyze_input(cli: &Cli, input: &Path) -> Result<Vec<(PathBuf, Result<FileReport>)>> {
    let config: PipelineConfig = cli.pipeline_config()?;
    let files = collect_audio_files(input)?;
    if files.is_empty() {
        bail!("No audio files found in {}", input.display());
    }

    log::info!("Found {} audio file(s)", files.len());
    analyze_files(&files, &config, !cli.json && files.len() > 1)
}

fn cmd_analyze(cli: &Cli, input: &Path, show_mel: bool) -> Result<()> {
    let results = analyze_input(cli, input)?;
    let mut reports = Vec::new();

    for (path, result) in results {
        match result {
            Ok(report) => {
                if !cli.json {
                    output::print_report(&report, show_mel, cli.verbose);
                }
                reports.push(report);
            }
            Err(e) => output::print_failure(&path.display().to_string(), &e),
        }
    }

    if cli.json {
        println!("{}", format_json(&reports)?);
    }
    Ok(())
}

fn cmd_snapshot(cli: &Cli, input: &Path, vowel: crate::storage::Vowel) -> Result<()> {
    let results = analyze_input(cli, input)?;
    let mut store = SnapshotStore::open(cli.store_path());
    let mut stored = Vec::new();

    for (path, result) in results {
        let file = path.display().to_string();
        match result {
            Ok(report) => {
                let snapshot = Snapshot::new(vowel, report.mean_coefficients);
                store.append(snapshot.clone())?;
                if !cli.json {
                    output::print_snapshot_stored(&file, &snapshot);
                }
                stored.push(snapshot);
            }
            Err(e) => output::print_failure(&file, &e),
        }
    }

    log::info!("Store {} now holds {} snapshot(s)", store.path().display(), store.len());
    if cli.json {
        println!("{}", format_json(&stored)?);
    }
    Ok(())
}

fn cmd_classify(cli: &Cli, input: &Path, k: usize) -> Result<()> {
    let store = SnapshotStore::open(cli.store_path());
    if store.is_empty() {
        bail!("No snapshots stored in {}", store.path().display());
    }
    let classifier = NearestNeighbors::from_snapshots(k, store.snapshots());

    let results = analyze_input(cli, input)?;
    let mut reports = Vec::new();

    for (path, result) in results {
        let file = path.display().to_string();
        match result {
            Ok(report) => {
                let classification = classifier.classify(&report.mean_coefficients);
                let report = ClassifyReport::new(file, classification);
                if !cli.json {
                    output::print_classification(&report);
                }
                reports.push(report);
            }
            Err(e) => output::print_failure(&file, &e),
        }
    }

    if cli.json {
        println!("{}", format_json(&reports)?);
    }
    Ok(())
}
