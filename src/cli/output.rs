//! Output formatting for CLI results

use colorful::Colorful;
use serde::Serialize;

use super::analysis::FileReport;
use crate::classify::Classification;
use crate::storage::Snapshot;

/// Classification of one input file
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub file: String,
    pub label: Option<String>,
    pub confidence: Option<f32>,
}

impl ClassifyReport {
    pub fn new(file: String, classification: Option<Classification>) -> Self {
        Self {
            file,
            label: classification.map(|c| c.label.to_string()),
            confidence: classification.map(|c| c.confidence),
        }
    }
}

/// Serialize any result set as pretty JSON
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Comma-separated vector with fixed precision
pub fn format_vector(values: &[f32]) -> String {
    values
        .iter()
        .map(|v| format!("{:.3}", v))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_report(report: &FileReport, show_mel: bool, verbose: bool) {
    println!("{}", report.path.display().to_string().cyan());
    println!("  Sample Rate: {} Hz", report.sample_rate);
    println!("  Channels: {} (down-mixed)", report.source_channels);
    println!("  Duration: {:.2}s", report.duration_secs);
    println!(
        "  Frames: {} analyzed, {} dropped",
        report.frames_analyzed, report.frames_dropped
    );
    if report.frames_skipped > 0 {
        println!(
            "  {}",
            format!("{} frame(s) with non-finite output left out of the mean", report.frames_skipped)
                .yellow()
        );
    }
    println!("  MFCC: [{}]", format_vector(&report.mean_coefficients));
    if show_mel {
        println!("  Log-mel: [{}]", format_vector(&report.mean_log_mel));
    }

    if verbose {
        println!("\n  Technical Details:");
        println!("    Codec: {}", report.codec);
        println!("    RMS Level: {:.4}", report.rms);
        println!("    Trailing samples discarded: {}", report.samples_discarded);
    }
    println!();
}

/// Written to stderr so `--json` output stays parseable
pub fn print_failure(file: &str, error: &anyhow::Error) {
    eprintln!("{} {}", "✗".red(), file.cyan());
    eprintln!("  {}", format!("{:#}", error).red());
}

pub fn print_snapshot_stored(file: &str, snapshot: &Snapshot) {
    println!(
        "{} {} → {} [{}]",
        "✓".green(),
        file,
        snapshot.vowel.to_string().yellow(),
        snapshot.id
    );
}

pub fn print_snapshots(snapshots: &[&Snapshot], verbose: bool) {
    if snapshots.is_empty() {
        println!("{}", "No snapshots stored".yellow());
        return;
    }

    for snapshot in snapshots {
        println!(
            "  {}  {}  {} coefficients",
            snapshot.id.clone().cyan(),
            snapshot.vowel.to_string().yellow(),
            snapshot.coefficients.len()
        );
        if verbose {
            println!("    [{}]", format_vector(&snapshot.coefficients));
        }
    }
    println!("\n{} snapshot(s)", snapshots.len());
}

pub fn print_classification(report: &ClassifyReport) {
    match (&report.label, report.confidence) {
        (Some(label), Some(confidence)) => println!(
            "{}  {} ({:.0}%)",
            report.file.clone().cyan(),
            label.clone().green(),
            confidence * 100.0
        ),
        _ => println!(
            "{}  {}",
            report.file.clone().cyan(),
            "no comparable snapshots".yellow()
        ),
    }
}
