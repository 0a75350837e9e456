//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{PipelineConfig, PipelinePreset};
use crate::storage::{SnapshotStore, Vowel};

/// Extract MFCC vectors from audio and classify vowels against stored snapshots
#[derive(Parser, Debug)]
#[command(name = "vowel-mfcc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true, env = "VOWEL_MFCC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Named parameter set, used when no config file is given
    #[arg(short, long, global = true, default_value = "reference", value_parser = parse_preset)]
    pub preset: PipelinePreset,

    /// Snapshot store location
    #[arg(short, long, global = true, env = "VOWEL_MFCC_STORE")]
    pub store: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print per-file MFCC summaries
    Analyze {
        /// Input file or directory
        input: PathBuf,

        /// Also print the mean log-mel energies
        #[arg(long)]
        mel: bool,
    },

    /// Store the mean MFCC vector of each input under a vowel label
    Snapshot {
        /// Input file or directory
        input: PathBuf,

        /// Vowel label (a, i, u, e, o, unknown)
        #[arg(long, value_parser = parse_vowel)]
        vowel: Vowel,
    },

    /// Label each input by its nearest stored snapshots
    Classify {
        /// Input file or directory
        input: PathBuf,

        /// Number of neighbours that vote
        #[arg(short, long, default_value = "3")]
        k: usize,
    },

    /// List stored snapshots
    List {
        /// Only show snapshots with this label
        #[arg(long, value_parser = parse_vowel)]
        vowel: Option<Vowel>,
    },

    /// Delete one snapshot by id
    Remove {
        id: String,
    },

    /// Delete every stored snapshot
    Clear,

    /// Print the effective pipeline configuration as TOML
    PrintConfig,
}

impl Cli {
    /// Config file if given, otherwise the selected preset
    pub fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        match &self.config {
            Some(path) => PipelineConfig::load(path),
            None => Ok(PipelineConfig::from_preset(self.preset)),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(SnapshotStore::default_path)
    }
}

fn parse_preset(name: &str) -> Result<PipelinePreset, String> {
    PipelinePreset::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = PipelinePreset::all().iter().map(|p| p.name()).collect();
        format!("Unknown preset '{}', expected one of {}", name, known.join(", "))
    })
}

fn parse_vowel(identifier: &str) -> Result<Vowel, String> {
    identifier.parse()
}
