//! vowel-mfcc - MFCC extraction for vowel snapshotting and classification
//!
//! Turns fixed-size frames of mono audio into mel-frequency cepstral
//! coefficients, one vector per frame, and keeps labeled vectors around
//! for nearest-neighbour vowel classification.
//!
//! ## Pipeline
//!
//! Each frame goes through, in order:
//!
//! 1. zero-mean / unit-variance normalization
//! 2. Hamming window (Hann and rectangular are configurable)
//! 3. real FFT magnitudes, `frame_size / 2` bins
//! 4. triangular mel filter bank
//! 5. `log10` with a small floor
//! 6. DCT-II, one coefficient per filter
//!
//! Every intermediate buffer is handed to a [`StageObserver`].
//!
//! ## Module Structure
//!
//! - `core` - Filter bank, frame processor, DSP primitives and capture helpers
//! - `config` - Pipeline parameters and presets
//! - `storage` - Labeled snapshot persistence
//! - `classify` - Vowel classification over stored snapshots
//! - `cli` - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vowel_mfcc::config::PipelineConfig;
//! use vowel_mfcc::core::StageRecorder;
//!
//! let processor = PipelineConfig::default().build_pipeline()?;
//! let mut recorder = StageRecorder::new();
//! processor.analyze(&frame, 48_000.0, &mut recorder)?;
//!
//! println!("MFCC: {:?}", recorder.coefficients);
//! ```
//!
//! ## Presets
//!
//! | Preset     | Frame | Filters | Filter band    | Bin axis   |
//! |------------|-------|---------|----------------|------------|
//! | Reference  | 1024  | 32      | 300–8000 Hz    | 0–24000 Hz |
//! | Narrowband | 512   | 24      | 300–3400 Hz    | 0–8000 Hz  |

// Filter bank, frame processor and DSP primitives
pub mod core;

// Command-line interface
pub mod cli;

// Pipeline configuration
pub mod config;

// Snapshot persistence
pub mod storage;

// Vowel classification
pub mod classify;

pub mod error;

pub use classify::{Classification, Classifier, NearestNeighbors};
pub use config::{PipelineConfig, PipelineConfigBuilder, PipelinePreset};
pub use core::{
    FrameOutcome, FrequencyRange, MelFilterBank, ProcessorState, SpectralFrameProcessor,
    StageObserver, StageRecorder,
};
pub use error::MfccError;
pub use storage::{Snapshot, SnapshotStore, Vowel};
