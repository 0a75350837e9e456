// src/cli/analysis.rs
//
// Whole-file analysis for the command line: decode, frame, and average the
// per-frame MFCC vectors. Files run in parallel, one processor per worker,
// all sharing a single filter bank.

use anyhow::{anyhow, Result};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::core::dsp::rms;
use crate::core::{decode_mono, run_frames, MelFilterBank, SpectralFrameProcessor, StageObserver};

/// Running mean of the coefficient and log-mel vectors across frames
#[derive(Debug, Clone, Default)]
pub struct MeanAccumulator {
    coefficients: Vec<f64>,
    log_mel: Vec<f64>,
    pending_log_mel: Vec<f32>,
    frames: usize,
    skipped: usize,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames that contributed to the means
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Frames left out because they contained non-finite values
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn mean_coefficients(&self) -> Option<Vec<f32>> {
        Self::mean(&self.coefficients, self.frames)
    }

    pub fn mean_log_mel(&self) -> Option<Vec<f32>> {
        Self::mean(&self.log_mel, self.frames)
    }

    fn mean(sum: &[f64], frames: usize) -> Option<Vec<f32>> {
        (frames > 0).then(|| sum.iter().map(|s| (s / frames as f64) as f32).collect())
    }

    fn accumulate(sum: &mut Vec<f64>, values: &[f32]) {
        if sum.len() != values.len() {
            sum.clear();
            sum.resize(values.len(), 0.0);
        }
        for (s, v) in sum.iter_mut().zip(values) {
            *s += *v as f64;
        }
    }
}

impl StageObserver for MeanAccumulator {
    fn log_mel_energies(&mut self, log_energies: &[f32]) {
        self.pending_log_mel.clear();
        self.pending_log_mel.extend_from_slice(log_energies);
    }

    fn coefficients(&mut self, coefficients: &[f32]) {
        // unfloored silence yields -inf, which would poison the mean
        if coefficients.iter().chain(&self.pending_log_mel).any(|v| !v.is_finite()) {
            self.skipped += 1;
            return;
        }
        Self::accumulate(&mut self.coefficients, coefficients);
        let pending = std::mem::take(&mut self.pending_log_mel);
        Self::accumulate(&mut self.log_mel, &pending);
        self.pending_log_mel = pending;
        self.frames += 1;
    }
}

/// Summary of one analyzed file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub source_channels: usize,
    pub duration_secs: f64,
    pub codec: String,
    /// RMS level of the decoded mono signal
    pub rms: f32,
    pub frames_analyzed: u64,
    pub frames_dropped: u64,
    pub frames_skipped: usize,
    pub samples_discarded: usize,
    pub mean_coefficients: Vec<f32>,
    pub mean_log_mel: Vec<f32>,
}

/// Decode `path` and run every complete frame through `processor`
pub fn analyze_file(path: &Path, processor: &SpectralFrameProcessor) -> Result<FileReport> {
    let audio = decode_mono(path)?;

    let nyquist = audio.sample_rate as f32 / 2.0;
    let axis = processor.filter_bank().source_range();
    if (axis.upper - nyquist).abs() > 1.0 {
        log::warn!(
            "{}: Nyquist is {} Hz but the filter bank assumes bins span {}",
            path.display(),
            nyquist,
            axis
        );
    }

    let mut accumulator = MeanAccumulator::new();
    let stats = run_frames(processor, &audio.samples, audio.sample_rate as f64, &mut accumulator)?;

    let mean_coefficients = accumulator.mean_coefficients().ok_or_else(|| {
        anyhow!(
            "{}: no usable frames ({} samples, frame size {})",
            path.display(),
            audio.samples.len(),
            processor.frame_size()
        )
    })?;

    log::debug!(
        "{}: {} frames, {} skipped, {} trailing samples",
        path.display(),
        stats.frames_analyzed,
        accumulator.skipped(),
        stats.samples_discarded
    );

    Ok(FileReport {
        path: path.to_path_buf(),
        sample_rate: audio.sample_rate,
        source_channels: audio.source_channels,
        duration_secs: audio.duration_secs,
        codec: audio.codec_name,
        rms: rms(&audio.samples),
        frames_analyzed: stats.frames_analyzed,
        frames_dropped: stats.frames_dropped,
        frames_skipped: accumulator.skipped(),
        samples_discarded: stats.samples_discarded,
        mean_coefficients,
        mean_log_mel: accumulator.mean_log_mel().unwrap_or_default(),
    })
}

/// Analyze `files` in parallel. Results come back in input order.
pub fn analyze_files(
    files: &[PathBuf],
    config: &PipelineConfig,
    show_progress: bool,
) -> Result<Vec<(PathBuf, Result<FileReport>)>> {
    config.validate()?;
    let bank: Arc<MelFilterBank> = config.build_filter_bank()?;

    let pb = if show_progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    let results = files
        .par_iter()
        .progress_with(pb.clone())
        .map_init(
            || config.build_processor(Arc::clone(&bank)),
            |processor, path| {
                let report = match processor {
                    Ok(processor) => analyze_file(path, processor),
                    Err(e) => Err(anyhow!(e.clone())),
                };
                (path.clone(), report)
            },
        )
        .collect();

    pb.finish_and_clear();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_accumulator_averages_finite_frames() {
        let mut acc = MeanAccumulator::new();
        acc.log_mel_energies(&[0.0, 2.0]);
        acc.coefficients(&[1.0, 3.0]);
        acc.log_mel_energies(&[2.0, 4.0]);
        acc.coefficients(&[3.0, 5.0]);
        acc.log_mel_energies(&[f32::NEG_INFINITY, 1.0]);
        acc.coefficients(&[f32::NEG_INFINITY, 0.0]);

        assert_eq!(acc.frames(), 2);
        assert_eq!(acc.skipped(), 1);
        assert_eq!(acc.mean_coefficients().unwrap(), vec![2.0, 4.0]);
        assert_eq!(acc.mean_log_mel().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_empty_accumulator_has_no_mean() {
        assert!(MeanAccumulator::new().mean_coefficients().is_none());
    }

    #[test]
    fn test_missing_file_reports_error() {
        let config = PipelineConfig::default();
        let files = vec![PathBuf::from("/nonexistent/take.wav")];
        let results = analyze_files(&files, &config, false).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].1.is_err());
    }
}
