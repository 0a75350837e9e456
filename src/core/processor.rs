// src/core/processor.rs
//
// Frame-by-frame MFCC analysis: normalize → window → magnitude spectrum →
// mel integration → log10 → DCT-II, with every stage handed to an observer.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::dsp::{
    fill_window, log10_compress, normalize_in_place, Dct2, LogFloor, RealSpectrum, WindowType,
};
use super::mel::MelFilterBank;
use crate::error::{MfccError, Result};

const IDLE: u8 = 0;
const ANALYZING: u8 = 1;

/// Admission state of a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    Idle,
    Analyzing,
}

/// What happened to a frame passed to [`SpectralFrameProcessor::analyze`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// All stages ran and were delivered
    Analyzed,
    /// Another analysis was in flight; the frame was discarded
    Dropped,
}

/// Receives each intermediate buffer in stage order.
///
/// Called synchronously on the analyzing thread. The slices borrow the
/// processor's scratch buffers and are overwritten by the next frame.
pub trait StageObserver {
    /// Raw copy of the input frame, before any processing
    fn started(&mut self, _samples: &[f32]) {}
    fn normalized(&mut self, _samples: &[f32]) {}
    fn windowed(&mut self, _samples: &[f32]) {}
    /// `frame_size / 2` magnitude bins
    fn spectrum(&mut self, _magnitudes: &[f32]) {}
    fn mel_energies(&mut self, _energies: &[f32]) {}
    fn log_mel_energies(&mut self, _log_energies: &[f32]) {}
    /// Final cepstral coefficients, one per mel filter
    fn coefficients(&mut self, _coefficients: &[f32]) {}
}

impl StageObserver for () {}

/// Observer that keeps an owned copy of the latest output of every stage
#[derive(Debug, Clone, Default)]
pub struct StageRecorder {
    pub input: Vec<f32>,
    pub normalized: Vec<f32>,
    pub windowed: Vec<f32>,
    pub spectrum: Vec<f32>,
    pub mel_energies: Vec<f32>,
    pub log_mel_energies: Vec<f32>,
    pub coefficients: Vec<f32>,
    /// Stage names in the order they were delivered
    pub order: Vec<&'static str>,
}

impl StageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(dst: &mut Vec<f32>, src: &[f32]) {
        dst.clear();
        dst.extend_from_slice(src);
    }
}

impl StageObserver for StageRecorder {
    fn started(&mut self, samples: &[f32]) {
        self.order.clear();
        self.order.push("started");
        Self::record(&mut self.input, samples);
    }

    fn normalized(&mut self, samples: &[f32]) {
        self.order.push("normalized");
        Self::record(&mut self.normalized, samples);
    }

    fn windowed(&mut self, samples: &[f32]) {
        self.order.push("windowed");
        Self::record(&mut self.windowed, samples);
    }

    fn spectrum(&mut self, magnitudes: &[f32]) {
        self.order.push("spectrum");
        Self::record(&mut self.spectrum, magnitudes);
    }

    fn mel_energies(&mut self, energies: &[f32]) {
        self.order.push("mel_energies");
        Self::record(&mut self.mel_energies, energies);
    }

    fn log_mel_energies(&mut self, log_energies: &[f32]) {
        self.order.push("log_mel_energies");
        Self::record(&mut self.log_mel_energies, log_energies);
    }

    fn coefficients(&mut self, coefficients: &[f32]) {
        self.order.push("coefficients");
        Self::record(&mut self.coefficients, coefficients);
    }
}

/// Construction options beyond frame size and filter bank
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProcessorOptions {
    pub window: WindowType,
    pub log_floor: LogFloor,
}

/// Buffers rewritten on every frame
struct Scratch {
    samples: Vec<f32>,
    fft: RealSpectrum,
    magnitudes: Vec<f32>,
    mel: Vec<f32>,
    log_mel: Vec<f32>,
    coefficients: Vec<f32>,
}

/// Resets the processor to idle when analysis ends, including by panic
struct AnalyzingGuard<'a>(&'a AtomicU8);

impl Drop for AnalyzingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(IDLE, Ordering::Release);
    }
}

/// Turns fixed-length PCM frames into MFCC vectors.
///
/// All buffers are allocated in the constructor. At most one frame is
/// analyzed at a time: a call that arrives while another is running
/// returns [`FrameOutcome::Dropped`] without waiting.
pub struct SpectralFrameProcessor {
    frame_size: usize,
    filter_bank: Arc<MelFilterBank>,
    window: Vec<f32>,
    dct: Dct2,
    log_floor: LogFloor,
    state: AtomicU8,
    scratch: Mutex<Scratch>,
    frames_analyzed: AtomicU64,
    frames_dropped: AtomicU64,
    /// f64 bits of the most recent sample rate, 0 before the first frame
    last_sample_rate: AtomicU64,
}

impl SpectralFrameProcessor {
    pub fn new(frame_size: usize, filter_bank: Arc<MelFilterBank>) -> Result<Self> {
        Self::with_options(frame_size, filter_bank, ProcessorOptions::default())
    }

    pub fn with_options(
        frame_size: usize,
        filter_bank: Arc<MelFilterBank>,
        options: ProcessorOptions,
    ) -> Result<Self> {
        if frame_size < 2 || !frame_size.is_power_of_two() {
            return Err(MfccError::FrameSizeNotPowerOfTwo(frame_size));
        }
        let half = frame_size / 2;
        if filter_bank.num_bins() != half {
            return Err(MfccError::FilterBankMismatch {
                frame_size,
                bank_bins: filter_bank.num_bins(),
                expected: half,
            });
        }
        if let LogFloor::Epsilon(eps) = options.log_floor {
            if !(eps > 0.0 && eps.is_finite()) {
                return Err(MfccError::InvalidConfig(format!(
                    "log floor must be a positive finite value, got {eps}"
                )));
            }
        } else {
            log::warn!("Log compression is unfloored: silent mel bands will produce -inf");
        }

        let num_filters = filter_bank.num_filters();
        let mut window = vec![0.0; frame_size];
        fill_window(&mut window, options.window);

        let scratch = Scratch {
            samples: vec![0.0; frame_size],
            fft: RealSpectrum::new(frame_size),
            magnitudes: vec![0.0; half],
            mel: vec![0.0; num_filters],
            log_mel: vec![0.0; num_filters],
            coefficients: vec![0.0; num_filters],
        };

        log::info!(
            "Spectral frame processor ready: frame {}, {:?} window, {} mel filters",
            frame_size,
            options.window,
            num_filters
        );

        Ok(Self {
            frame_size,
            filter_bank,
            window,
            dct: Dct2::new(num_filters),
            log_floor: options.log_floor,
            state: AtomicU8::new(IDLE),
            scratch: Mutex::new(scratch),
            frames_analyzed: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            last_sample_rate: AtomicU64::new(0),
        })
    }

    /// Analyze one frame, delivering every stage to `observer` in order.
    ///
    /// The frame is copied in; the caller's buffer is not retained.
    pub fn analyze<O>(&self, frame: &[f32], sample_rate: f64, observer: &mut O) -> Result<FrameOutcome>
    where
        O: StageObserver + ?Sized,
    {
        if frame.len() != self.frame_size {
            return Err(MfccError::FrameLengthMismatch {
                given: frame.len(),
                expected: self.frame_size,
            });
        }

        if self
            .state
            .compare_exchange(IDLE, ANALYZING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            let dropped = self.frames_dropped.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Already analyzing, skipped frame ({} dropped so far)", dropped);
            return Ok(FrameOutcome::Dropped);
        }
        let _analyzing = AnalyzingGuard(&self.state);

        // a panicking observer poisons the lock; every buffer is rewritten
        // before it is read, so the contents can be reused as they are
        let mut guard = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);
        let scratch = &mut *guard;

        self.last_sample_rate.store(sample_rate.to_bits(), Ordering::Relaxed);
        scratch.samples.copy_from_slice(frame);
        observer.started(&scratch.samples);

        let norm = normalize_in_place(&mut scratch.samples);
        if norm.degenerate {
            log::trace!("Zero-variance frame (mean {}), left unnormalized", norm.mean);
        }
        observer.normalized(&scratch.samples);

        for (s, w) in scratch.samples.iter_mut().zip(&self.window) {
            *s *= w;
        }
        observer.windowed(&scratch.samples);

        scratch.fft.magnitudes(&scratch.samples, &mut scratch.magnitudes);
        observer.spectrum(&scratch.magnitudes);

        self.filter_bank.apply(&scratch.magnitudes, &mut scratch.mel);
        observer.mel_energies(&scratch.mel);

        log10_compress(&scratch.mel, &mut scratch.log_mel, self.log_floor);
        observer.log_mel_energies(&scratch.log_mel);

        self.dct.process(&scratch.log_mel, &mut scratch.coefficients);
        observer.coefficients(&scratch.coefficients);

        self.frames_analyzed.fetch_add(1, Ordering::Relaxed);
        Ok(FrameOutcome::Analyzed)
    }

    pub fn state(&self) -> ProcessorState {
        match self.state.load(Ordering::Acquire) {
            IDLE => ProcessorState::Idle,
            _ => ProcessorState::Analyzing,
        }
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed.load(Ordering::Relaxed)
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped.load(Ordering::Relaxed)
    }

    /// Sample rate of the most recent admitted frame
    pub fn last_sample_rate(&self) -> Option<f64> {
        match self.last_sample_rate.load(Ordering::Relaxed) {
            0 => None,
            bits => Some(f64::from_bits(bits)),
        }
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn num_filters(&self) -> usize {
        self.filter_bank.num_filters()
    }

    pub fn filter_bank(&self) -> &Arc<MelFilterBank> {
        &self.filter_bank
    }

    pub fn log_floor(&self) -> LogFloor {
        self.log_floor
    }
}
