// src/core/capture.rs
//
// Frame assembly between a sample source and the frame processor.

use super::processor::{FrameOutcome, SpectralFrameProcessor, StageObserver};
use crate::error::Result;

/// Convert 16-bit PCM to float without rescaling.
///
/// Values keep their integer magnitude (±32768); normalization in the
/// processor makes the MFCC output independent of input scale.
pub fn pcm16_to_f32(input: &[i16], output: &mut [f32]) {
    debug_assert_eq!(input.len(), output.len());
    for (o, &s) in output.iter_mut().zip(input) {
        *o = s as f32;
    }
}

/// Collects arbitrarily sized sample blocks into fixed, non-overlapping frames.
///
/// The internal buffer holds exactly one frame and is reused; a frame is
/// handed out as soon as it fills. Samples left at the end of a stream are
/// discarded.
pub struct FrameChunker {
    frame: Vec<f32>,
    filled: usize,
}

impl FrameChunker {
    pub fn new(frame_size: usize) -> Self {
        Self {
            frame: vec![0.0; frame_size],
            filled: 0,
        }
    }

    /// Push `samples`, calling `on_frame` for every completed frame
    pub fn push<F>(&mut self, mut samples: &[f32], mut on_frame: F) -> Result<()>
    where
        F: FnMut(&[f32]) -> Result<()>,
    {
        while !samples.is_empty() {
            let take = (self.frame.len() - self.filled).min(samples.len());
            self.frame[self.filled..self.filled + take].copy_from_slice(&samples[..take]);
            self.filled += take;
            samples = &samples[take..];

            if self.filled == self.frame.len() {
                self.filled = 0;
                on_frame(&self.frame)?;
            }
        }
        Ok(())
    }

    /// Samples waiting for the next frame to complete
    pub fn pending(&self) -> usize {
        self.filled
    }

    pub fn frame_size(&self) -> usize {
        self.frame.len()
    }
}

/// Totals for one capture run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames_analyzed: u64,
    pub frames_dropped: u64,
    /// Trailing samples that did not fill a frame
    pub samples_discarded: usize,
}

/// Feed a whole signal through `processor`, frame by frame
pub fn run_frames<O>(
    processor: &SpectralFrameProcessor,
    samples: &[f32],
    sample_rate: f64,
    observer: &mut O,
) -> Result<CaptureStats>
where
    O: StageObserver + ?Sized,
{
    let mut chunker = FrameChunker::new(processor.frame_size());
    let mut stats = CaptureStats::default();

    chunker.push(samples, |frame| {
        match processor.analyze(frame, sample_rate, observer)? {
            FrameOutcome::Analyzed => stats.frames_analyzed += 1,
            FrameOutcome::Dropped => stats.frames_dropped += 1,
        }
        Ok(())
    })?;

    stats.samples_discarded = chunker.pending();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mel::{FrequencyRange, MelFilterBank};
    use crate::core::processor::StageRecorder;
    use std::sync::Arc;

    #[test]
    fn test_pcm16_conversion_keeps_magnitude() {
        let input = [i16::MIN, -1, 0, 1, i16::MAX];
        let mut output = [0.0f32; 5];
        pcm16_to_f32(&input, &mut output);
        assert_eq!(output, [-32768.0, -1.0, 0.0, 1.0, 32767.0]);
    }

    #[test]
    fn test_chunker_across_block_boundaries() {
        let mut chunker = FrameChunker::new(4);
        let mut frames: Vec<Vec<f32>> = Vec::new();

        for block in [&[0.0, 1.0, 2.0][..], &[3.0, 4.0][..], &[5.0, 6.0, 7.0, 8.0, 9.0][..]] {
            chunker
                .push(block, |frame| {
                    frames.push(frame.to_vec());
                    Ok(())
                })
                .unwrap();
        }

        assert_eq!(frames, vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]);
        assert_eq!(chunker.pending(), 2);
    }

    #[test]
    fn test_run_frames_counts() {
        let bank = MelFilterBank::build(
            FrequencyRange::new(0.0, 8_000.0),
            FrequencyRange::new(100.0, 4_000.0),
            64,
            8,
        )
        .unwrap();
        let processor = SpectralFrameProcessor::new(128, Arc::new(bank)).unwrap();
        let signal: Vec<f32> = (0..128 * 5 + 17).map(|i| (i as f32 * 0.2).sin()).collect();

        let mut recorder = StageRecorder::new();
        let stats = run_frames(&processor, &signal, 16_000.0, &mut recorder).unwrap();

        assert_eq!(stats.frames_analyzed, 5);
        assert_eq!(stats.frames_dropped, 0);
        assert_eq!(stats.samples_discarded, 17);
        assert_eq!(recorder.coefficients.len(), 8);
        // last frame delivered was the fifth one
        assert_eq!(recorder.input[0], signal[128 * 4]);
    }
}
