//! Real-input FFT magnitude spectrum with preallocated buffers

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

/// Forward real FFT of a fixed power-of-two length.
///
/// Input, output and scratch buffers are allocated once in `new`;
/// `magnitudes` does not allocate.
pub struct RealSpectrum {
    fft: Arc<dyn RealToComplex<f32>>,
    input: Vec<f32>,
    output: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    fft_size: usize,
}

impl RealSpectrum {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        Self {
            input: fft.make_input_vec(),
            output: fft.make_output_vec(),
            scratch: fft.make_scratch_vec(),
            fft,
            fft_size,
        }
    }

    /// Write the `fft_size / 2` magnitude bins of `samples` into `out`.
    ///
    /// Uses the packed real-FFT layout: every bin is scaled by `1 / (2N)`
    /// after the factor-two gain of the packed transform, and bin 0 holds DC
    /// and Nyquist together as one complex value.
    pub fn magnitudes(&mut self, samples: &[f32], out: &mut [f32]) {
        let half = self.fft_size / 2;
        debug_assert_eq!(samples.len(), self.fft_size);
        debug_assert_eq!(out.len(), half);

        self.input.copy_from_slice(samples);
        if let Err(e) = self
            .fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch)
        {
            log::error!("Real FFT of length {} failed: {}", self.fft_size, e);
            out.fill(0.0);
            return;
        }

        // packed transform yields 2·X[k]; scaled by 1/(2N) that leaves X[k]/N
        let scale = 2.0 / (2.0 * self.fft_size as f32);

        out[0] = self.output[0].re.hypot(self.output[half].re) * scale;
        for (m, c) in out[1..].iter_mut().zip(&self.output[1..half]) {
            *m = c.norm() * scale;
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}
