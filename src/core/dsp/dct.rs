//! Type-II DCT and log compression for the cepstral stage

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Lower clamp applied before the base-10 logarithm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode", content = "epsilon")]
pub enum LogFloor {
    /// Plain `log10`; silent bands become `-inf`, negative inputs NaN
    None,
    /// Clamp inputs to at least this positive value
    Epsilon(f32),
}

impl Default for LogFloor {
    fn default() -> Self {
        Self::Epsilon(1e-10)
    }
}

/// Element-wise `log10` of `input` into `output`
pub fn log10_compress(input: &[f32], output: &mut [f32], floor: LogFloor) {
    debug_assert_eq!(input.len(), output.len());
    match floor {
        LogFloor::None => {
            for (o, &x) in output.iter_mut().zip(input) {
                *o = x.log10();
            }
        }
        LogFloor::Epsilon(eps) => {
            for (o, &x) in output.iter_mut().zip(input) {
                *o = x.max(eps).log10();
            }
        }
    }
}

/// Unnormalized DCT-II of fixed length:
/// `C[k] = Σ x[j] · cos(π k (2j + 1) / 2n)`
pub struct Dct2 {
    len: usize,
    /// Row-major `len × len` cosine table, row k holds the k-th basis
    table: Vec<f32>,
}

impl Dct2 {
    pub fn new(len: usize) -> Self {
        let n = len as f32;
        let mut table = Vec::with_capacity(len * len);
        for k in 0..len {
            for j in 0..len {
                table.push((PI * k as f32 * (2.0 * j as f32 + 1.0) / (2.0 * n)).cos());
            }
        }
        Self { len, table }
    }

    pub fn process(&self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), self.len);
        debug_assert_eq!(output.len(), self.len);

        for (basis, out) in self.table.chunks_exact(self.len).zip(output.iter_mut()) {
            *out = basis.iter().zip(input).map(|(c, x)| c * x).sum();
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
