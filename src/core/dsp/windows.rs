//! Window function implementations

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Hamming,
    Hann,
    Rectangular,
}

impl WindowType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "hamming" | "hamm" => Some(Self::Hamming),
            "hann" | "hanning" => Some(Self::Hann),
            "rectangular" | "rect" | "none" => Some(Self::Rectangular),
            _ => None,
        }
    }
}

/// Fill `out` with the periodic form of the window, `w[n] = a - (1 - a) cos(2πn/N)`.
pub fn fill_window(out: &mut [f32], window_type: WindowType) {
    let n = out.len() as f32;
    let a = match window_type {
        WindowType::Hamming => 0.54,
        WindowType::Hann => 0.5,
        WindowType::Rectangular => {
            out.fill(1.0);
            return;
        }
    };
    for (i, w) in out.iter_mut().enumerate() {
        *w = a - (1.0 - a) * (2.0 * PI * i as f32 / n).cos();
    }
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    let mut window = vec![0.0; size];
    fill_window(&mut window, window_type);
    window
}
