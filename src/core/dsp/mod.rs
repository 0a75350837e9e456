//! Digital Signal Processing utilities

pub mod dct;
pub mod fft;
pub mod stats;
pub mod windows;

pub use dct::{log10_compress, Dct2, LogFloor};
pub use fft::RealSpectrum;
pub use stats::{argmax, mean_and_std_dev, normalize_in_place, rms, Normalization};
pub use windows::{create_window, fill_window, WindowType};
