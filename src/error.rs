// src/error.rs
//
// Error type for pipeline construction and frame analysis.

use thiserror::Error;

/// Errors raised by the MFCC pipeline.
///
/// Everything except `FrameLengthMismatch` is a configuration error and is
/// reported at construction time; a pipeline that built successfully never
/// fails on a correctly sized frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MfccError {
    #[error("invalid filter bank configuration: {0}")]
    InvalidFilterBankConfig(String),

    #[error("frame size {0} is not a power of two (minimum 2)")]
    FrameSizeNotPowerOfTwo(usize),

    #[error("filter bank has {bank_bins} bins but frame size {frame_size} needs {expected}")]
    FilterBankMismatch {
        frame_size: usize,
        bank_bins: usize,
        expected: usize,
    },

    #[error("frame length ({given}) must equal configured frame size ({expected})")]
    FrameLengthMismatch { given: usize, expected: usize },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MfccError>;
