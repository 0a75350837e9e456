//! Core analysis modules

pub mod capture;
pub mod decoder;
pub mod dsp;
pub mod mel;
pub mod processor;

pub use capture::{pcm16_to_f32, run_frames, CaptureStats, FrameChunker};
pub use decoder::{decode_mono, DecodedAudio};
pub use mel::{hz_to_mel, mel_to_hz, FrequencyRange, MelFilterBank};
pub use processor::{
    FrameOutcome, ProcessorOptions, ProcessorState, SpectralFrameProcessor, StageObserver,
    StageRecorder,
};
