//! Configuration module for the MFCC pipeline

mod pipeline;

pub use pipeline::{PipelineConfig, PipelineConfigBuilder, PipelinePreset};
