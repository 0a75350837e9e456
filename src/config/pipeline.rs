// src/config/pipeline.rs
//
// Construction-time parameters of the MFCC pipeline.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::core::dsp::{LogFloor, WindowType};
use crate::core::mel::{FrequencyRange, MelFilterBank};
use crate::core::processor::{ProcessorOptions, SpectralFrameProcessor};
use crate::error::{MfccError, Result};

/// Named parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePreset {
    /// 1024-sample frames, 32 filters over 300–8000 Hz on a 0–24 kHz axis
    Reference,
    /// 16 kHz telephone band: 512-sample frames, 24 filters over 300–3400 Hz
    Narrowband,
}

impl PipelinePreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "reference" | "default" => Some(Self::Reference),
            "narrowband" | "telephone" => Some(Self::Narrowband),
            _ => None,
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Reference, Self::Narrowband]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Narrowband => "narrowband",
        }
    }
}

/// Pipeline configuration. Fixed once a pipeline is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub num_bins: usize,
    pub num_filters: usize,
    pub frame_size: usize,
    pub window: WindowType,
    /// Frequency axis sampled by the spectrum bins
    pub source_range: FrequencyRange,
    /// Band covered by the mel filters
    pub target_range: FrequencyRange,
    pub log_floor: LogFloor,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_preset(PipelinePreset::Reference)
    }
}

impl PipelineConfig {
    pub fn from_preset(preset: PipelinePreset) -> Self {
        match preset {
            PipelinePreset::Reference => Self {
                source_range: FrequencyRange::new(0.0, 24_000.0),
                target_range: FrequencyRange::new(300.0, 8_000.0),
                num_bins: 512,
                num_filters: 32,
                frame_size: 1024,
                window: WindowType::Hamming,
                log_floor: LogFloor::default(),
            },
            PipelinePreset::Narrowband => Self {
                source_range: FrequencyRange::new(0.0, 8_000.0),
                target_range: FrequencyRange::new(300.0, 3_400.0),
                num_bins: 256,
                num_filters: 24,
                frame_size: 512,
                window: WindowType::Hamming,
                log_floor: LogFloor::default(),
            },
        }
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid pipeline configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize pipeline configuration")
    }

    /// Check cross-field constraints without building anything
    pub fn validate(&self) -> Result<()> {
        if self.frame_size < 2 || !self.frame_size.is_power_of_two() {
            return Err(MfccError::FrameSizeNotPowerOfTwo(self.frame_size));
        }
        if self.num_bins != self.frame_size / 2 {
            return Err(MfccError::FilterBankMismatch {
                frame_size: self.frame_size,
                bank_bins: self.num_bins,
                expected: self.frame_size / 2,
            });
        }
        if self.num_filters == 0 {
            return Err(MfccError::InvalidConfig("num_filters must be greater than zero".into()));
        }
        if let LogFloor::Epsilon(eps) = self.log_floor {
            if !(eps > 0.0 && eps.is_finite()) {
                return Err(MfccError::InvalidConfig(format!(
                    "log floor must be a positive finite value, got {eps}"
                )));
            }
        }
        Ok(())
    }

    pub fn build_filter_bank(&self) -> Result<Arc<MelFilterBank>> {
        MelFilterBank::build(self.source_range, self.target_range, self.num_bins, self.num_filters)
            .map(Arc::new)
    }

    /// Processor over an existing (possibly shared) filter bank
    pub fn build_processor(&self, filter_bank: Arc<MelFilterBank>) -> Result<SpectralFrameProcessor> {
        let options = ProcessorOptions {
            window: self.window,
            log_floor: self.log_floor,
        };
        SpectralFrameProcessor::with_options(self.frame_size, filter_bank, options)
    }

    /// Filter bank and processor in one step
    pub fn build_pipeline(&self) -> Result<SpectralFrameProcessor> {
        self.validate()?;
        self.build_processor(self.build_filter_bank()?)
    }
}

/// Builder for custom pipeline configurations
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn from_preset(preset: PipelinePreset) -> Self {
        Self {
            config: PipelineConfig::from_preset(preset),
        }
    }

    pub fn source_range(mut self, lower: f32, upper: f32) -> Self {
        self.config.source_range = FrequencyRange::new(lower, upper);
        self
    }

    pub fn target_range(mut self, lower: f32, upper: f32) -> Self {
        self.config.target_range = FrequencyRange::new(lower, upper);
        self
    }

    /// Sets the frame size and the matching `frame_size / 2` bin count
    pub fn frame_size(mut self, frame_size: usize) -> Self {
        self.config.frame_size = frame_size;
        self.config.num_bins = frame_size / 2;
        self
    }

    pub fn num_filters(mut self, num_filters: usize) -> Self {
        self.config.num_filters = num_filters;
        self
    }

    pub fn window(mut self, window: WindowType) -> Self {
        self.config.window = window;
        self
    }

    pub fn log_floor(mut self, floor: LogFloor) -> Self {
        self.config.log_floor = floor;
        self
    }

    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
