// tests/test_utils/mod.rs
//
// Shared helpers: synthetic signals, WAV fixtures and binary invocation.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use uuid::Uuid;

pub const SAMPLE_RATE: u32 = 48_000;

/// Directory under the system temp dir, removed on drop
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{}-{}", prefix, Uuid::new_v4()));
        fs::create_dir_all(&path).expect("Failed to create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn sine(freq: f32, sample_rate: u32, len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
        .collect()
}

/// Harmonic series on `f0` shaped by resonances at `formants` (Hz).
/// Peak-normalized to 0.5.
pub fn synth_vowel(f0: f32, formants: &[f32], sample_rate: u32, len: usize) -> Vec<f32> {
    let nyquist = sample_rate as f32 / 2.0;
    let bandwidth = 120.0;
    let mut signal = vec![0.0f32; len];

    let mut harmonic = 1;
    while (harmonic as f32 * f0) < nyquist.min(8_000.0) {
        let freq = harmonic as f32 * f0;
        let gain: f32 = formants
            .iter()
            .map(|f| 1.0 / (1.0 + ((freq - f) / bandwidth).powi(2)))
            .sum::<f32>()
            + 0.01;
        for (i, s) in signal.iter_mut().enumerate() {
            *s += gain * (2.0 * PI * freq * i as f32 / sample_rate as f32).sin();
        }
        harmonic += 1;
    }

    let peak = signal.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > 0.0 {
        for s in &mut signal {
            *s *= 0.5 / peak;
        }
    }
    signal
}

/// Open-vowel envelope (/a/)
pub fn vowel_a(f0: f32, len: usize) -> Vec<f32> {
    synth_vowel(f0, &[800.0, 1_200.0, 2_500.0], SAMPLE_RATE, len)
}

/// Close front envelope (/i/)
pub fn vowel_i(f0: f32, len: usize) -> Vec<f32> {
    synth_vowel(f0, &[300.0, 2_300.0, 3_000.0], SAMPLE_RATE, len)
}

/// 16-bit PCM WAV, samples in [-1, 1], `channels` interleaved copies
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create WAV");
    for s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value).expect("Failed to write sample");
        }
    }
    writer.finalize().expect("Failed to finalize WAV");
}

pub fn write_mono_wav(path: &Path, samples: &[f32]) {
    write_wav(path, samples, SAMPLE_RATE, 1);
}

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vowel-mfcc"))
}

/// Run the binary against an isolated store
pub fn run_vowel_mfcc(store: &Path, args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .arg("--store")
        .arg(store)
        .args(args)
        .env_remove("VOWEL_MFCC_CONFIG")
        .output()
        .expect("Failed to execute vowel-mfcc")
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}
