// tests/pipeline_test.rs
//
// End-to-end tests of the library pipeline: filter bank, frame processor,
// file decoding, snapshots and classification.

mod test_utils;

use std::sync::Arc;

use test_utils::*;
use vowel_mfcc::classify::{Classifier, NearestNeighbors};
use vowel_mfcc::cli::analyze_file;
use vowel_mfcc::config::{PipelineConfig, PipelineConfigBuilder, PipelinePreset};
use vowel_mfcc::core::dsp::argmax;
use vowel_mfcc::core::{
    decode_mono, run_frames, FrameOutcome, FrequencyRange, MelFilterBank, SpectralFrameProcessor,
    StageRecorder,
};
use vowel_mfcc::storage::{Snapshot, SnapshotStore, Vowel};

#[test]
fn test_sine_through_cd_rate_pipeline() {
    let bank = Arc::new(
        MelFilterBank::build(
            FrequencyRange::new(0.0, 22_050.0),
            FrequencyRange::new(300.0, 8_000.0),
            512,
            32,
        )
        .unwrap(),
    );
    let processor = SpectralFrameProcessor::new(1024, Arc::clone(&bank)).unwrap();

    let frame = sine(440.0, 44_100, 1024, 1.0);
    let mut recorder = StageRecorder::new();
    let outcome = processor.analyze(&frame, 44_100.0, &mut recorder).unwrap();

    assert_eq!(outcome, FrameOutcome::Analyzed);
    assert_eq!(recorder.spectrum.len(), 512);
    assert_eq!(recorder.coefficients.len(), 32);
    assert!(recorder.coefficients.iter().all(|c| c.is_finite()));

    // 440 / 22050 * 512 ≈ 10.2
    let peak = argmax(&recorder.spectrum).unwrap();
    println!("Spectrum peak at bin {}", peak);
    assert!((9..=11).contains(&peak));

    let loudest = argmax(&recorder.mel_energies).unwrap();
    println!("Loudest mel band {}", loudest);
    assert!(loudest <= 3);
}

#[test]
fn test_decoded_wav_matches_in_memory_signal() {
    let dir = TempDir::new("vowel-mfcc-decode");
    let signal = vowel_a(150.0, 8 * 1024 + 100);
    let path = dir.join("a.wav");
    write_mono_wav(&path, &signal);

    let audio = decode_mono(&path).unwrap();
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.source_channels, 1);
    assert_eq!(audio.samples.len(), signal.len());

    let processor = PipelineConfig::default().build_pipeline().unwrap();

    let mut from_file = StageRecorder::new();
    let stats = run_frames(&processor, &audio.samples, SAMPLE_RATE as f64, &mut from_file).unwrap();
    assert_eq!(stats.frames_analyzed, 8);
    assert_eq!(stats.frames_dropped, 0);
    assert_eq!(stats.samples_discarded, 100);

    let mut from_memory = StageRecorder::new();
    run_frames(&processor, &signal, SAMPLE_RATE as f64, &mut from_memory).unwrap();

    // 16-bit quantization only perturbs the coefficients slightly
    for (a, b) in from_file.coefficients.iter().zip(&from_memory.coefficients) {
        assert!((a - b).abs() < 0.05 * b.abs().max(1.0), "{} vs {}", a, b);
    }
    assert_eq!(processor.frames_analyzed(), 16);
    assert_eq!(processor.last_sample_rate(), Some(SAMPLE_RATE as f64));
}

#[test]
fn test_stereo_file_is_downmixed() {
    let dir = TempDir::new("vowel-mfcc-stereo");
    let signal = vowel_i(180.0, 4 * 1024);
    let mono = dir.join("mono.wav");
    let stereo = dir.join("stereo.wav");
    write_wav(&mono, &signal, SAMPLE_RATE, 1);
    write_wav(&stereo, &signal, SAMPLE_RATE, 2);

    let processor = PipelineConfig::default().build_pipeline().unwrap();
    let mono_report = analyze_file(&mono, &processor).unwrap();
    let stereo_report = analyze_file(&stereo, &processor).unwrap();

    assert_eq!(stereo_report.source_channels, 2);
    assert_eq!(stereo_report.frames_analyzed, 4);
    assert_eq!(mono_report.mean_coefficients, stereo_report.mean_coefficients);
}

#[test]
fn test_processors_sharing_a_bank_agree() {
    let config = PipelineConfig::from_preset(PipelinePreset::Narrowband);
    let bank = config.build_filter_bank().unwrap();
    let first = config.build_processor(Arc::clone(&bank)).unwrap();
    let second = config.build_processor(Arc::clone(&bank)).unwrap();

    let signal = synth_vowel(200.0, &[500.0, 1_500.0], 16_000, 512);
    let mut a = StageRecorder::new();
    let mut b = StageRecorder::new();
    first.analyze(&signal, 16_000.0, &mut a).unwrap();
    second.analyze(&signal, 16_000.0, &mut b).unwrap();

    assert_eq!(a.coefficients, b.coefficients);
    assert_eq!(Arc::strong_count(&bank), 3);
}

#[test]
fn test_silence_yields_finite_coefficients() {
    let processor = PipelineConfigBuilder::new()
        .num_filters(20)
        .build()
        .unwrap()
        .build_pipeline()
        .unwrap();

    let mut recorder = StageRecorder::new();
    processor.analyze(&vec![0.0; 1024], 48_000.0, &mut recorder).unwrap();

    assert!(recorder.normalized.iter().all(|s| *s == 0.0));
    assert!(recorder.coefficients.iter().all(|c| c.is_finite()));
    // every band sits on the floor: log10(1e-10) * 20 in DC, nothing else
    assert!((recorder.coefficients[0] + 200.0).abs() < 1e-2);
    assert!(recorder.coefficients[1..].iter().all(|c| c.abs() < 1e-2));
}

#[test]
fn test_snapshot_then_classify() {
    let dir = TempDir::new("vowel-mfcc-classify");
    let processor = PipelineConfig::default().build_pipeline().unwrap();
    let len = SAMPLE_RATE as usize / 2;

    let takes = [
        ("a_low.wav", Vowel::A, vowel_a(120.0, len)),
        ("a_high.wav", Vowel::A, vowel_a(170.0, len)),
        ("i_low.wav", Vowel::I, vowel_i(120.0, len)),
        ("i_high.wav", Vowel::I, vowel_i(170.0, len)),
    ];

    let mut store = SnapshotStore::open(dir.join("snapshot.json"));
    for (name, vowel, signal) in &takes {
        let path = dir.join(name);
        write_mono_wav(&path, signal);
        let report = analyze_file(&path, &processor).unwrap();
        store.append(Snapshot::new(*vowel, report.mean_coefficients)).unwrap();
    }

    let reloaded = SnapshotStore::open(dir.join("snapshot.json"));
    assert_eq!(reloaded.len(), 4);
    let classifier = NearestNeighbors::from_snapshots(1, reloaded.snapshots());

    for (name, expected, signal) in [
        ("a_test.wav", Vowel::A, vowel_a(145.0, len)),
        ("i_test.wav", Vowel::I, vowel_i(145.0, len)),
    ] {
        let path = dir.join(name);
        write_mono_wav(&path, &signal);
        let report = analyze_file(&path, &processor).unwrap();
        let result = classifier.classify(&report.mean_coefficients).unwrap();
        println!("{} → {} ({:.0}%)", name, result.label, result.confidence * 100.0);
        assert_eq!(result.label, expected);
    }
}
