//! Estimates the tempo of a WAV file.
//!
//! Usage: `$ cargo run --release --example wav-file-tempo -- <file.wav>`

use log::LevelFilter;
use std::process::exit;
use std::time::Instant;
use wavelet_bpm_detector::stdlib::analyze_track_parallel;
use wavelet_bpm_detector::util::pcm16_interleaved_to_mono;
use wavelet_bpm_detector::{WindowBpmEstimator, DEFAULT_WINDOW_LEN};

/// Reads a 16-bit WAV file to mono samples in range `-1.0..=1.0`.
fn read_wav_to_mono(path: &str) -> (Vec<f64>, hound::WavSpec) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let header = reader.spec();
    let interleaved = reader
        .samples::<i16>()
        .map(|s| s.unwrap())
        .collect::<Vec<_>>();
    let samples = pcm16_interleaved_to_mono(&interleaved, usize::from(header.channels)).collect();
    (samples, header)
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: wav-file-tempo <file.wav>");
        exit(1);
    };

    let (samples, header) = read_wav_to_mono(&path);
    log::info!(
        "{path}: {} samples at {} Hz ({:.1} s)",
        samples.len(),
        header.sample_rate,
        samples.len() as f64 / header.sample_rate as f64
    );

    let estimator = WindowBpmEstimator::new(header.sample_rate as f64).unwrap();
    let now = Instant::now();
    let estimates = analyze_track_parallel(&estimator, &samples, DEFAULT_WINDOW_LEN);
    log::info!("Analysis took {:?}", now.elapsed());

    for (i, estimate) in estimates.estimates().enumerate() {
        match estimate {
            Some(bpm) => println!("window {i:>3}: {bpm:.1} BPM"),
            None => println!("window {i:>3}: -"),
        }
    }

    match estimates.track_bpm() {
        Ok(bpm) => println!("track: {bpm:.1} BPM"),
        Err(e) => {
            eprintln!("track: {e}");
            exit(1);
        }
    }
}
