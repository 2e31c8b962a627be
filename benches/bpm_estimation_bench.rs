//! Benchmarks the stages of the tempo estimation on one default-sized window
//! and the whole estimation on a short track.
//!
//! To run these, run `$ cargo bench --bench bpm_estimation_bench`

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use wavelet_bpm_detector::correlation::correlate;
use wavelet_bpm_detector::stdlib::analyze_track_parallel;
use wavelet_bpm_detector::{
    analyze_track, Daubechies8, WaveletTransform, WindowBpmEstimator, DEFAULT_LEVELS,
    DEFAULT_WINDOW_LEN,
};

const SAMPLE_RATE: f64 = 44100.0;

fn criterion_benchmark(c: &mut Criterion) {
    let window = samples::click_track(SAMPLE_RATE, 120.0, DEFAULT_WINDOW_LEN);
    let estimator = WindowBpmEstimator::new(SAMPLE_RATE).unwrap();

    c.bench_function(
        &format!("decompose {DEFAULT_WINDOW_LEN} samples ({DEFAULT_LEVELS} levels)"),
        |b| {
            let transform = Daubechies8::new();
            b.iter(|| {
                let _ = black_box(transform.decompose(black_box(&window), DEFAULT_LEVELS));
            })
        },
    );

    // Length of the combined envelope of a default window.
    let envelope = &window[..DEFAULT_WINDOW_LEN / 16];
    c.bench_function(
        &format!("autocorrelation of {} samples", envelope.len()),
        |b| {
            b.iter(|| {
                let _ = black_box(correlate(black_box(envelope)));
            })
        },
    );

    c.bench_function(
        &format!("estimate tempo of {DEFAULT_WINDOW_LEN} samples"),
        |b| {
            b.iter(|| {
                let _ = black_box(estimator.estimate(black_box(&window)));
            })
        },
    );

    let track = samples::click_track(SAMPLE_RATE, 120.0, DEFAULT_WINDOW_LEN * 8);
    let mut group = c.benchmark_group("track analysis");
    group.sample_size(10);
    group.bench_function("8 windows (sequential)", |b| {
        b.iter(|| {
            let _ = black_box(analyze_track(&estimator, black_box(&track), DEFAULT_WINDOW_LEN));
        })
    });
    group.bench_function("8 windows (parallel)", |b| {
        b.iter(|| {
            let _ = black_box(analyze_track_parallel(
                &estimator,
                black_box(&track),
                DEFAULT_WINDOW_LEN,
            ));
        })
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

mod samples {
    use std::f64::consts::PI;

    /// Returns `len` samples of a click track with `bpm` beats per minute,
    /// slightly disturbed by noise.
    pub fn click_track(sample_rate_hz: f64, bpm: f64, len: usize) -> Vec<f64> {
        let period = (60.0 / bpm * sample_rate_hz) as usize;
        let click_len = (0.1 * sample_rate_hz) as usize;
        (0..len)
            .map(|i| {
                let t = (i % period) as f64 / sample_rate_hz;
                let click = if i % period < click_len {
                    0.8 * (2.0 * PI * 100.0 * t).sin() * (-t / 0.02).exp()
                } else {
                    0.0
                };
                click + (rand::random::<f64>() - 0.5) * 0.02
            })
            .collect()
    }
}
