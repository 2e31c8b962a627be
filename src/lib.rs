/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Tempo estimation for music in beats per minute (BPM), based on the
//! discrete wavelet transform (DWT) and autocorrelation.
//!
//! The library follows the approach of Tzanetakis, Essl and Cook ("Audio
//! Analysis using the Discrete Wavelet Transform", 2001). A window of mono
//! samples is decomposed into frequency sub-bands, the envelopes of all
//! sub-bands are summed up, and the periodicity of that sum reveals the tempo.
//! A whole track is split into windows whose estimates are reduced to one
//! tempo via the median.
//!
//! The library is `no_std`-compatible but needs `alloc`. The `std` feature
//! enables parallel track analysis. The `recording` feature (default) enables
//! live tempo estimation from an audio input device via [`cpal`].
//!
//! ## Example
//! ```rust
//! use wavelet_bpm_detector::{analyze_track, WindowBpmEstimator, DEFAULT_WINDOW_LEN};
//!
//! let sample_rate = 44100.0;
//! let estimator = WindowBpmEstimator::new(sample_rate).unwrap();
//! // Mono samples in range `-1.0..=1.0`, e.g., decoded from a WAV file.
//! let samples = vec![0.0; DEFAULT_WINDOW_LEN * 2];
//! let estimates = analyze_track(&estimator, &samples, DEFAULT_WINDOW_LEN);
//! // Silence has no tempo.
//! assert!(estimates.track_bpm().is_err());
//! ```
//!
//! [`cpal`]: https://crates.io/crates/cpal

#![no_std]
#![deny(missing_debug_implementations)]

extern crate alloc;

#[cfg_attr(any(test, feature = "std"), macro_use)]
#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(test)]
#[macro_use]
extern crate assert2;

#[cfg(test)]
#[macro_use]
extern crate float_cmp;

mod config;
mod track;
mod wavelet;
mod window_estimator;

/// PRIVATE. For tests.
#[cfg(test)]
mod test_utils;

pub mod correlation;
pub mod envelope;
#[cfg(feature = "std")]
pub mod stdlib;
pub mod util;

pub use config::{
    ConfigurationError, EstimatorConfig, TempoSearch, DEFAULT_LEVELS, DEFAULT_MAX_TEMPO_BPM,
    DEFAULT_MIN_TEMPO_BPM,
};
pub use track::{
    analyze_track, estimate_track_bpm, median, TrackBpmAggregator, TrackError, DEFAULT_WINDOW_LEN,
};
pub use wavelet::{Daubechies8, DecompositionError, DecompositionLevel, WaveletTransform};
pub use window_estimator::{EstimationError, WindowBpmEstimator};

/// Estimates the tempo of a single window of mono samples in beats per
/// minute, using the default [`EstimatorConfig`].
///
/// This is a convenience wrapper around [`WindowBpmEstimator`]. When many
/// windows of the same source are analyzed, create the estimator once
/// instead.
pub fn estimate_window_bpm(samples: &[f64], sample_rate_hz: f64) -> Result<f64, EstimationError> {
    WindowBpmEstimator::new(sample_rate_hz)?.estimate(samples)
}
