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

//! Reduction of per-window tempo estimates into one tempo for a whole track.

use crate::window_estimator::{EstimationError, WindowBpmEstimator};
use crate::wavelet::WaveletTransform;
use alloc::vec::Vec;
use thiserror::Error;

/// Default window length in samples. At 44.1 kHz, this is roughly three
/// seconds of audio, which is long enough for the combined envelope to cover
/// the whole default tempo range.
pub const DEFAULT_WINDOW_LEN: usize = 131072;

/// Possible errors when reducing the window estimates of a track.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// None of the windows produced a valid estimate.
    #[error("no valid window estimate ({invalid} invalid)")]
    NoValidEstimates { invalid: usize },
}

/// Collects the tempo estimates of all windows of a track in the order they
/// arrive and reduces them to one tempo via the median.
///
/// The collection is append-only. Windows without a valid estimate are kept
/// as invalid entries so that the position of every window stays known; they
/// are skipped by the median.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBpmAggregator {
    estimates: Vec<Option<f64>>,
}

impl TrackBpmAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            estimates: Vec::new(),
        }
    }

    /// Adds the result of the next window.
    pub fn push(&mut self, estimate: Result<f64, EstimationError>) {
        match estimate {
            Ok(bpm) => self.push_bpm(bpm),
            Err(e) => {
                log::debug!("window #{} has no valid estimate: {e}", self.estimates.len());
                self.estimates.push(None);
            }
        }
    }

    /// Adds the tempo of the next window. Non-finite values are recorded as
    /// invalid.
    pub fn push_bpm(&mut self, bpm: f64) {
        if bpm.is_finite() {
            self.estimates.push(Some(bpm));
        } else {
            log::debug!("window #{} has a non-finite estimate: {bpm}", self.estimates.len());
            self.estimates.push(None);
        }
    }

    /// Returns the estimates in window order; `None` marks an invalid window.
    pub fn estimates(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.estimates.iter().copied()
    }

    /// Returns the valid estimates in window order.
    pub fn valid_estimates(&self) -> impl Iterator<Item = f64> + '_ {
        self.estimates.iter().flatten().copied()
    }

    /// Number of windows seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    /// Whether no window has been seen so far.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Number of windows with a valid estimate.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid_estimates().count()
    }

    /// Number of windows without a valid estimate.
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.len() - self.valid_count()
    }

    /// Returns the median of all valid estimates.
    pub fn track_bpm(&self) -> Result<f64, TrackError> {
        let valid = self.valid_estimates().collect::<Vec<_>>();
        median(&valid).ok_or(TrackError::NoValidEstimates {
            invalid: self.invalid_count(),
        })
    }
}

impl Extend<Result<f64, EstimationError>> for TrackBpmAggregator {
    fn extend<I: IntoIterator<Item = Result<f64, EstimationError>>>(&mut self, iter: I) {
        iter.into_iter().for_each(|estimate| self.push(estimate));
    }
}

impl FromIterator<Result<f64, EstimationError>> for TrackBpmAggregator {
    fn from_iter<I: IntoIterator<Item = Result<f64, EstimationError>>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}

/// Median of the values: sort ascending, take the middle element for an odd
/// count and the mean of the two middle elements for an even count. Returns
/// `None` for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        len if len % 2 == 1 => Some(sorted[mid]),
        _ => Some((sorted[mid - 1] + sorted[mid]) / 2.0),
    }
}

/// Reduces the tempo estimates of all windows of a track to the track's
/// tempo (median). Non-finite estimates are skipped.
pub fn estimate_track_bpm(window_bpms: &[f64]) -> Result<f64, TrackError> {
    window_bpms
        .iter()
        .copied()
        .fold(TrackBpmAggregator::new(), |mut aggregator, bpm| {
            aggregator.push_bpm(bpm);
            aggregator
        })
        .track_bpm()
}

/// Splits a whole track into consecutive windows of `window_len` samples and
/// estimates the tempo of each of them. A trailing partial window is
/// ignored.
///
/// # Panics
/// If `window_len` is zero.
pub fn analyze_track<T: WaveletTransform>(
    estimator: &WindowBpmEstimator<T>,
    samples: &[f64],
    window_len: usize,
) -> TrackBpmAggregator {
    assert!(window_len > 0, "window length must not be zero");
    samples
        .chunks_exact(window_len)
        .map(|window| estimator.estimate(window))
        .collect()
}
